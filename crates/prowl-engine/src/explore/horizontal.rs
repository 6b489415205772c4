//! Horizontal scroll probe: exercise independently horizontally-scrollable
//! regions inside the current viewport, round-tripping each one so the page
//! is left visually untouched.

use std::collections::HashSet;

use super::wire;
use crate::backend::{Backend, BackendError};
use crate::tuning::Tuning;

/// Probe every qualifying, unvisited, in-viewport region once. Returns how
/// many regions were exercised this iteration. The visited set lives for
/// the whole Phase-2 pass, keyed by the stable probe id, so a region is
/// never reprocessed on a later iteration.
pub async fn probe(
    backend: &mut dyn Backend,
    tuning: &Tuning,
    visited: &mut HashSet<u32>,
) -> Result<u32, BackendError> {
    let candidates = wire::collect_horizontals(backend).await?;
    let mut count = 0u32;

    for region in candidates {
        if visited.contains(&region.id) || !region.in_viewport {
            continue;
        }

        let overflow = region.content_width - region.viewport_width;
        let styled_scrollable = matches!(region.overflow_x.as_str(), "auto" | "scroll");
        if overflow <= tuning.hscroll_tolerance && !(styled_scrollable && overflow > 0.0) {
            continue;
        }

        let origin = region.position;
        let reached = match wire::set_horizontal(backend, region.id, origin + tuning.hscroll_offset)
            .await
        {
            Ok(result) => result.position,
            Err(e) if e.is_fatal() => return Err(e),
            Err(_) => continue,
        };
        tokio::time::sleep(tuning.hscroll_settle()).await;

        // Overflowing but immobile (e.g. clipped by a parent): leave it
        // unmarked so nothing pretends it was exercised.
        if (reached - origin).abs() < super::vertical::POSITION_EPSILON {
            continue;
        }

        match wire::set_horizontal(backend, region.id, origin).await {
            Ok(_) => {}
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => tracing::debug!("restore of region {} failed: {}", region.id, e),
        }

        visited.insert(region.id);
        count += 1;
    }

    Ok(count)
}
