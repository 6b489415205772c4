//! Phase 1: passive full descent then ascent of the scroll surface, small
//! fixed steps, to trigger lazy-loaded content before any interaction.

use super::{surface, wire};
use crate::backend::{Backend, BackendError};
use crate::explore::surface::ScrollTarget;
use crate::tuning::Tuning;

/// Positions closer than this are treated as unchanged.
pub(crate) const POSITION_EPSILON: f64 = 0.5;

/// Descend the surface until the bottom is confirmed or the position stops
/// moving. The extent is re-read after every step because infinite-scroll
/// pages grow while being scrolled.
pub async fn descend(
    backend: &mut dyn Backend,
    surface: &mut ScrollTarget,
    tuning: &Tuning,
) -> Result<(), BackendError> {
    let mut current = wire::metrics(backend, surface.container()).await?;

    // A page that reports no scroll range at position 0 may have grown a
    // scrollable container since the surface was resolved.
    if surface.container().is_none() && current.extent <= 0.0 && current.position <= 0.0 {
        *surface = surface::resolve(backend).await?;
        if surface.is_noop() {
            return Ok(());
        }
        current = wire::metrics(backend, surface.container()).await?;
    }

    let container = surface.container();
    let mut position = current.position;
    let mut extent = current.extent;
    let mut stuck = 0u32;

    loop {
        if position >= extent {
            if extent <= 0.0 {
                break;
            }
            tokio::time::sleep(tuning.bottom_confirm_delay()).await;
            let confirm = wire::metrics(backend, container).await?;
            if confirm.extent <= extent + POSITION_EPSILON {
                break; // confirmed bottom
            }
            extent = confirm.extent;
            surface.scroll_extent = extent;
            continue;
        }

        wire::set_scroll(backend, container, position + tuning.descend_step).await?;
        tokio::time::sleep(tuning.descend_delay()).await;

        let now = wire::metrics(backend, container).await?;
        if (now.position - position).abs() < POSITION_EPSILON {
            stuck += 1;
            if stuck > tuning.stuck_threshold && now.extent > 0.0 {
                tracing::warn!(
                    "descent stuck at {:.0}px after {} attempts, aborting",
                    position,
                    stuck
                );
                return Ok(());
            }
        } else {
            stuck = 0;
        }
        position = now.position;
        extent = now.extent;
        surface.scroll_extent = extent;
    }

    Ok(())
}

/// Ascend symmetrically back to the top, then force the position to exactly
/// zero so Phase 2 starts from a known offset.
pub async fn ascend(
    backend: &mut dyn Backend,
    surface: &ScrollTarget,
    tuning: &Tuning,
) -> Result<(), BackendError> {
    let container = surface.container();
    let mut position = wire::metrics(backend, container).await?.position;
    let mut stuck = 0u32;

    while position > 0.0 {
        let target = (position - tuning.descend_step).max(0.0);
        wire::set_scroll(backend, container, target).await?;
        tokio::time::sleep(tuning.descend_delay()).await;

        let now = wire::metrics(backend, container).await?;
        if (now.position - position).abs() < POSITION_EPSILON {
            stuck += 1;
            if stuck > tuning.stuck_threshold {
                tracing::warn!("ascent stuck at {:.0}px, aborting", position);
                break;
            }
        } else {
            stuck = 0;
        }
        position = now.position;
    }

    wire::set_scroll(backend, container, 0.0).await?;
    Ok(())
}
