//! Phase 2: re-traverse the surface in fixed increments and run the input,
//! click and horizontal probes at every position.

use std::collections::HashSet;

use super::{clicks, horizontal, inputs, surface, wire};
use crate::backend::{Backend, BackendError};
use crate::tuning::Tuning;
use prowl_common::trace::{Step, Trace};

/// One bounded, position-advancing interaction pass.
///
/// The scroll extent is measured once at entry and never re-checked:
/// content appended below it during the pass is not scanned. That is the
/// documented behavior, not an oversight to fix. The loop body always runs
/// at least once so non-scrolling pages still get probed at position 0.
///
/// Only fatal backend errors escape; everything else degrades to a step or
/// error entry and the loop keeps advancing.
pub async fn interaction_pass(
    backend: &mut dyn Backend,
    tuning: &Tuning,
    trace: &mut Trace,
    max_clicks: u32,
) -> Result<(), BackendError> {
    let surface = surface::resolve(backend).await?;
    let container = surface.container();
    let extent = surface.scroll_extent;

    let mut inputs_done = 0u32;
    let mut clicks_done = 0u32;
    let mut handled_clickables: HashSet<u32> = HashSet::new();
    let mut visited_regions: HashSet<u32> = HashSet::new();
    let mut position = 0.0f64;

    loop {
        match wire::set_scroll(backend, container, position).await {
            Ok(_) => trace.push_step(Step::Scroll { position }),
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => trace.push_step(Step::ScrollError {
                message: e.to_string(),
            }),
        }
        tokio::time::sleep(tuning.scan_settle()).await;

        if inputs_done < tuning.input_budget {
            match inputs::probe(backend, tuning, trace, tuning.input_budget - inputs_done).await {
                Ok(filled) => inputs_done += filled,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => trace.push_error(format!("input probe failed: {}", e)),
            }
        }

        if clicks_done < max_clicks {
            match clicks::probe(
                backend,
                tuning,
                trace,
                max_clicks - clicks_done,
                &mut handled_clickables,
            )
            .await
            {
                Ok(performed) => clicks_done += performed,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => trace.push_error(format!("click probe failed: {}", e)),
            }
        }

        match horizontal::probe(backend, tuning, &mut visited_regions).await {
            Ok(count) if count > 0 => trace.push_step(Step::HorizontalScroll { count }),
            Ok(_) => {}
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => trace.push_error(format!("horizontal probe failed: {}", e)),
        }

        position += tuning.scan_step;
        if position >= extent {
            break;
        }
    }

    Ok(())
}
