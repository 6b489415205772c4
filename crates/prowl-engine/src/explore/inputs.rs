//! Input probe: fill empty, visible, text-like form fields with a fixed
//! sentinel value.

use super::wire;
use crate::backend::{Backend, BackendError};
use crate::tuning::Tuning;
use prowl_common::trace::{Step, Trace};

/// Not free-text fields; filling these would toggle state or submit forms.
const SKIP_TYPES: &[&str] = &["hidden", "submit", "button", "image", "checkbox", "radio"];

/// Fill up to `budget_left` fields, emitting one `Input` step per success.
/// Per-field failures (detached, covered, timeout) are swallowed: the field
/// simply produces no step. Returns how many fields were filled.
pub async fn probe(
    backend: &mut dyn Backend,
    tuning: &Tuning,
    trace: &mut Trace,
    budget_left: u32,
) -> Result<u32, BackendError> {
    let fields = wire::collect_inputs(backend).await?;
    let mut filled = 0u32;

    for field in fields {
        if filled >= budget_left {
            break;
        }
        if field.has_value {
            continue;
        }
        if SKIP_TYPES.contains(&field.input_type.as_str()) {
            continue;
        }
        if !field.rect.is_rendered() {
            continue;
        }

        let attempt = tokio::time::timeout(
            tuning.interaction_timeout(),
            wire::fill(backend, field.id, &tuning.fill_value),
        )
        .await;

        match attempt {
            Ok(Ok(result)) if result.success => {
                trace.push_step(Step::Input {
                    input_type: field.input_type,
                });
                filled += 1;
            }
            Ok(Err(e)) if e.is_fatal() => return Err(e),
            Ok(Ok(_)) | Ok(Err(_)) => {
                tracing::debug!("fill skipped for field {}", field.id);
            }
            Err(_) => {
                tracing::debug!("fill timed out for field {}", field.id);
            }
        }
    }

    Ok(filled)
}
