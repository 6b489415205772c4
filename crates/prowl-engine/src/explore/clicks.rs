//! Click probe: click visible, safe, clickable elements in document order
//! until the remaining click budget runs out.

use std::collections::HashSet;

use super::{popup, wire};
use crate::backend::{Backend, BackendError};
use crate::tuning::Tuning;
use prowl_common::trace::{Step, Trace};

/// Returns how many clicks were performed. A failure of the collection
/// itself emits one `ClickError` step; a failure on an individual element
/// is a silent skip (the element is simply unreachable).
///
/// `handled` carries the stable ids already clicked or denylist-skipped in
/// this pass. Collection re-runs at every scroll position, so without it a
/// dangerous element would emit one `SkipClick` per iteration instead of
/// one per element.
pub async fn probe(
    backend: &mut dyn Backend,
    tuning: &Tuning,
    trace: &mut Trace,
    budget_left: u32,
    handled: &mut HashSet<u32>,
) -> Result<u32, BackendError> {
    let clickables = match wire::collect_clickables(backend).await {
        Ok(clickables) => clickables,
        Err(e) if e.is_fatal() => return Err(e),
        Err(e) => {
            trace.push_step(Step::ClickError {
                message: e.to_string(),
            });
            return Ok(0);
        }
    };

    let mut clicked = 0u32;
    for element in clickables {
        if clicked >= budget_left {
            break;
        }
        if handled.contains(&element.id) {
            continue;
        }

        let text = element.text.trim();
        if text.is_empty() {
            continue;
        }

        if let Some(term) = dangerous_term(text, &tuning.denylist) {
            tracing::info!("skipping \"{}\" (matches denylisted \"{}\")", text, term);
            handled.insert(element.id);
            trace.push_step(Step::SkipClick {
                reason: "dangerous-text".into(),
                text: text.to_string(),
            });
            continue;
        }

        if !element.rect.is_rendered() {
            continue;
        }

        let attempt = tokio::time::timeout(
            tuning.interaction_timeout(),
            wire::click(backend, element.id, false, None),
        )
        .await;

        match attempt {
            Ok(Ok(result)) if result.success => {
                handled.insert(element.id);
                trace.push_step(Step::Click {
                    text: text.chars().take(tuning.click_text_len).collect(),
                    tag: Some(element.tag),
                });
                clicked += 1;
                // The click may have opened a modal blocking everything else.
                popup::dismiss(backend, tuning).await;
            }
            Ok(Err(e)) if e.is_fatal() => return Err(e),
            Ok(Ok(_)) | Ok(Err(_)) | Err(_) => {
                tracing::debug!("click skipped for element {}", element.id);
            }
        }
    }

    Ok(clicked)
}

fn dangerous_term<'a>(text: &str, denylist: &'a [String]) -> Option<&'a str> {
    let lowered = text.to_lowercase();
    denylist
        .iter()
        .find(|term| lowered.contains(&term.to_lowercase()))
        .map(String::as_str)
}
