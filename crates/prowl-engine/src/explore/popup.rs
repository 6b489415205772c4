//! Popup dismissal: after a click anything may be covering the page. Try a
//! close control, then the dimmed backdrop, then Escape. Best-effort only;
//! no stage verifies that something actually closed, and the next
//! iteration's visibility checks skip whatever stays obscured.

use super::wire;
use crate::backend::Backend;
use crate::tuning::Tuning;

/// Likely close controls, probed in order. A `Some` text is an exact
/// trimmed-text filter on top of the selector.
const CLOSE_SELECTORS: &[(&str, Option<&str>)] = &[
    ("[aria-label=\"close\"]", None),
    ("[aria-label=\"Close\"]", None),
    ("[aria-label=\"닫기\"]", None),
    (".close", None),
    (".modal-close", None),
    (".btn-close", None),
    (".popup-close", None),
    (".close-button", None),
    ("button", Some("닫기")),
    ("button", Some("Close")),
    ("button", Some("취소")),
    ("button", Some("X")),
];

/// Dimmed backdrop candidates, clicked as a fallback when no close control
/// is found.
const BACKDROP_SELECTORS: &[&str] = &[
    ".modal-backdrop",
    ".overlay",
    ".dimmed",
    ".dim",
    ".mask",
    "[class*=\"backdrop\"]",
];

/// The backdrop is usually covered by the dialog itself, so the click is
/// forced at a corner offset instead of the center.
const BACKDROP_CORNER_OFFSET: (f64, f64) = (8.0, 8.0);

/// Never fails: every internal error degrades to the next stage and
/// ultimately to the Escape key, whose own failure is swallowed.
pub async fn dismiss(backend: &mut dyn Backend, tuning: &Tuning) {
    tokio::time::sleep(tuning.popup_settle()).await;

    for (selector, text) in CLOSE_SELECTORS {
        let matches = match wire::query(backend, selector, *text).await {
            Ok(matches) => matches,
            Err(_) => continue,
        };
        let Some(element) = matches.into_iter().next() else {
            continue;
        };
        if let Ok(result) = wire::click(backend, element.id, false, None).await
            && result.success
        {
            tracing::debug!("dismissed popup via close control {}", selector);
            return;
        }
    }

    for selector in BACKDROP_SELECTORS {
        let matches = match wire::query(backend, selector, None).await {
            Ok(matches) => matches,
            Err(_) => continue,
        };
        let Some(element) = matches.into_iter().next() else {
            continue;
        };
        if let Ok(result) =
            wire::click(backend, element.id, true, Some(BACKDROP_CORNER_OFFSET)).await
            && result.success
        {
            tracing::debug!("dismissed popup via backdrop {}", selector);
            return;
        }
    }

    if let Err(e) = backend.press_key("Escape").await {
        tracing::debug!("popup fallback key press failed: {}", e);
    }
}
