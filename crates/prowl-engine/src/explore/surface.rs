//! Scroll surface resolution: does the page itself scroll, or does a nested
//! container hold the real content?

use super::wire;
use crate::backend::{Backend, BackendError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceMode {
    /// The document scrolls.
    Page,
    /// A nested overflow container scrolls; identified by its probe id.
    Container(u32),
}

/// Resolved scroll surface for the current viewport. A transient value: it
/// is recomputed at every phase entry and dropped when the phase ends, so
/// no marker state outlives the region it described.
#[derive(Debug, Clone)]
pub struct ScrollTarget {
    pub mode: SurfaceMode,
    pub scroll_extent: f64,
    pub viewport_extent: f64,
}

impl ScrollTarget {
    pub fn container(&self) -> Option<u32> {
        match self.mode {
            SurfaceMode::Container(id) => Some(id),
            SurfaceMode::Page => None,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.scroll_extent <= 0.0
    }
}

/// Decision rule: a scrollable document wins outright; otherwise the
/// overflow container with the largest content height (first in document
/// order on a tie); otherwise a no-op page region.
pub async fn resolve(backend: &mut dyn Backend) -> Result<ScrollTarget, BackendError> {
    let page = wire::metrics(backend, None).await?;
    if page.extent > 0.0 {
        return Ok(ScrollTarget {
            mode: SurfaceMode::Page,
            scroll_extent: page.extent,
            viewport_extent: page.viewport,
        });
    }

    let candidates = wire::find_containers(backend).await?;
    let mut best: Option<&prowl_common::protocol::ContainerInfo> = None;
    for candidate in &candidates {
        if candidate.content <= candidate.viewport {
            continue;
        }
        if best.is_none_or(|current| candidate.content > current.content) {
            best = Some(candidate);
        }
    }

    match best {
        Some(container) => {
            tracing::debug!(
                "page does not scroll; using container {} ({}px content)",
                container.id,
                container.content
            );
            Ok(ScrollTarget {
                mode: SurfaceMode::Container(container.id),
                scroll_extent: container.content - container.viewport,
                viewport_extent: container.viewport,
            })
        }
        None => Ok(ScrollTarget {
            mode: SurfaceMode::Page,
            scroll_extent: 0.0,
            viewport_extent: page.viewport,
        }),
    }
}
