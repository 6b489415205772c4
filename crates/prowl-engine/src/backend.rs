use async_trait::async_trait;
use std::path::Path;

pub use prowl_common::error::BackendError;
use prowl_common::protocol::{ProbeRequest, ProbeResponse};
use prowl_common::trace::PageEvent;

#[derive(Debug, Clone)]
pub struct NavigationResult {
    pub url: String,
    pub title: String,
    pub status: u16, // generic status code (e.g. 200)
}

/// The page-hosting capability set the exploration engine drives.
///
/// One backend holds exactly one page; calls are issued one at a time and
/// each is a full round trip, so the engine never interleaves operations.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Launch the backend (start browser, create the page, install the
    /// page-scoped event subscriptions).
    async fn launch(&mut self) -> Result<(), BackendError>;

    /// Close the backend and cleanup resources.
    async fn close(&mut self) -> Result<(), BackendError>;

    /// Navigate the page to a specific URL.
    async fn navigate(&mut self, url: &str) -> Result<NavigationResult, BackendError>;

    /// Resize the viewport.
    async fn set_viewport(&mut self, width: u32, height: u32) -> Result<(), BackendError>;

    /// Execute one probe request inside the page and return its response.
    async fn probe(&mut self, request: ProbeRequest) -> Result<ProbeResponse, BackendError>;

    /// Capture a screenshot of the current viewport (or the full page) to
    /// the given path.
    async fn screenshot(&mut self, _path: &Path, _full_page: bool) -> Result<(), BackendError> {
        Err(BackendError::NotSupported("screenshot".into()))
    }

    /// Send a keyboard key event to the page.
    async fn press_key(&mut self, _key: &str) -> Result<(), BackendError> {
        Err(BackendError::NotSupported("press_key".into()))
    }

    /// Hand over the environment errors the host collected since the last
    /// drain (console errors, failed requests, crashes).
    fn drain_page_events(&mut self) -> Vec<PageEvent> {
        Vec::new()
    }
}
