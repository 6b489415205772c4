use thiserror::Error;

/// Failures reported by a page-hosting backend.
///
/// Only a small subset is fatal to an exploration pass; everything else is
/// recoverable at the phase or element level.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    #[error("Navigation failed: {0}")]
    Navigation(String),

    /// A probe request reached the page but the in-page script refused it.
    #[error("Probe failed [{code}]: {message}")]
    Probe { code: String, message: String },

    #[error("Script execution error: {0}")]
    ScriptError(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Element {0} is gone (detached or never tagged)")]
    ElementGone(u32),

    #[error("Connection lost")]
    ConnectionLost,

    #[error("Not ready")]
    NotReady,

    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Other: {0}")]
    Other(String),

    #[error("Not supported: {0}")]
    NotSupported(String),
}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        BackendError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::Serialization(err.to_string())
    }
}

impl BackendError {
    /// True when the page is unusable and the whole exploration pass must
    /// end early. Everything else is recovered in place.
    pub fn is_fatal(&self) -> bool {
        matches!(self, BackendError::ConnectionLost | BackendError::NotReady)
    }
}
