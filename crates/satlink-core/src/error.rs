//! Error types for SATLINK

use thiserror::Error;

/// Core SATLINK errors
#[derive(Error, Debug)]
pub enum SatlinkError {
    // Timeline errors
    #[error("Clock is not running: cannot mark event '{0}'")]
    NotRunning(String),

    // Render errors
    #[error("Render target missing: {0}")]
    RenderTargetMissing(String),

    // Feed errors
    #[error("Malformed sample feed: {0}")]
    MalformedFeed(String),

    #[error("I/O error: {0}")]
    Io(String),

    // Console errors
    #[error("Configuration panels incomplete: {}", .0.join(", "))]
    PanelsIncomplete(Vec<String>),

    #[error("Export failed: {0}")]
    Export(String),
}

impl From<std::io::Error> for SatlinkError {
    fn from(e: std::io::Error) -> Self {
        SatlinkError::Io(e.to_string())
    }
}

/// Result type for SATLINK operations
pub type SatlinkResult<T> = Result<T, SatlinkError>;
