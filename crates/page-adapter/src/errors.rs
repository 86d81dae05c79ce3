//! Error types for the browser-automation port

use thiserror::Error;

/// Page driver error enumeration
#[derive(Debug, Error, Clone)]
pub enum PageError {
    /// Locator resolved to no element
    #[error("Target not found: {0}")]
    TargetNotFound(String),

    /// Navigation did not settle within its deadline
    #[error("Navigation timed out: {0}")]
    NavTimeout(String),

    /// Element wait expired
    #[error("Wait timed out: {0}")]
    WaitTimeout(String),

    /// Injected script failed to evaluate
    #[error("Script evaluation failed: {0}")]
    ScriptFailed(String),

    /// Transport-level failure talking to the browser
    #[error("Driver I/O error: {0}")]
    Io(String),

    /// Internal driver error
    #[error("Internal driver error: {0}")]
    Internal(String),
}

impl PageError {
    /// Check if the failure is plausibly transient
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PageError::NavTimeout(_) | PageError::WaitTimeout(_) | PageError::Io(_)
        )
    }
}
