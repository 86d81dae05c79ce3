//! Error type for orchestrated work

use page_adapter::PageError;
use thiserror::Error;

/// Failure raised by a `work` closure or a pacing primitive
///
/// The orchestrator does not distinguish variants when retrying - any error
/// routes through the same backoff loop - but callers composing primitives
/// inside `work` can branch on them.
#[derive(Debug, Error, Clone)]
pub enum ActionError {
    /// A named target resolved to nothing
    #[error("Element not found: {0}")]
    ElementMissing(String),

    /// Navigation failed or did not settle
    #[error("Navigation failed: {0}")]
    Navigation(String),

    /// A bounded wait expired
    #[error("Timed out: {0}")]
    Timeout(String),

    /// The orchestrator's cancellation token fired
    #[error("Cancelled")]
    Cancelled,

    /// Driver-level failure
    #[error(transparent)]
    Page(#[from] PageError),

    /// Domain-specific failure raised by the work closure
    #[error("{0}")]
    Failed(String),
}

impl ActionError {
    pub fn failed(message: impl Into<String>) -> Self {
        ActionError::Failed(message.into())
    }
}
