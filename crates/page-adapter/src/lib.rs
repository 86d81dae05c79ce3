//! Browser-automation port - the interface the resilience framework drives
//!
//! The framework never talks to a concrete browser. It consumes this trait,
//! which an external adapter (CDP, WebDriver, ...) implements with
//! bounded-timeout semantics. Every operation either completes within its
//! deadline or reports failure through [`PageError`].

pub mod errors;
pub mod types;

pub use errors::*;
pub use types::*;

use async_trait::async_trait;
use std::time::Duration;

/// Browser page driver trait
///
/// One instance corresponds to one live page/context within a session.
/// Implementations report absence as `Ok(None)` and faults as `Err`; the
/// locator layer treats both as a miss for the attempted candidate.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigate to a URL and wait for the settle condition
    async fn navigate(
        &self,
        url: &str,
        wait_until: NavWait,
        timeout: Duration,
    ) -> Result<(), PageError>;

    /// Find an element right now, waiting at most `timeout`
    async fn query(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<Option<ElementHandle>, PageError>;

    /// Wait for an element to reach `state`, at most `timeout`
    async fn wait_for(
        &self,
        locator: &Locator,
        state: ElementState,
        timeout: Duration,
    ) -> Result<Option<ElementHandle>, PageError>;

    /// Click a previously resolved element
    async fn click(&self, element: &ElementHandle) -> Result<(), PageError>;

    /// Type a single character into a previously resolved element
    async fn type_char(&self, element: &ElementHandle, ch: char) -> Result<(), PageError>;

    /// Move the pointer to page coordinates
    async fn move_pointer(&self, x: f64, y: f64) -> Result<(), PageError>;

    /// Bounding box of an element, `None` when it has no layout
    async fn bounding_box(&self, element: &ElementHandle)
        -> Result<Option<BoundingBox>, PageError>;

    /// Evaluate a script in the page, returning its JSON result
    async fn evaluate_script(&self, expression: &str) -> Result<serde_json::Value, PageError>;

    /// Capture a screenshot of the current viewport
    async fn screenshot(&self) -> Result<Vec<u8>, PageError>;
}
