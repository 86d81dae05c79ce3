//! Composed resolution: fallback chain plus auto-discovery

use page_adapter::{ElementHandle, ElementState, Locator, PageDriver};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::discovery::discovery_patterns;
use crate::registry::{SelectorRegistry, DISCOVERED_PRIORITY};
use crate::types::{SelectorCandidate, SelectorKind};

impl SelectorRegistry {
    /// Resolve a named target to a live element
    ///
    /// Tries candidates in resolver order; the first hit is recorded and
    /// returned immediately. A miss is not an error - `None` means every
    /// candidate and every discovery pattern came up empty, and the caller
    /// decides whether that aborts the attempt.
    pub async fn resolve(&self, driver: &dyn PageDriver, name: &str) -> Option<ElementHandle> {
        self.resolve_with(driver, name, ElementState::Attached, self.candidate_timeout())
            .await
    }

    /// Resolve with an explicit element state and per-candidate wait bound
    pub async fn resolve_with(
        &self,
        driver: &dyn PageDriver,
        name: &str,
        state: ElementState,
        timeout: Duration,
    ) -> Option<ElementHandle> {
        for candidate in self.candidates(name) {
            let locator = candidate.locator();
            match driver.wait_for(&locator, state, timeout).await {
                Ok(Some(element)) => {
                    self.record_success(name, &candidate);
                    debug!(target_name = name, locator = %locator, "Resolved element");
                    return Some(element);
                }
                Ok(None) => {
                    self.record_failure(name, &candidate);
                }
                Err(err) => {
                    debug!(target_name = name, locator = %locator, error = %err, "Candidate errored");
                    self.record_failure(name, &candidate);
                }
            }
        }

        warn!(
            target_name = name,
            "All candidates failed, attempting auto-discovery"
        );
        self.auto_discover(driver, name).await
    }

    /// Try generic patterns derived from the target name
    ///
    /// A hit is appended to the target's permanent candidate set at
    /// [`DISCOVERED_PRIORITY`] so future calls try it directly.
    async fn auto_discover(
        &self,
        driver: &dyn PageDriver,
        name: &str,
    ) -> Option<ElementHandle> {
        for pattern in discovery_patterns(name) {
            let locator = Locator::Css(pattern.clone());
            match driver.query(&locator, self.candidate_timeout()).await {
                Ok(Some(element)) => {
                    info!(target_name = name, pattern = %pattern, "Auto-discovered candidate");
                    self.add_candidate(
                        name,
                        SelectorCandidate::new(pattern, SelectorKind::Css, DISCOVERED_PRIORITY),
                    );
                    return Some(element);
                }
                Ok(None) => continue,
                Err(err) => {
                    debug!(target_name = name, pattern = %pattern, error = %err, "Discovery probe errored");
                    continue;
                }
            }
        }

        None
    }
}
