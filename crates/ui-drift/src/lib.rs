//! UI change detection - early warning that the locator tables will decay
//!
//! Captures a structural baseline per page (a hashed tag/role/test-id tree
//! plus a screenshot hash) and compares later visits against it. A detected
//! change does not block anything by itself; operational tooling watches the
//! reports and rotates selector candidates before resolution starts failing.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use page_adapter::{PageDriver, PageError};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Script producing a compact structural signature of the page
///
/// Tag names, roles and test ids down to depth 3 - enough to notice a layout
/// shuffle without being perturbed by text content churn.
const DOM_SIGNATURE_SCRIPT: &str = r#"
(() => {
    const getStructure = (el, depth = 0) => {
        if (depth > 3) return '';

        let sig = el.tagName;
        const role = el.getAttribute && el.getAttribute('role');
        if (role) sig += `[${role}]`;
        const testid = el.getAttribute && el.getAttribute('data-testid');
        if (testid) sig += `#${testid}`;

        const children = Array.from(el.children)
            .map(child => getStructure(child, depth + 1))
            .join(',');

        return sig + (children ? `(${children})` : '');
    };

    return getStructure(document.body);
})()
"#;

/// Stored reference state for one page
#[derive(Debug, Clone)]
struct Baseline {
    dom_signature: u64,
    screenshot_hash: u64,
    captured_at: DateTime<Utc>,
    last_check: DateTime<Utc>,
}

/// Comparison result for one page visit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftReport {
    pub page_name: String,
    pub changed: bool,
    pub dom_changed: bool,
    pub visual_changed: bool,
    pub checked_at: DateTime<Utc>,

    /// Probe failure, when the comparison could not run
    pub error: Option<String>,
}

impl DriftReport {
    fn unchanged(page_name: &str, now: DateTime<Utc>) -> Self {
        Self {
            page_name: page_name.to_string(),
            changed: false,
            dom_changed: false,
            visual_changed: false,
            checked_at: now,
            error: None,
        }
    }
}

/// Baseline status for one monitored page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageStatus {
    pub has_baseline: bool,
    pub captured_at: DateTime<Utc>,
    pub last_check: DateTime<Utc>,
}

/// Detector with per-page baselines; process-wide lifetime
pub struct UiChangeDetector {
    baselines: RwLock<HashMap<String, Baseline>>,
}

impl UiChangeDetector {
    pub fn new() -> Self {
        Self {
            baselines: RwLock::new(HashMap::new()),
        }
    }

    /// Capture (or overwrite) the baseline for a page
    pub async fn capture_baseline(
        &self,
        driver: &dyn PageDriver,
        page_name: &str,
    ) -> Result<(), PageError> {
        let (dom_signature, screenshot_hash) = self.probe(driver).await?;
        let now = Utc::now();

        let mut baselines = self.baselines.write();
        baselines.insert(
            page_name.to_string(),
            Baseline {
                dom_signature,
                screenshot_hash,
                captured_at: now,
                last_check: now,
            },
        );
        info!(page_name, "Captured UI baseline");
        Ok(())
    }

    /// Compare the current page against its baseline
    ///
    /// Never fails: a missing baseline is captured on the spot and reported
    /// as unchanged; a probe failure degrades to an unchanged report carrying
    /// the error message.
    pub async fn detect_changes(
        &self,
        driver: &dyn PageDriver,
        page_name: &str,
    ) -> DriftReport {
        let now = Utc::now();

        let baseline = self.baselines.read().get(page_name).cloned();
        let Some(baseline) = baseline else {
            warn!(page_name, "No baseline, capturing now");
            let mut report = DriftReport::unchanged(page_name, now);
            if let Err(err) = self.capture_baseline(driver, page_name).await {
                report.error = Some(err.to_string());
            }
            return report;
        };

        let (dom_signature, screenshot_hash) = match self.probe(driver).await {
            Ok(probe) => probe,
            Err(err) => {
                warn!(page_name, error = %err, "Drift probe failed");
                let mut report = DriftReport::unchanged(page_name, now);
                report.error = Some(err.to_string());
                return report;
            }
        };

        let dom_changed = dom_signature != baseline.dom_signature;
        let visual_changed = screenshot_hash != baseline.screenshot_hash;
        let report = DriftReport {
            page_name: page_name.to_string(),
            changed: dom_changed || visual_changed,
            dom_changed,
            visual_changed,
            checked_at: now,
            error: None,
        };

        if report.changed {
            warn!(
                page_name,
                dom_changed, visual_changed, "UI change detected"
            );
        }

        let mut baselines = self.baselines.write();
        if let Some(entry) = baselines.get_mut(page_name) {
            entry.last_check = now;
        }

        report
    }

    /// Baseline status of every monitored page
    pub fn status(&self) -> HashMap<String, PageStatus> {
        self.baselines
            .read()
            .iter()
            .map(|(name, baseline)| {
                (
                    name.clone(),
                    PageStatus {
                        has_baseline: true,
                        captured_at: baseline.captured_at,
                        last_check: baseline.last_check,
                    },
                )
            })
            .collect()
    }

    async fn probe(&self, driver: &dyn PageDriver) -> Result<(u64, u64), PageError> {
        let structure = driver.evaluate_script(DOM_SIGNATURE_SCRIPT).await?;
        let structure = structure.as_str().unwrap_or_default().to_string();
        let screenshot = driver.screenshot().await?;
        Ok((hash_of(&structure), hash_of(&screenshot)))
    }
}

impl Default for UiChangeDetector {
    fn default() -> Self {
        Self::new()
    }
}

fn hash_of<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}
