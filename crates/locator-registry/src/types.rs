//! Candidate types for the locator registry

use chrono::{DateTime, Utc};
use page_adapter::Locator;
use serde::{Deserialize, Serialize};

/// Locator strategy tag carried by a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectorKind {
    Css,
    XPath,
    Text,
    TestId,
}

impl SelectorKind {
    /// Get strategy name as string
    pub fn name(&self) -> &'static str {
        match self {
            SelectorKind::Css => "css",
            SelectorKind::XPath => "xpath",
            SelectorKind::Text => "text",
            SelectorKind::TestId => "testid",
        }
    }
}

/// One concrete strategy for finding a named UI target
///
/// Mutated only through the registry's `record_success`/`record_failure`;
/// the counters feed the resolver ordering and the health report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorCandidate {
    /// Raw selector value
    pub value: String,

    /// Strategy this value belongs to
    pub kind: SelectorKind,

    /// Static ranking ceiling; lower is tried first
    pub priority: i32,

    /// Times this candidate resolved an element
    pub success_count: u64,

    /// Times this candidate missed or errored
    pub failure_count: u64,

    /// Last time this candidate resolved an element
    pub last_success_at: Option<DateTime<Utc>>,
}

impl SelectorCandidate {
    pub fn new(value: impl Into<String>, kind: SelectorKind, priority: i32) -> Self {
        Self {
            value: value.into(),
            kind,
            priority,
            success_count: 0,
            failure_count: 0,
            last_success_at: None,
        }
    }

    /// Translate into the driver-facing locator
    pub fn locator(&self) -> Locator {
        match self.kind {
            SelectorKind::Css => Locator::Css(self.value.clone()),
            SelectorKind::XPath => Locator::XPath(self.value.clone()),
            SelectorKind::Text => Locator::Text(self.value.clone()),
            SelectorKind::TestId => Locator::TestId(self.value.clone()),
        }
    }

    pub fn total_uses(&self) -> u64 {
        self.success_count + self.failure_count
    }

    /// Empirical success rate; 0 when the candidate has never been tried
    pub fn success_rate(&self) -> f64 {
        let total = self.total_uses();
        if total == 0 {
            return 0.0;
        }
        self.success_count as f64 / total as f64
    }

    /// Identity used by the registry to find the stored entry
    pub(crate) fn matches(&self, other: &SelectorCandidate) -> bool {
        self.value == other.value && self.kind == other.kind
    }
}
