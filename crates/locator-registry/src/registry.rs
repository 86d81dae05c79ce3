//! Candidate store with ranking and demotion

use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::defaults::default_targets;
use crate::types::SelectorCandidate;

/// Priority assigned to candidates appended by auto-discovery.
pub const DISCOVERED_PRIORITY: i32 = 10;

/// Failures beyond this count demote the candidate one priority step per
/// additional failure.
pub const DEMOTION_THRESHOLD: u64 = 5;

/// Registry of named UI targets, each with ranked locator candidates
///
/// Process-wide lifetime: counters and discovered candidates accumulate until
/// shutdown. A standing candidate is never removed, only deprioritized, so a
/// transient outage cannot permanently disable a strategy that later
/// recovers.
pub struct SelectorRegistry {
    targets: RwLock<HashMap<String, Vec<SelectorCandidate>>>,
    candidate_timeout: Duration,
}

impl SelectorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            targets: RwLock::new(HashMap::new()),
            candidate_timeout: Duration::from_secs(3),
        }
    }

    /// Create a registry preloaded with the built-in target table
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        {
            let mut targets = registry.targets.write();
            for (name, candidates) in default_targets() {
                targets.insert(name.to_string(), candidates);
            }
        }
        registry
    }

    /// Override the per-candidate wait used by `resolve`
    pub fn with_candidate_timeout(mut self, timeout: Duration) -> Self {
        self.candidate_timeout = timeout;
        self
    }

    pub(crate) fn candidate_timeout(&self) -> Duration {
        self.candidate_timeout
    }

    /// Append candidates for a target, creating it when absent
    ///
    /// Existing candidates are never replaced; new ones extend the set.
    pub fn register_target(&self, name: &str, candidates: Vec<SelectorCandidate>) {
        let mut targets = self.targets.write();
        targets.entry(name.to_string()).or_default().extend(candidates);
    }

    /// Append a single candidate (used by auto-discovery)
    pub fn add_candidate(&self, name: &str, candidate: SelectorCandidate) {
        info!(
            target_name = name,
            value = %candidate.value,
            kind = candidate.kind.name(),
            priority = candidate.priority,
            "Added candidate"
        );
        let mut targets = self.targets.write();
        targets.entry(name.to_string()).or_default().push(candidate);
    }

    /// All candidates for a target in resolver order:
    /// `(priority ascending, success_count descending)`
    ///
    /// The ordering rewards empirically reliable candidates while still
    /// respecting the explicit priority ceiling. Ties keep registration
    /// order (the sort is stable).
    pub fn candidates(&self, name: &str) -> Vec<SelectorCandidate> {
        let targets = self.targets.read();
        let mut candidates = targets.get(name).cloned().unwrap_or_default();
        candidates.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then(b.success_count.cmp(&a.success_count))
        });
        candidates
    }

    /// Best-ranked candidate for a target, if any
    pub fn best(&self, name: &str) -> Option<SelectorCandidate> {
        self.candidates(name).into_iter().next()
    }

    /// Registered target names
    pub fn target_names(&self) -> Vec<String> {
        self.targets.read().keys().cloned().collect()
    }

    /// Record a successful use of a candidate
    pub fn record_success(&self, name: &str, candidate: &SelectorCandidate) {
        let mut targets = self.targets.write();
        let Some(stored) = targets
            .get_mut(name)
            .and_then(|list| list.iter_mut().find(|c| c.matches(candidate)))
        else {
            return;
        };

        stored.success_count += 1;
        stored.last_success_at = Some(Utc::now());
        debug!(target_name = name, value = %stored.value, "Candidate success");
    }

    /// Record a failed use of a candidate
    ///
    /// Once the cumulative failure count exceeds [`DEMOTION_THRESHOLD`],
    /// every further failure pushes the candidate one priority step later in
    /// future orderings.
    pub fn record_failure(&self, name: &str, candidate: &SelectorCandidate) {
        let mut targets = self.targets.write();
        let Some(stored) = targets
            .get_mut(name)
            .and_then(|list| list.iter_mut().find(|c| c.matches(candidate)))
        else {
            return;
        };

        stored.failure_count += 1;
        warn!(
            target_name = name,
            value = %stored.value,
            failures = stored.failure_count,
            "Candidate failure"
        );

        if stored.failure_count > DEMOTION_THRESHOLD {
            stored.priority += 1;
            debug!(
                target_name = name,
                value = %stored.value,
                priority = stored.priority,
                "Candidate demoted"
            );
        }
    }
}

impl Default for SelectorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
