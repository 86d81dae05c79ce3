//! Gate engine: history bookkeeping plus check evaluation

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{debug, warn};
use webpilot_core_types::ActionKind;

use crate::checks::{
    AbuseRiskCheck, AccountWarmthCheck, AutomationFlagsCheck, CheckContext, IpConsistencyCheck,
    RapidBurstCheck, RateLimitCheck, RiskCheck, SessionHealthCheck, TimingRegularityCheck,
};
use crate::clock::{Clock, SystemClock};
use crate::policy::RiskPolicy;
use crate::types::RiskAssessment;

/// Admission-control engine
///
/// Owns the per-kind action history and the ordered check list. One instance
/// per account context; state accumulates for the life of the process with no
/// expiry beyond the sliding rate windows. Constructed explicitly and shared
/// via `Arc` - there is no ambient global.
pub struct RiskEngine {
    policy: RiskPolicy,
    clock: Arc<dyn Clock>,
    history: RwLock<HashMap<String, Vec<DateTime<Utc>>>>,
    checks: Vec<Arc<dyn RiskCheck>>,
}

impl RiskEngine {
    /// Create an engine with the wall clock
    pub fn new(policy: RiskPolicy) -> Self {
        Self::with_clock(policy, Arc::new(SystemClock))
    }

    /// Create an engine with an injected time source
    pub fn with_clock(policy: RiskPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            policy,
            clock,
            history: RwLock::new(HashMap::new()),
            checks: default_checks(),
        }
    }

    /// Register an additional heuristic, evaluated after the built-ins
    pub fn with_check(mut self, check: Arc<dyn RiskCheck>) -> Self {
        self.checks.push(check);
        self
    }

    pub fn policy(&self) -> &RiskPolicy {
        &self.policy
    }

    /// Run every check and return the aggregated verdict
    ///
    /// Never fails: absence of data always resolves to "passed". Pruning of
    /// stale history entries for the checked kind is persisted, not just
    /// filtered for this call.
    pub fn check(&self, kind: &ActionKind, account_age_days: Option<u32>) -> RiskAssessment {
        let now = self.clock.now();

        let (recent, total_actions) = {
            let mut history = self.history.write();

            if let Some(window) = self.policy.window_for(kind.as_str()) {
                if let Some(entries) = history.get_mut(kind.as_str()) {
                    let cutoff = now - window.window();
                    entries.retain(|t| *t > cutoff);
                }
            }

            let recent = history.get(kind.as_str()).cloned().unwrap_or_default();
            let total: u64 = history.values().map(|v| v.len() as u64).sum();
            (recent, total)
        };

        let ctx = CheckContext {
            kind,
            recent: &recent,
            total_actions,
            account_age_days,
            now,
            policy: &self.policy,
        };

        let outcomes = self.checks.iter().map(|c| c.evaluate(&ctx)).collect();
        let assessment = RiskAssessment::from_outcomes(outcomes, self.policy.pass_threshold);

        if assessment.passed {
            debug!(
                kind = %kind,
                risk_score = assessment.risk_score,
                "Preflight check passed"
            );
        } else {
            warn!(
                kind = %kind,
                risk_score = assessment.risk_score,
                failed = ?assessment.failed_checks,
                "Preflight check failed"
            );
        }

        assessment
    }

    /// Record a completed side-effecting attempt
    ///
    /// Must be called only after the attempt actually ran, never during the
    /// gate itself - consulting the gate does not move the score.
    pub fn record_action(&self, kind: &ActionKind) {
        let now = self.clock.now();
        let mut history = self.history.write();
        let entries = history.entry(kind.as_str().to_string()).or_default();
        // Keeps the sequence sorted even if an injected clock moves backwards.
        let pos = entries.partition_point(|t| *t <= now);
        entries.insert(pos, now);
    }

    /// Recorded entries currently held for a kind
    pub fn action_count(&self, kind: &ActionKind) -> usize {
        self.history
            .read()
            .get(kind.as_str())
            .map(Vec::len)
            .unwrap_or(0)
    }
}

/// Built-in check list, in evaluation order
///
/// Three live heuristics followed by the always-pass extension points; the
/// gate is the single place new detection heuristics are added.
fn default_checks() -> Vec<Arc<dyn RiskCheck>> {
    vec![
        Arc::new(RateLimitCheck),
        Arc::new(RapidBurstCheck),
        Arc::new(AccountWarmthCheck),
        Arc::new(AutomationFlagsCheck),
        Arc::new(SessionHealthCheck),
        Arc::new(TimingRegularityCheck),
        Arc::new(AbuseRiskCheck),
        Arc::new(IpConsistencyCheck),
    ]
}
