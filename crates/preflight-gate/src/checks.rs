//! Individual admission checks
//!
//! Each check is independent and evaluates against a read-only snapshot of
//! gate state. The engine runs every registered check on every call and never
//! short-circuits, so an assessment's details are always complete. New
//! heuristics plug in through [`RiskCheck`] without touching the
//! orchestrator.

use chrono::{DateTime, Utc};
use webpilot_core_types::ActionKind;

use crate::policy::RiskPolicy;
use crate::types::CheckOutcome;

/// Read-only state snapshot handed to each check
pub struct CheckContext<'a> {
    /// Kind being gated
    pub kind: &'a ActionKind,

    /// Recorded timestamps for this kind, ascending, already pruned against
    /// the kind's window when one is configured
    pub recent: &'a [DateTime<Utc>],

    /// Total recorded actions across all kinds
    pub total_actions: u64,

    /// Account age supplied by the caller, when known
    pub account_age_days: Option<u32>,

    /// Evaluation instant
    pub now: DateTime<Utc>,

    /// Active policy
    pub policy: &'a RiskPolicy,
}

/// One admission heuristic
pub trait RiskCheck: Send + Sync {
    /// Stable name reported in assessments
    fn name(&self) -> &'static str;

    /// Evaluate against the snapshot; must not mutate gate state
    fn evaluate(&self, ctx: &CheckContext<'_>) -> CheckOutcome;
}

/// Sliding-window rate limit per kind
pub struct RateLimitCheck;

impl RiskCheck for RateLimitCheck {
    fn name(&self) -> &'static str {
        "rate_limit"
    }

    fn evaluate(&self, ctx: &CheckContext<'_>) -> CheckOutcome {
        let Some(window) = ctx.policy.window_for(ctx.kind.as_str()) else {
            return CheckOutcome::pass(self.name());
        };

        if ctx.recent.len() >= window.max_actions as usize {
            return CheckOutcome::fail(
                self.name(),
                ctx.policy.rate_risk_weight,
                format!(
                    "{} rate limit exceeded: {}/{}",
                    ctx.kind,
                    ctx.recent.len(),
                    window.max_actions
                ),
            );
        }

        CheckOutcome::pass(self.name())
    }
}

/// Machine-like burst detection over the most recent actions of a kind
pub struct RapidBurstCheck;

impl RiskCheck for RapidBurstCheck {
    fn name(&self) -> &'static str {
        "suspicious_patterns"
    }

    fn evaluate(&self, ctx: &CheckContext<'_>) -> CheckOutcome {
        let burst = &ctx.policy.burst;
        if ctx.recent.len() < burst.min_actions {
            return CheckOutcome::pass(self.name());
        }

        let tail = &ctx.recent[ctx.recent.len() - burst.min_actions..];
        let span = tail[tail.len() - 1] - tail[0];
        if span.num_milliseconds() < burst.span_ms as i64 {
            return CheckOutcome::fail(
                self.name(),
                burst.risk_weight,
                format!(
                    "Actions too rapid ({} in <{}s)",
                    burst.min_actions,
                    burst.span_ms / 1000
                ),
            );
        }

        CheckOutcome::pass(self.name())
    }
}

/// Activity-volume restriction for young accounts
pub struct AccountWarmthCheck;

impl RiskCheck for AccountWarmthCheck {
    fn name(&self) -> &'static str {
        "account_warmth"
    }

    fn evaluate(&self, ctx: &CheckContext<'_>) -> CheckOutcome {
        let Some(age_days) = ctx.account_age_days else {
            return CheckOutcome::pass(self.name());
        };

        let warmth = &ctx.policy.warmth;
        if age_days < warmth.min_account_age_days && ctx.total_actions > warmth.max_total_actions {
            return CheckOutcome::fail(
                self.name(),
                warmth.risk_weight,
                format!(
                    "New account ({}d) with high activity ({})",
                    age_days, ctx.total_actions
                ),
            );
        }

        CheckOutcome::pass(self.name())
    }
}

/// Browser automation-flag probe
///
/// Always passes until flag probing (navigator.webdriver and friends) is
/// wired through the page driver.
pub struct AutomationFlagsCheck;

impl RiskCheck for AutomationFlagsCheck {
    fn name(&self) -> &'static str {
        "automation_flags"
    }

    fn evaluate(&self, _ctx: &CheckContext<'_>) -> CheckOutcome {
        CheckOutcome::pass(self.name())
    }
}

/// Session authentication health
///
/// Always passes until cookie/auth-token validation is wired through the
/// session layer.
pub struct SessionHealthCheck;

impl RiskCheck for SessionHealthCheck {
    fn name(&self) -> &'static str {
        "session_health"
    }

    fn evaluate(&self, _ctx: &CheckContext<'_>) -> CheckOutcome {
        CheckOutcome::pass(self.name())
    }
}

/// Interval-regularity analysis across all kinds
///
/// Always passes until interval-variance scoring lands; perfectly regular
/// gaps are a stronger automation signal than raw volume.
pub struct TimingRegularityCheck;

impl RiskCheck for TimingRegularityCheck {
    fn name(&self) -> &'static str {
        "timing_regularity"
    }

    fn evaluate(&self, _ctx: &CheckContext<'_>) -> CheckOutcome {
        CheckOutcome::pass(self.name())
    }
}

/// Abuse-detection risk estimate
///
/// Always passes until recent-failure and velocity signals feed a challenge
/// likelihood score.
pub struct AbuseRiskCheck;

impl RiskCheck for AbuseRiskCheck {
    fn name(&self) -> &'static str {
        "abuse_risk"
    }

    fn evaluate(&self, _ctx: &CheckContext<'_>) -> CheckOutcome {
        CheckOutcome::pass(self.name())
    }
}

/// Network/IP consistency
///
/// Always passes until egress tracking reports address changes mid-session.
pub struct IpConsistencyCheck;

impl RiskCheck for IpConsistencyCheck {
    fn name(&self) -> &'static str {
        "ip_consistency"
    }

    fn evaluate(&self, _ctx: &CheckContext<'_>) -> CheckOutcome {
        CheckOutcome::pass(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn ctx_with<'a>(
        kind: &'a ActionKind,
        recent: &'a [DateTime<Utc>],
        total: u64,
        age: Option<u32>,
        now: DateTime<Utc>,
        policy: &'a RiskPolicy,
    ) -> CheckContext<'a> {
        CheckContext {
            kind,
            recent,
            total_actions: total,
            account_age_days: age,
            now,
            policy,
        }
    }

    #[test]
    fn rate_limit_passes_for_unconfigured_kind() {
        let policy = RiskPolicy::default();
        let kind = ActionKind::new("profile_view");
        let now = Utc::now();
        let history: Vec<DateTime<Utc>> = (0..500).map(|i| now - Duration::seconds(i)).collect();

        let outcome =
            RateLimitCheck.evaluate(&ctx_with(&kind, &history, 500, None, now, &policy));
        assert!(outcome.passed);
        assert_eq!(outcome.risk_weight, 0.0);
    }

    #[test]
    fn rate_limit_fails_at_capacity() {
        let policy = RiskPolicy::default();
        let kind = ActionKind::new("group_join");
        let now = Utc::now();
        let history: Vec<DateTime<Utc>> =
            (0..5).map(|i| now - Duration::minutes(5 - i)).collect();

        let outcome = RateLimitCheck.evaluate(&ctx_with(&kind, &history, 5, None, now, &policy));
        assert!(!outcome.passed);
        assert!((outcome.risk_weight - 0.4).abs() < f64::EPSILON);
        assert!(outcome.message.unwrap().contains("5/5"));
    }

    #[test]
    fn burst_ignores_sparse_history() {
        let policy = RiskPolicy::default();
        let kind = ActionKind::new("like");
        let now = Utc::now();
        let history = vec![now - Duration::seconds(3), now];

        let outcome = RapidBurstCheck.evaluate(&ctx_with(&kind, &history, 2, None, now, &policy));
        assert!(outcome.passed);
    }

    #[test]
    fn burst_flags_three_rapid_actions() {
        let policy = RiskPolicy::default();
        let kind = ActionKind::new("like");
        let now = Utc::now();
        let history = vec![
            now - Duration::minutes(30),
            now - Duration::seconds(8),
            now - Duration::seconds(4),
            now,
        ];

        let outcome = RapidBurstCheck.evaluate(&ctx_with(&kind, &history, 4, None, now, &policy));
        assert!(!outcome.passed);
        assert!((outcome.risk_weight - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn warmth_only_applies_to_young_accounts() {
        let policy = RiskPolicy::default();
        let kind = ActionKind::new("post");
        let now = Utc::now();
        let history: Vec<DateTime<Utc>> = Vec::new();

        let seasoned =
            AccountWarmthCheck.evaluate(&ctx_with(&kind, &history, 100, Some(365), now, &policy));
        assert!(seasoned.passed);

        let cold =
            AccountWarmthCheck.evaluate(&ctx_with(&kind, &history, 21, Some(3), now, &policy));
        assert!(!cold.passed);

        let unknown =
            AccountWarmthCheck.evaluate(&ctx_with(&kind, &history, 1000, None, now, &policy));
        assert!(unknown.passed);
    }
}
