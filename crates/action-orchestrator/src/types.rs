//! Result and retry-state types for the orchestrator

use std::time::{Duration, Instant};

use preflight_gate::RiskAssessment;
use serde::{Deserialize, Serialize};

use crate::pacing::PacingPlan;

/// Orchestrator configuration, supplied at construction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Attempts per `execute` call
    #[serde(default = "OrchestratorConfig::default_max_retries")]
    pub max_retries: u32,

    /// Base of the exponential backoff between attempts
    #[serde(default = "OrchestratorConfig::default_retry_delay_base_ms")]
    pub retry_delay_base_ms: u64,

    /// Ceiling on a single backoff sleep
    #[serde(default = "OrchestratorConfig::default_retry_backoff_cap_ms")]
    pub retry_backoff_cap_ms: u64,

    /// Deadline for `safe_navigate`
    #[serde(default = "OrchestratorConfig::default_navigate_timeout_ms")]
    pub navigate_timeout_ms: u64,

    #[serde(default)]
    pub pacing: PacingPlan,
}

impl OrchestratorConfig {
    fn default_max_retries() -> u32 {
        3
    }

    fn default_retry_delay_base_ms() -> u64 {
        2_000
    }

    fn default_retry_backoff_cap_ms() -> u64 {
        60_000
    }

    fn default_navigate_timeout_ms() -> u64 {
        30_000
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_retries: Self::default_max_retries(),
            retry_delay_base_ms: Self::default_retry_delay_base_ms(),
            retry_backoff_cap_ms: Self::default_retry_backoff_cap_ms(),
            navigate_timeout_ms: Self::default_navigate_timeout_ms(),
            pacing: PacingPlan::default(),
        }
    }
}

/// Per-invocation execution state
///
/// Created at `execute()` entry and dropped at return; nothing here survives
/// across calls.
#[derive(Debug)]
pub struct RetryContext {
    /// 1-based attempt counter; 0 before the first attempt starts
    pub attempt: u32,

    /// Backoff sleeps applied so far
    pub backoff_schedule: Vec<Duration>,

    pub status: RetryStatus,

    /// Invocation start, for latency reporting
    pub started_at: Instant,
}

impl RetryContext {
    pub fn new() -> Self {
        Self {
            attempt: 0,
            backoff_schedule: Vec::new(),
            status: RetryStatus::Pending,
            started_at: Instant::now(),
        }
    }

    /// Enter the next attempt
    pub fn begin_attempt(&mut self) {
        self.attempt += 1;
        self.status = RetryStatus::Running;
    }

    pub fn push_backoff(&mut self, delay: Duration) {
        self.backoff_schedule.push(delay);
    }
}

impl Default for RetryContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Lifecycle of one `execute` invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RetryStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
}

/// Result reported to the caller
///
/// The admission diagnostics (`risk_score`, `failed_checks`) are populated
/// only for gate rejections; transient and terminal action failures carry
/// the last error message and the attempt count.
#[derive(Debug, Clone, Serialize)]
pub struct ActionOutcome<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub attempts: u32,
    pub risk_score: Option<f64>,
    pub failed_checks: Vec<String>,
}

impl<T> ActionOutcome<T> {
    /// Rejected by the preflight gate; no attempt ran
    pub fn rejected(assessment: &RiskAssessment) -> Self {
        Self {
            success: false,
            data: None,
            error: Some("Preflight check failed".to_string()),
            attempts: 0,
            risk_score: Some(assessment.risk_score),
            failed_checks: assessment.failed_checks.clone(),
        }
    }

    /// Work completed on the given attempt
    pub fn succeeded(data: T, attempts: u32) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            attempts,
            risk_score: None,
            failed_checks: Vec::new(),
        }
    }

    /// Work exhausted its attempts
    pub fn failed(error: impl Into<String>, attempts: u32) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            attempts,
            risk_score: None,
            failed_checks: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use preflight_gate::CheckOutcome;

    #[test]
    fn retry_context_tracks_attempts() {
        let mut retry = RetryContext::new();
        assert_eq!(retry.attempt, 0);
        assert_eq!(retry.status, RetryStatus::Pending);

        retry.begin_attempt();
        retry.push_backoff(Duration::from_secs(2));
        retry.begin_attempt();

        assert_eq!(retry.attempt, 2);
        assert_eq!(retry.status, RetryStatus::Running);
        assert_eq!(retry.backoff_schedule, vec![Duration::from_secs(2)]);
    }

    #[test]
    fn rejected_outcome_carries_gate_diagnostics() {
        let assessment = RiskAssessment::from_outcomes(
            vec![
                CheckOutcome::fail("rate_limit", 0.4, "exceeded"),
                CheckOutcome::fail("suspicious_patterns", 0.3, "too rapid"),
            ],
            0.7,
        );

        let outcome: ActionOutcome<()> = ActionOutcome::rejected(&assessment);
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("Preflight check failed"));
        assert_eq!(outcome.attempts, 0);
        assert!((outcome.risk_score.unwrap() - 0.7).abs() < 1e-9);
        assert_eq!(outcome.failed_checks.len(), 2);
    }

    #[test]
    fn config_deserializes_with_partial_fields() {
        let config: OrchestratorConfig = serde_json::from_str(r#"{"max_retries": 5}"#).unwrap();
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.retry_delay_base_ms, 2_000);
        assert_eq!(config.pacing.pre_action.min_ms, 500);
    }
}
