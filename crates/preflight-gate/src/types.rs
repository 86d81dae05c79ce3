//! Core types for the admission gate

use serde::{Deserialize, Serialize};

/// Outcome of one independent admission check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// Stable check name ("rate_limit", "suspicious_patterns", ...)
    pub name: String,

    /// Whether the check passed
    pub passed: bool,

    /// Risk contributed when the check fails
    pub risk_weight: f64,

    /// Human-readable failure detail
    pub message: Option<String>,
}

impl CheckOutcome {
    /// Create a passing outcome (contributes no risk)
    pub fn pass(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            risk_weight: 0.0,
            message: None,
        }
    }

    /// Create a failing outcome with its weight and detail
    pub fn fail(name: impl Into<String>, risk_weight: f64, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            risk_weight,
            message: Some(message.into()),
        }
    }
}

/// Aggregated admission verdict
///
/// Recomputed fresh on every `check()` call, never cached. `details` always
/// carries every check that ran, passing or not, so operational tooling can
/// see the complete picture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Whether the action may proceed (`risk_score < pass_threshold`)
    pub passed: bool,

    /// Sum of risk weights over failed checks
    pub risk_score: f64,

    /// Names of the checks that failed
    pub failed_checks: Vec<String>,

    /// Every check outcome, in evaluation order
    pub details: Vec<CheckOutcome>,
}

impl RiskAssessment {
    /// Derive the verdict from a complete set of outcomes
    pub fn from_outcomes(details: Vec<CheckOutcome>, pass_threshold: f64) -> Self {
        let failed: Vec<&CheckOutcome> = details.iter().filter(|c| !c.passed).collect();
        let risk_score: f64 = failed.iter().map(|c| c.risk_weight).sum();
        let failed_checks = failed.iter().map(|c| c.name.clone()).collect();

        Self {
            passed: risk_score < pass_threshold,
            risk_score,
            failed_checks,
            details,
        }
    }
}
