//! Risk policy model with conservative defaults
//!
//! Every threshold the gate consults lives here as configuration. The
//! constants carried by `Default` reflect observed tolerance of the target
//! site, not derived values; an external configuration layer may override
//! any of them at construction time.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Sliding rate window for one action kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RateWindow {
    /// Maximum recorded actions tolerated inside the window
    pub max_actions: u32,

    /// Window length in milliseconds
    pub window_ms: u64,
}

impl RateWindow {
    /// Convenience constructor for per-hour limits
    pub fn per_hour(max_actions: u32) -> Self {
        Self {
            max_actions,
            window_ms: 3_600_000,
        }
    }

    pub fn window(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.window_ms as i64)
    }
}

/// Rapid-burst detection policy
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BurstPolicy {
    /// Number of most-recent actions inspected
    #[serde(default = "BurstPolicy::default_min_actions")]
    pub min_actions: usize,

    /// Span under which the burst is considered machine-like
    #[serde(default = "BurstPolicy::default_span_ms")]
    pub span_ms: u64,

    /// Risk contributed on failure
    #[serde(default = "BurstPolicy::default_risk_weight")]
    pub risk_weight: f64,
}

impl BurstPolicy {
    fn default_min_actions() -> usize {
        3
    }

    fn default_span_ms() -> u64 {
        10_000
    }

    fn default_risk_weight() -> f64 {
        0.3
    }
}

impl Default for BurstPolicy {
    fn default() -> Self {
        Self {
            min_actions: Self::default_min_actions(),
            span_ms: Self::default_span_ms(),
            risk_weight: Self::default_risk_weight(),
        }
    }
}

/// Account warm-up policy for young accounts
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WarmthPolicy {
    /// Accounts younger than this are considered cold
    #[serde(default = "WarmthPolicy::default_min_account_age_days")]
    pub min_account_age_days: u32,

    /// Total actions (all kinds) a cold account may accumulate
    #[serde(default = "WarmthPolicy::default_max_total_actions")]
    pub max_total_actions: u64,

    /// Risk contributed on failure
    #[serde(default = "WarmthPolicy::default_risk_weight")]
    pub risk_weight: f64,
}

impl WarmthPolicy {
    fn default_min_account_age_days() -> u32 {
        14
    }

    fn default_max_total_actions() -> u64 {
        20
    }

    fn default_risk_weight() -> f64 {
        0.3
    }
}

impl Default for WarmthPolicy {
    fn default() -> Self {
        Self {
            min_account_age_days: Self::default_min_account_age_days(),
            max_total_actions: Self::default_max_total_actions(),
            risk_weight: Self::default_risk_weight(),
        }
    }
}

/// Complete gate policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskPolicy {
    /// Assessments at or above this score are rejected
    #[serde(default = "RiskPolicy::default_pass_threshold")]
    pub pass_threshold: f64,

    /// Risk contributed by a failed rate-limit check
    #[serde(default = "RiskPolicy::default_rate_risk_weight")]
    pub rate_risk_weight: f64,

    /// Per-kind sliding windows; kinds absent here are unthrottled
    #[serde(default = "default_rate_windows")]
    pub rate_windows: HashMap<String, RateWindow>,

    #[serde(default)]
    pub burst: BurstPolicy,

    #[serde(default)]
    pub warmth: WarmthPolicy,
}

impl RiskPolicy {
    fn default_pass_threshold() -> f64 {
        0.7
    }

    fn default_rate_risk_weight() -> f64 {
        0.4
    }

    /// Look up the window configured for a kind
    pub fn window_for(&self, kind: &str) -> Option<&RateWindow> {
        self.rate_windows.get(kind)
    }
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self {
            pass_threshold: Self::default_pass_threshold(),
            rate_risk_weight: Self::default_rate_risk_weight(),
            rate_windows: default_rate_windows(),
            burst: BurstPolicy::default(),
            warmth: WarmthPolicy::default(),
        }
    }
}

/// Default per-kind limits (max actions per 1-hour window)
pub fn default_rate_windows() -> HashMap<String, RateWindow> {
    let mut windows = HashMap::new();
    windows.insert("friend_request".to_string(), RateWindow::per_hour(15));
    windows.insert("post".to_string(), RateWindow::per_hour(8));
    windows.insert("message".to_string(), RateWindow::per_hour(40));
    windows.insert("like".to_string(), RateWindow::per_hour(80));
    windows.insert("comment".to_string(), RateWindow::per_hour(20));
    windows.insert("group_join".to_string(), RateWindow::per_hour(5));
    windows.insert("page_like".to_string(), RateWindow::per_hour(10));
    windows
}
