//! Admission-control gate - risk-scored preflight checks
//!
//! Before every automated action the orchestrator asks this gate "is it safe
//! to act now?". The gate runs a fixed, ordered set of independent checks
//! (sliding-window rate limits, burst detection, account warm-up, plus
//! always-pass extension points for future heuristics), sums the weights of
//! the failures into a single risk score, and admits the action only while
//! the score stays under the configured threshold.
//!
//! The gate itself is side-effect-free: action history moves only through
//! [`RiskEngine::record_action`], which callers invoke after a real
//! side-effecting attempt.

pub mod checks;
pub mod clock;
pub mod engine;
pub mod policy;
pub mod types;

pub use checks::{CheckContext, RiskCheck};
pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::RiskEngine;
pub use policy::{default_rate_windows, BurstPolicy, RateWindow, RiskPolicy, WarmthPolicy};
pub use types::{CheckOutcome, RiskAssessment};
