//! Action orchestrator - admission gate + retries + human pacing
//!
//! Every domain operation (profile edits, friend actions, posting,
//! messaging, group actions) is a thin `work` closure executed through
//! [`Orchestrator::execute`]:
//!
//! 1. The preflight gate decides whether it is safe to act at all; a
//!    rejection returns the risk diagnostics without running `work`.
//! 2. Admitted work runs up to `max_retries` times, each attempt preceded by
//!    a human-pacing delay and separated by exponential backoff with jitter.
//! 3. A successful attempt is recorded with the gate exactly once, so the
//!    rate history reflects real side effects, never gate consultations.
//!
//! `work` closures compose the pacing primitives (`human_type`,
//! `human_click`, `scroll_slowly`, `wait_for_element`, `safe_navigate`) with
//! the locator registry to touch the page.

pub mod errors;
pub mod executor;
pub mod pacing;
pub mod session;
pub mod types;

pub use errors::ActionError;
pub use executor::Orchestrator;
pub use pacing::{DelayRange, PacingPlan};
pub use session::SessionGate;
pub use types::{ActionOutcome, OrchestratorConfig, RetryContext, RetryStatus};
