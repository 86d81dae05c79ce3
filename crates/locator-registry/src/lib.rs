//! Adaptive UI-locator registry - selector fallback with self-healing
//!
//! Named UI targets each carry a ranked chain of locator candidates
//! (CSS/XPath/text/test-id). Resolution walks the chain in
//! `(priority, -success_count)` order, records every hit and miss, demotes
//! chronically failing candidates, and - when the whole chain is exhausted -
//! falls back to generic patterns derived from the target name, appending
//! any pattern that works as a permanent low-priority candidate.

pub mod defaults;
pub mod discovery;
pub mod health;
pub mod registry;
pub mod resolver;
pub mod types;

pub use defaults::default_targets;
pub use health::{CandidateHealth, HealthReport};
pub use registry::{SelectorRegistry, DEMOTION_THRESHOLD, DISCOVERED_PRIORITY};
pub use types::{SelectorCandidate, SelectorKind};
