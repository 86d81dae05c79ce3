//! Per-session serialization for callers
//!
//! One browser page/context is the shared mutable resource behind every
//! `work` closure; concurrent navigations or DOM queries against the same
//! session race and corrupt each other's state. The orchestrator itself does
//! not serialize access - domain services hold a [`SessionGate`] guard for
//! the duration of each `execute` call instead.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use webpilot_core_types::SessionId;

/// Keyed mutex map granting at most one in-flight action per session
#[derive(Default)]
pub struct SessionGate {
    slots: DashMap<SessionId, Arc<Mutex<()>>>,
}

impl SessionGate {
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
        }
    }

    /// Acquire the session's slot, waiting until any in-flight action on the
    /// same session finishes
    pub async fn acquire(&self, session: &SessionId) -> OwnedMutexGuard<()> {
        let slot = {
            let entry = self
                .slots
                .entry(session.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())));
            entry.value().clone()
        };
        slot.lock_owned().await
    }
}
