//! Health reporting for operational tooling
//!
//! Read-only view over the candidate statistics; consumed by status
//! endpoints, never by the resolver itself.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::registry::SelectorRegistry;
use crate::types::SelectorKind;

/// Health snapshot of one candidate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateHealth {
    pub value: String,
    pub kind: SelectorKind,

    /// `success_count / total_uses`, 0 when never used
    pub success_rate: f64,

    pub total_uses: u64,
    pub last_success_at: Option<DateTime<Utc>>,
}

/// Health snapshot of every registered target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub targets: HashMap<String, Vec<CandidateHealth>>,
}

impl SelectorRegistry {
    /// Compute the current health report
    pub fn health_report(&self) -> HealthReport {
        let mut targets = HashMap::new();

        for name in self.target_names() {
            let stats = self
                .candidates(&name)
                .into_iter()
                .map(|candidate| CandidateHealth {
                    success_rate: candidate.success_rate(),
                    total_uses: candidate.total_uses(),
                    value: candidate.value,
                    kind: candidate.kind,
                    last_success_at: candidate.last_success_at,
                })
                .collect();
            targets.insert(name, stats);
        }

        HealthReport { targets }
    }
}
