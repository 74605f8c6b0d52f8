//! Snapshot of a driven evolution run.

use serde::{Deserialize, Serialize};
use crate::gene::QuantumGene;
use crate::metrics::EvolutionMetrics;
use crate::Time;

/// Lifecycle of a driven run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvolutionStatus {
    /// Constructed, no generation evolved yet
    Idle,
    /// Evolving
    Running,
    /// A stop condition was reached
    Completed,
    /// Construction failed; nothing to evolve
    Error,
}

/// What a host presents after each generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvolutionState {
    /// Best individual found so far
    pub best_solution: Option<QuantumGene>,
    /// Latest metrics
    pub metrics: EvolutionMetrics,
    /// Generations evolved
    pub generation: u64,
    /// Run status
    pub status: EvolutionStatus,
    /// When the snapshot was taken
    pub updated_at: Time,
}
