//! Per-generation metrics snapshot.

use serde::{Deserialize, Serialize};
use crate::objective::ObjectiveFunction;

/// Metrics recomputed after every generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvolutionMetrics {
    /// Fitness and diversity statistics
    pub population_stats: PopulationStats,
    /// Quantum state statistics
    pub quantum_metrics: QuantumMetrics,
    /// One entry per configured objective
    pub objectives: Vec<ObjectiveMetric>,
}

/// Fitness and diversity statistics of a generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulationStats {
    /// Highest fitness in the generation
    pub best_fitness: f64,
    /// Mean fitness in the generation
    pub average_fitness: f64,
    /// Population diversity
    pub diversity_index: f64,
    /// Relative change of best fitness
    pub convergence_rate: f64,
}

/// Quantum state statistics of a generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantumMetrics {
    /// Mean absolute entanglement
    pub entanglement_strength: f64,
    /// Mean closeness of amplitudes to 0.5
    pub superposition_quality: f64,
    /// Relative gain over a random classical baseline
    pub quantum_advantage: f64,
}

/// Tracking of a single objective against the best solution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveMetric {
    /// Objective identifier
    pub id: String,
    /// Raw objective value of the best solution
    pub current_value: f64,
    /// Relative change since the previous snapshot
    pub improvement: f64,
    /// Weighted count of bound breaches
    pub constraint_violations: u32,
}

impl ObjectiveMetric {
    /// Zeroed entry for an objective.
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            current_value: 0.0,
            improvement: 0.0,
            constraint_violations: 0,
        }
    }
}

impl EvolutionMetrics {
    /// Zeroed metrics with one entry per objective.
    pub fn initial(objectives: &[ObjectiveFunction]) -> Self {
        Self {
            population_stats: PopulationStats::default(),
            quantum_metrics: QuantumMetrics::default(),
            objectives: objectives.iter().map(|o| ObjectiveMetric::empty(&o.id)).collect(),
        }
    }

    /// Last recorded value of an objective, or 0 if it was never recorded.
    pub fn objective_value(&self, id: &str) -> f64 {
        self.objectives
            .iter()
            .find(|o| o.id == id)
            .map(|o| o.current_value)
            .unwrap_or(0.0)
    }
}
