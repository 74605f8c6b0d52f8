//! Qevo core data models.
//!
//! This crate defines the data structures shared by the quantum-inspired
//! evolutionary optimizer: genes, populations, objectives, configuration
//! and the per-generation metrics snapshot.

#![warn(missing_docs)]

// Identity
mod id;
mod error;

// Genome
mod gene;
mod population;

// Configuration
mod objective;
mod config;

// Reporting
mod metrics;
mod state;

// Re-exports
pub use id::RunId;
pub use error::{EvolutionError, Result};

pub use gene::QuantumGene;
pub use population::{Population, diversity};

pub use objective::{
    ObjectiveFunction, ObjectiveTarget, ObjectiveConstraints, ConstraintType, HARD_VIOLATION_WEIGHT,
};
pub use config::{
    EvolutionConfig, ConfigOverrides, PopulationConfig, QuantumConfig, EvolutionParams,
    GlobalConstraints, InitializationStrategy, MeasurementStrategy, default_objectives,
};

pub use metrics::{EvolutionMetrics, PopulationStats, QuantumMetrics, ObjectiveMetric};
pub use state::{EvolutionState, EvolutionStatus};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
