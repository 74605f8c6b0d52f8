//! Optimizer configuration, defaults and validation.

use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_4;
use crate::error::{EvolutionError, Result};
use crate::objective::{ConstraintType, ObjectiveFunction, ObjectiveTarget};

/// Complete optimizer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvolutionConfig {
    /// Population shape
    pub population: PopulationConfig,

    /// Quantum state parameters
    pub quantum: QuantumConfig,

    /// Genetic operator parameters
    pub evolution: EvolutionParams,

    /// Objectives summed into fitness
    pub objectives: Vec<ObjectiveFunction>,

    /// Run-level limits
    pub constraints: GlobalConstraints,
}

/// Population shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulationConfig {
    /// Individuals per generation
    pub size: usize,
    /// Positions per gene
    pub num_genes: usize,
    /// Initialization strategy (all strategies sample uniformly)
    pub initialization_strategy: InitializationStrategy,
}

/// Population initialization strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InitializationStrategy {
    /// Uniform random genes
    Random,
    /// Quantum-style genes
    Quantum,
    /// Mix of both
    Hybrid,
}

/// Quantum state parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantumConfig {
    /// Entanglement threshold
    pub entanglement_threshold: f64,
    /// Superposition decay rate
    pub superposition_decay_rate: f64,
    /// Upper bound of the phase increment applied by mutation
    pub phase_rotation_angle: f64,
    /// How a gene collapses to a 0/1 state
    pub measurement_strategy: MeasurementStrategy,
}

/// How a gene collapses to a 0/1 state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementStrategy {
    /// Emit 1 with the collapse probability
    Probabilistic,
    /// Emit 1 when the collapse probability exceeds 0.5
    Deterministic,
}

/// Genetic operator parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvolutionParams {
    /// Generation budget for a driven run
    pub max_generations: u64,
    /// Probability that an offspring receives one point mutation
    pub mutation_rate: f64,
    /// Probability that an offspring is produced by crossover instead of cloning
    pub crossover_rate: f64,
    /// Selection pressure
    pub selection_pressure: f64,
    /// Adaptive parameter tuning flag
    pub adaptive_parameters: bool,
}

/// Run-level limits, checked by the caller between generations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalConstraints {
    /// Wall-clock budget in seconds
    pub time_limit: u64,
    /// Memory budget in megabytes
    pub resource_limit: u64,
    /// Diversity below which a driven run stops
    pub diversity_threshold: f64,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            size: 100,
            num_genes: 50,
            initialization_strategy: InitializationStrategy::Quantum,
        }
    }
}

impl Default for QuantumConfig {
    fn default() -> Self {
        Self {
            entanglement_threshold: 0.7,
            superposition_decay_rate: 0.01,
            phase_rotation_angle: FRAC_PI_4,
            measurement_strategy: MeasurementStrategy::Probabilistic,
        }
    }
}

impl Default for EvolutionParams {
    fn default() -> Self {
        Self {
            max_generations: 1000,
            mutation_rate: 0.01,
            crossover_rate: 0.8,
            selection_pressure: 0.1,
            adaptive_parameters: true,
        }
    }
}

impl Default for GlobalConstraints {
    fn default() -> Self {
        Self {
            time_limit: 3600,
            resource_limit: 1000,
            diversity_threshold: 0.1,
        }
    }
}

/// The three built-in objectives.
pub fn default_objectives() -> Vec<ObjectiveFunction> {
    vec![
        ObjectiveFunction::new(
            "efficiency",
            "System Efficiency",
            0.4,
            ObjectiveTarget::Maximize,
            0.0,
            1.0,
            ConstraintType::Soft,
        ),
        ObjectiveFunction::new(
            "complexity",
            "Solution Complexity",
            0.3,
            ObjectiveTarget::Minimize,
            0.0,
            1.0,
            ConstraintType::Soft,
        ),
        ObjectiveFunction::new(
            "stability",
            "System Stability",
            0.3,
            ObjectiveTarget::Maximize,
            0.5,
            1.0,
            ConstraintType::Hard,
        ),
    ]
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population: PopulationConfig::default(),
            quantum: QuantumConfig::default(),
            evolution: EvolutionParams::default(),
            objectives: default_objectives(),
            constraints: GlobalConstraints::default(),
        }
    }
}

impl EvolutionConfig {
    /// Parse a complete configuration. Every required section must be present.
    pub fn from_json(json: &str) -> Result<Self> {
        let overrides: ConfigOverrides = serde_json::from_str(json)?;
        Self::try_from(overrides)
    }

    /// Check that the configuration describes a well-defined evolution.
    pub fn validate(&self) -> Result<()> {
        if self.population.size < 2 {
            return Err(EvolutionError::InvalidConfig(format!(
                "population.size must be at least 2, got {}",
                self.population.size
            )));
        }
        if self.population.num_genes == 0 {
            return Err(EvolutionError::InvalidConfig(
                "population.numGenes must be positive".to_string(),
            ));
        }

        check_probability("evolution.mutationRate", self.evolution.mutation_rate)?;
        check_probability("evolution.crossoverRate", self.evolution.crossover_rate)?;

        let angle = self.quantum.phase_rotation_angle;
        if !angle.is_finite() || angle < 0.0 {
            return Err(EvolutionError::InvalidConfig(format!(
                "quantum.phaseRotationAngle must be a finite non-negative number, got {angle}"
            )));
        }

        for objective in &self.objectives {
            if !objective.weight.is_finite() {
                return Err(EvolutionError::InvalidConfig(format!(
                    "objective `{}` has a non-finite weight",
                    objective.id
                )));
            }
            let (min, max) = objective.normalization_range();
            if !(max > min) {
                return Err(EvolutionError::InvalidConfig(format!(
                    "objective `{}` has an empty range [{min}, {max}]",
                    objective.id
                )));
            }
        }

        Ok(())
    }
}

fn check_probability(field: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(EvolutionError::InvalidConfig(format!(
            "{field} must be within [0, 1], got {value}"
        )))
    }
}

/// A configuration where every section is optional.
///
/// Used both for strict construction, where the four required sections must
/// be present, and for editing, where provided sections replace defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigOverrides {
    /// Population shape
    pub population: Option<PopulationConfig>,
    /// Quantum state parameters
    pub quantum: Option<QuantumConfig>,
    /// Genetic operator parameters
    pub evolution: Option<EvolutionParams>,
    /// Objectives summed into fitness
    pub objectives: Option<Vec<ObjectiveFunction>>,
    /// Run-level limits
    pub constraints: Option<GlobalConstraints>,
}

impl ConfigOverrides {
    /// Parse overrides from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Replace each section of `base` that these overrides provide.
    pub fn merge_onto(self, base: EvolutionConfig) -> EvolutionConfig {
        EvolutionConfig {
            population: self.population.unwrap_or(base.population),
            quantum: self.quantum.unwrap_or(base.quantum),
            evolution: self.evolution.unwrap_or(base.evolution),
            objectives: self.objectives.unwrap_or(base.objectives),
            constraints: self.constraints.unwrap_or(base.constraints),
        }
    }
}

impl TryFrom<ConfigOverrides> for EvolutionConfig {
    type Error = EvolutionError;

    fn try_from(overrides: ConfigOverrides) -> Result<Self> {
        Ok(Self {
            population: overrides
                .population
                .ok_or(EvolutionError::MissingSection("population"))?,
            quantum: overrides
                .quantum
                .ok_or(EvolutionError::MissingSection("quantum"))?,
            evolution: overrides
                .evolution
                .ok_or(EvolutionError::MissingSection("evolution"))?,
            objectives: overrides
                .objectives
                .ok_or(EvolutionError::MissingSection("objectives"))?,
            constraints: overrides.constraints.unwrap_or_default(),
        })
    }
}

impl From<EvolutionConfig> for ConfigOverrides {
    fn from(config: EvolutionConfig) -> Self {
        Self {
            population: Some(config.population),
            quantum: Some(config.quantum),
            evolution: Some(config.evolution),
            objectives: Some(config.objectives),
            constraints: Some(config.constraints),
        }
    }
}
