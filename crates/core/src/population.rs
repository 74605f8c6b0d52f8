//! Population of quantum genes.

use serde::{Deserialize, Serialize};
use crate::gene::QuantumGene;

/// The current generation's individuals plus derived statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Population {
    /// Individuals of this generation
    pub individuals: Vec<QuantumGene>,

    /// Generation the individuals belong to
    pub generation: u64,

    /// Mean pairwise superposition distance
    pub diversity: f64,

    /// Carried for reporting; not derived from the individuals
    pub convergence: f64,
}

impl Population {
    /// Wrap a set of individuals, computing their diversity.
    pub fn new(individuals: Vec<QuantumGene>, generation: u64) -> Self {
        let diversity = diversity(&individuals);
        Self {
            individuals,
            generation,
            diversity,
            convergence: 0.0,
        }
    }

    /// Number of individuals.
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    /// Whether the population is empty.
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Index of the fittest individual. Ties keep the earliest.
    pub fn fittest_index(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, ind) in self.individuals.iter().enumerate() {
            match best {
                Some(b) if ind.fitness <= self.individuals[b].fitness => {}
                _ => best = Some(i),
            }
        }
        best
    }
}

/// Mean Euclidean distance between the superposition vectors of all ordered
/// pairs of distinct individuals.
///
/// Returns 0 for fewer than two individuals.
pub fn diversity(individuals: &[QuantumGene]) -> f64 {
    let n = individuals.len();
    if n < 2 {
        return 0.0;
    }

    let total: f64 = individuals
        .iter()
        .map(|a| individuals.iter().map(|b| a.distance(b)).sum::<f64>())
        .sum();

    total / (n * (n - 1)) as f64
}
