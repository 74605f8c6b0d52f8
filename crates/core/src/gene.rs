//! Quantum gene - one candidate solution.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// A candidate solution encoded as superposition amplitudes, entanglement
/// coefficients and a global phase.
///
/// `superposition[i]` and `entanglement[i]` describe the same gene position;
/// both vectors always have the same length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantumGene {
    /// Amplitudes, each in [0, 1) at creation
    pub superposition: Vec<f64>,

    /// Coefficients, each in [-1, 1) at creation
    pub entanglement: Vec<f64>,

    /// Phase, in [0, 2π) at creation
    pub phase: f64,

    /// Weighted objective score, recomputed every generation
    pub fitness: f64,
}

impl QuantumGene {
    /// Create a gene with `num_genes` uniformly random positions.
    pub fn random<R: Rng + ?Sized>(num_genes: usize, rng: &mut R) -> Self {
        let superposition = (0..num_genes).map(|_| rng.gen::<f64>()).collect();
        let entanglement = (0..num_genes).map(|_| rng.gen::<f64>() * 2.0 - 1.0).collect();

        Self {
            superposition,
            entanglement,
            phase: rng.gen::<f64>() * TAU,
            fitness: 0.0,
        }
    }

    /// Create a "classical" gene: amplitudes hard-thresholded to {0, 1} by a
    /// coin flip per position, no entanglement and zero phase.
    pub fn classical<R: Rng + ?Sized>(num_genes: usize, rng: &mut R) -> Self {
        let mut gene = Self::random(num_genes, rng);
        for amplitude in gene.superposition.iter_mut() {
            *amplitude = if rng.gen::<f64>() > 0.5 { 1.0 } else { 0.0 };
        }
        gene.entanglement.iter_mut().for_each(|e| *e = 0.0);
        gene.phase = 0.0;
        gene
    }

    /// Create a gene from explicit values. Fitness starts at zero.
    ///
    /// Returns `None` if the two vectors differ in length.
    pub fn from_parts(superposition: Vec<f64>, entanglement: Vec<f64>, phase: f64) -> Option<Self> {
        if superposition.len() != entanglement.len() {
            return None;
        }
        Some(Self {
            superposition,
            entanglement,
            phase,
            fitness: 0.0,
        })
    }

    /// Number of gene positions.
    pub fn len(&self) -> usize {
        self.superposition.len()
    }

    /// Whether the gene has no positions.
    pub fn is_empty(&self) -> bool {
        self.superposition.is_empty()
    }

    /// Mean of `|entanglement_i|` over all positions.
    pub fn mean_entanglement(&self) -> f64 {
        mean(self.entanglement.iter().map(|e| e.abs()), self.entanglement.len())
    }

    /// Mean of `min(a, 1 - a)` over all amplitudes; largest when amplitudes sit near 0.5.
    pub fn superposition_balance(&self) -> f64 {
        mean(
            self.superposition.iter().map(|a| a.min(1.0 - a)),
            self.superposition.len(),
        )
    }

    /// Euclidean distance between the superposition vectors of two genes.
    pub fn distance(&self, other: &QuantumGene) -> f64 {
        self.superposition
            .iter()
            .zip(other.superposition.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>()
            .sqrt()
    }
}

fn mean(values: impl Iterator<Item = f64>, len: usize) -> f64 {
    if len == 0 {
        return 0.0;
    }
    values.sum::<f64>() / len as f64
}
