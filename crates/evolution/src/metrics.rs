//! Derived population and quantum statistics.

use qevo_core::QuantumGene;

/// Mean over individuals of each individual's mean absolute entanglement.
pub fn entanglement_strength(individuals: &[QuantumGene]) -> f64 {
    mean_of(individuals, QuantumGene::mean_entanglement)
}

/// Mean over individuals of each individual's superposition balance.
pub fn superposition_quality(individuals: &[QuantumGene]) -> f64 {
    mean_of(individuals, QuantumGene::superposition_balance)
}

/// Highest and mean fitness.
pub fn fitness_summary(individuals: &[QuantumGene]) -> (f64, f64) {
    if individuals.is_empty() {
        return (0.0, 0.0);
    }
    let best = individuals
        .iter()
        .map(|ind| ind.fitness)
        .fold(f64::NEG_INFINITY, f64::max);
    (best, mean_of(individuals, |ind| ind.fitness))
}

/// `(current - previous) / |previous|`, dividing by 1 when `previous` is zero.
pub fn relative_change(current: f64, previous: f64) -> f64 {
    (current - previous) / nonzero(previous.abs())
}

/// `(best - recorded) / best`, dividing by 1 when `best` is zero.
pub fn convergence_rate(best: f64, recorded: f64) -> f64 {
    (best - recorded) / nonzero(best)
}

fn nonzero(denominator: f64) -> f64 {
    if denominator == 0.0 {
        1.0
    } else {
        denominator
    }
}

fn mean_of(individuals: &[QuantumGene], f: impl Fn(&QuantumGene) -> f64) -> f64 {
    if individuals.is_empty() {
        return 0.0;
    }
    individuals.iter().map(f).sum::<f64>() / individuals.len() as f64
}
