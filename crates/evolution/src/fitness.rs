//! Fitness evaluation: collapse a gene, score the collapsed state, and sum
//! the weighted, normalized objective values.

use qevo_core::{MeasurementStrategy, ObjectiveFunction, QuantumGene};
use rand::Rng;

/// Collapse threshold used by deterministic measurement.
pub const DETERMINISTIC_THRESHOLD: f64 = 0.5;

/// Probability that position `i` of `gene` collapses to 1.
pub fn collapse_probability(gene: &QuantumGene, i: usize) -> f64 {
    (gene.superposition[i] * (gene.phase + gene.entanglement[i]).cos()).powi(2)
}

/// Reduce a gene to one 0/1 value per position.
///
/// Probabilistic measurement draws from `rng`; deterministic measurement
/// never touches it.
pub fn collapse<R: Rng + ?Sized>(
    gene: &QuantumGene,
    strategy: MeasurementStrategy,
    rng: &mut R,
) -> Vec<u8> {
    (0..gene.len())
        .map(|i| {
            let probability = collapse_probability(gene, i);
            let one = match strategy {
                MeasurementStrategy::Probabilistic => rng.gen::<f64>() < probability,
                MeasurementStrategy::Deterministic => probability > DETERMINISTIC_THRESHOLD,
            };
            u8::from(one)
        })
        .collect()
}

/// Raw score of a collapsed state for the objective with the given id.
///
/// Unknown ids score 0.
pub fn score_state(state: &[u8], objective_id: &str) -> f64 {
    if state.is_empty() {
        return 0.0;
    }
    let mean = state_mean(state);

    match objective_id {
        "efficiency" => mean,
        "complexity" => 1.0 - (mean - 0.5).abs(),
        "stability" => {
            let variance = state
                .iter()
                .map(|&v| (f64::from(v) - mean).powi(2))
                .sum::<f64>()
                / state.len() as f64;
            1.0 - variance
        }
        _ => 0.0,
    }
}

fn state_mean(state: &[u8]) -> f64 {
    state.iter().map(|&v| f64::from(v)).sum::<f64>() / state.len() as f64
}

/// Raw value of one objective for a gene. Collapses the gene afresh.
pub fn objective_value<R: Rng + ?Sized>(
    gene: &QuantumGene,
    objective: &ObjectiveFunction,
    strategy: MeasurementStrategy,
    rng: &mut R,
) -> f64 {
    let state = collapse(gene, strategy, rng);
    score_state(&state, &objective.id)
}

/// Weighted sum of normalized objective values.
pub fn evaluate<R: Rng + ?Sized>(
    gene: &QuantumGene,
    objectives: &[ObjectiveFunction],
    strategy: MeasurementStrategy,
    rng: &mut R,
) -> f64 {
    objectives
        .iter()
        .map(|objective| {
            let value = objective_value(gene, objective, strategy, rng);
            objective.normalize(value) * objective.weight
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use qevo_core::{ConstraintType, ObjectiveTarget};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gene(superposition: Vec<f64>, entanglement: Vec<f64>, phase: f64) -> QuantumGene {
        QuantumGene::from_parts(superposition, entanglement, phase).unwrap()
    }

    fn objective(id: &str, target: ObjectiveTarget) -> ObjectiveFunction {
        ObjectiveFunction::new(id, id, 1.0, target, 0.0, 1.0, ConstraintType::Soft)
    }

    #[test]
    fn test_deterministic_collapse_thresholds_squared_amplitude() {
        let mut rng = StdRng::seed_from_u64(1);
        let g = gene(vec![0.9, 0.9, 0.1, 0.1], vec![0.0; 4], 0.0);
        let state = collapse(&g, MeasurementStrategy::Deterministic, &mut rng);
        assert_eq!(state, vec![1, 1, 0, 0]);
    }

    #[test]
    fn test_collapse_probability_includes_phase_and_entanglement() {
        let g = gene(vec![1.0], vec![std::f64::consts::FRAC_PI_2], 0.0);
        assert!(collapse_probability(&g, 0) < 1e-12);

        let g = gene(vec![0.8], vec![0.0], std::f64::consts::PI);
        assert!((collapse_probability(&g, 0) - 0.64).abs() < 1e-12);
    }

    #[test]
    fn test_efficiency_golden_value() {
        let mut rng = StdRng::seed_from_u64(2);
        let g = gene(vec![0.9, 0.9, 0.1, 0.1], vec![0.0; 4], 0.0);
        let objectives = [objective("efficiency", ObjectiveTarget::Maximize)];

        let fitness = evaluate(&g, &objectives, MeasurementStrategy::Deterministic, &mut rng);
        assert!((fitness - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_normalization_sign_flip() {
        let mut rng = StdRng::seed_from_u64(3);
        // state = [1, 0, 0, 0], efficiency = 0.25
        let g = gene(vec![0.9, 0.1, 0.1, 0.1], vec![0.0; 4], 0.0);

        let maximize = [objective("efficiency", ObjectiveTarget::Maximize)];
        let minimize = [objective("efficiency", ObjectiveTarget::Minimize)];

        let up = evaluate(&g, &maximize, MeasurementStrategy::Deterministic, &mut rng);
        let down = evaluate(&g, &minimize, MeasurementStrategy::Deterministic, &mut rng);
        assert!((up - 0.25).abs() < 1e-12);
        assert!((down - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_deterministic_evaluation_is_repeatable() {
        let mut rng = StdRng::seed_from_u64(4);
        let g = QuantumGene::random(20, &mut rng);
        let objectives = qevo_core::default_objectives();

        let first = evaluate(&g, &objectives, MeasurementStrategy::Deterministic, &mut rng);
        for _ in 0..10 {
            let again = evaluate(&g, &objectives, MeasurementStrategy::Deterministic, &mut rng);
            assert_eq!(first, again);
        }
    }

    #[test]
    fn test_probabilistic_collapse_tracks_probability() {
        let mut rng = StdRng::seed_from_u64(5);
        // probability = 0.7^2 = 0.49 at every position
        let g = gene(vec![0.7; 1000], vec![0.0; 1000], 0.0);
        let state = collapse(&g, MeasurementStrategy::Probabilistic, &mut rng);
        let ones = state.iter().filter(|&&v| v == 1).count();
        assert!((400..=580).contains(&ones), "ones = {ones}");
    }

    #[test]
    fn test_probabilistic_collapse_extremes() {
        let mut rng = StdRng::seed_from_u64(6);
        let certain = gene(vec![1.0; 50], vec![0.0; 50], 0.0);
        let never = gene(vec![0.0; 50], vec![0.0; 50], 0.0);
        assert!(collapse(&certain, MeasurementStrategy::Probabilistic, &mut rng)
            .iter()
            .all(|&v| v == 1));
        assert!(collapse(&never, MeasurementStrategy::Probabilistic, &mut rng)
            .iter()
            .all(|&v| v == 0));
    }

    #[test]
    fn test_score_state_objectives() {
        assert_eq!(score_state(&[1, 1, 0, 0], "efficiency"), 0.5);
        assert_eq!(score_state(&[1, 1, 0, 0], "complexity"), 1.0);
        assert_eq!(score_state(&[1, 1, 1, 1], "complexity"), 0.5);
        assert_eq!(score_state(&[1, 1, 0, 0], "stability"), 0.75);
        assert_eq!(score_state(&[1, 0, 1], "unknown"), 0.0);
        assert_eq!(score_state(&[], "efficiency"), 0.0);
    }

    #[test]
    fn test_stability_of_constant_state_is_one() {
        assert_eq!(score_state(&[1; 8], "stability"), 1.0);
        assert_eq!(score_state(&[0; 8], "stability"), 1.0);
    }

    #[test]
    fn test_weights_scale_contributions() {
        let mut rng = StdRng::seed_from_u64(7);
        let g = gene(vec![0.9, 0.9, 0.1, 0.1], vec![0.0; 4], 0.0);
        let mut efficiency = objective("efficiency", ObjectiveTarget::Maximize);
        efficiency.weight = 0.4;
        let mut stability = objective("stability", ObjectiveTarget::Maximize);
        stability.weight = 0.6;

        let fitness = evaluate(
            &g,
            &[efficiency, stability],
            MeasurementStrategy::Deterministic,
            &mut rng,
        );
        // 0.4 * 0.5 + 0.6 * 0.75
        assert!((fitness - 0.65).abs() < 1e-12);
    }
}
