//! Genetic operators: tournament selection, one-point crossover and point mutation.

use qevo_core::QuantumGene;
use rand::seq::index;
use rand::Rng;

/// Tournament size for a population: `max(2, floor(size * 0.1))`.
pub fn tournament_size(population_size: usize) -> usize {
    (population_size / 10).max(2)
}

/// Run one tournament and return the index of the winner.
///
/// Contestants are drawn without replacement from every individual except
/// `exclude`. When fewer candidates remain than `size`, all of them compete.
/// The fittest contestant wins; ties go to the one drawn first.
///
/// Returns `None` only if no candidate is available.
pub fn tournament_select<R: Rng + ?Sized>(
    individuals: &[QuantumGene],
    size: usize,
    exclude: Option<usize>,
    rng: &mut R,
) -> Option<usize> {
    let candidates: Vec<usize> = (0..individuals.len())
        .filter(|&i| Some(i) != exclude)
        .collect();
    if candidates.is_empty() {
        return None;
    }

    let draws = size.min(candidates.len()).max(1);
    let mut winner: Option<usize> = None;
    for pick in index::sample(rng, candidates.len(), draws) {
        let contestant = candidates[pick];
        match winner {
            Some(w) if individuals[contestant].fitness <= individuals[w].fitness => {}
            _ => winner = Some(contestant),
        }
    }
    winner
}

/// Pick two distinct parents by tournament.
pub fn select_parents<R: Rng + ?Sized>(
    individuals: &[QuantumGene],
    rng: &mut R,
) -> Option<(usize, usize)> {
    let size = tournament_size(individuals.len());
    let first = tournament_select(individuals, size, None, rng)?;
    let second = tournament_select(individuals, size, Some(first), rng)?;
    Some((first, second))
}

/// Produce an offspring from two parents.
///
/// With probability `1 - crossover_rate` the offspring is a copy of one parent
/// chosen by a fair coin. Otherwise positions `[0, k)` come from `first` and
/// `[k, N)` from `second` for a random `k`, the phase is the parents' mean and
/// fitness starts at zero.
pub fn crossover<R: Rng + ?Sized>(
    first: &QuantumGene,
    second: &QuantumGene,
    crossover_rate: f64,
    rng: &mut R,
) -> QuantumGene {
    if rng.gen::<f64>() > crossover_rate {
        return if rng.gen::<f64>() < 0.5 {
            first.clone()
        } else {
            second.clone()
        };
    }

    let point = if first.is_empty() {
        0
    } else {
        rng.gen_range(0..first.len())
    };

    let mut superposition = first.superposition[..point].to_vec();
    superposition.extend_from_slice(&second.superposition[point..]);
    let mut entanglement = first.entanglement[..point].to_vec();
    entanglement.extend_from_slice(&second.entanglement[point..]);

    QuantumGene {
        superposition,
        entanglement,
        phase: (first.phase + second.phase) / 2.0,
        fitness: 0.0,
    }
}

/// With probability `mutation_rate`, re-draw one random position and rotate
/// the phase by a random amount in `[0, phase_rotation_angle)`.
///
/// The gate is applied once per gene, not once per position. Returns whether
/// the gene was mutated.
pub fn mutate<R: Rng + ?Sized>(
    gene: &mut QuantumGene,
    mutation_rate: f64,
    phase_rotation_angle: f64,
    rng: &mut R,
) -> bool {
    if gene.is_empty() || rng.gen::<f64>() >= mutation_rate {
        return false;
    }

    let i = rng.gen_range(0..gene.len());
    gene.superposition[i] = rng.gen::<f64>();
    gene.entanglement[i] = rng.gen::<f64>() * 2.0 - 1.0;
    gene.phase += rng.gen::<f64>() * phase_rotation_angle;
    true
}
