//! Quantum-inspired evolutionary optimizer.

use qevo_core::{
    ConfigOverrides, EvolutionConfig, EvolutionError, EvolutionMetrics, ObjectiveMetric,
    Population, QuantumGene, Result, RunId,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::fitness;
use crate::metrics::{
    convergence_rate, entanglement_strength, fitness_summary, relative_change,
    superposition_quality,
};
use crate::operators::{crossover, mutate, select_parents};

/// Evolves a population of quantum genes one generation at a time.
///
/// The optimizer holds no timers; callers decide when to call [`evolve`].
/// All randomness is drawn from the instance RNG, so a seeded optimizer is
/// reproducible.
///
/// [`evolve`]: QuantumEvolutionOptimizer::evolve
pub struct QuantumEvolutionOptimizer<R: Rng = StdRng> {
    id: RunId,
    config: EvolutionConfig,
    population: Population,
    metrics: EvolutionMetrics,
    generation: u64,
    best_solution: Option<QuantumGene>,
    rng: R,
}

impl QuantumEvolutionOptimizer<StdRng> {
    /// Create an optimizer seeded from system entropy.
    pub fn new(config: EvolutionConfig) -> Result<Self> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create a reproducible optimizer.
    pub fn with_seed(config: EvolutionConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    /// Create an optimizer from sectioned configuration.
    ///
    /// Fails if `population`, `quantum`, `evolution` or `objectives` is absent.
    pub fn from_overrides(overrides: ConfigOverrides) -> Result<Self> {
        Self::new(EvolutionConfig::try_from(overrides)?)
    }
}

impl<R: Rng> QuantumEvolutionOptimizer<R> {
    /// Create an optimizer drawing from the given RNG.
    ///
    /// Validates the configuration before building the initial population.
    pub fn with_rng(config: EvolutionConfig, mut rng: R) -> Result<Self> {
        config.validate()?;

        let individuals = (0..config.population.size)
            .map(|_| QuantumGene::random(config.population.num_genes, &mut rng))
            .collect();
        let population = Population::new(individuals, 0);
        let metrics = EvolutionMetrics::initial(&config.objectives);
        let id = RunId::new();

        debug!(
            run = %id,
            size = config.population.size,
            num_genes = config.population.num_genes,
            diversity = population.diversity,
            "Initialized population"
        );

        Ok(Self {
            id,
            config,
            population,
            metrics,
            generation: 0,
            best_solution: None,
            rng,
        })
    }

    /// Advance one generation and return the refreshed metrics.
    pub fn evolve(&mut self) -> Result<EvolutionMetrics> {
        let size = self.config.population.size;
        let mut offspring = Vec::with_capacity(size);

        while offspring.len() < size {
            let individuals = &self.population.individuals;
            let (a, b) = select_parents(individuals, &mut self.rng).ok_or_else(|| {
                EvolutionError::InvalidConfig(
                    "population too small to select two parents".to_string(),
                )
            })?;

            let mut child = crossover(
                &individuals[a],
                &individuals[b],
                self.config.evolution.crossover_rate,
                &mut self.rng,
            );
            mutate(
                &mut child,
                self.config.evolution.mutation_rate,
                self.config.quantum.phase_rotation_angle,
                &mut self.rng,
            );
            child.fitness = self.fitness(&child);
            offspring.push(child);
        }

        self.generation += 1;
        self.population = Population::new(offspring, self.generation);

        if let Some(i) = self.population.fittest_index() {
            let candidate = &self.population.individuals[i];
            let improved = self
                .best_solution
                .as_ref()
                .map_or(true, |best| candidate.fitness > best.fitness);
            if improved {
                info!(
                    run = %self.id,
                    generation = self.generation,
                    fitness = candidate.fitness,
                    "New best solution"
                );
                self.best_solution = Some(candidate.clone());
            }
        }

        self.update_metrics();

        debug!(
            run = %self.id,
            generation = self.generation,
            best = self.metrics.population_stats.best_fitness,
            average = self.metrics.population_stats.average_fitness,
            diversity = self.population.diversity,
            "Evolved generation"
        );

        Ok(self.metrics.clone())
    }

    /// Weighted fitness of a gene under this optimizer's objectives.
    ///
    /// Stochastic under probabilistic measurement.
    pub fn fitness(&mut self, gene: &QuantumGene) -> f64 {
        fitness::evaluate(
            gene,
            &self.config.objectives,
            self.config.quantum.measurement_strategy,
            &mut self.rng,
        )
    }

    fn update_metrics(&mut self) {
        let individuals = &self.population.individuals;
        let (best, average) = fitness_summary(individuals);

        let stats = &mut self.metrics.population_stats;
        stats.best_fitness = best;
        stats.average_fitness = average;
        stats.diversity_index = self.population.diversity;
        // Compared against the field just written, so this stays at zero.
        stats.convergence_rate = convergence_rate(best, stats.best_fitness);

        let entanglement = entanglement_strength(individuals);
        let superposition = superposition_quality(individuals);
        let advantage = self.quantum_advantage();

        let quantum = &mut self.metrics.quantum_metrics;
        quantum.entanglement_strength = entanglement;
        quantum.superposition_quality = superposition;
        quantum.quantum_advantage = advantage;

        self.update_objective_metrics();
    }

    /// Relative gain of this generation's best fitness over a freshly drawn
    /// coin-flip baseline. The baseline is random on every call.
    fn quantum_advantage(&mut self) -> f64 {
        let baseline = QuantumGene::classical(self.config.population.num_genes, &mut self.rng);
        self.advantage_over(&baseline)
    }

    /// `(best - baseline) / |baseline|` for the last recorded best fitness,
    /// dividing by 1 when the baseline scores zero.
    fn advantage_over(&mut self, baseline: &QuantumGene) -> f64 {
        let classical = self.fitness(baseline);
        let quantum = self.metrics.population_stats.best_fitness;
        relative_change(quantum, classical)
    }

    fn update_objective_metrics(&mut self) {
        let Some(best) = self.best_solution.as_ref() else {
            return;
        };

        let strategy = self.config.quantum.measurement_strategy;
        let objectives = self
            .config
            .objectives
            .iter()
            .map(|objective| {
                let current_value =
                    fitness::objective_value(best, objective, strategy, &mut self.rng);
                let previous = self.metrics.objective_value(&objective.id);
                ObjectiveMetric {
                    id: objective.id.clone(),
                    current_value,
                    improvement: relative_change(current_value, previous),
                    constraint_violations: objective.constraint_violations(current_value),
                }
            })
            .collect();

        self.metrics.objectives = objectives;
    }

    /// Best individual found so far, if any generation has been evolved.
    pub fn best_solution(&self) -> Option<&QuantumGene> {
        self.best_solution.as_ref()
    }

    /// Metrics of the last generation.
    pub fn metrics(&self) -> &EvolutionMetrics {
        &self.metrics
    }

    /// Number of generations evolved.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Current population.
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Configuration in use.
    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    /// Identifier of this optimizer instance.
    pub fn id(&self) -> RunId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qevo_core::{
        ConstraintType, InitializationStrategy, MeasurementStrategy, ObjectiveFunction,
        ObjectiveTarget, PopulationConfig,
    };

    fn small_config(size: usize, num_genes: usize) -> EvolutionConfig {
        EvolutionConfig {
            population: PopulationConfig {
                size,
                num_genes,
                initialization_strategy: InitializationStrategy::Quantum,
            },
            ..EvolutionConfig::default()
        }
    }

    #[test]
    fn test_construction_builds_initial_state() {
        let optimizer = QuantumEvolutionOptimizer::with_seed(small_config(20, 8), 1).unwrap();

        assert_eq!(optimizer.generation(), 0);
        assert!(optimizer.best_solution().is_none());
        assert_eq!(optimizer.population().len(), 20);
        assert!(optimizer.population().diversity > 0.0);
        assert_eq!(optimizer.metrics(), &EvolutionMetrics::initial(&optimizer.config().objectives));
        for ind in &optimizer.population().individuals {
            assert_eq!(ind.superposition.len(), 8);
            assert_eq!(ind.entanglement.len(), 8);
            assert_eq!(ind.fitness, 0.0);
        }
    }

    #[test]
    fn test_construction_fails_without_objectives() {
        let overrides = ConfigOverrides {
            objectives: None,
            ..ConfigOverrides::from(EvolutionConfig::default())
        };
        let err = QuantumEvolutionOptimizer::from_overrides(overrides).err().unwrap();
        assert!(matches!(err, EvolutionError::MissingSection("objectives")));
    }

    #[test]
    fn test_construction_fails_for_each_missing_section() {
        let full = ConfigOverrides::from(EvolutionConfig::default());
        let cases = [
            ConfigOverrides { population: None, ..full.clone() },
            ConfigOverrides { quantum: None, ..full.clone() },
            ConfigOverrides { evolution: None, ..full.clone() },
            ConfigOverrides { objectives: None, ..full.clone() },
        ];
        for overrides in cases {
            assert!(matches!(
                QuantumEvolutionOptimizer::from_overrides(overrides),
                Err(EvolutionError::MissingSection(_))
            ));
        }
    }

    #[test]
    fn test_construction_rejects_degenerate_population() {
        let err = QuantumEvolutionOptimizer::new(small_config(1, 8)).err().unwrap();
        assert!(matches!(err, EvolutionError::InvalidConfig(_)));
        let err = QuantumEvolutionOptimizer::new(small_config(10, 0)).err().unwrap();
        assert!(matches!(err, EvolutionError::InvalidConfig(_)));
    }

    #[test]
    fn test_evolve_preserves_shapes_and_counts_generations() {
        let mut optimizer = QuantumEvolutionOptimizer::with_seed(small_config(15, 6), 2).unwrap();

        for expected in 1..=10 {
            optimizer.evolve().unwrap();
            assert_eq!(optimizer.generation(), expected);
            assert_eq!(optimizer.population().generation, expected);
            assert_eq!(optimizer.population().len(), 15);
            for ind in &optimizer.population().individuals {
                assert_eq!(ind.superposition.len(), 6);
                assert_eq!(ind.entanglement.len(), 6);
            }
        }
    }

    #[test]
    fn test_best_solution_never_decreases() {
        let mut optimizer = QuantumEvolutionOptimizer::with_seed(small_config(30, 10), 3).unwrap();
        let mut last = f64::NEG_INFINITY;

        for _ in 0..25 {
            optimizer.evolve().unwrap();
            let best = optimizer.best_solution().unwrap().fitness;
            assert!(best >= last);
            last = best;
        }
    }

    #[test]
    fn test_best_solution_is_set_after_first_generation() {
        let mut optimizer = QuantumEvolutionOptimizer::with_seed(small_config(10, 4), 4).unwrap();
        let metrics = optimizer.evolve().unwrap();
        let best = optimizer.best_solution().unwrap();
        assert_eq!(best.fitness, metrics.population_stats.best_fitness);
    }

    #[test]
    fn test_metrics_after_evolve() {
        let mut optimizer = QuantumEvolutionOptimizer::with_seed(small_config(25, 12), 5).unwrap();
        let metrics = optimizer.evolve().unwrap();
        let stats = &metrics.population_stats;

        assert!(stats.best_fitness >= stats.average_fitness);
        assert_eq!(stats.diversity_index, optimizer.population().diversity);
        assert_eq!(stats.convergence_rate, 0.0);
        assert!(metrics.quantum_metrics.entanglement_strength >= 0.0);
        assert!(metrics.quantum_metrics.entanglement_strength <= 1.0);
        assert!(metrics.quantum_metrics.superposition_quality >= 0.0);
        assert!(metrics.quantum_metrics.superposition_quality <= 0.5);
        assert!(metrics.quantum_metrics.quantum_advantage.is_finite());
        assert_eq!(metrics.objectives.len(), 3);
        assert_eq!(&metrics, optimizer.metrics());
    }

    #[test]
    fn test_objective_metrics_track_best_solution() {
        let mut config = small_config(10, 4);
        config.quantum.measurement_strategy = MeasurementStrategy::Deterministic;
        config.objectives = vec![ObjectiveFunction::new(
            "stability",
            "Stability",
            1.0,
            ObjectiveTarget::Maximize,
            2.0,
            3.0,
            ConstraintType::Hard,
        )];
        let mut optimizer = QuantumEvolutionOptimizer::with_seed(config, 6).unwrap();

        let first = optimizer.evolve().unwrap();
        let objective = &first.objectives[0];
        assert_eq!(objective.id, "stability");
        // Stability never exceeds 1, so it always breaches the hard minimum of 2
        assert_eq!(objective.constraint_violations, 10);
        // Previous value was 0, so the improvement is the value itself
        assert_eq!(objective.improvement, objective.current_value);

        let second = optimizer.evolve().unwrap();
        let expected = relative_change(second.objectives[0].current_value, objective.current_value);
        assert_eq!(second.objectives[0].improvement, expected);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let run = |seed| {
            let mut optimizer =
                QuantumEvolutionOptimizer::with_seed(small_config(12, 5), seed).unwrap();
            (0..5).map(|_| optimizer.evolve().unwrap()).last().unwrap()
        };
        assert_eq!(run(42), run(42));
    }

    #[test]
    fn test_deterministic_fitness_is_stable() {
        let mut config = small_config(10, 4);
        config.quantum.measurement_strategy = MeasurementStrategy::Deterministic;
        let mut optimizer = QuantumEvolutionOptimizer::with_seed(config, 7).unwrap();

        let gene = QuantumGene::from_parts(vec![0.9, 0.9, 0.1, 0.1], vec![0.0; 4], 0.0).unwrap();
        let first = optimizer.fitness(&gene);
        assert_eq!(first, optimizer.fitness(&gene));
        // efficiency 0.5 * 0.4 + (1 - complexity 1.0) * 0.3 + (stability 0.75 - 0.5) / 0.5 * 0.3
        assert!((first - 0.35).abs() < 1e-12);
    }

    fn efficiency_only(num_genes: usize) -> EvolutionConfig {
        let mut config = small_config(10, num_genes);
        config.quantum.measurement_strategy = MeasurementStrategy::Deterministic;
        config.objectives = vec![ObjectiveFunction::new(
            "efficiency",
            "Efficiency",
            1.0,
            ObjectiveTarget::Maximize,
            0.0,
            1.0,
            ConstraintType::Soft,
        )];
        config
    }

    #[test]
    fn test_quantum_advantage_against_fixed_baseline() {
        let mut optimizer = QuantumEvolutionOptimizer::with_seed(efficiency_only(4), 10).unwrap();
        optimizer.evolve().unwrap();
        let best = optimizer.metrics().population_stats.best_fitness;

        // Deterministic collapse of a binary gene with zero phase reproduces its bits
        let half = QuantumGene::from_parts(vec![1.0, 1.0, 0.0, 0.0], vec![0.0; 4], 0.0).unwrap();
        assert_eq!(optimizer.advantage_over(&half), (best - 0.5) / 0.5);

        let quarter = QuantumGene::from_parts(vec![1.0, 0.0, 0.0, 0.0], vec![0.0; 4], 0.0).unwrap();
        assert_eq!(optimizer.advantage_over(&quarter), (best - 0.25) / 0.25);

        // A zero-scoring baseline divides by one
        let zero = QuantumGene::from_parts(vec![0.0; 4], vec![0.0; 4], 0.0).unwrap();
        assert_eq!(optimizer.advantage_over(&zero), best);
    }

    #[test]
    fn test_quantum_advantage_against_classical_baseline() {
        let num_genes = 16;
        let mut optimizer =
            QuantumEvolutionOptimizer::with_seed(efficiency_only(num_genes), 11).unwrap();
        optimizer.evolve().unwrap();
        let best = optimizer.metrics().population_stats.best_fitness;

        let mut rng = StdRng::seed_from_u64(12);
        for _ in 0..20 {
            let baseline = QuantumGene::classical(num_genes, &mut rng);
            let ones = baseline.superposition.iter().filter(|&&a| a == 1.0).count();
            let classical = ones as f64 / num_genes as f64;
            let expected = if classical == 0.0 {
                best - classical
            } else {
                (best - classical) / classical.abs()
            };

            assert_eq!(optimizer.advantage_over(&baseline), expected);
        }
    }

    #[test]
    fn test_two_individual_population_evolves() {
        let mut optimizer = QuantumEvolutionOptimizer::with_seed(small_config(2, 3), 8).unwrap();
        for _ in 0..5 {
            optimizer.evolve().unwrap();
        }
        assert_eq!(optimizer.population().len(), 2);
    }

    #[test]
    fn test_empty_objectives_give_zero_fitness() {
        let mut config = small_config(6, 3);
        config.objectives.clear();
        let mut optimizer = QuantumEvolutionOptimizer::with_seed(config, 9).unwrap();

        let metrics = optimizer.evolve().unwrap();
        assert_eq!(metrics.population_stats.best_fitness, 0.0);
        assert_eq!(metrics.quantum_metrics.quantum_advantage, 0.0);
        assert!(metrics.objectives.is_empty());
    }
}
