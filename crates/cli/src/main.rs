//! Qevo CLI - drive the quantum-inspired evolutionary optimizer.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use qevo_core::{ConfigOverrides, EvolutionConfig, EvolutionState, MeasurementStrategy};
use qevo_evolution::{EvolutionDriver, StopReason};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "qevo")]
#[command(about = "Quantum-inspired evolutionary optimizer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the default configuration as JSON
    Defaults,
    /// Evolve until a stop condition is reached
    Run {
        #[command(flatten)]
        opts: RunOpts,
        /// Print the final state as JSON
        #[arg(long)]
        json: bool,
    },
    /// Evolve on a fixed interval, printing every generation
    Watch {
        #[command(flatten)]
        opts: RunOpts,
        /// Milliseconds between generations
        #[arg(long, default_value = "1000", value_parser = clap::value_parser!(u64).range(1..))]
        interval_ms: u64,
    },
}

#[derive(Args)]
struct RunOpts {
    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Require every config section instead of merging onto defaults
    #[arg(long)]
    strict: bool,
    /// Override evolution.maxGenerations
    #[arg(long)]
    generations: Option<u64>,
    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
    /// Use deterministic measurement
    #[arg(long)]
    deterministic: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Defaults => {
            println!("{}", serde_json::to_string_pretty(&EvolutionConfig::default())?);
        }
        Commands::Run { opts, json } => {
            let mut driver = build_driver(&opts)?;
            let reason = driver.run()?;
            let state = driver.state();

            if json {
                println!("{}", serde_json::to_string_pretty(&state)?);
            } else {
                print_summary(&driver, &state, reason);
            }
        }
        Commands::Watch { opts, interval_ms } => {
            let mut driver = build_driver(&opts)?;
            let reason = driver
                .watch(Duration::from_millis(interval_ms), print_generation)
                .await?;
            print_summary(&driver, &driver.state(), reason);
        }
    }

    Ok(())
}

fn load_config(opts: &RunOpts) -> Result<EvolutionConfig> {
    let mut config = match &opts.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            if opts.strict {
                EvolutionConfig::from_json(&text)
                    .with_context(|| format!("Invalid config {}", path.display()))?
            } else {
                ConfigOverrides::from_json(&text)
                    .with_context(|| format!("Invalid config {}", path.display()))?
                    .merge_onto(EvolutionConfig::default())
            }
        }
        None => EvolutionConfig::default(),
    };

    if let Some(generations) = opts.generations {
        config.evolution.max_generations = generations;
    }
    if opts.deterministic {
        config.quantum.measurement_strategy = MeasurementStrategy::Deterministic;
    }
    Ok(config)
}

fn build_driver(opts: &RunOpts) -> Result<EvolutionDriver> {
    let config = load_config(opts)?;
    let driver = match opts.seed {
        Some(seed) => EvolutionDriver::with_seed(config, seed),
        None => EvolutionDriver::new(config),
    }
    .context("Failed to construct optimizer")?;

    if let Some(optimizer) = driver.optimizer() {
        info!(
            run = %optimizer.id(),
            size = optimizer.config().population.size,
            genes = optimizer.config().population.num_genes,
            "Starting evolution"
        );
    }
    Ok(driver)
}

fn print_generation(state: &EvolutionState) {
    let stats = &state.metrics.population_stats;
    println!(
        "gen {:>5} | best {:.4} | avg {:.4} | diversity {:.4} | advantage {:+.3}",
        state.generation,
        stats.best_fitness,
        stats.average_fitness,
        stats.diversity_index,
        state.metrics.quantum_metrics.quantum_advantage,
    );
}

fn print_summary(driver: &EvolutionDriver, state: &EvolutionState, reason: StopReason) {
    let stats = &state.metrics.population_stats;
    let quantum = &state.metrics.quantum_metrics;
    let elapsed = state.updated_at - driver.started_at();

    println!("Evolution stopped after {} generations ({})", state.generation, reason.as_str());
    println!("  Started: {}", driver.started_at());
    println!("  Elapsed: {:.3}s", elapsed.num_milliseconds() as f64 / 1000.0);
    println!("  Best fitness: {:.4}", stats.best_fitness);
    println!("  Average fitness: {:.4}", stats.average_fitness);
    println!("  Diversity: {:.4}", stats.diversity_index);
    println!("  Entanglement strength: {:.4}", quantum.entanglement_strength);
    println!("  Superposition quality: {:.4}", quantum.superposition_quality);
    println!("  Quantum advantage: {:+.3}", quantum.quantum_advantage);

    println!("Objectives");
    for objective in &state.metrics.objectives {
        println!(
            "  {} = {:.4} ({:+.2}%), violations {}",
            objective.id,
            objective.current_value,
            objective.improvement * 100.0,
            objective.constraint_violations,
        );
    }

    if let Some(best) = &state.best_solution {
        println!("Best solution: fitness {:.4}, phase {:.4}", best.fitness, best.phase);
    }
}
