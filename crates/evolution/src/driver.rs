//! Caller-side evolution loop.
//!
//! The optimizer itself holds no timers. [`EvolutionDriver`] owns one,
//! evaluates the run-level stop conditions between generations and produces
//! [`EvolutionState`] snapshots for presentation.

use chrono::Utc;
use qevo_core::{
    EvolutionConfig, EvolutionError, EvolutionMetrics, EvolutionState, EvolutionStatus, Result,
    Time,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

use crate::QuantumEvolutionOptimizer;

/// Why a driven run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StopReason {
    /// `evolution.maxGenerations` generations were evolved
    MaxGenerations,
    /// `constraints.timeLimit` seconds elapsed
    TimeLimit,
    /// Diversity fell below `constraints.diversityThreshold`
    DiversityCollapse,
}

impl StopReason {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            StopReason::MaxGenerations => "max generations reached",
            StopReason::TimeLimit => "time limit reached",
            StopReason::DiversityCollapse => "diversity below threshold",
        }
    }
}

/// Drives an optimizer until a stop condition holds.
pub struct EvolutionDriver {
    config: EvolutionConfig,
    optimizer: Option<QuantumEvolutionOptimizer>,
    seed: Option<u64>,
    status: EvolutionStatus,
    stop_reason: Option<StopReason>,
    started_at: Time,
}

impl EvolutionDriver {
    /// Create a driver around a fresh optimizer.
    pub fn new(config: EvolutionConfig) -> Result<Self> {
        Self::build(config, None)
    }

    /// Create a driver whose optimizers are seeded with `seed`.
    pub fn with_seed(config: EvolutionConfig, seed: u64) -> Result<Self> {
        Self::build(config, Some(seed))
    }

    fn build(config: EvolutionConfig, seed: Option<u64>) -> Result<Self> {
        let optimizer = construct(&config, seed)?;
        Ok(Self {
            config,
            optimizer: Some(optimizer),
            seed,
            status: EvolutionStatus::Idle,
            stop_reason: None,
            started_at: Utc::now(),
        })
    }

    /// Discard the current optimizer and start over from `config`.
    ///
    /// On failure the driver is left in the error state and refuses to step
    /// until a later reset succeeds.
    pub fn reset(&mut self, config: EvolutionConfig) -> Result<()> {
        self.optimizer = None;
        self.stop_reason = None;
        self.started_at = Utc::now();

        match construct(&config, self.seed) {
            Ok(optimizer) => {
                self.optimizer = Some(optimizer);
                self.config = config;
                self.status = EvolutionStatus::Idle;
                Ok(())
            }
            Err(e) => {
                warn!("Reset failed: {}", e);
                self.status = EvolutionStatus::Error;
                Err(e)
            }
        }
    }

    /// Stop condition that currently holds, if any.
    pub fn check_stop(&self) -> Option<StopReason> {
        let optimizer = self.optimizer.as_ref()?;
        let limits = &self.config.constraints;

        if optimizer.generation() >= self.config.evolution.max_generations {
            return Some(StopReason::MaxGenerations);
        }

        // A clock that went backwards counts as no time elapsed.
        let elapsed = (Utc::now() - self.started_at).to_std().unwrap_or_default();
        if elapsed >= Duration::from_secs(limits.time_limit) {
            return Some(StopReason::TimeLimit);
        }

        let diversity = optimizer.population().diversity;
        if optimizer.generation() > 0 && diversity < limits.diversity_threshold {
            return Some(StopReason::DiversityCollapse);
        }

        None
    }

    /// Evolve one generation unless a stop condition holds.
    ///
    /// Returns `None` once the run has completed.
    pub fn step(&mut self) -> Result<Option<EvolutionMetrics>> {
        if self.optimizer.is_none() {
            return Err(EvolutionError::NotReady(
                "construction failed; reset with a valid configuration".to_string(),
            ));
        }
        if self.status == EvolutionStatus::Completed {
            return Ok(None);
        }

        if let Some(reason) = self.check_stop() {
            self.complete(reason);
            return Ok(None);
        }

        let Some(optimizer) = self.optimizer.as_mut() else {
            return Ok(None);
        };
        let metrics = optimizer.evolve()?;
        self.status = EvolutionStatus::Running;
        Ok(Some(metrics))
    }

    /// Step until a stop condition holds.
    pub fn run(&mut self) -> Result<StopReason> {
        while self.step()?.is_some() {}
        self.stopped()
    }

    /// Step once per `period`, reporting the state after every generation.
    ///
    /// A zero `period` is rejected.
    pub async fn watch<F>(&mut self, period: Duration, mut on_state: F) -> Result<StopReason>
    where
        F: FnMut(&EvolutionState),
    {
        if period.is_zero() {
            return Err(EvolutionError::InvalidConfig(
                "watch period must be greater than zero".to_string(),
            ));
        }

        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            if self.step()?.is_none() {
                break;
            }
            on_state(&self.state());
        }
        self.stopped()
    }

    fn stopped(&self) -> Result<StopReason> {
        self.stop_reason
            .ok_or_else(|| EvolutionError::NotReady("run has not stopped".to_string()))
    }

    fn complete(&mut self, reason: StopReason) {
        let generation = self.generation();
        match reason {
            StopReason::MaxGenerations => {
                info!(generation, "Evolution completed: {}", reason.as_str())
            }
            _ => warn!(generation, "Evolution stopped early: {}", reason.as_str()),
        }
        self.stop_reason = Some(reason);
        self.status = EvolutionStatus::Completed;
    }

    /// Snapshot for presentation.
    pub fn state(&self) -> EvolutionState {
        match &self.optimizer {
            Some(optimizer) => EvolutionState {
                best_solution: optimizer.best_solution().cloned(),
                metrics: optimizer.metrics().clone(),
                generation: optimizer.generation(),
                status: self.status,
                updated_at: Utc::now(),
            },
            None => EvolutionState {
                best_solution: None,
                metrics: EvolutionMetrics::initial(&self.config.objectives),
                generation: 0,
                status: self.status,
                updated_at: Utc::now(),
            },
        }
    }

    /// Generations evolved by the current optimizer.
    pub fn generation(&self) -> u64 {
        self.optimizer.as_ref().map_or(0, |o| o.generation())
    }

    /// Current run status.
    pub fn status(&self) -> EvolutionStatus {
        self.status
    }

    /// Why the run stopped, once it has.
    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop_reason
    }

    /// The driven optimizer, if construction succeeded.
    pub fn optimizer(&self) -> Option<&QuantumEvolutionOptimizer> {
        self.optimizer.as_ref()
    }

    /// When the current run started.
    pub fn started_at(&self) -> Time {
        self.started_at
    }
}

fn construct(config: &EvolutionConfig, seed: Option<u64>) -> Result<QuantumEvolutionOptimizer> {
    match seed {
        Some(seed) => QuantumEvolutionOptimizer::with_seed(config.clone(), seed),
        None => QuantumEvolutionOptimizer::new(config.clone()),
    }
}
