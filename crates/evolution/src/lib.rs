//! Evolution layer - quantum-inspired genetic optimization.
//!
//! [`QuantumEvolutionOptimizer`] advances a population of quantum genes one
//! generation per [`evolve`](QuantumEvolutionOptimizer::evolve) call;
//! [`EvolutionDriver`] is a caller-side loop with run-level stop conditions.

#![warn(missing_docs, unused_crate_dependencies)]

mod optimizer;
mod driver;
pub mod fitness;
pub mod operators;
pub mod metrics;

pub use optimizer::QuantumEvolutionOptimizer;
pub use driver::{EvolutionDriver, StopReason};
