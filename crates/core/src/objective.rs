//! Objective functions - weighted scoring targets.

use serde::{Deserialize, Serialize};

/// A named, weighted objective contributing to gene fitness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveFunction {
    /// Identifier selecting the scoring function
    pub id: String,

    /// Human readable name
    pub name: String,

    /// Weight in the fitness sum
    pub weight: f64,

    /// Optimization direction
    pub target: ObjectiveTarget,

    /// Value bounds
    pub constraints: ObjectiveConstraints,
}

/// Optimization direction of an objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectiveTarget {
    /// Higher raw values are better
    Maximize,
    /// Lower raw values are better
    Minimize,
}

/// Severity of a constraint breach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintType {
    /// Each breach counts ten times
    Hard,
    /// Each breach counts once
    Soft,
}

/// Bounds of an objective's raw value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveConstraints {
    /// Lower bound; normalization treats an absent bound as 0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    /// Upper bound; normalization treats an absent bound as 1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    /// Breach severity
    #[serde(rename = "type")]
    pub kind: ConstraintType,
}

/// Violation count charged per hard-constraint breach.
pub const HARD_VIOLATION_WEIGHT: u32 = 10;

impl ObjectiveFunction {
    /// Create an objective bounded to `[min, max]`.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        weight: f64,
        target: ObjectiveTarget,
        min: f64,
        max: f64,
        kind: ConstraintType,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            weight,
            target,
            constraints: ObjectiveConstraints {
                min: Some(min),
                max: Some(max),
                kind,
            },
        }
    }

    /// Range used for normalization.
    pub fn normalization_range(&self) -> (f64, f64) {
        (
            self.constraints.min.unwrap_or(0.0),
            self.constraints.max.unwrap_or(1.0),
        )
    }

    /// Map a raw value onto the objective's range, flipped for minimization.
    ///
    /// Values outside the range are not clamped.
    pub fn normalize(&self, value: f64) -> f64 {
        let (min, max) = self.normalization_range();
        let normalized = (value - min) / (max - min);
        match self.target {
            ObjectiveTarget::Maximize => normalized,
            ObjectiveTarget::Minimize => 1.0 - normalized,
        }
    }

    /// Weighted count of bound breaches for a raw value.
    pub fn constraint_violations(&self, value: f64) -> u32 {
        let mut violations = 0;
        if self.constraints.min.is_some_and(|min| value < min) {
            violations += 1;
        }
        if self.constraints.max.is_some_and(|max| value > max) {
            violations += 1;
        }

        match self.constraints.kind {
            ConstraintType::Hard => violations * HARD_VIOLATION_WEIGHT,
            ConstraintType::Soft => violations,
        }
    }
}
