//! Error type for optimizer construction and configuration.

/// Result alias used across the optimizer crates.
pub type Result<T> = std::result::Result<T, EvolutionError>;

/// Errors that can occur while building or driving an optimizer.
#[derive(Debug, thiserror::Error)]
pub enum EvolutionError {
    /// A required configuration section is absent
    #[error("Invalid config: missing required section `{0}`")]
    MissingSection(&'static str),

    /// A configuration value would make evolution ill-defined
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Configuration could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No optimizer is available to evolve
    #[error("No optimizer available: {0}")]
    NotReady(String),
}
