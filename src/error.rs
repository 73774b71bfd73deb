//! Error types for the projectile simulation.

use thiserror::Error;

/// Errors raised by the tableau registry, the projectile model and scenario loading.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Registry lookup for a method name that is not one of the supported schemes
    #[error("unknown integration method '{0}'")]
    UnknownMethod(String),

    /// A trajectory query was made before `solve()` completed
    #[error("projectile has not been solved")]
    NotSolved,

    /// Out-of-domain construction input
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// The step ceiling was reached without the projectile crossing ground level
    #[error("projectile did not land within {steps} steps (t = {t})")]
    DidNotLand {
        /// Number of steps taken
        steps: u64,
        /// Simulation time when integration was abandoned
        t: f64,
    },

    /// Position or velocity became NaN or infinite
    #[error("non-finite state detected at t = {t}")]
    NonFiniteState {
        /// Time of the offending step
        t: f64,
    },

    /// Scenario file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Scenario file could not be parsed
    #[error("scenario parse error: {0}")]
    Config(#[from] serde_json::Error),

    /// Worker pool for batch solving could not be built
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SimulationError>;
