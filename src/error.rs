//! Configuration errors, raised before any computation starts.

use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Reynolds number must be positive and finite, got {0}")]
    InvalidReynolds(f64),

    #[error("grid must have at least one cell in each direction, got {nx}x{ny}")]
    InvalidGrid { nx: usize, ny: usize },

    #[error("domain size must be positive and finite, got {lx}x{ly}")]
    InvalidDomain { lx: f64, ly: f64 },

    #[error("time step must be positive and finite, got {0}")]
    InvalidTimeStep(f64),

    #[error("{name} tolerance must be non-negative and finite, got {value}")]
    InvalidTolerance { name: &'static str, value: f64 },

    #[error("lid velocity must be finite, got {0}")]
    InvalidLidVelocity(f64),

    #[error("SOR relaxation factor must lie in (0, 2), got {0}")]
    InvalidRelaxation(f64),

    #[error("snapshot interval must be a positive integer or absent, got {0}")]
    InvalidSnapshotInterval(usize),

    #[error("{name} must be at least 1")]
    InvalidCadence { name: &'static str },

    #[error("unknown pressure solver '{0}' (expected jacobi, gauss_seidel or sor)")]
    UnknownPressureSolver(String),

    #[error("failed to read run file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse run file: {0}")]
    Parse(#[from] serde_yaml::Error),
}
