//! YAML run file. Every key is optional and falls back to the library defaults.
//!
//! ```yaml
//! reynolds: 400
//! nx: 80
//! ny: 80
//! pressure_solver: sor
//! omega: 1.85
//! tuning:
//!   convergence_check_interval: 200
//! ```

use crate::error::{ConfigError, ConfigResult};
use crate::pressure::{PressureSolver, PressureSolverKind};
use crate::solver::{SolverConfig, SolverTuning};
use serde::Deserialize;
use std::path::Path;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RunFile {
    pub reynolds: f64,
    pub nx: usize,
    pub ny: usize,
    pub lx: f64,
    pub ly: f64,
    pub max_iter: usize,
    /// Absent means "use the recommended stable step".
    pub dt: Option<f64>,
    pub velocity_tolerance: f64,
    pub pressure_tolerance: f64,
    pub pressure_solver: PressureSolverKind,
    pub omega: f64,
    pub snapshot_interval: Option<usize>,
    pub lid_velocity: f64,
    pub tuning: TuningFile,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TuningFile {
    pub convergence_check_interval: usize,
    pub pressure_max_iterations: usize,
    pub pressure_check_interval: usize,
    pub progress_interval: usize,
}

impl Default for RunFile {
    fn default() -> Self {
        let config = SolverConfig::default();
        Self {
            reynolds: config.reynolds,
            nx: config.nx,
            ny: config.ny,
            lx: config.lx,
            ly: config.ly,
            max_iter: config.max_iter,
            dt: None,
            velocity_tolerance: config.velocity_tolerance,
            pressure_tolerance: config.pressure_tolerance,
            pressure_solver: config.pressure_solver.kind(),
            omega: 1.8,
            snapshot_interval: config.snapshot_interval,
            lid_velocity: config.lid_velocity,
            tuning: TuningFile::default(),
        }
    }
}

impl Default for TuningFile {
    fn default() -> Self {
        let tuning = SolverTuning::default();
        Self {
            convergence_check_interval: tuning.convergence_check_interval,
            pressure_max_iterations: tuning.pressure_max_iterations,
            pressure_check_interval: tuning.pressure_check_interval,
            progress_interval: tuning.progress_interval,
        }
    }
}

impl From<TuningFile> for SolverTuning {
    fn from(file: TuningFile) -> Self {
        Self {
            convergence_check_interval: file.convergence_check_interval,
            pressure_max_iterations: file.pressure_max_iterations,
            pressure_check_interval: file.pressure_check_interval,
            progress_interval: file.progress_interval,
        }
    }
}

impl RunFile {
    pub fn from_yaml(contents: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(contents)?)
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let file = Self::from_yaml(&contents)?;
        log::debug!("loaded run file {}", path.display());
        Ok(file)
    }

    pub fn pressure_solver(&self) -> PressureSolver {
        PressureSolver::from_kind(self.pressure_solver, self.omega)
    }

    /// Builds a validated solver configuration. A missing `dt` becomes the
    /// recommended stable step for the chosen grid and Reynolds number.
    pub fn to_solver_config(&self) -> ConfigResult<SolverConfig> {
        let mut config = SolverConfig {
            reynolds: self.reynolds,
            nx: self.nx,
            ny: self.ny,
            lx: self.lx,
            ly: self.ly,
            max_iter: self.max_iter,
            dt: 1.0,
            velocity_tolerance: self.velocity_tolerance,
            pressure_tolerance: self.pressure_tolerance,
            pressure_solver: self.pressure_solver(),
            snapshot_interval: self.snapshot_interval,
            lid_velocity: self.lid_velocity,
            tuning: self.tuning.into(),
        };
        config.dt = match self.dt {
            Some(dt) => dt,
            None => {
                config.validate()?;
                config.stability().recommended_dt()
            }
        };
        config.validate()?;
        Ok(config)
    }
}
