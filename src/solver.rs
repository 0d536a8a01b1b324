//! Time-stepping driver for the lid-driven cavity.
//!
//! One step is predictor -> pressure source -> Poisson solve -> correction.
//! Every `convergence_check_interval` steps the relative velocity change is
//! measured; the run ends as soon as both components fall below the
//! velocity tolerance, or when `max_iter` steps have been taken.

use crate::error::{ConfigError, ConfigResult};
use crate::mac::CavityWalls;
use crate::momentum::{predict_velocity_into, MomentumParams};
use crate::pressure::{solve_pressure_into, PoissonParams, PoissonReport, PoissonScratch, PressureSolver};
use crate::projection::{correct_velocity_into, pressure_source_into};
use crate::stability::{advise, StabilityAdvice};
use crate::{Field2, MacGrid2, MacVelocity2};
use std::ops::ControlFlow;

const NORM_EPSILON: f64 = 1e-12;

/// Cadences that are performance knobs rather than physics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolverTuning {
    pub convergence_check_interval: usize,
    pub pressure_max_iterations: usize,
    pub pressure_check_interval: usize,
    pub progress_interval: usize,
}

impl Default for SolverTuning {
    fn default() -> Self {
        Self {
            convergence_check_interval: 100,
            pressure_max_iterations: 2000,
            pressure_check_interval: 10,
            progress_interval: 50,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolverConfig {
    pub reynolds: f64,
    pub nx: usize,
    pub ny: usize,
    pub lx: f64,
    pub ly: f64,
    pub max_iter: usize,
    pub dt: f64,
    pub velocity_tolerance: f64,
    pub pressure_tolerance: f64,
    pub pressure_solver: PressureSolver,
    /// Capture a snapshot every `n` steps; `None` keeps only the final state.
    pub snapshot_interval: Option<usize>,
    pub lid_velocity: f64,
    pub tuning: SolverTuning,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            reynolds: 100.0,
            nx: 60,
            ny: 60,
            lx: 1.0,
            ly: 1.0,
            max_iter: 20_000,
            dt: 0.001,
            velocity_tolerance: 1e-6,
            pressure_tolerance: 1e-6,
            pressure_solver: PressureSolver::default(),
            snapshot_interval: None,
            lid_velocity: 1.0,
            tuning: SolverTuning::default(),
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.reynolds.is_finite() && self.reynolds > 0.0) {
            return Err(ConfigError::InvalidReynolds(self.reynolds));
        }
        if self.nx == 0 || self.ny == 0 {
            return Err(ConfigError::InvalidGrid {
                nx: self.nx,
                ny: self.ny,
            });
        }
        if !(self.lx.is_finite() && self.lx > 0.0 && self.ly.is_finite() && self.ly > 0.0) {
            return Err(ConfigError::InvalidDomain {
                lx: self.lx,
                ly: self.ly,
            });
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(ConfigError::InvalidTimeStep(self.dt));
        }
        for (name, value) in [
            ("velocity", self.velocity_tolerance),
            ("pressure", self.pressure_tolerance),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidTolerance { name, value });
            }
        }
        if !self.lid_velocity.is_finite() {
            return Err(ConfigError::InvalidLidVelocity(self.lid_velocity));
        }
        if let PressureSolver::Sor { omega } = self.pressure_solver {
            if !(omega > 0.0 && omega < 2.0) {
                return Err(ConfigError::InvalidRelaxation(omega));
            }
        }
        if let Some(0) = self.snapshot_interval {
            return Err(ConfigError::InvalidSnapshotInterval(0));
        }
        let tuning = self.tuning;
        for (name, value) in [
            ("convergence check interval", tuning.convergence_check_interval),
            ("pressure check interval", tuning.pressure_check_interval),
            ("progress interval", tuning.progress_interval),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidCadence { name });
            }
        }
        Ok(())
    }

    pub fn grid(&self) -> MacGrid2 {
        MacGrid2::new(self.nx, self.ny, self.lx, self.ly)
    }

    pub fn walls(&self) -> CavityWalls {
        CavityWalls::lid_driven(self.lid_velocity)
    }

    pub fn stability(&self) -> StabilityAdvice {
        advise(self.reynolds, self.grid(), self.lid_velocity)
    }

    fn momentum(&self) -> MomentumParams {
        MomentumParams {
            reynolds: self.reynolds,
            dt: self.dt,
            walls: self.walls(),
        }
    }

    fn poisson(&self) -> PoissonParams {
        PoissonParams {
            tolerance: self.pressure_tolerance,
            max_iterations: self.tuning.pressure_max_iterations,
            check_interval: self.tuning.pressure_check_interval,
        }
    }
}

/// Deep copy of the solver state after `step` completed time steps.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub step: usize,
    pub time: f64,
    pub grid: MacGrid2,
    pub u: Field2,
    pub v: Field2,
    pub p: Field2,
}

impl Snapshot {
    pub fn velocity(&self) -> MacVelocity2 {
        MacVelocity2::from_components(self.grid, self.u.clone(), self.v.clone())
    }
}

/// Captured states in step order. Never empty; the last entry is the final state.
#[derive(Clone, Debug, PartialEq)]
pub struct SnapshotHistory {
    snapshots: Vec<Snapshot>,
}

impl SnapshotHistory {
    fn new() -> Self {
        Self {
            snapshots: Vec::new(),
        }
    }

    fn push(&mut self, snapshot: Snapshot) {
        self.snapshots.push(snapshot);
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn final_state(&self) -> &Snapshot {
        &self.snapshots[self.snapshots.len() - 1]
    }

    pub fn u_snapshots(&self) -> impl Iterator<Item = &Field2> {
        self.snapshots.iter().map(|snapshot| &snapshot.u)
    }

    pub fn v_snapshots(&self) -> impl Iterator<Item = &Field2> {
        self.snapshots.iter().map(|snapshot| &snapshot.v)
    }

    pub fn p_snapshots(&self) -> impl Iterator<Item = &Field2> {
        self.snapshots.iter().map(|snapshot| &snapshot.p)
    }

    pub fn into_snapshots(self) -> Vec<Snapshot> {
        self.snapshots
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    Converged,
    MaxIterReached,
    /// The progress hook asked to stop.
    Aborted,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConvergenceStatus {
    pub converged: bool,
    /// Completed steps at the moment convergence was detected.
    pub step: Option<usize>,
    /// Larger of the u/v relative changes at the last check, `INFINITY` if none ran.
    pub residual: f64,
}

/// Relative velocity change measured at one convergence checkpoint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResidualSample {
    pub step: usize,
    pub u: f64,
    pub v: f64,
}

impl ResidualSample {
    pub fn max(&self) -> f64 {
        self.u.max(self.v)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PoissonStats {
    pub solves: usize,
    pub total_iterations: usize,
    /// Solves that stopped at the iteration cap.
    pub capped_solves: usize,
}

impl PoissonStats {
    fn record(&mut self, report: PoissonReport) {
        self.solves += 1;
        self.total_iterations += report.iterations;
        if !report.converged {
            self.capped_solves += 1;
        }
    }
}

#[derive(Clone, Debug)]
pub struct SolveResult {
    pub history: SnapshotHistory,
    pub status: ConvergenceStatus,
    pub termination: Termination,
    pub steps_taken: usize,
    pub residuals: Vec<ResidualSample>,
    pub advice: StabilityAdvice,
    pub poisson: PoissonStats,
}

/// What the progress hook sees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Progress {
    /// Steps completed so far.
    pub step: usize,
    pub max_iter: usize,
    /// Set on the last call of a run.
    pub termination: Option<Termination>,
}

/// Exclusive owner of the velocity and pressure buffers for one run.
#[derive(Clone, Debug)]
pub struct CavitySolver {
    config: SolverConfig,
    velocity: MacVelocity2,
    pressure: Field2,
    predicted: MacVelocity2,
    source: Field2,
    poisson: PoissonScratch,
    steps_taken: usize,
    stats: PoissonStats,
}

impl CavitySolver {
    /// Validates `config` and allocates a fluid at rest.
    pub fn new(config: SolverConfig) -> ConfigResult<Self> {
        config.validate()?;
        let grid = config.grid();
        let pressure = Field2::new(grid.cell_grid(), 0.0);
        let poisson = PoissonScratch::new(&pressure);
        Ok(Self {
            config,
            velocity: MacVelocity2::zeros(grid),
            pressure,
            predicted: MacVelocity2::zeros(grid),
            source: Field2::new(grid.cell_grid(), 0.0),
            poisson,
            steps_taken: 0,
            stats: PoissonStats::default(),
        })
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn velocity(&self) -> &MacVelocity2 {
        &self.velocity
    }

    pub fn pressure(&self) -> &Field2 {
        &self.pressure
    }

    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    pub fn poisson_stats(&self) -> PoissonStats {
        self.stats
    }

    /// Advance one time step.
    pub fn step(&mut self) -> PoissonReport {
        let config = self.config;
        predict_velocity_into(&mut self.predicted, &self.velocity, config.momentum());
        pressure_source_into(&mut self.source, &self.predicted, config.dt);
        let report = solve_pressure_into(
            &mut self.pressure,
            &self.source,
            config.pressure_solver,
            config.poisson(),
            &mut self.poisson,
        );
        correct_velocity_into(
            &mut self.velocity,
            &self.predicted,
            &self.pressure,
            config.dt,
            config.walls(),
        );
        self.steps_taken += 1;
        self.stats.record(report);
        report
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            step: self.steps_taken,
            time: self.steps_taken as f64 * self.config.dt,
            grid: self.velocity.grid(),
            u: self.velocity.u().clone(),
            v: self.velocity.v().clone(),
            p: self.pressure.clone(),
        }
    }

    /// `‖new - old‖ / (‖old‖ + ε)` for each component.
    pub fn relative_change(&self, previous: &MacVelocity2) -> (f64, f64) {
        let u = self.velocity.u().distance(previous.u()) / (previous.u().norm() + NORM_EPSILON);
        let v = self.velocity.v().distance(previous.v()) / (previous.v().norm() + NORM_EPSILON);
        (u, v)
    }
}

pub fn solve(config: SolverConfig) -> ConfigResult<SolveResult> {
    solve_with_progress(config, |_| ControlFlow::Continue(()))
}

/// Runs to convergence, `max_iter`, or until `hook` breaks.
///
/// `hook` is called before every `progress_interval`-th step and once more
/// when the run ends.
pub fn solve_with_progress<F>(config: SolverConfig, mut hook: F) -> ConfigResult<SolveResult>
where
    F: FnMut(Progress) -> ControlFlow<()>,
{
    let mut solver = CavitySolver::new(config)?;
    let advice = config.stability();
    log::info!(
        "solving lid-driven cavity: Re={}, grid {}x{}, dt={}, solver {}",
        config.reynolds,
        config.nx,
        config.ny,
        config.dt,
        config.pressure_solver
    );
    match advice.warning(config.dt) {
        Some(warning) => log::warn!("{warning}"),
        None => log::info!("dt={} within stability limits, {advice}", config.dt),
    }
    if let PressureSolver::Sor { omega } = config.pressure_solver {
        if !(1.7..=1.9).contains(&omega) {
            log::debug!("SOR omega={omega} is outside the usual 1.7-1.9 range");
        }
    }

    let tuning = config.tuning;
    let mut history = SnapshotHistory::new();
    let mut residuals = Vec::new();
    let mut previous = MacVelocity2::zeros(config.grid());
    let mut status = ConvergenceStatus {
        converged: false,
        step: None,
        residual: f64::INFINITY,
    };
    let mut termination = Termination::MaxIterReached;
    let mut warned_non_finite = false;

    for n in 0..config.max_iter {
        if n % tuning.progress_interval == 0 {
            let progress = Progress {
                step: n,
                max_iter: config.max_iter,
                termination: None,
            };
            if hook(progress).is_break() {
                termination = Termination::Aborted;
                break;
            }
        }

        let check = n % tuning.convergence_check_interval == 0;
        if check {
            previous.clone_from(solver.velocity());
        }
        solver.step();

        if check {
            let (u, v) = solver.relative_change(&previous);
            let sample = ResidualSample {
                step: solver.steps_taken(),
                u,
                v,
            };
            residuals.push(sample);
            status.residual = sample.max();
            log::debug!("step {}: relative change u={u:.3e} v={v:.3e}", sample.step);
            if !(u.is_finite() && v.is_finite()) && !warned_non_finite {
                log::warn!(
                    "velocity field is no longer finite at step {}; dt={} is likely unstable",
                    sample.step,
                    config.dt
                );
                warned_non_finite = true;
            }
            if u < config.velocity_tolerance && v < config.velocity_tolerance {
                status.converged = true;
                status.step = Some(sample.step);
            }
        }

        if let Some(interval) = config.snapshot_interval {
            if n % interval == 0 {
                history.push(solver.snapshot());
            }
        }

        if status.converged {
            termination = Termination::Converged;
            break;
        }
    }

    let steps_taken = solver.steps_taken();
    // appended even when a periodic capture already holds this step
    history.push(solver.snapshot());

    match termination {
        Termination::Converged => log::info!(
            "converged at step {steps_taken} (relative change {:.2e})",
            status.residual
        ),
        Termination::MaxIterReached => log::info!(
            "reached max_iter={} without converging (relative change {:.2e})",
            config.max_iter,
            status.residual
        ),
        Termination::Aborted => log::info!("run aborted by caller after {steps_taken} steps"),
    }
    let poisson = solver.poisson_stats();
    if poisson.capped_solves > 0 {
        log::debug!(
            "{} of {} pressure solves stopped at the iteration cap",
            poisson.capped_solves,
            poisson.solves
        );
    }
    // The loop has already exited, so a Break from this last call has nothing to stop.
    let _ = hook(Progress {
        step: steps_taken,
        max_iter: config.max_iter,
        termination: Some(termination),
    });

    Ok(SolveResult {
        history,
        status,
        termination,
        steps_taken,
        residuals,
        advice,
        poisson,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::max_interior_divergence;

    fn assert_close(a: f64, b: f64, tol: f64) {
        assert!(
            (a - b).abs() <= tol,
            "expected {a} to be within {tol} of {b}"
        );
    }

    fn small(nx: usize, max_iter: usize) -> SolverConfig {
        SolverConfig {
            reynolds: 10.0,
            nx,
            ny: nx,
            max_iter,
            dt: 0.01,
            ..SolverConfig::default()
        }
    }

    #[test]
    fn default_config_is_valid() {
        assert!(SolverConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_invalid_configuration() {
        let base = SolverConfig::default();
        let cases = [
            SolverConfig { reynolds: 0.0, ..base },
            SolverConfig { reynolds: f64::NAN, ..base },
            SolverConfig { nx: 0, ..base },
            SolverConfig { ny: 0, ..base },
            SolverConfig { lx: -1.0, ..base },
            SolverConfig { dt: 0.0, ..base },
            SolverConfig { dt: f64::INFINITY, ..base },
            SolverConfig { velocity_tolerance: -1.0, ..base },
            SolverConfig { pressure_tolerance: f64::NAN, ..base },
            SolverConfig { lid_velocity: f64::NAN, ..base },
            SolverConfig { pressure_solver: PressureSolver::Sor { omega: 2.0 }, ..base },
            SolverConfig { snapshot_interval: Some(0), ..base },
            SolverConfig {
                tuning: SolverTuning {
                    convergence_check_interval: 0,
                    ..SolverTuning::default()
                },
                ..base
            },
        ];
        for config in cases {
            assert!(config.validate().is_err(), "accepted {config:?}");
            assert!(solve(config).is_err());
        }
    }

    #[test]
    fn snapshot_interval_error_is_descriptive() {
        let config = SolverConfig {
            snapshot_interval: Some(0),
            ..SolverConfig::default()
        };
        let err = solve(config).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSnapshotInterval(0)));
        assert!(err.to_string().contains("snapshot interval"));
    }

    #[test]
    fn zero_step_run_returns_initial_state() {
        let result = solve(small(6, 0)).unwrap();
        assert_eq!(result.history.len(), 1);
        assert_eq!(result.steps_taken, 0);
        assert!(!result.status.converged);
        assert_eq!(result.status.step, None);
        assert_eq!(result.termination, Termination::MaxIterReached);
        let state = result.history.final_state();
        assert_eq!(state.step, 0);
        assert_eq!(state.u.max_abs(), 0.0);
        assert_eq!(state.v.max_abs(), 0.0);
        assert_eq!(state.p.max_abs(), 0.0);
    }

    #[test]
    fn boundary_values_hold_exactly_after_every_step() {
        let config = SolverConfig {
            lid_velocity: 1.0,
            ..small(10, 0)
        };
        let mut solver = CavitySolver::new(config).unwrap();
        for _ in 0..30 {
            solver.step();
            let u = solver.velocity().u();
            let v = solver.velocity().v();
            for y in 0..9 {
                assert_eq!(u.get(0, y), 0.0);
                assert_eq!(u.get(10, y), 0.0);
            }
            for x in 0..=10 {
                assert_eq!(u.get(x, 9), 1.0);
            }
            for x in 0..10 {
                assert_eq!(v.get(x, 0), 0.0);
                assert_eq!(v.get(x, 10), 0.0);
            }
        }
    }

    #[test]
    fn pressure_has_zero_mean_after_every_step() {
        let mut solver = CavitySolver::new(small(8, 0)).unwrap();
        for _ in 0..20 {
            solver.step();
            assert_close(solver.pressure().mean(), 0.0, 1e-12);
        }
    }

    #[test]
    fn snapshots_follow_interval_and_end_with_final_state() {
        let config = SolverConfig {
            snapshot_interval: Some(10),
            velocity_tolerance: 0.0,
            ..small(6, 25)
        };
        let result = solve(config).unwrap();
        let steps: Vec<usize> = result.history.snapshots().iter().map(|s| s.step).collect();
        assert_eq!(steps, vec![1, 11, 21, 25]);
        assert_eq!(result.history.final_state().step, result.steps_taken);
        assert_eq!(result.history.u_snapshots().count(), 4);
        assert_eq!(result.history.p_snapshots().count(), 4);
    }

    #[test]
    fn final_state_is_appended_even_when_last_capture_matches() {
        let config = SolverConfig {
            snapshot_interval: Some(1),
            velocity_tolerance: 0.0,
            ..small(4, 5)
        };
        let result = solve(config).unwrap();
        let steps: Vec<usize> = result.history.snapshots().iter().map(|s| s.step).collect();
        assert_eq!(steps, vec![1, 2, 3, 4, 5, 5]);
        let snapshots = result.history.snapshots();
        assert_eq!(snapshots[4].u, snapshots[5].u);
        assert_eq!(snapshots[4].p, snapshots[5].p);
    }

    #[test]
    fn history_without_interval_holds_only_final_state() {
        let result = solve(small(6, 12)).unwrap();
        assert_eq!(result.history.len(), 1);
        assert_eq!(result.history.final_state().step, 12);
        assert_close(result.history.final_state().time, 0.12, 1e-12);
    }

    #[test]
    fn snapshots_are_independent_copies() {
        let config = SolverConfig {
            snapshot_interval: Some(2),
            velocity_tolerance: 0.0,
            ..small(6, 6)
        };
        let result = solve(config).unwrap();
        let snapshots = result.history.snapshots();
        assert_ne!(snapshots[0].u, snapshots[1].u);
        assert_eq!(snapshots[0].velocity().u(), &snapshots[0].u);
    }

    #[test]
    fn progress_hook_runs_at_cadence_and_can_abort() {
        let config = SolverConfig {
            velocity_tolerance: 0.0,
            tuning: SolverTuning {
                progress_interval: 10,
                ..SolverTuning::default()
            },
            ..small(6, 100)
        };
        let mut seen = Vec::new();
        let result = solve_with_progress(config, |progress| {
            seen.push((progress.step, progress.termination));
            if progress.step >= 20 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .unwrap();
        assert_eq!(result.termination, Termination::Aborted);
        assert_eq!(result.steps_taken, 20);
        assert_eq!(
            seen,
            vec![
                (0, None),
                (10, None),
                (20, None),
                (20, Some(Termination::Aborted)),
            ]
        );
        assert_eq!(result.history.final_state().step, 20);
    }

    #[test]
    fn break_from_final_report_leaves_result_alone() {
        let config = SolverConfig {
            velocity_tolerance: 0.0,
            ..small(6, 30)
        };
        let mut finals = 0;
        let result = solve_with_progress(config, |progress| match progress.termination {
            Some(_) => {
                finals += 1;
                ControlFlow::Break(())
            }
            None => ControlFlow::Continue(()),
        })
        .unwrap();
        assert_eq!(finals, 1);
        assert_eq!(result.termination, Termination::MaxIterReached);
        assert_eq!(result.steps_taken, 30);
        assert_eq!(result.history.final_state().step, 30);
    }

    #[test]
    fn max_iter_without_convergence_is_reported() {
        let config = SolverConfig {
            velocity_tolerance: 0.0,
            ..small(6, 150)
        };
        let result = solve(config).unwrap();
        assert_eq!(result.termination, Termination::MaxIterReached);
        assert!(!result.status.converged);
        assert_eq!(result.steps_taken, 150);
        let steps: Vec<usize> = result.residuals.iter().map(|s| s.step).collect();
        assert_eq!(steps, vec![1, 101]);
        assert!(result.status.residual.is_finite());
    }

    #[test]
    fn small_cavity_converges_and_conserves_mass() {
        let config = SolverConfig {
            pressure_tolerance: 1e-8,
            ..small(8, 20_000)
        };
        let result = solve(config).unwrap();
        assert!(result.status.converged);
        assert_eq!(result.termination, Termination::Converged);
        assert_eq!(result.status.step, Some(result.steps_taken));
        assert!(result.status.residual < config.velocity_tolerance);
        let state = result.history.final_state();
        let divergence = max_interior_divergence(&state.velocity());
        assert!(divergence < 1e-3, "max interior divergence {divergence}");
        assert!(result.poisson.solves == result.steps_taken);
    }

    #[test]
    fn residual_decays_over_checkpoints() {
        let config = SolverConfig {
            reynolds: 100.0,
            nx: 16,
            ny: 16,
            dt: 0.01,
            max_iter: 3000,
            velocity_tolerance: 0.0,
            ..SolverConfig::default()
        };
        let result = solve(config).unwrap();
        // the first sample compares against the fluid at rest
        let samples: Vec<f64> = result.residuals.iter().skip(1).map(|s| s.max()).collect();
        assert!(samples.len() >= 20);
        let early = &samples[..5];
        let late = &samples[samples.len() - 5..];
        let early_mean = early.iter().sum::<f64>() / early.len() as f64;
        let late_mean = late.iter().sum::<f64>() / late.len() as f64;
        assert!(late_mean < 0.5 * early_mean, "early {early_mean} late {late_mean}");
        assert!(samples[samples.len() - 1] < samples[0]);
    }

    #[test]
    fn sor_at_unit_omega_reproduces_gauss_seidel_run() {
        let base = SolverConfig {
            velocity_tolerance: 0.0,
            ..small(8, 40)
        };
        let gs = solve(SolverConfig {
            pressure_solver: PressureSolver::GaussSeidel,
            ..base
        })
        .unwrap();
        let sor = solve(SolverConfig {
            pressure_solver: PressureSolver::Sor { omega: 1.0 },
            ..base
        })
        .unwrap();
        assert_eq!(gs.history, sor.history);
    }
}
