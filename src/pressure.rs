//! Pressure Poisson solve `∇²p = b` with homogeneous Neumann walls.
//!
//! Out-of-range neighbours are read through [`Field2::sample_clamped`], which
//! is the zero-gradient ghost layer re-derived from the current iterate on
//! every sweep. Gauss-Seidel and SOR sweep the checkerboard in two phases:
//! red cells (`(x + y)` even) then black, each phase writing into a scratch
//! buffer that is swapped in before the next phase reads it.

use crate::error::ConfigError;
use crate::Field2;
use std::fmt;
use std::str::FromStr;

/// Relaxation scheme as named in configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PressureSolverKind {
    Jacobi,
    GaussSeidel,
    Sor,
}

impl PressureSolverKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PressureSolverKind::Jacobi => "jacobi",
            PressureSolverKind::GaussSeidel => "gauss_seidel",
            PressureSolverKind::Sor => "sor",
        }
    }
}

impl fmt::Display for PressureSolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PressureSolverKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "jacobi" => Ok(PressureSolverKind::Jacobi),
            "gauss_seidel" | "gs" => Ok(PressureSolverKind::GaussSeidel),
            "sor" => Ok(PressureSolverKind::Sor),
            _ => Err(ConfigError::UnknownPressureSolver(s.to_string())),
        }
    }
}

/// Relaxation scheme with its parameters, fixed for a whole run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PressureSolver {
    Jacobi,
    GaussSeidel,
    Sor { omega: f64 },
}

impl PressureSolver {
    /// `omega` is only read for [`PressureSolverKind::Sor`].
    pub fn from_kind(kind: PressureSolverKind, omega: f64) -> Self {
        match kind {
            PressureSolverKind::Jacobi => PressureSolver::Jacobi,
            PressureSolverKind::GaussSeidel => PressureSolver::GaussSeidel,
            PressureSolverKind::Sor => PressureSolver::Sor { omega },
        }
    }

    pub fn kind(self) -> PressureSolverKind {
        match self {
            PressureSolver::Jacobi => PressureSolverKind::Jacobi,
            PressureSolver::GaussSeidel => PressureSolverKind::GaussSeidel,
            PressureSolver::Sor { .. } => PressureSolverKind::Sor,
        }
    }

    /// Blend factor of the red-black sweep; `None` for Jacobi.
    pub fn relaxation(self) -> Option<f64> {
        match self {
            PressureSolver::Jacobi => None,
            PressureSolver::GaussSeidel => Some(1.0),
            PressureSolver::Sor { omega } => Some(omega),
        }
    }
}

impl Default for PressureSolver {
    fn default() -> Self {
        PressureSolver::Sor { omega: 1.8 }
    }
}

impl fmt::Display for PressureSolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PressureSolver::Sor { omega } => write!(f, "sor(omega={omega})"),
            other => f.write_str(other.kind().as_str()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PoissonParams {
    /// Stop once the max change between checked sweeps drops below this.
    pub tolerance: f64,
    pub max_iterations: usize,
    /// Sweeps between convergence checks; sweep 0 is always checked.
    pub check_interval: usize,
}

impl Default for PoissonParams {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            max_iterations: 2000,
            check_interval: 10,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PoissonReport {
    pub iterations: usize,
    /// Max change measured at the last check, `INFINITY` if none ran.
    pub max_change: f64,
    pub converged: bool,
}

#[derive(Clone, Debug)]
pub struct PoissonScratch {
    next: Field2,
    previous: Field2,
}

impl PoissonScratch {
    pub fn new(pressure: &Field2) -> Self {
        Self {
            next: Field2::new(pressure.grid(), 0.0),
            previous: Field2::new(pressure.grid(), 0.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Color {
    Red,
    Black,
}

impl Color {
    fn matches(self, x: usize, y: usize) -> bool {
        match self {
            Color::Red => (x + y) % 2 == 0,
            Color::Black => (x + y) % 2 == 1,
        }
    }
}

/// Solve in place, warm-starting from the incoming `pressure`.
///
/// Hitting `max_iterations` is not an error: the last iterate is kept and
/// the report says `converged: false`. The result always has zero mean.
pub fn solve_pressure_into(
    pressure: &mut Field2,
    rhs: &Field2,
    solver: PressureSolver,
    params: PoissonParams,
    scratch: &mut PoissonScratch,
) -> PoissonReport {
    assert_eq!(pressure.grid(), rhs.grid(), "pressure grid mismatch");
    let check_interval = params.check_interval.max(1);
    let mut report = PoissonReport {
        iterations: 0,
        max_change: f64::INFINITY,
        converged: false,
    };
    for iteration in 0..params.max_iterations {
        let check = iteration % check_interval == 0;
        report.iterations = iteration + 1;
        match solver.relaxation() {
            None => {
                jacobi_sweep(&mut scratch.next, pressure, rhs);
                if check {
                    report.max_change = scratch.next.max_abs_diff(pressure);
                }
                std::mem::swap(pressure, &mut scratch.next);
            }
            Some(omega) => {
                if check {
                    scratch.previous.clone_from(pressure);
                }
                for color in [Color::Red, Color::Black] {
                    red_black_phase(&mut scratch.next, pressure, rhs, omega, color);
                    std::mem::swap(pressure, &mut scratch.next);
                }
                if check {
                    report.max_change = pressure.max_abs_diff(&scratch.previous);
                }
            }
        }
        if check && report.max_change < params.tolerance {
            report.converged = true;
            break;
        }
    }
    pressure.subtract_mean();
    if report.converged {
        log::trace!(
            "{solver} pressure solve converged after {} sweeps (change {:.3e})",
            report.iterations,
            report.max_change
        );
    } else {
        log::debug!(
            "{solver} pressure solve stopped at cap of {} sweeps (change {:.3e})",
            report.iterations,
            report.max_change
        );
    }
    report
}

pub fn solve_pressure(
    rhs: &Field2,
    solver: PressureSolver,
    params: PoissonParams,
) -> (Field2, PoissonReport) {
    let mut pressure = Field2::new(rhs.grid(), 0.0);
    let mut scratch = PoissonScratch::new(&pressure);
    let report = solve_pressure_into(&mut pressure, rhs, solver, params, &mut scratch);
    (pressure, report)
}

/// Five-point Gauss-Seidel value at `(x, y)` with clamped Neumann ghosts.
fn relaxed_value(pressure: &Field2, rhs: &Field2, x: usize, y: usize) -> f64 {
    let grid = pressure.grid();
    let dx2 = grid.dx() * grid.dx();
    let dy2 = grid.dy() * grid.dy();
    let (xi, yi) = (x as i64, y as i64);
    let east = pressure.sample_clamped(xi + 1, yi);
    let west = pressure.sample_clamped(xi - 1, yi);
    let north = pressure.sample_clamped(xi, yi + 1);
    let south = pressure.sample_clamped(xi, yi - 1);
    (dy2 * (east + west) + dx2 * (north + south) - dx2 * dy2 * rhs.get(x, y))
        / (2.0 * (dx2 + dy2))
}

fn jacobi_sweep(out: &mut Field2, pressure: &Field2, rhs: &Field2) {
    out.fill_with_index(|x, y| relaxed_value(pressure, rhs, x, y));
}

fn red_black_phase(out: &mut Field2, pressure: &Field2, rhs: &Field2, omega: f64, color: Color) {
    out.fill_with_index(|x, y| {
        let old = pressure.get(x, y);
        if color.matches(x, y) {
            (1.0 - omega) * old + omega * relaxed_value(pressure, rhs, x, y)
        } else {
            old
        }
    });
}

/// Discrete `∇²p - b` with the same Neumann ghosts as the sweeps.
pub fn poisson_residual(pressure: &Field2, rhs: &Field2) -> Field2 {
    let grid = pressure.grid();
    let dx2 = grid.dx() * grid.dx();
    let dy2 = grid.dy() * grid.dy();
    Field2::from_fn(grid, |x, y| {
        let (xi, yi) = (x as i64, y as i64);
        let center = pressure.get(x, y);
        let east = pressure.sample_clamped(xi + 1, yi);
        let west = pressure.sample_clamped(xi - 1, yi);
        let north = pressure.sample_clamped(xi, yi + 1);
        let south = pressure.sample_clamped(xi, yi - 1);
        (east - 2.0 * center + west) / dx2 + (north - 2.0 * center + south) / dy2 - rhs.get(x, y)
    })
}
