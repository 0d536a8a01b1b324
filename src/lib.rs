mod benchmark;
mod cache;
mod config;
mod diagnostics;
mod error;
mod field;
mod grid;
mod mac;
mod momentum;
mod pressure;
mod projection;
mod solver;
mod stability;

pub use benchmark::{
    centerline_u, centerline_v, compare_profile, compare_with_ghia, ghia_reference,
    BenchmarkReport, GhiaReference, PointError, Profile, ProfileComparison, GHIA_1982,
};
pub use cache::SolveCache;
pub use config::{RunFile, TuningFile};
pub use diagnostics::{
    cell_centered_u, cell_centered_v, kinetic_energy, max_interior_divergence, speed, summarize,
    vorticity, FlowSummary,
};
pub use error::{ConfigError, ConfigResult};
pub use field::Field2;
pub use grid::Grid2;
pub use mac::{
    apply_cavity_boundaries, apply_impermeable_walls, CavityWalls, MacGrid2, MacVelocity2, Wall,
};
pub use momentum::{predict_velocity, predict_velocity_into, MomentumParams};
pub use pressure::{
    poisson_residual, solve_pressure, solve_pressure_into, PoissonParams, PoissonReport,
    PoissonScratch, PressureSolver, PressureSolverKind,
};
pub use projection::{correct_velocity_into, divergence, divergence_into, pressure_source_into};
pub use solver::{
    solve, solve_with_progress, CavitySolver, ConvergenceStatus, PoissonStats, Progress,
    ResidualSample, Snapshot, SnapshotHistory, SolveResult, SolverConfig, SolverTuning,
    Termination,
};
pub use stability::{advise, advise_unit_cavity, StabilityAdvice};
