use anyhow::{bail, Context, Result};
use cavity_flow::{
    advise, centerline_u, centerline_v, compare_with_ghia, ghia_reference, solve_with_progress,
    summarize, BenchmarkReport, Field2, MacGrid2, PressureSolverKind, Profile, ProfileComparison,
    RunFile, SolveResult, SolverConfig, Termination,
};
use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

const LOG_EVERY: usize = 1000;

#[derive(Parser)]
#[command(name = "cavity")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Lid-driven cavity flow on a staggered grid", long_about = None)]
struct Cli {
    /// Default log filter (trace, debug, info, warn, error); RUST_LOG wins
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the solver to convergence or max-iter
    Run(RunArgs),
    /// Print the recommended time step
    Advise(AdviseArgs),
    /// Run and check the centre lines against Ghia et al. (1982)
    Benchmark(BenchmarkArgs),
}

#[derive(Args)]
struct RunArgs {
    /// YAML run file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: Overrides,

    /// Directory for CSV output of the final fields and centre lines
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Args)]
struct Overrides {
    #[arg(long)]
    re: Option<f64>,
    #[arg(long)]
    nx: Option<usize>,
    #[arg(long)]
    ny: Option<usize>,
    /// Time step; the recommended value is used when neither flag nor file sets it
    #[arg(long)]
    dt: Option<f64>,
    #[arg(long)]
    max_iter: Option<usize>,
    #[arg(long)]
    vtol: Option<f64>,
    #[arg(long)]
    ptol: Option<f64>,
    /// jacobi, gauss_seidel or sor
    #[arg(long)]
    solver: Option<PressureSolverKind>,
    #[arg(long)]
    omega: Option<f64>,
    #[arg(long)]
    snapshot_interval: Option<usize>,
    #[arg(long)]
    lid_velocity: Option<f64>,
}

impl Overrides {
    fn apply(&self, file: &mut RunFile) {
        if let Some(re) = self.re {
            file.reynolds = re;
        }
        if let Some(nx) = self.nx {
            file.nx = nx;
        }
        if let Some(ny) = self.ny {
            file.ny = ny;
        }
        if let Some(dt) = self.dt {
            file.dt = Some(dt);
        }
        if let Some(max_iter) = self.max_iter {
            file.max_iter = max_iter;
        }
        if let Some(vtol) = self.vtol {
            file.velocity_tolerance = vtol;
        }
        if let Some(ptol) = self.ptol {
            file.pressure_tolerance = ptol;
        }
        if let Some(solver) = self.solver {
            file.pressure_solver = solver;
        }
        if let Some(omega) = self.omega {
            file.omega = omega;
        }
        if self.snapshot_interval.is_some() {
            file.snapshot_interval = self.snapshot_interval;
        }
        if let Some(lid) = self.lid_velocity {
            file.lid_velocity = lid;
        }
    }
}

#[derive(Args)]
struct AdviseArgs {
    #[arg(long, default_value_t = 100.0)]
    re: f64,
    #[arg(long, default_value_t = 60)]
    nx: usize,
    #[arg(long, default_value_t = 60)]
    ny: usize,
    #[arg(long, default_value_t = 1.0)]
    lid_velocity: f64,
}

#[derive(Args)]
struct BenchmarkArgs {
    #[arg(long, default_value_t = 100.0)]
    re: f64,
    #[arg(long, default_value_t = 60)]
    nx: usize,
    #[arg(long, default_value_t = 60)]
    ny: usize,
    #[arg(long)]
    dt: Option<f64>,
    #[arg(long, default_value_t = 50_000)]
    max_iter: usize,
    /// Largest acceptable RMS error on either centre line
    #[arg(long, default_value_t = 0.05)]
    tolerance: f64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    match cli.command {
        Command::Run(args) => run(args),
        Command::Advise(args) => advise_dt(args),
        Command::Benchmark(args) => benchmark(args),
    }
}

fn run(args: RunArgs) -> Result<()> {
    let mut file = match &args.config {
        Some(path) => RunFile::load(path)?,
        None => RunFile::default(),
    };
    args.overrides.apply(&mut file);
    let config = file.to_solver_config()?;
    println!("{}", config.stability());

    let result = solve_logged(config)?;
    print_status(&result);

    let velocity = result.history.final_state().velocity();
    let summary = summarize(&velocity);
    println!(
        "max speed {:.4}, kinetic energy {:.4e}, max interior |div| {:.3e}, vorticity [{:.3}, {:.3}]",
        summary.max_speed,
        summary.kinetic_energy,
        summary.max_interior_divergence,
        summary.vorticity_range.0,
        summary.vorticity_range.1
    );
    match compare_with_ghia(&velocity, config.reynolds, config.lid_velocity) {
        Some(report) => print_benchmark(&report),
        None => println!("Re={} has no Ghia et al. (1982) reference data", config.reynolds),
    }

    if let Some(out) = &args.out {
        write_outputs(out, &result, config.lid_velocity)?;
        println!("wrote results to {}", out.display());
    }
    Ok(())
}

fn advise_dt(args: AdviseArgs) -> Result<()> {
    if args.nx == 0 || args.ny == 0 {
        bail!("grid must have at least one cell in each direction");
    }
    let advice = advise(args.re, MacGrid2::unit(args.nx, args.ny), args.lid_velocity);
    println!("{advice}");
    Ok(())
}

fn benchmark(args: BenchmarkArgs) -> Result<()> {
    let file = RunFile {
        reynolds: args.re,
        nx: args.nx,
        ny: args.ny,
        dt: args.dt,
        max_iter: args.max_iter,
        ..RunFile::default()
    };
    let config = file.to_solver_config()?;
    if ghia_reference(config.reynolds).is_none() {
        bail!("Re={} has no Ghia et al. (1982) reference data", config.reynolds);
    }
    let result = solve_logged(config)?;
    print_status(&result);
    let velocity = result.history.final_state().velocity();
    let report = compare_with_ghia(&velocity, config.reynolds, config.lid_velocity)
        .context("reference data disappeared")?;
    print_benchmark(&report);
    let worst = report.u.rms_error.max(report.v.rms_error);
    if worst > args.tolerance {
        bail!("centre-line RMS error {worst:.4} exceeds tolerance {}", args.tolerance);
    }
    Ok(())
}

fn solve_logged(config: SolverConfig) -> Result<SolveResult> {
    let result = solve_with_progress(config, |progress| {
        if progress.termination.is_none() && progress.step > 0 && progress.step % LOG_EVERY == 0 {
            log::info!("step {}/{}", progress.step, progress.max_iter);
        }
        ControlFlow::Continue(())
    })?;
    Ok(result)
}

fn print_status(result: &SolveResult) {
    match result.termination {
        Termination::Converged => println!(
            "converged after {} steps (relative change {:.3e})",
            result.steps_taken, result.status.residual
        ),
        Termination::MaxIterReached => println!(
            "stopped at max-iter after {} steps (relative change {:.3e})",
            result.steps_taken, result.status.residual
        ),
        Termination::Aborted => println!("aborted after {} steps", result.steps_taken),
    }
    println!(
        "pressure solves: {} ({} sweeps, {} hit the cap)",
        result.poisson.solves, result.poisson.total_iterations, result.poisson.capped_solves
    );
}

fn print_benchmark(report: &BenchmarkReport) {
    println!("Ghia et al. (1982), Re={}", report.reynolds);
    print_comparison("u(x=0.5)", "y", &report.u);
    print_comparison("v(y=0.5)", "x", &report.v);
}

fn print_comparison(label: &str, axis: &str, comparison: &ProfileComparison) {
    println!(
        "  {label}: max |err| {:.4}, rms {:.4}",
        comparison.max_abs_error, comparison.rms_error
    );
    for point in &comparison.points {
        println!(
            "    {axis}={:.4}  ref {:>9.5}  sim {:>9.5}",
            point.coord, point.reference, point.simulated
        );
    }
}

fn write_outputs(dir: &Path, result: &SolveResult, lid_velocity: f64) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;
    let state = result.history.final_state();
    write_field(&dir.join("u.csv"), &state.u)?;
    write_field(&dir.join("v.csv"), &state.v)?;
    write_field(&dir.join("p.csv"), &state.p)?;
    let velocity = state.velocity();
    write_profile(&dir.join("centerline_u.csv"), "y,u", &centerline_u(&velocity, lid_velocity))?;
    write_profile(&dir.join("centerline_v.csv"), "x,v", &centerline_v(&velocity))?;
    write_residuals(&dir.join("residuals.csv"), result)?;
    Ok(())
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

/// One line per grid row, bottom row first.
fn write_field(path: &Path, field: &Field2) -> Result<()> {
    let mut out = create(path)?;
    for y in 0..field.height() {
        let line: Vec<String> = field.row(y).iter().map(|value| value.to_string()).collect();
        writeln!(out, "{}", line.join(","))?;
    }
    out.flush()?;
    Ok(())
}

fn write_profile(path: &Path, header: &str, profile: &Profile) -> Result<()> {
    let mut out = create(path)?;
    writeln!(out, "{header}")?;
    for (coord, value) in profile.coords.iter().zip(&profile.values) {
        writeln!(out, "{coord},{value}")?;
    }
    out.flush()?;
    Ok(())
}

fn write_residuals(path: &Path, result: &SolveResult) -> Result<()> {
    let mut out = create(path)?;
    writeln!(out, "step,u,v")?;
    for sample in &result.residuals {
        writeln!(out, "{},{},{}", sample.step, sample.u, sample.v)?;
    }
    out.flush()?;
    Ok(())
}
