use crate::mac::{apply_cavity_boundaries, CavityWalls};
use crate::{Field2, MacVelocity2};

pub fn divergence(velocity: &MacVelocity2) -> Field2 {
    let mut out = Field2::new(velocity.grid().cell_grid(), 0.0);
    divergence_into(&mut out, velocity);
    out
}

/// Cell-centred `u_x + v_y` from the four faces of each cell.
pub fn divergence_into(out: &mut Field2, velocity: &MacVelocity2) {
    let grid = velocity.grid();
    let (dx, dy) = (grid.dx(), grid.dy());
    let u = velocity.u();
    let v = velocity.v();
    out.fill_with_index(|x, y| {
        (u.get(x + 1, y) - u.get(x, y)) / dx + (v.get(x, y + 1) - v.get(x, y)) / dy
    });
}

/// Poisson source `div(u*) / dt`.
pub fn pressure_source_into(out: &mut Field2, predicted: &MacVelocity2, dt: f64) {
    divergence_into(out, predicted);
    let inv_dt = 1.0 / dt;
    out.update_with_index(|_, _, value| value * inv_dt);
}

/// `u = u* - dt ∂p/∂x`, `v = v* - dt ∂p/∂y` on interior faces, then the
/// cavity boundary values are written exactly.
pub fn correct_velocity_into(
    out: &mut MacVelocity2,
    predicted: &MacVelocity2,
    pressure: &Field2,
    dt: f64,
    walls: CavityWalls,
) {
    debug_assert_eq!(out.grid(), predicted.grid(), "velocity grid mismatch");
    let grid = predicted.grid();
    let (nx, ny) = (grid.nx(), grid.ny());
    let (dx, dy) = (grid.dx(), grid.dy());
    let u_star = predicted.u();
    let v_star = predicted.v();
    out.u_mut().fill_with_index(|x, y| {
        let value = u_star.get(x, y);
        if x == 0 || x == nx {
            return value;
        }
        value - dt * (pressure.get(x, y) - pressure.get(x - 1, y)) / dx
    });
    out.v_mut().fill_with_index(|x, y| {
        let value = v_star.get(x, y);
        if y == 0 || y == ny {
            return value;
        }
        value - dt * (pressure.get(x, y) - pressure.get(x, y - 1)) / dy
    });
    apply_cavity_boundaries(out, walls);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pressure::{solve_pressure, PoissonParams, PressureSolver};
    use crate::MacGrid2;

    fn assert_close(a: f64, b: f64, tol: f64) {
        assert!(
            (a - b).abs() <= tol,
            "expected {a} to be within {tol} of {b}"
        );
    }

    #[test]
    fn divergence_of_uniform_flow_is_zero() {
        let grid = MacGrid2::unit(8, 6);
        let u = Field2::new(grid.u_grid(), 1.0);
        let v = Field2::new(grid.v_grid(), -1.0);
        let velocity = MacVelocity2::from_components(grid, u, v);
        assert_close(divergence(&velocity).max_abs(), 0.0, 1e-12);
    }

    #[test]
    fn divergence_of_linear_expansion() {
        let grid = MacGrid2::unit(5, 4);
        let u_grid = grid.u_grid();
        let v_grid = grid.v_grid();
        let u = Field2::from_fn(u_grid, |x, y| u_grid.position(x, y).0);
        let v = Field2::from_fn(v_grid, |x, y| 2.0 * v_grid.position(x, y).1);
        let velocity = MacVelocity2::from_components(grid, u, v);
        let div = divergence(&velocity);
        for value in div.as_slice() {
            assert_close(*value, 3.0, 1e-12);
        }
    }

    #[test]
    fn pressure_source_scales_by_dt() {
        let grid = MacGrid2::unit(4, 4);
        let u = Field2::from_fn(grid.u_grid(), |x, _| x as f64 * 0.25);
        let velocity = MacVelocity2::from_components(grid, u, Field2::new(grid.v_grid(), 0.0));
        let mut source = Field2::new(grid.cell_grid(), 0.0);
        pressure_source_into(&mut source, &velocity, 0.5);
        assert_close(source.get(1, 1), 2.0, 1e-12);
    }

    #[test]
    fn projection_removes_divergence() {
        let grid = MacGrid2::unit(16, 16);
        let u = Field2::from_fn(grid.u_grid(), |x, y| {
            if x == 0 || x == 16 {
                0.0
            } else {
                ((x * 7 + y * 3) % 5) as f64 * 0.1
            }
        });
        let v = Field2::from_fn(grid.v_grid(), |x, y| {
            if y == 0 || y == 16 {
                0.0
            } else {
                ((x * 2 + y * 5) % 7) as f64 * -0.05
            }
        });
        let predicted = MacVelocity2::from_components(grid, u, v);
        let dt = 0.01;
        let mut source = Field2::new(grid.cell_grid(), 0.0);
        pressure_source_into(&mut source, &predicted, dt);
        let params = PoissonParams {
            tolerance: 1e-12,
            max_iterations: 20_000,
            check_interval: 10,
        };
        let (pressure, report) = solve_pressure(&source, PressureSolver::Sor { omega: 1.8 }, params);
        assert!(report.converged);
        let mut corrected = MacVelocity2::zeros(grid);
        correct_velocity_into(&mut corrected, &predicted, &pressure, dt, CavityWalls::no_slip());
        let before = divergence(&predicted).max_abs();
        let after = divergence(&corrected).max_abs();
        assert!(before > 1.0);
        assert!(after < 1e-6, "divergence after projection {after}");
    }

    #[test]
    fn correction_writes_boundaries_exactly() {
        let grid = MacGrid2::unit(4, 4);
        let predicted = MacVelocity2::from_components(
            grid,
            Field2::new(grid.u_grid(), 0.3),
            Field2::new(grid.v_grid(), 0.3),
        );
        let pressure = Field2::from_fn(grid.cell_grid(), |x, y| (x * y) as f64);
        let mut out = MacVelocity2::zeros(grid);
        correct_velocity_into(&mut out, &predicted, &pressure, 0.1, CavityWalls::lid_driven(1.0));
        for y in 0..3 {
            assert_eq!(out.u().get(0, y), 0.0);
            assert_eq!(out.u().get(4, y), 0.0);
        }
        for x in 0..=4 {
            assert_eq!(out.u().get(x, 3), 1.0);
        }
        for x in 0..4 {
            assert_eq!(out.v().get(x, 0), 0.0);
            assert_eq!(out.v().get(x, 4), 0.0);
        }
        // interior u at (2, 1): 0.3 - 0.1 * (p(2,1) - p(1,1)) / 0.25
        assert_close(out.u().get(2, 1), 0.3 - 0.1 * (2.0 - 1.0) / 0.25, 1e-12);
    }
}
