//! Derived fields for inspecting a solution. All of them live on cell centres.

use crate::projection::divergence;
use crate::{Field2, MacVelocity2};

/// `u` averaged from the left and right faces of each cell.
pub fn cell_centered_u(velocity: &MacVelocity2) -> Field2 {
    let u = velocity.u();
    Field2::from_fn(velocity.grid().cell_grid(), |x, y| 0.5 * (u.get(x, y) + u.get(x + 1, y)))
}

/// `v` averaged from the bottom and top faces of each cell.
pub fn cell_centered_v(velocity: &MacVelocity2) -> Field2 {
    let v = velocity.v();
    Field2::from_fn(velocity.grid().cell_grid(), |x, y| 0.5 * (v.get(x, y) + v.get(x, y + 1)))
}

pub fn speed(velocity: &MacVelocity2) -> Field2 {
    let uc = cell_centered_u(velocity);
    let vc = cell_centered_v(velocity);
    uc.zip_with(&vc, |u, v| u.hypot(v))
}

/// `∂v/∂x - ∂u/∂y` of the cell-centred velocity. Central differences inside,
/// one-sided differences on the outer ring of cells.
pub fn vorticity(velocity: &MacVelocity2) -> Field2 {
    let grid = velocity.grid();
    let (nx, ny) = (grid.nx(), grid.ny());
    let (dx, dy) = (grid.dx(), grid.dy());
    let uc = cell_centered_u(velocity);
    let vc = cell_centered_v(velocity);
    Field2::from_fn(grid.cell_grid(), |x, y| {
        let dv_dx = gradient(nx, x, dx, |i| vc.get(i, y));
        let du_dy = gradient(ny, y, dy, |j| uc.get(x, j));
        dv_dx - du_dy
    })
}

fn gradient(len: usize, at: usize, spacing: f64, value: impl Fn(usize) -> f64) -> f64 {
    if len < 2 {
        return 0.0;
    }
    if at == 0 {
        (value(1) - value(0)) / spacing
    } else if at == len - 1 {
        (value(at) - value(at - 1)) / spacing
    } else {
        (value(at + 1) - value(at - 1)) / (2.0 * spacing)
    }
}

/// Largest |div u| over cells that touch no wall.
///
/// Wall-adjacent cells are excluded: the lid row carries the imposed lid
/// speed on its vertical faces and is not projected.
pub fn max_interior_divergence(velocity: &MacVelocity2) -> f64 {
    let div = divergence(velocity);
    let (nx, ny) = (div.width(), div.height());
    let mut max = 0.0_f64;
    for y in 1..ny.saturating_sub(1) {
        for x in 1..nx.saturating_sub(1) {
            max = max.max(div.get(x, y).abs());
        }
    }
    max
}

/// Area-averaged kinetic energy `0.5 <u² + v²>` of the cell-centred velocity.
pub fn kinetic_energy(velocity: &MacVelocity2) -> f64 {
    let uc = cell_centered_u(velocity);
    let vc = cell_centered_v(velocity);
    0.5 * (uc.sum_squares() + vc.sum_squares()) / uc.grid().size() as f64
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlowSummary {
    pub max_speed: f64,
    pub kinetic_energy: f64,
    pub max_interior_divergence: f64,
    /// Cell-centred vorticity range as `(min, max)`.
    pub vorticity_range: (f64, f64),
}

pub fn summarize(velocity: &MacVelocity2) -> FlowSummary {
    FlowSummary {
        max_speed: speed(velocity).max_abs(),
        kinetic_energy: kinetic_energy(velocity),
        max_interior_divergence: max_interior_divergence(velocity),
        vorticity_range: vorticity(velocity).min_max(),
    }
}
