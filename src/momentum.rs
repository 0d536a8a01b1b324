//! Explicit momentum predictor.
//!
//! Advances `u`, `v` by one forward-Euler step of advection plus viscous
//! diffusion with no pressure coupling. Advection uses the averaged-product
//! MAC form: `(u²)_x` from face-averaged `u`, and `(uv)_y` / `(uv)_x` from
//! products interpolated to cell corners. Samples beyond a wall come from
//! [`Wall::ghost`](crate::Wall::ghost).

use crate::mac::{apply_impermeable_walls, CavityWalls};
use crate::MacVelocity2;

/// Coefficients of one predictor step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MomentumParams {
    pub reynolds: f64,
    pub dt: f64,
    pub walls: CavityWalls,
}

pub fn predict_velocity(velocity: &MacVelocity2, params: MomentumParams) -> MacVelocity2 {
    let mut out = MacVelocity2::zeros(velocity.grid());
    predict_velocity_into(&mut out, velocity, params);
    out
}

/// Writes `u*`, `v*` into `out`. Wall-normal faces of the result are zero.
pub fn predict_velocity_into(out: &mut MacVelocity2, velocity: &MacVelocity2, params: MomentumParams) {
    debug_assert_eq!(out.grid(), velocity.grid(), "velocity grid mismatch");
    let grid = velocity.grid();
    let nx = grid.nx();
    let ny = grid.ny();
    let dt = params.dt;
    let inv_re = 1.0 / params.reynolds;
    let walls = params.walls;
    out.u_mut().fill_with_index(|x, y| {
        let u = velocity.u().get(x, y);
        if x == 0 || x == nx {
            return u;
        }
        u + dt * u_tendency(velocity, walls, inv_re, x, y)
    });
    out.v_mut().fill_with_index(|x, y| {
        let v = velocity.v().get(x, y);
        if y == 0 || y == ny {
            return v;
        }
        v + dt * v_tendency(velocity, inv_re, x, y)
    });
    apply_impermeable_walls(out);
}

/// `-(u²)_x - (uv)_y + ∇²u / Re` at interior u-face `(x, y)`.
fn u_tendency(velocity: &MacVelocity2, walls: CavityWalls, inv_re: f64, x: usize, y: usize) -> f64 {
    let grid = velocity.grid();
    let (dx, dy) = (grid.dx(), grid.dy());
    let u = velocity.u();
    let v = velocity.v();
    let ny = grid.ny();

    let uc = u.get(x, y);
    let ue = u.get(x + 1, y);
    let uw = u.get(x - 1, y);
    let un = if y + 1 < ny {
        u.get(x, y + 1)
    } else {
        walls.lid.ghost(uc)
    };
    let us = if y > 0 {
        u.get(x, y - 1)
    } else {
        CavityWalls::STATIONARY.ghost(uc)
    };

    let diffusion = inv_re * ((ue - 2.0 * uc + uw) / (dx * dx) + (un - 2.0 * uc + us) / (dy * dy));

    let u_east = 0.5 * (uc + ue);
    let u_west = 0.5 * (uc + uw);
    let du2_dx = (u_east * u_east - u_west * u_west) / dx;

    let v_top = 0.5 * (v.get(x - 1, y + 1) + v.get(x, y + 1));
    let v_bottom = 0.5 * (v.get(x - 1, y) + v.get(x, y));
    let u_top = 0.5 * (un + uc);
    let u_bottom = 0.5 * (uc + us);
    let duv_dy = (u_top * v_top - u_bottom * v_bottom) / dy;

    -du2_dx - duv_dy + diffusion
}

/// `-(uv)_x - (v²)_y + ∇²v / Re` at interior v-face `(x, y)`.
fn v_tendency(velocity: &MacVelocity2, inv_re: f64, x: usize, y: usize) -> f64 {
    let grid = velocity.grid();
    let (dx, dy) = (grid.dx(), grid.dy());
    let u = velocity.u();
    let v = velocity.v();
    let nx = grid.nx();

    let vc = v.get(x, y);
    let vn = v.get(x, y + 1);
    let vs = v.get(x, y - 1);
    let ve = if x + 1 < nx {
        v.get(x + 1, y)
    } else {
        CavityWalls::STATIONARY.ghost(vc)
    };
    let vw = if x > 0 {
        v.get(x - 1, y)
    } else {
        CavityWalls::STATIONARY.ghost(vc)
    };

    let diffusion = inv_re * ((ve - 2.0 * vc + vw) / (dx * dx) + (vn - 2.0 * vc + vs) / (dy * dy));

    let v_north = 0.5 * (vc + vn);
    let v_south = 0.5 * (vc + vs);
    let dv2_dy = (v_north * v_north - v_south * v_south) / dy;

    let u_right = 0.5 * (u.get(x + 1, y) + u.get(x + 1, y - 1));
    let u_left = 0.5 * (u.get(x, y) + u.get(x, y - 1));
    let v_right = 0.5 * (ve + vc);
    let v_left = 0.5 * (vw + vc);
    let duv_dx = (v_right * u_right - v_left * u_left) / dx;

    -duv_dx - dv2_dy + diffusion
}
