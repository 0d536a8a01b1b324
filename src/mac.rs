//! Staggered marker-and-cell layout for a rectangular cavity.
//!
//! `u` lives on vertical faces (`ny` rows of `nx + 1`), `v` on horizontal
//! faces (`ny + 1` rows of `nx`), pressure at cell centres (`ny` rows of
//! `nx`). Column/row 0 of a velocity component is the left/bottom wall.

use crate::{Field2, Grid2};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MacGrid2 {
    nx: usize,
    ny: usize,
    lx: f64,
    ly: f64,
}

impl MacGrid2 {
    pub fn new(nx: usize, ny: usize, lx: f64, ly: f64) -> Self {
        assert!(nx > 0, "nx must be > 0");
        assert!(ny > 0, "ny must be > 0");
        assert!(lx > 0.0, "lx must be > 0");
        assert!(ly > 0.0, "ly must be > 0");
        Self { nx, ny, lx, ly }
    }

    /// Unit square cavity.
    pub fn unit(nx: usize, ny: usize) -> Self {
        Self::new(nx, ny, 1.0, 1.0)
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn lx(&self) -> f64 {
        self.lx
    }

    pub fn ly(&self) -> f64 {
        self.ly
    }

    pub fn dx(&self) -> f64 {
        self.lx / self.nx as f64
    }

    pub fn dy(&self) -> f64 {
        self.ly / self.ny as f64
    }

    pub fn min_spacing(&self) -> f64 {
        self.dx().min(self.dy())
    }

    pub fn cell_grid(&self) -> Grid2 {
        let (dx, dy) = (self.dx(), self.dy());
        Grid2::new(self.nx, self.ny, dx, dy, (0.5 * dx, 0.5 * dy))
    }

    pub fn u_grid(&self) -> Grid2 {
        let (dx, dy) = (self.dx(), self.dy());
        Grid2::new(self.nx + 1, self.ny, dx, dy, (0.0, 0.5 * dy))
    }

    pub fn v_grid(&self) -> Grid2 {
        let (dx, dy) = (self.dx(), self.dy());
        Grid2::new(self.nx, self.ny + 1, dx, dy, (0.5 * dx, 0.0))
    }

    pub fn cell_center(&self, x: usize, y: usize) -> (f64, f64) {
        (
            (x as f64 + 0.5) * self.dx(),
            (y as f64 + 0.5) * self.dy(),
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MacVelocity2 {
    grid: MacGrid2,
    u: Field2,
    v: Field2,
}

impl MacVelocity2 {
    pub fn zeros(grid: MacGrid2) -> Self {
        Self {
            grid,
            u: Field2::new(grid.u_grid(), 0.0),
            v: Field2::new(grid.v_grid(), 0.0),
        }
    }

    pub fn from_components(grid: MacGrid2, u: Field2, v: Field2) -> Self {
        assert_eq!(u.grid(), grid.u_grid(), "u grid mismatch");
        assert_eq!(v.grid(), grid.v_grid(), "v grid mismatch");
        Self { grid, u, v }
    }

    pub fn grid(&self) -> MacGrid2 {
        self.grid
    }

    pub fn u(&self) -> &Field2 {
        &self.u
    }

    pub fn v(&self) -> &Field2 {
        &self.v
    }

    pub fn u_mut(&mut self) -> &mut Field2 {
        &mut self.u
    }

    pub fn v_mut(&mut self) -> &mut Field2 {
        &mut self.v
    }

    pub fn clone_from(&mut self, other: &Self) {
        self.u.clone_from(&other.u);
        self.v.clone_from(&other.v);
    }

    pub fn max_abs(&self) -> f64 {
        self.u.max_abs().max(self.v.max_abs())
    }
}

/// Tangential condition of one cavity wall. Every wall is impermeable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Wall {
    NoSlip,
    /// Wall translating along itself at the given speed.
    Sliding(f64),
}

impl Wall {
    pub fn speed(self) -> f64 {
        match self {
            Wall::NoSlip => 0.0,
            Wall::Sliding(speed) => speed,
        }
    }

    /// Ghost value that puts `speed` at the wall midway between the ghost
    /// and its interior neighbour.
    pub fn ghost(self, interior: f64) -> f64 {
        match self {
            Wall::NoSlip => -interior,
            Wall::Sliding(speed) => 2.0 * speed - interior,
        }
    }
}

/// Side walls and floor are always [`Wall::NoSlip`]; only the lid may slide.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CavityWalls {
    pub lid: Wall,
}

impl CavityWalls {
    pub const STATIONARY: Wall = Wall::NoSlip;

    pub fn no_slip() -> Self {
        Self { lid: Wall::NoSlip }
    }

    /// Lid moving in +x.
    pub fn lid_driven(lid_velocity: f64) -> Self {
        Self {
            lid: Wall::Sliding(lid_velocity),
        }
    }
}

/// Zero the wall-normal faces: `u` on the side walls, `v` on the floor and lid.
pub fn apply_impermeable_walls(velocity: &mut MacVelocity2) {
    let grid = velocity.grid();
    let u = velocity.u_mut();
    u.fill_column(0, 0.0);
    u.fill_column(grid.nx(), 0.0);
    let v = velocity.v_mut();
    v.fill_row(0, 0.0);
    v.fill_row(grid.ny(), 0.0);
}

/// Full cavity condition after a correction step.
///
/// Normal faces are zeroed first, then a sliding lid overwrites the top row
/// of `u`, so that row (corners included) ends up exactly at the lid speed.
pub fn apply_cavity_boundaries(velocity: &mut MacVelocity2, walls: CavityWalls) {
    apply_impermeable_walls(velocity);
    if let Wall::Sliding(speed) = walls.lid {
        let top = velocity.grid().ny() - 1;
        velocity.u_mut().fill_row(top, speed);
    }
}
