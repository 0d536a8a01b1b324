//! Centre-line profiles and the Ghia, Ghia & Shin (1982) reference data.
//!
//! Reference coordinates are for a unit cavity with unit lid speed; they are
//! scaled by the domain size and lid velocity when compared.

use crate::MacVelocity2;

const GHIA_Y: [f64; 17] = [
    1.0000, 0.9766, 0.9688, 0.9609, 0.9531, 0.8516, 0.7344, 0.6172, 0.5000, 0.4531, 0.2813, 0.1719,
    0.1016, 0.0703, 0.0625, 0.0547, 0.0000,
];

const GHIA_X: [f64; 17] = [
    1.0000, 0.9688, 0.9609, 0.9531, 0.9453, 0.9063, 0.8594, 0.8047, 0.5000, 0.2344, 0.2266, 0.1563,
    0.0938, 0.0781, 0.0703, 0.0625, 0.0000,
];

/// Tabulated centre-line velocities for one Reynolds number.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GhiaReference {
    pub reynolds: u32,
    /// Heights along x = 0.5.
    pub y: [f64; 17],
    /// u at `y`.
    pub u: [f64; 17],
    /// Abscissae along y = 0.5.
    pub x: [f64; 17],
    /// v at `x`.
    pub v: [f64; 17],
}

pub const GHIA_1982: [GhiaReference; 7] = [
    GhiaReference {
        reynolds: 100,
        y: GHIA_Y,
        u: [
            1.0000, 0.84123, 0.78871, 0.73722, 0.68717, 0.23151, 0.00332, -0.13641, -0.20581, -0.21090,
            -0.15662, -0.10150, -0.06434, -0.04775, -0.04192, -0.03717, 0.00000,
        ],
        x: GHIA_X,
        v: [
            0.0000, -0.05906, -0.07391, -0.08864, -0.10313, -0.16914, -0.22445, -0.24533, 0.05454,
            0.17527, 0.17507, 0.16077, 0.12317, 0.10890, 0.10091, 0.09233, 0.00000,
        ],
    },
    GhiaReference {
        reynolds: 400,
        y: GHIA_Y,
        u: [
            1.0000, 0.75837, 0.68439, 0.61756, 0.55892, 0.29093, 0.16256, 0.02135, -0.11477, -0.17119,
            -0.32726, -0.24299, -0.14612, -0.10338, -0.09266, -0.08186, 0.00000,
        ],
        x: GHIA_X,
        v: [
            0.0000, -0.12146, -0.15663, -0.19254, -0.22847, -0.23827, -0.44993, -0.38598, 0.05186,
            0.30174, 0.30203, 0.28124, 0.22965, 0.20920, 0.19713, 0.18360, 0.00000,
        ],
    },
    GhiaReference {
        reynolds: 1000,
        y: GHIA_Y,
        u: [
            1.0000, 0.65928, 0.57492, 0.51117, 0.46604, 0.33304, 0.18719, 0.05702, -0.06080, -0.10648,
            -0.27805, -0.38289, -0.29730, -0.22220, -0.20196, -0.18109, 0.00000,
        ],
        x: GHIA_X,
        v: [
            0.0000, -0.21388, -0.27669, -0.33714, -0.39188, -0.51550, -0.42665, -0.31966, 0.02526,
            0.32235, 0.33075, 0.37095, 0.32627, 0.30353, 0.29012, 0.27485, 0.00000,
        ],
    },
    GhiaReference {
        reynolds: 3200,
        y: GHIA_Y,
        u: [
            1.0000, 0.53236, 0.48296, 0.46547, 0.46101, 0.34682, 0.19791, 0.07156, -0.04272, -0.086636,
            -0.24427, -0.34323, -0.41933, -0.37827, -0.35344, -0.32407, 0.00000,
        ],
        x: GHIA_X,
        v: [
            0.0000, -0.39017, -0.47425, -0.52357, -0.54053, -0.44307, -0.37401, -0.31184, 0.00999,
            0.28188, 0.29030, 0.37119, 0.42768, 0.41906, 0.40917, 0.39560, 0.00000,
        ],
    },
    GhiaReference {
        reynolds: 5000,
        y: GHIA_Y,
        u: [
            1.0000, 0.48223, 0.46120, 0.45992, 0.46036, 0.33556, 0.20087, 0.08183, -0.03039, -0.07404,
            -0.22855, -0.33050, -0.40435, -0.43643, -0.42901, -0.41165, 0.00000,
        ],
        x: GHIA_X,
        v: [
            0.0000, -0.49774, -0.55069, -0.55408, -0.52876, -0.41442, -0.36214, -0.30018, 0.00945,
            0.27280, 0.28066, 0.35368, 0.42951, 0.43648, 0.43329, 0.42447, 0.00000,
        ],
    },
    GhiaReference {
        reynolds: 7500,
        y: GHIA_Y,
        u: [
            1.0000, 0.47244, 0.47048, 0.47323, 0.47167, 0.34228, 0.20591, 0.08342, -0.03800, -0.07503,
            -0.23176, -0.32393, -0.38324, -0.43025, -0.43590, -0.43154, 0.00000,
        ],
        x: GHIA_X,
        v: [
            0.0000, -0.53858, -0.55216, -0.52347, -0.48590, -0.41050, -0.36213, -0.30448, 0.00824,
            0.27348, 0.28117, 0.35060, 0.41824, 0.43564, 0.44030, 0.43979, 0.00000,
        ],
    },
    GhiaReference {
        reynolds: 10000,
        y: GHIA_Y,
        u: [
            1.0000, 0.47221, 0.47783, 0.48070, 0.47804, 0.34635, 0.20673, 0.08344, 0.03111, -0.07540,
            -0.23186, -0.32709, -0.38000, -0.41657, -0.42537, -0.42735, 0.00000,
        ],
        x: GHIA_X,
        v: [
            0.0000, -0.54302, -0.52987, -0.49099, -0.45863, -0.41496, -0.36737, -0.30719, 0.00831,
            0.27224, 0.28003, 0.35070, 0.41487, 0.43124, 0.43733, 0.43983, 0.00000,
        ],
    },
];

/// Table for `reynolds` if it is one of the tabulated values.
pub fn ghia_reference(reynolds: f64) -> Option<&'static GhiaReference> {
    GHIA_1982
        .iter()
        .find(|table| (table.reynolds as f64 - reynolds).abs() < 1e-9)
}

/// A 1D profile with ascending coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Profile {
    pub coords: Vec<f64>,
    pub values: Vec<f64>,
}

impl Profile {
    pub fn new(coords: Vec<f64>, values: Vec<f64>) -> Self {
        assert_eq!(coords.len(), values.len(), "profile length mismatch");
        assert!(!coords.is_empty(), "profile must not be empty");
        debug_assert!(coords.windows(2).all(|w| w[0] <= w[1]), "coords must ascend");
        Self { coords, values }
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Piecewise-linear value at `at`, held constant beyond either end.
    pub fn interpolate(&self, at: f64) -> f64 {
        let last = self.coords.len() - 1;
        if at <= self.coords[0] {
            return self.values[0];
        }
        if at >= self.coords[last] {
            return self.values[last];
        }
        let hi = self.coords.partition_point(|c| *c <= at).min(last);
        let lo = hi - 1;
        let span = self.coords[hi] - self.coords[lo];
        if span <= 0.0 {
            return self.values[hi];
        }
        let t = (at - self.coords[lo]) / span;
        self.values[lo] + t * (self.values[hi] - self.values[lo])
    }
}

/// u along the face column nearest the vertical centre line, at cell-centre
/// heights, with the wall values `0` at the bottom and `lid_velocity` at the top.
pub fn centerline_u(velocity: &MacVelocity2, lid_velocity: f64) -> Profile {
    let grid = velocity.grid();
    let u = velocity.u();
    let column = u.grid().nearest_column(0.5 * grid.lx());
    let mut coords = Vec::with_capacity(grid.ny() + 2);
    let mut values = Vec::with_capacity(grid.ny() + 2);
    coords.push(0.0);
    values.push(0.0);
    coords.extend(u.grid().y_coords());
    values.extend(u.column(column));
    coords.push(grid.ly());
    values.push(lid_velocity);
    Profile::new(coords, values)
}

/// v along the face row nearest the horizontal centre line, at cell-centre
/// abscissae, with zero at both side walls.
pub fn centerline_v(velocity: &MacVelocity2) -> Profile {
    let grid = velocity.grid();
    let v = velocity.v();
    let row = v.grid().nearest_row(0.5 * grid.ly());
    let mut coords = Vec::with_capacity(grid.nx() + 2);
    let mut values = Vec::with_capacity(grid.nx() + 2);
    coords.push(0.0);
    values.push(0.0);
    coords.extend(v.grid().x_coords());
    values.extend_from_slice(v.row(row));
    coords.push(grid.lx());
    values.push(0.0);
    Profile::new(coords, values)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointError {
    pub coord: f64,
    pub reference: f64,
    pub simulated: f64,
}

impl PointError {
    pub fn abs_error(&self) -> f64 {
        (self.simulated - self.reference).abs()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProfileComparison {
    pub points: Vec<PointError>,
    pub max_abs_error: f64,
    pub rms_error: f64,
}

impl ProfileComparison {
    /// Max error over reference points with `lo <= coord <= hi`.
    pub fn max_abs_error_within(&self, lo: f64, hi: f64) -> f64 {
        self.points
            .iter()
            .filter(|point| point.coord >= lo && point.coord <= hi)
            .map(PointError::abs_error)
            .fold(0.0, f64::max)
    }
}

pub fn compare_profile(profile: &Profile, coords: &[f64], reference: &[f64]) -> ProfileComparison {
    assert_eq!(coords.len(), reference.len(), "reference length mismatch");
    let points: Vec<PointError> = coords
        .iter()
        .zip(reference)
        .map(|(&coord, &reference)| PointError {
            coord,
            reference,
            simulated: profile.interpolate(coord),
        })
        .collect();
    let max_abs_error = points.iter().map(PointError::abs_error).fold(0.0, f64::max);
    let rms_error = if points.is_empty() {
        0.0
    } else {
        let sum: f64 = points.iter().map(|p| p.abs_error() * p.abs_error()).sum();
        (sum / points.len() as f64).sqrt()
    };
    ProfileComparison {
        points,
        max_abs_error,
        rms_error,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BenchmarkReport {
    pub reynolds: u32,
    pub u: ProfileComparison,
    pub v: ProfileComparison,
}

/// Compares both centre lines against Ghia et al. when `reynolds` is tabulated.
pub fn compare_with_ghia(
    velocity: &MacVelocity2,
    reynolds: f64,
    lid_velocity: f64,
) -> Option<BenchmarkReport> {
    let table = ghia_reference(reynolds)?;
    let grid = velocity.grid();
    let scale = |values: &[f64; 17]| values.iter().map(|v| v * lid_velocity).collect::<Vec<_>>();
    let y: Vec<f64> = table.y.iter().map(|y| y * grid.ly()).collect();
    let x: Vec<f64> = table.x.iter().map(|x| x * grid.lx()).collect();
    let u = compare_profile(&centerline_u(velocity, lid_velocity), &y, &scale(&table.u));
    let v = compare_profile(&centerline_v(velocity), &x, &scale(&table.v));
    Some(BenchmarkReport {
        reynolds: table.reynolds,
        u,
        v,
    })
}
