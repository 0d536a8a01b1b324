//! Advisory explicit time-step limits. Never blocks a run.

use crate::MacGrid2;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StabilityAdvice {
    /// Convective limit `min(dx, dy) / |u_lid|`.
    pub dt_cfl: f64,
    /// Viscous limit `0.25 · Re · min(dx, dy)²`.
    pub dt_diffusion: f64,
}

impl StabilityAdvice {
    pub fn recommended_dt(&self) -> f64 {
        self.dt_cfl.min(self.dt_diffusion)
    }

    pub fn is_within_limits(&self, dt: f64) -> bool {
        dt <= self.recommended_dt()
    }

    /// Human-readable warning when `dt` exceeds the recommendation.
    pub fn warning(&self, dt: f64) -> Option<String> {
        if self.is_within_limits(dt) {
            return None;
        }
        Some(format!(
            "dt={dt} exceeds the recommended dt <= {:.6} (CFL {:.6}, diffusion {:.6}); the run may become unstable",
            self.recommended_dt(),
            self.dt_cfl,
            self.dt_diffusion
        ))
    }
}

impl fmt::Display for StabilityAdvice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "recommended dt <= {:.6} (CFL: {:.6}, diffusion: {:.6})",
            self.recommended_dt(),
            self.dt_cfl,
            self.dt_diffusion
        )
    }
}

pub fn advise(reynolds: f64, grid: MacGrid2, lid_velocity: f64) -> StabilityAdvice {
    let h = grid.min_spacing();
    let speed = lid_velocity.abs();
    let dt_cfl = if speed > 0.0 { h / speed } else { f64::INFINITY };
    StabilityAdvice {
        dt_cfl,
        dt_diffusion: 0.25 * reynolds * h * h,
    }
}

/// Limits for a unit cavity with lid speed 1.
pub fn advise_unit_cavity(reynolds: f64, nx: usize, ny: usize) -> StabilityAdvice {
    advise(reynolds, MacGrid2::unit(nx, ny), 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64, tol: f64) {
        assert!(
            (a - b).abs() <= tol,
            "expected {a} to be within {tol} of {b}"
        );
    }

    #[test]
    fn limits_for_default_run() {
        let advice = advise_unit_cavity(100.0, 60, 60);
        assert_close(advice.dt_cfl, 1.0 / 60.0, 1e-15);
        assert_close(advice.dt_diffusion, 25.0 / 3600.0, 1e-15);
        assert_close(advice.recommended_dt(), 25.0 / 3600.0, 1e-15);
        assert!(advice.is_within_limits(0.001));
        assert!(advice.warning(0.001).is_none());
    }

    #[test]
    fn low_reynolds_is_diffusion_limited() {
        let advice = advise_unit_cavity(1.0, 20, 40);
        let h = 1.0 / 40.0;
        assert_close(advice.recommended_dt(), 0.25 * h * h, 1e-15);
        let warning = advice.warning(0.01).unwrap();
        assert!(warning.contains("dt=0.01"));
    }

    #[test]
    fn high_reynolds_is_convection_limited() {
        let advice = advise_unit_cavity(10_000.0, 100, 100);
        assert_close(advice.recommended_dt(), 0.01, 1e-15);
    }

    #[test]
    fn resting_lid_has_no_convective_limit() {
        let advice = advise(100.0, MacGrid2::unit(10, 10), 0.0);
        assert!(advice.dt_cfl.is_infinite());
        assert_close(advice.recommended_dt(), 0.25, 1e-15);
    }
}
