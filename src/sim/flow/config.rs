use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

use crate::grid::CavityGrid;

/// Configuration for a lid-driven cavity run.
///
/// The dense projection setup is O(N^2) memory and O(N^3) time in the number
/// of grid points, so `points_x`/`points_y` are meant for small to moderate
/// grids (a few thousand degrees of freedom at most).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowConfig {
    /// Grid points across the cavity (x direction).
    pub points_x: usize,
    /// Grid points up the cavity (y direction).
    pub points_y: usize,
    /// Cavity width in m.
    pub width: f64,
    /// Cavity height in m.
    pub height: f64,
    /// Fluid density in kg/m^3.
    pub density: f64,
    /// Dynamic viscosity in Pa*s.
    pub dynamic_viscosity: f64,
    /// Lid speed in m/s (applied as the u boundary constant above the top row).
    pub lid_speed: f64,
    /// Time step in s.
    ///
    /// Explicit Euler with no stability guard: a step violating the
    /// convective/viscous limits diverges to NaN/Inf without detection.
    pub dt: f64,
    /// Number of steps to march. The loop always runs the full count.
    pub n_steps: usize,
    /// Record a velocity snapshot every this many steps; 0 disables snapshots.
    pub save_interval: usize,
    /// Singular-value cutoff for the pseudoinverse.
    ///
    /// `None` uses machine epsilon scaled by the largest singular value and
    /// the larger matrix dimension.
    pub pinv_tolerance: Option<f64>,
}

impl FlowConfig {
    pub fn new() -> Self {
        Self {
            points_x: 9,
            points_y: 9,
            width: 1.0,
            height: 1.0,
            density: 1.0,
            dynamic_viscosity: 0.01,
            lid_speed: 1.0,
            dt: 1e-3,
            n_steps: 100,
            save_interval: 10,
            pinv_tolerance: None,
        }
    }

    /// Kinematic viscosity nu = mu / rho, in m^2/s.
    pub fn kinematic_viscosity(&self) -> f64 {
        self.dynamic_viscosity / self.density
    }

    /// Checks the configuration and builds the grid it describes.
    pub fn grid(&self) -> Result<CavityGrid> {
        self.validate()?;
        CavityGrid::new(self.points_x, self.points_y, self.width, self.height)
    }

    /// Fail-fast validation of every recognized option.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.points_x >= 3 && self.points_y >= 3,
            "Grid counts must be at least 3, got {} x {}",
            self.points_x,
            self.points_y
        );
        ensure!(
            self.width > 0.0 && self.height > 0.0,
            "Cavity dimensions must be positive, got {} x {}",
            self.width,
            self.height
        );
        ensure!(self.density > 0.0, "Density must be positive, got {}", self.density);
        ensure!(
            self.dynamic_viscosity > 0.0,
            "Dynamic viscosity must be positive, got {}",
            self.dynamic_viscosity
        );
        ensure!(self.dt > 0.0, "Time step must be positive, got {}", self.dt);
        ensure!(self.lid_speed.is_finite(), "Lid speed must be finite");
        if let Some(tol) = self.pinv_tolerance {
            ensure!(
                tol > 0.0 && tol.is_finite(),
                "Pseudoinverse tolerance must be positive and finite, got {tol}"
            );
        }
        Ok(())
    }
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let cfg = FlowConfig::new();
        assert_eq!(cfg.points_x, 9);
        assert!((cfg.width - 1.0).abs() < 1e-12);
        assert!((cfg.lid_speed - 1.0).abs() < 1e-12);
        assert!(cfg.pinv_tolerance.is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_kinematic_viscosity() {
        let mut cfg = FlowConfig::new();
        cfg.density = 2.0;
        cfg.dynamic_viscosity = 0.5;
        assert!((cfg.kinematic_viscosity() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut cfg = FlowConfig::new();
        cfg.points_x = 2;
        assert!(cfg.validate().is_err());

        let mut cfg = FlowConfig::new();
        cfg.density = 0.0;
        assert!(cfg.validate().is_err());

        let mut cfg = FlowConfig::new();
        cfg.dt = -1.0;
        assert!(cfg.validate().is_err());

        let mut cfg = FlowConfig::new();
        cfg.pinv_tolerance = Some(0.0);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_grid_matches_counts() {
        let cfg = FlowConfig::new();
        let grid = cfg.grid().unwrap();
        assert_eq!(grid.num_points(), 81);
        assert_eq!(grid.num_dof(), 162);
    }

    #[test]
    fn test_default_trait() {
        let cfg: FlowConfig = Default::default();
        assert_eq!(cfg.n_steps, 100);
    }
}
