//! Constrained acceleration for one instant.
//!
//! Splits the mass-scaled free acceleration into its constraint-satisfying
//! part (null-space projection, which becomes the physical acceleration) and
//! its constraint-violating part, whose squared half-norm is the Appellian
//! diagnostic.

use anyhow::{Result, ensure};
use nalgebra::DVector;

use super::mass::MassScaling;
use super::projection::ProjectionOperators;

/// Output of one constrained-acceleration solve.
#[derive(Debug, Clone)]
pub struct ConstrainedAcceleration {
    /// Physical acceleration, length 2N.
    pub acceleration: DVector<f64>,
    /// Mass-scaled (transformed) acceleration, length 2N.
    pub scaled_acceleration: DVector<f64>,
    /// Appellian: half the squared norm of the constraint-violating
    /// component of the free acceleration. Nonnegative by construction.
    pub appellian: f64,
}

/// Projects the forcing vector onto the constraint-satisfying subspace.
///
/// Pure function of its inputs; the caller appends the Appellian to its
/// series and integrates the acceleration.
pub fn solve_constrained_acceleration(
    forcing: &[f64],
    mass: &MassScaling,
    projection: &ProjectionOperators,
) -> Result<ConstrainedAcceleration> {
    let n_dof = projection.null.ncols();
    ensure!(
        forcing.len() == n_dof,
        "Forcing vector has {} entries, projectors act on {n_dof}",
        forcing.len()
    );

    let c_tilde = DVector::from_iterator(
        n_dof,
        forcing.iter().map(|&c| c * mass.inv_sqrt()),
    );

    let scaled_acceleration = -(&projection.null * &c_tilde);
    let violating = -(&projection.range * &c_tilde);
    let appellian = 0.5 * violating.norm_squared();

    let acceleration = &scaled_acceleration * mass.inv_sqrt();

    Ok(ConstrainedAcceleration {
        acceleration,
        scaled_acceleration,
        appellian,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CavityGrid;
    use crate::sim::flow::constraint::{apply, build_divergence_operator};
    use crate::sim::flow::projection::build_projection_operators;

    fn setup(px: usize, py: usize) -> (CavityGrid, MassScaling, ProjectionOperators) {
        let grid = CavityGrid::new(px, py, 1.0, 1.0).unwrap();
        let a = build_divergence_operator(&grid).unwrap();
        let mass = MassScaling::new(1.0, grid.dx(), grid.dy()).unwrap();
        let ops = build_projection_operators(&a, &mass, None).unwrap();
        (grid, mass, ops)
    }

    #[test]
    fn test_rejects_wrong_length() {
        let (_, mass, ops) = setup(4, 4);
        assert!(solve_constrained_acceleration(&[1.0, 2.0], &mass, &ops).is_err());
    }

    #[test]
    fn test_zero_forcing_gives_zero_everything() {
        let (grid, mass, ops) = setup(4, 4);
        let forcing = vec![0.0; grid.num_dof()];
        let out = solve_constrained_acceleration(&forcing, &mass, &ops).unwrap();
        assert!(out.acceleration.iter().all(|&a| a == 0.0));
        assert_eq!(out.appellian, 0.0);
    }

    #[test]
    fn test_appellian_is_nonnegative() {
        let (grid, mass, ops) = setup(5, 4);
        for seed in 0..5 {
            let forcing: Vec<f64> = (0..grid.num_dof())
                .map(|k| ((k * 31 + seed * 17) % 23) as f64 - 11.0)
                .collect();
            let out = solve_constrained_acceleration(&forcing, &mass, &ops).unwrap();
            assert!(out.appellian >= 0.0);
        }
    }

    #[test]
    fn test_projected_acceleration_is_divergence_free() {
        let (grid, mass, ops) = setup(5, 5);
        let a = build_divergence_operator(&grid).unwrap();
        let forcing: Vec<f64> = (0..grid.num_dof()).map(|k| (k as f64 * 0.3).cos()).collect();
        let out = solve_constrained_acceleration(&forcing, &mass, &ops).unwrap();

        let accel: Vec<f64> = out.acceleration.iter().copied().collect();
        let mut div = vec![0.0; grid.num_points()];
        apply(&a, &accel, &mut div).unwrap();
        let max_div = div.iter().fold(0.0_f64, |acc, d| acc.max(d.abs()));
        let scale = accel.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
        assert!(
            max_div <= 1e-9 * (1.0 + scale),
            "Projected acceleration has divergence {max_div}"
        );
    }

    #[test]
    fn test_split_reassembles_free_acceleration() {
        // N*C~ + P*C~ = C~, so scaled + violating parts must sum to -C~.
        let (grid, mass, ops) = setup(4, 5);
        let forcing: Vec<f64> = (0..grid.num_dof()).map(|k| 0.01 * k as f64).collect();
        let out = solve_constrained_acceleration(&forcing, &mass, &ops).unwrap();

        let c_tilde = DVector::from_iterator(
            grid.num_dof(),
            forcing.iter().map(|&c| c * mass.inv_sqrt()),
        );
        let violating = -(&ops.range * &c_tilde);
        let total = &out.scaled_acceleration + &violating + &c_tilde;
        assert!(total.norm() < 1e-10);
    }

    #[test]
    fn test_appellian_matches_definition() {
        let (grid, mass, ops) = setup(4, 4);
        let forcing: Vec<f64> = (0..grid.num_dof()).map(|k| ((k % 7) as f64) - 3.0).collect();
        let out = solve_constrained_acceleration(&forcing, &mass, &ops).unwrap();

        let c_tilde = DVector::from_iterator(
            grid.num_dof(),
            forcing.iter().map(|&c| c * mass.inv_sqrt()),
        );
        let q = -(&ops.range * &c_tilde);
        assert!((out.appellian - 0.5 * q.norm_squared()).abs() < 1e-12);
    }
}
