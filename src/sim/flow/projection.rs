//! Global projection operators from the dense pseudoinverse.
//!
//! The mass-scaled constraint operator is factored once with a dense SVD;
//! its Moore-Penrose pseudoinverse yields the range-space projector
//! P = pinv(A~) * A~ and the null-space projector N = I - P. Everything here
//! is O(N^2) memory and O(N^3) time and is the scalability ceiling of the
//! dense method; it runs exactly once per grid, never inside the time loop.

use anyhow::{Result, anyhow, ensure};
use nalgebra::DMatrix;
use nalgebra_sparse::CsrMatrix;

use super::mass::MassScaling;

/// Range- and null-space projectors over the 2N velocity space.
#[derive(Debug, Clone)]
pub struct ProjectionOperators {
    /// Range-space projector P = pinv(A~) * A~ (idempotent).
    pub range: DMatrix<f64>,
    /// Null-space projector N = I - P; its image is the divergence-free
    /// subspace in mass-scaled coordinates.
    pub null: DMatrix<f64>,
    /// Singular-value cutoff actually applied.
    pub tolerance: f64,
    /// Effective rank of the scaled constraint operator at that cutoff.
    pub rank: usize,
}

/// Builds the projectors for a constraint operator and mass scaling.
///
/// `tolerance` overrides the singular-value cutoff; `None` uses machine
/// epsilon scaled by the largest singular value and the larger matrix
/// dimension. The cutoff choice changes the effective rank and hence the
/// projectors; the idempotency invariant P*P ~= P is the check that the
/// chosen cutoff is sane.
pub fn build_projection_operators(
    constraint: &CsrMatrix<f64>,
    mass: &MassScaling,
    tolerance: Option<f64>,
) -> Result<ProjectionOperators> {
    let n_rows = constraint.nrows();
    let n_dof = constraint.ncols();
    ensure!(
        n_dof == 2 * n_rows,
        "Constraint operator must be N x 2N, got {n_rows} x {n_dof}"
    );

    // A~ = A * M^(-1/2): sparse times scalar, densified only here.
    let mut a_tilde = DMatrix::<f64>::zeros(n_rows, n_dof);
    for (row, col, val) in constraint.triplet_iter() {
        a_tilde[(row, col)] = val * mass.inv_sqrt();
    }

    let svd = a_tilde.clone().svd(true, true);
    let u = svd
        .u
        .as_ref()
        .ok_or_else(|| anyhow!("SVD did not produce U"))?;
    let v_t = svd
        .v_t
        .as_ref()
        .ok_or_else(|| anyhow!("SVD did not produce V^T"))?;

    let sigma_max = svd.singular_values.max();
    let tol = match tolerance {
        Some(t) => t,
        None => f64::EPSILON * n_rows.max(n_dof) as f64 * sigma_max,
    };

    let mut sigma_inv = svd.singular_values.clone();
    let mut rank = 0;
    for s in sigma_inv.iter_mut() {
        if *s > tol {
            *s = 1.0 / *s;
            rank += 1;
        } else {
            *s = 0.0;
        }
    }

    // pinv(A~) = V * Sigma^+ * U^T, (2N x N).
    let pinv = v_t.transpose() * DMatrix::from_diagonal(&sigma_inv) * u.transpose();
    let range = &pinv * &a_tilde;
    let null = DMatrix::<f64>::identity(n_dof, n_dof) - &range;

    Ok(ProjectionOperators {
        range,
        null,
        tolerance: tol,
        rank,
    })
}
