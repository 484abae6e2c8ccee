//! Sparse divergence (constraint) operator.
//!
//! Row m of the operator discretizes du/dx + dv/dy at grid point m with
//! central differences. Columns are interleaved per point (u at 2m, v at
//! 2m+1). Wherever a neighbor lies on a wall its column is omitted rather
//! than zeroed: the wall velocity is a known boundary constant, not an
//! unknown degree of freedom, so it contributes nothing to the constraint
//! on the unknowns.
//!
//! Every category uses the reciprocal coefficients 1/dx and 1/dy. Boundary
//! rows are one-sided (they simply drop the wall-crossing entries); they are
//! not rescaled relative to the interior rows.

use anyhow::Result;
use nalgebra_sparse::{CooMatrix, CsrMatrix};

use crate::grid::CavityGrid;

/// Column index of the u component of point `m`.
#[inline]
pub fn u_col(m: usize) -> usize {
    2 * m
}

/// Column index of the v component of point `m`.
#[inline]
pub fn v_col(m: usize) -> usize {
    2 * m + 1
}

/// Builds the N x 2N divergence operator for `grid`.
///
/// The matrix depends only on grid topology and spacing; it is built once
/// and reused for the lifetime of the simulation. Each row carries at most
/// four nonzeros.
pub fn build_divergence_operator(grid: &CavityGrid) -> Result<CsrMatrix<f64>> {
    let n = grid.num_points();
    let px = grid.px();
    let cx = 1.0 / grid.dx();
    let cy = 1.0 / grid.dy();

    let mut coo = CooMatrix::new(n, grid.num_dof());
    for m in 0..n {
        let cat = grid.category(m);
        // Four candidate slots: south v, west u, east u, north v. A slot is
        // dropped when the neighbor sits on a wall.
        if !cat.wall_south() {
            coo.push(m, v_col(m - px), -cy);
        }
        if !cat.wall_west() {
            coo.push(m, u_col(m - 1), -cx);
        }
        if !cat.wall_east() {
            coo.push(m, u_col(m + 1), cx);
        }
        if !cat.wall_north() {
            coo.push(m, v_col(m + px), cy);
        }
    }

    Ok(CsrMatrix::from(&coo))
}

/// Sparse matrix-vector product `y = A * x` over plain slices.
///
/// Kept explicit so the hot path never materializes A densely.
pub fn apply(a: &CsrMatrix<f64>, x: &[f64], y: &mut [f64]) -> Result<()> {
    anyhow::ensure!(
        x.len() == a.ncols() && y.len() == a.nrows(),
        "apply: dimension mismatch (A is {}x{}, x has {}, y has {})",
        a.nrows(),
        a.ncols(),
        x.len(),
        y.len()
    );
    for (row, out) in y.iter_mut().enumerate() {
        let lane = a.row(row);
        let mut sum = 0.0;
        for (&col, &val) in lane.col_indices().iter().zip(lane.values()) {
            sum += val * x[col];
        }
        *out = sum;
    }
    Ok(())
}
