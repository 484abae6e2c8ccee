//! Free-acceleration (forcing) assembly.
//!
//! Computes, for the current velocity field, the convective plus viscous
//! forcing of every degree of freedom as if the incompressibility constraint
//! did not exist. This runs once per time step and dominates the per-step
//! cost after the projection operators are built.

use anyhow::{Result, ensure};
use rayon::prelude::*;

use crate::grid::CavityGrid;

/// Physical parameters the stencils need, fixed for the run.
#[derive(Debug, Clone, Copy)]
pub struct ForcingParams {
    /// Fluid density in kg/m^3.
    pub density: f64,
    /// Kinematic viscosity in m^2/s.
    pub kinematic_viscosity: f64,
    /// Lid speed in m/s.
    pub lid_speed: f64,
}

/// Velocity pair at one directional neighbor slot: either read from the
/// field or replaced by the wall constant.
#[derive(Debug, Clone, Copy)]
struct Slot {
    u: f64,
    v: f64,
}

/// Assembles the 2N forcing vector into `out`.
///
/// `velocity` holds interleaved (u, v) pairs and must have length 2N; the
/// output slice is fully overwritten. Points are independent, so rows are
/// assembled in parallel; every neighbor read observes `velocity` as passed
/// in, i.e. the field at the start of the step.
pub fn assemble_forcing(
    grid: &CavityGrid,
    params: &ForcingParams,
    velocity: &[f64],
    out: &mut [f64],
) -> Result<()> {
    let n_dof = grid.num_dof();
    ensure!(
        velocity.len() == n_dof,
        "Velocity vector has {} entries, grid needs {n_dof}",
        velocity.len()
    );
    ensure!(
        out.len() == n_dof,
        "Forcing buffer has {} entries, grid needs {n_dof}",
        out.len()
    );

    let px = grid.px();
    let dx = grid.dx();
    let dy = grid.dy();
    let nu = params.kinematic_viscosity;
    // Mass per node on the uniform grid; scales forcing into force units.
    let node_mass = params.density * dx * dy;

    out.par_chunks_mut(2).enumerate().for_each(|(m, pair)| {
        let cat = grid.category(m);
        let here = read(velocity, m);

        // No-slip walls contribute zero; the lid contributes u = lid_speed
        // to the northern slot of top-adjacent points.
        let west = if cat.wall_west() {
            Slot { u: 0.0, v: 0.0 }
        } else {
            read(velocity, m - 1)
        };
        let east = if cat.wall_east() {
            Slot { u: 0.0, v: 0.0 }
        } else {
            read(velocity, m + 1)
        };
        let south = if cat.wall_south() {
            Slot { u: 0.0, v: 0.0 }
        } else {
            read(velocity, m - px)
        };
        let north = if cat.wall_north() {
            Slot {
                u: params.lid_speed,
                v: 0.0,
            }
        } else {
            read(velocity, m + px)
        };

        let conv_u = 0.5 * here.u * (east.u - west.u) / dx
            + 0.5 * here.v * (north.u - south.u) / dy;
        let visc_u = nu
            * ((east.u - 2.0 * here.u + west.u) / (dx * dx)
                + (north.u - 2.0 * here.u + south.u) / (dy * dy));

        let conv_v = 0.5 * here.u * (east.v - west.v) / dx
            + 0.5 * here.v * (north.v - south.v) / dy;
        let visc_v = nu
            * ((east.v - 2.0 * here.v + west.v) / (dx * dx)
                + (north.v - 2.0 * here.v + south.v) / (dy * dy));

        pair[0] = node_mass * (conv_u - visc_u);
        pair[1] = node_mass * (conv_v - visc_v);
    });

    Ok(())
}

#[inline]
fn read(velocity: &[f64], m: usize) -> Slot {
    Slot {
        u: velocity[2 * m],
        v: velocity[2 * m + 1],
    }
}
