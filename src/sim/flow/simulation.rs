//! Explicit time marching of the constrained cavity flow.
//!
//! The marcher owns the velocity field and the per-step forcing buffer. The
//! projection operators and the constraint matrix are grid/physics constants
//! built exactly once before the loop; each step applies the projection to
//! the forcing assembled from the velocity at the start of the step, then
//! integrates with explicit Euler.
//!
//! There is no stability guard: a time step violating the explicit
//! convective/viscous limits diverges to NaN/Inf without detection, and
//! there is no convergence short-circuit; the loop always runs the full
//! configured count.

use anyhow::{Context, Result};
use nalgebra_sparse::CsrMatrix;

use crate::grid::CavityGrid;

use super::config::FlowConfig;
use super::constraint::build_divergence_operator;
use super::forcing::{ForcingParams, assemble_forcing};
use super::mass::MassScaling;
use super::projection::{ProjectionOperators, build_projection_operators};
use super::recorder::{SnapshotRecorder, SnapshotSink};
use super::result::CaseResult;
use super::solver::solve_constrained_acceleration;

/// A prepared cavity simulation: grid, operators and state for one run.
pub struct FlowSimulation {
    config: FlowConfig,
    grid: CavityGrid,
    mass: MassScaling,
    constraint: CsrMatrix<f64>,
    projection: ProjectionOperators,
    forcing_params: ForcingParams,
    /// Interleaved (u, v) pairs; the single mutable state of the run.
    velocity: Vec<f64>,
    /// Per-step forcing buffer, reused to avoid reallocation.
    forcing: Vec<f64>,
    steps_done: usize,
}

impl FlowSimulation {
    /// Validates the configuration and performs the one-time setup: grid
    /// classification, constraint assembly and the dense projection build.
    pub fn new(config: FlowConfig) -> Result<Self> {
        let grid = config.grid()?;
        let mass = MassScaling::new(config.density, grid.dx(), grid.dy())?;
        let constraint =
            build_divergence_operator(&grid).context("Failed to assemble divergence operator")?;
        let projection = build_projection_operators(&constraint, &mass, config.pinv_tolerance)
            .context("Failed to build projection operators")?;
        let forcing_params = ForcingParams {
            density: config.density,
            kinematic_viscosity: config.kinematic_viscosity(),
            lid_speed: config.lid_speed,
        };

        let n_dof = grid.num_dof();
        Ok(Self {
            config,
            grid,
            mass,
            constraint,
            projection,
            forcing_params,
            velocity: vec![0.0; n_dof],
            forcing: vec![0.0; n_dof],
            steps_done: 0,
        })
    }

    pub fn grid(&self) -> &CavityGrid {
        &self.grid
    }

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    pub fn constraint(&self) -> &CsrMatrix<f64> {
        &self.constraint
    }

    pub fn projection(&self) -> &ProjectionOperators {
        &self.projection
    }

    pub fn mass(&self) -> &MassScaling {
        &self.mass
    }

    /// Current velocity field (interleaved u, v).
    pub fn velocity(&self) -> &[f64] {
        &self.velocity
    }

    /// Number of steps taken so far.
    pub fn steps_done(&self) -> usize {
        self.steps_done
    }

    /// Replaces the velocity field, e.g. to start from a manufactured state.
    pub fn set_velocity(&mut self, velocity: &[f64]) -> Result<()> {
        anyhow::ensure!(
            velocity.len() == self.grid.num_dof(),
            "Velocity vector has {} entries, grid needs {}",
            velocity.len(),
            self.grid.num_dof()
        );
        self.velocity.copy_from_slice(velocity);
        Ok(())
    }

    /// Advances one step and returns the Appellian of that step.
    pub fn step(&mut self) -> Result<f64> {
        // Acceleration comes from the field as it stands at the start of
        // the step; the forcing buffer still holds that assembly.
        assemble_forcing(
            &self.grid,
            &self.forcing_params,
            &self.velocity,
            &mut self.forcing,
        )?;
        let solved =
            solve_constrained_acceleration(&self.forcing, &self.mass, &self.projection)?;

        let dt = self.config.dt;
        for (v, a) in self.velocity.iter_mut().zip(solved.acceleration.iter()) {
            *v += dt * a;
        }
        self.steps_done += 1;
        Ok(solved.appellian)
    }

    /// Runs the configured number of steps, feeding every decimated snapshot
    /// to `sink` and returning the Appellian series.
    pub fn march<S: SnapshotSink>(&mut self, sink: &mut S) -> Result<Vec<f64>> {
        let n_steps = self.config.n_steps;
        let interval = self.config.save_interval;
        let mut series = Vec::with_capacity(n_steps);

        for step in 1..=n_steps {
            let appellian = self.step()?;
            series.push(appellian);
            if interval > 0 && step % interval == 0 {
                let time = step as f64 * self.config.dt;
                sink.record(step, time, &self.velocity)?;
            }
        }
        Ok(series)
    }
}

/// Runs a full case from a configuration and returns the consolidated
/// record: config echo, decimated snapshots and the Appellian series.
pub fn run_case(config: FlowConfig) -> Result<CaseResult> {
    let mut sim = FlowSimulation::new(config.clone())?;
    let mut recorder = SnapshotRecorder::new();
    let series = sim.march(&mut recorder)?;
    for value in series {
        recorder.push_appellian(value);
    }
    Ok(recorder.finalize(config))
}
