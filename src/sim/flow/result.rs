use serde::{Deserialize, Serialize};

use super::config::FlowConfig;

/// One saved velocity field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VelocitySnapshot {
    /// 1-based step number the snapshot was taken after.
    pub step: usize,
    /// Simulated time in s.
    pub time: f64,
    /// Interleaved (u, v) pairs, length 2N.
    pub velocity: Vec<f64>,
}

impl VelocitySnapshot {
    /// Largest speed magnitude over all grid points, in m/s.
    pub fn max_speed(&self) -> f64 {
        self.velocity
            .chunks_exact(2)
            .map(|p| (p[0] * p[0] + p[1] * p[1]).sqrt())
            .fold(0.0, f64::max)
    }

    /// Kinetic energy of the field for a uniform node mass, in J.
    pub fn kinetic_energy(&self, node_mass: f64) -> f64 {
        0.5 * node_mass
            * self
                .velocity
                .chunks_exact(2)
                .map(|p| p[0] * p[0] + p[1] * p[1])
                .sum::<f64>()
    }
}

/// Consolidated record of a finished run: the configuration used, every
/// saved snapshot indexable by step number, and the full Appellian series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseResult {
    pub config: FlowConfig,
    pub snapshots: Vec<VelocitySnapshot>,
    /// One Appellian value per step, 1..n_steps.
    pub appellian: Vec<f64>,
}

impl CaseResult {
    /// Looks up a saved snapshot by its step number.
    pub fn snapshot_at_step(&self, step: usize) -> Option<&VelocitySnapshot> {
        self.snapshots.iter().find(|s| s.step == step)
    }

    /// Appellian of the final step, if any steps ran.
    pub fn final_appellian(&self) -> Option<f64> {
        self.appellian.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> VelocitySnapshot {
        VelocitySnapshot {
            step: 10,
            time: 0.01,
            velocity: vec![3.0, 4.0, 0.0, 0.0],
        }
    }

    #[test]
    fn test_max_speed() {
        assert!((snapshot().max_speed() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_kinetic_energy() {
        // 0.5 * m * (3^2 + 4^2)
        assert!((snapshot().kinetic_energy(2.0) - 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_snapshot_lookup() {
        let result = CaseResult {
            config: FlowConfig::new(),
            snapshots: vec![snapshot()],
            appellian: vec![0.5, 0.25],
        };
        assert!(result.snapshot_at_step(10).is_some());
        assert!(result.snapshot_at_step(11).is_none());
        assert_eq!(result.final_appellian(), Some(0.25));
    }
}
