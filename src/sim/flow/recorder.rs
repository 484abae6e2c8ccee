use anyhow::{Result, ensure};

use super::config::FlowConfig;
use super::result::{CaseResult, VelocitySnapshot};

/// Collaborator interface the time marcher persists snapshots through.
///
/// The marcher calls `record` once per saved step with the field as it
/// stands after that step; implementations decide what to keep.
pub trait SnapshotSink {
    fn record(&mut self, step: usize, time: f64, velocity: &[f64]) -> Result<()>;
}

/// Discards every snapshot. Useful when only the Appellian series matters.
#[derive(Debug, Default)]
pub struct NullSink;

impl SnapshotSink for NullSink {
    fn record(&mut self, _step: usize, _time: f64, _velocity: &[f64]) -> Result<()> {
        Ok(())
    }
}

/// In-memory recorder that accumulates snapshots and the Appellian series
/// and finalizes them into a [`CaseResult`].
#[derive(Debug, Default)]
pub struct SnapshotRecorder {
    snapshots: Vec<VelocitySnapshot>,
    appellian: Vec<f64>,
    expected_dof: Option<usize>,
}

impl SnapshotRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one Appellian sample; called every step.
    pub fn push_appellian(&mut self, value: f64) {
        self.appellian.push(value);
    }

    /// Number of snapshots recorded so far.
    pub fn num_snapshots(&self) -> usize {
        self.snapshots.len()
    }

    /// Consumes the recorder into the consolidated case record.
    pub fn finalize(self, config: FlowConfig) -> CaseResult {
        CaseResult {
            config,
            snapshots: self.snapshots,
            appellian: self.appellian,
        }
    }
}

impl SnapshotSink for SnapshotRecorder {
    fn record(&mut self, step: usize, time: f64, velocity: &[f64]) -> Result<()> {
        match self.expected_dof {
            None => self.expected_dof = Some(velocity.len()),
            Some(n) => ensure!(
                velocity.len() == n,
                "Snapshot at step {step} has {} entries, earlier snapshots had {n}",
                velocity.len()
            ),
        }
        self.snapshots.push(VelocitySnapshot {
            step,
            time,
            velocity: velocity.to_vec(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_accumulates() {
        let mut rec = SnapshotRecorder::new();
        rec.record(5, 0.005, &[1.0, 2.0]).unwrap();
        rec.record(10, 0.01, &[3.0, 4.0]).unwrap();
        rec.push_appellian(0.1);
        rec.push_appellian(0.2);
        assert_eq!(rec.num_snapshots(), 2);

        let result = rec.finalize(FlowConfig::new());
        assert_eq!(result.snapshots.len(), 2);
        assert_eq!(result.appellian, vec![0.1, 0.2]);
        assert_eq!(result.snapshot_at_step(10).unwrap().velocity, vec![3.0, 4.0]);
    }

    #[test]
    fn test_recorder_rejects_inconsistent_lengths() {
        let mut rec = SnapshotRecorder::new();
        rec.record(1, 0.0, &[1.0, 2.0]).unwrap();
        assert!(rec.record(2, 0.0, &[1.0]).is_err());
    }

    #[test]
    fn test_null_sink_accepts_everything() {
        let mut sink = NullSink;
        assert!(sink.record(1, 0.0, &[0.0; 8]).is_ok());
    }
}
