use serde::{Serialize, Deserialize};

/// Statistics of one finished epoch, streamed by `TrainingSession`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// Value of the network's epoch counter after this epoch (1-based).
    pub epoch: usize,
    /// Epochs requested for this run.
    pub total_epochs: usize,
    /// Mean loss over all samples in this epoch.
    pub error: f64,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}
