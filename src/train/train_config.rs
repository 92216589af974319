use serde::{Serialize, Deserialize};

/// Hyperparameters of one `fit` run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub epochs: usize,
    pub learning_rate: f64,
}

impl TrainConfig {
    pub fn new(epochs: usize, learning_rate: f64) -> Self {
        TrainConfig { epochs, learning_rate }
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig { epochs: 100, learning_rate: 0.3 }
    }
}
