pub mod error;
pub mod math;
pub mod activation;
pub mod layers;
pub mod loss;
pub mod network;
pub mod train;
pub mod dataset;
pub mod heatmap;
pub mod config;

// Convenience re-exports
pub use error::{Error, Result};
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use layers::{ActivationLayer, FullyConnectedLayer, Layer};
pub use loss::loss_type::LossType;
pub use network::network::{Network, StopHandle};
pub use train::{EpochStats, TrainConfig, TrainingSession};
pub use dataset::{DatasetKind, Feature, Point, PointColor};
pub use config::{PlaygroundConfig, Resolution};
