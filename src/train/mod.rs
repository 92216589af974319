pub mod epoch_stats;
pub mod train_config;
pub mod loop_fn;
pub mod session;

pub use epoch_stats::EpochStats;
pub use train_config::TrainConfig;
pub use session::TrainingSession;
