use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crate::error::{Error, Result};
use crate::math::matrix::Matrix;
use crate::network::network::{Network, StopHandle};
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;

/// A `fit` run on a background thread.
///
/// The network moves into the worker for the duration of the run. One
/// `EpochStats` is sent per completed epoch; dropping the receiver stops the
/// run after the current epoch, as does `stop()`.
pub struct TrainingSession {
    stop: StopHandle,
    progress: mpsc::Receiver<EpochStats>,
    worker: JoinHandle<(Network, Result<f64>)>,
}

impl TrainingSession {
    pub fn spawn(
        mut network: Network,
        x_train: Vec<Matrix>,
        y_train: Vec<Matrix>,
        config: TrainConfig,
    ) -> TrainingSession {
        let (tx, rx) = mpsc::channel::<EpochStats>();
        let stop = network.stop_handle();
        // Raised here rather than inside the worker so that a `stop()` issued
        // before the thread runs is never overwritten.
        stop.start();

        let worker = thread::spawn(move || {
            let mut t_start = Instant::now();
            let total_epochs = config.epochs;

            let result = network.run_epochs(&x_train, &y_train, config.epochs, config.learning_rate, |net| {
                let stats = EpochStats {
                    epoch: net.epoch(),
                    total_epochs,
                    error: net.error(),
                    elapsed_ms: t_start.elapsed().as_millis() as u64,
                };
                // If the receiver has been dropped, stop training.
                if tx.send(stats).is_err() {
                    net.stop_training();
                }
                t_start = Instant::now();
            });
            (network, result)
        });

        TrainingSession { stop, progress: rx, worker }
    }

    /// Requests cancellation before the next epoch.
    pub fn stop(&self) {
        self.stop.stop();
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Progress stream; ends when the worker finishes.
    pub fn progress(&self) -> &mpsc::Receiver<EpochStats> {
        &self.progress
    }

    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Waits for the worker and hands the network back with the run's outcome.
    pub fn join(self) -> Result<(Network, Result<f64>)> {
        self.worker
            .join()
            .map_err(|_| Error::WorkerPanicked)
    }
}
