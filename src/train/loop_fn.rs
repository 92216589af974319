use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::math::matrix::Matrix;
use crate::network::network::Network;

impl Network {
    /// Trains with per-sample gradient descent and returns the mean error of
    /// the last completed epoch.
    pub fn fit(
        &mut self,
        x_train: &[Matrix],
        y_train: &[Matrix],
        epochs: usize,
        learning_rate: f64,
    ) -> Result<f64> {
        self.fit_with(x_train, y_train, epochs, learning_rate, |_| {})
    }

    /// Like `fit`, calling `on_epoch` after every completed epoch.
    ///
    /// The next epoch only starts once `on_epoch` returns, and only while the
    /// training flag is still set, so `on_epoch` (or a `StopHandle` held
    /// elsewhere) can cancel the run between epochs. Cancellation is
    /// epoch-granular: a started epoch always runs over every sample.
    ///
    /// Nothing is mutated when the loss is missing or the data is
    /// inconsistent.
    pub fn fit_with<F>(
        &mut self,
        x_train: &[Matrix],
        y_train: &[Matrix],
        epochs: usize,
        learning_rate: f64,
        on_epoch: F,
    ) -> Result<f64>
    where
        F: FnMut(&mut Network),
    {
        self.training.start();
        self.run_epochs(x_train, y_train, epochs, learning_rate, on_epoch)
    }

    /// Epoch loop for a network whose training flag has already been raised.
    /// The training set is checked here, so both `fit_with` and background
    /// sessions reject bad data before any layer is touched.
    pub(crate) fn run_epochs<F>(
        &mut self,
        x_train: &[Matrix],
        y_train: &[Matrix],
        epochs: usize,
        learning_rate: f64,
        mut on_epoch: F,
    ) -> Result<f64>
    where
        F: FnMut(&mut Network),
    {
        if let Err(e) = self.validate_training_set(x_train, y_train) {
            self.training.stop();
            return Err(e);
        }

        let samples = x_train.len();
        info!(samples, epochs, learning_rate, loss = ?self.loss, "training started");

        for _ in 0..epochs {
            if !self.training.is_running() {
                info!(epoch = self.epoch, "training stopped");
                return Ok(self.error);
            }

            let mut total_loss = 0.0;
            for (input, expected) in x_train.iter().zip(y_train) {
                if let Err(e) = self.train_sample(input, expected, learning_rate, &mut total_loss) {
                    self.training.stop();
                    return Err(e);
                }
            }

            self.error = total_loss / samples as f64;
            self.epoch += 1;
            debug!(epoch = self.epoch, error = self.error, "epoch complete");

            on_epoch(self);
        }

        self.training.stop();
        info!(epoch = self.epoch, error = self.error, "training finished");
        Ok(self.error)
    }

    fn validate_training_set(&self, x_train: &[Matrix], y_train: &[Matrix]) -> Result<()> {
        if self.loss.is_none() {
            return Err(Error::NoLossConfigured);
        }
        if x_train.len() != y_train.len() {
            return Err(Error::SampleCountMismatch { inputs: x_train.len(), labels: y_train.len() });
        }
        if x_train.is_empty() {
            return Err(Error::EmptyTrainingSet);
        }
        Ok(())
    }

    /// Forward pass, loss accumulation, then the backward pass through the
    /// layers in reverse order.
    fn train_sample(
        &mut self,
        input: &Matrix,
        expected: &Matrix,
        learning_rate: f64,
        total_loss: &mut f64,
    ) -> Result<()> {
        let loss = self.loss.ok_or(Error::NoLossConfigured)?;
        let output = self.forward(input)?;

        *total_loss += loss.loss(expected, &output)?;

        let mut error = loss.derivative(expected, &output)?;
        for layer in self.layers.iter_mut().rev() {
            error = layer.backward_propagate(&error, learning_rate)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation::ActivationFunction;
    use crate::layers::layer::Layer;
    use crate::loss::loss_type::LossType;

    fn xor() -> (Vec<Matrix>, Vec<Matrix>) {
        let x = [[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]]
            .iter()
            .map(|r| Matrix::row(r.to_vec()).unwrap())
            .collect();
        let y = [0.0, 1.0, 1.0, 0.0]
            .iter()
            .map(|&v| Matrix::row(vec![v]).unwrap())
            .collect();
        (x, y)
    }

    fn xor_network() -> Network {
        let mut net = Network::new();
        net.add(Layer::fully_connected(2, 3));
        net.add(Layer::activation(ActivationFunction::Tanh));
        net.add(Layer::fully_connected(3, 1));
        net.add(Layer::activation(ActivationFunction::Tanh));
        net
    }

    #[test]
    fn fit_without_loss_fails_and_leaves_layers_alone() {
        let (x, y) = xor();
        let mut net = xor_network();
        let before = serde_json::to_string(net.layers()).unwrap();

        let err = net.fit(&x, &y, 10, 0.1).unwrap_err();

        assert!(matches!(err, Error::NoLossConfigured));
        assert_eq!(serde_json::to_string(net.layers()).unwrap(), before);
        assert_eq!(net.epoch(), 0);
        assert!(net.layers().iter().all(|l| l.input().is_none()));
    }

    #[test]
    fn fit_validates_sample_counts() {
        let (x, y) = xor();
        let mut net = xor_network();
        net.use_loss(LossType::Mse);
        assert!(matches!(
            net.fit(&x, &y[..3], 1, 0.1),
            Err(Error::SampleCountMismatch { inputs: 4, labels: 3 })
        ));
        assert!(matches!(net.fit(&[], &[], 1, 0.1), Err(Error::EmptyTrainingSet)));
        assert!(!net.is_training());
        assert_eq!(net.epoch(), 0);
    }

    #[test]
    fn fit_counts_epochs_and_reports_each_one() {
        let (x, y) = xor();
        let mut net = xor_network();
        net.use_loss(LossType::Mse);

        let mut seen = Vec::new();
        let error = net.fit_with(&x, &y, 5, 0.1, |n| seen.push((n.epoch(), n.error()))).unwrap();

        assert_eq!(net.epoch(), 5);
        assert_eq!(seen.iter().map(|s| s.0).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
        assert_eq!(seen.last().map(|s| s.1), Some(error));
        assert!(!net.is_training());
    }

    #[test]
    fn stopping_from_the_callback_ends_after_current_epoch() {
        let (x, y) = xor();
        let mut net = xor_network();
        net.use_loss(LossType::Mse);

        net.fit_with(&x, &y, 100, 0.1, |n| {
            assert!(n.is_training());
            if n.epoch() == 3 {
                n.stop_training();
            }
        }).unwrap();

        assert_eq!(net.epoch(), 3);
    }

    #[test]
    fn training_reduces_error() {
        let (x, y) = xor();
        let mut net = xor_network();
        net.use_loss(LossType::Mse);

        net.fit(&x, &y, 1, 0.1).unwrap();
        let first = net.error();
        net.fit(&x, &y, 300, 0.1).unwrap();
        assert!(net.error() < first);
        assert_eq!(net.epoch(), 301);
    }

    #[test]
    fn shape_errors_surface_from_fit() {
        let mut net = xor_network();
        net.use_loss(LossType::Mse);
        let x = vec![Matrix::ones(1, 2)];
        let y = vec![Matrix::ones(1, 2)];
        assert!(matches!(net.fit(&x, &y, 1, 0.1), Err(Error::DimensionMismatch { .. })));
        assert!(!net.is_training());
    }
}
