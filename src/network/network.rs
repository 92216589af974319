use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::activation::activation::ActivationFunction;
use crate::error::{Error, Result};
use crate::layers::dense::FullyConnectedLayer;
use crate::layers::layer::Layer;
use crate::loss::loss_type::LossType;
use crate::math::matrix::Matrix;

/// Shared view of a network's training flag.
///
/// Clearing it cancels a running `fit` before its next epoch begins; an
/// epoch already in progress always completes.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(false, Ordering::Relaxed);
    }

    pub fn is_running(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub(crate) fn start(&self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

/// Ordered pipeline of layers plus the training state observed by the
/// playground: epoch counter, last epoch's mean error and the training flag.
///
/// The configured activation is what topology edits give to the layers
/// they create. `version` is bumped by every structural change so that
/// observers can detect edits without comparing layer lists.
#[derive(Debug, Serialize, Deserialize)]
pub struct Network {
    pub(crate) layers: Vec<Layer>,
    pub(crate) epoch: usize,
    pub(crate) error: f64,
    pub(crate) loss: Option<LossType>,
    pub(crate) activation: Option<ActivationFunction>,
    #[serde(skip)]
    pub(crate) training: StopHandle,
    #[serde(skip)]
    pub(crate) version: u64,
}

impl Network {
    pub fn new() -> Network {
        Network {
            layers: Vec::new(),
            epoch: 0,
            error: 0.0,
            loss: None,
            activation: None,
            training: StopHandle::default(),
            version: 0,
        }
    }

    /// Appends a layer. Width compatibility with the previous layer is the
    /// caller's responsibility.
    pub fn add(&mut self, layer: impl Into<Layer>) {
        self.layers.push(layer.into());
        self.touch();
    }

    pub fn use_loss(&mut self, loss: LossType) {
        self.loss = Some(loss);
        self.touch();
    }

    /// Sets the activation given to layers created by topology edits.
    pub fn activate(&mut self, activation: ActivationFunction) {
        self.activation = Some(activation);
        self.touch();
    }

    /// Runs one sample through every layer, caching each layer's input and output.
    pub fn forward(&mut self, input: &Matrix) -> Result<Matrix> {
        let mut current = input.clone();
        for layer in &mut self.layers {
            current = layer.forward_propagate(&current)?;
        }
        Ok(current)
    }

    /// Forward pass for each input. Weights are untouched; layer caches are not.
    pub fn predict(&mut self, inputs: &[Matrix]) -> Result<Vec<Matrix>> {
        inputs.iter().map(|input| self.forward(input)).collect()
    }

    /// Zeroes the counters, stops training and redraws every dense layer's
    /// parameters. The layer shapes stay as they are.
    pub fn reset(&mut self) {
        self.epoch = 0;
        self.error = 0.0;
        self.training.stop();
        for layer in &mut self.layers {
            if let Layer::FullyConnected(dense) = layer {
                dense.reinitialize();
            }
        }
        self.touch();
        debug!(layers = self.layers.len(), "network reset");
    }

    pub fn stop_training(&self) {
        self.training.stop();
    }

    /// Handle that can stop training from another thread.
    pub fn stop_handle(&self) -> StopHandle {
        self.training.clone()
    }

    pub fn is_training(&self) -> bool {
        self.training.is_running()
    }

    pub fn epoch(&self) -> usize {
        self.epoch
    }

    pub fn error(&self) -> f64 {
        self.error
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn loss(&self) -> Option<LossType> {
        self.loss
    }

    pub fn activation(&self) -> Option<ActivationFunction> {
        self.activation
    }

    pub(crate) fn touch(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    /// Serializes the network weights to a pretty-printed JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a network from a JSON file previously written by `save_json`.
    ///
    /// Every dense layer's parameters must match its declared sizes, and each
    /// dense layer must accept the previous one's output width.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Network> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let network: Network = serde_json::from_reader(reader)?;
        network.check_layers()?;
        Ok(network)
    }

    fn check_layers(&self) -> Result<()> {
        let mut upstream: Option<&FullyConnectedLayer> = None;
        for dense in self.layers.iter().filter_map(Layer::as_fully_connected) {
            dense.check_shape()?;
            if let Some(prev) = upstream {
                if prev.output_size != dense.input_size {
                    return Err(Error::DimensionMismatch {
                        op: "layer chain",
                        left: (prev.input_size, prev.output_size),
                        right: (dense.input_size, dense.output_size),
                    });
                }
            }
            upstream = Some(dense);
        }
        Ok(())
    }
}

impl Default for Network {
    fn default() -> Self {
        Network::new()
    }
}

/// Copies layers and configuration; the copy gets its own, stopped,
/// training flag.
impl Clone for Network {
    fn clone(&self) -> Self {
        Network {
            layers: self.layers.clone(),
            epoch: self.epoch,
            error: self.error,
            loss: self.loss,
            activation: self.activation,
            training: StopHandle::default(),
            version: self.version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_network() -> Network {
        let mut net = Network::new();
        net.add(Layer::fully_connected(2, 3));
        net.add(Layer::activation(ActivationFunction::Tanh));
        net.add(Layer::fully_connected(3, 1));
        net.add(Layer::activation(ActivationFunction::Tanh));
        net
    }

    fn dense_weights(net: &Network) -> Vec<Matrix> {
        net.layers().iter()
            .filter_map(Layer::as_fully_connected)
            .map(|l| l.weights.clone())
            .collect()
    }

    #[test]
    fn predict_returns_one_output_per_input() {
        let mut net = small_network();
        let inputs = vec![Matrix::row(vec![0.0, 1.0]).unwrap(), Matrix::row(vec![1.0, 1.0]).unwrap()];
        let outputs = net.predict(&inputs).unwrap();
        assert_eq!(outputs.len(), 2);
        assert!(outputs.iter().all(|o| o.dims() == (1, 1)));
        assert!(net.layers().iter().all(|l| l.output().is_some()));
    }

    #[test]
    fn predict_surfaces_dimension_mismatch() {
        let mut net = small_network();
        assert!(net.predict(&[Matrix::ones(1, 3)]).is_err());
    }

    #[test]
    fn reset_redraws_weights_but_keeps_shapes() {
        let mut net = small_network();
        net.epoch = 12;
        net.error = 0.4;
        let before = dense_weights(&net);

        net.reset();

        assert_eq!(net.epoch(), 0);
        assert_eq!(net.error(), 0.0);
        assert!(!net.is_training());
        let after = dense_weights(&net);
        assert_eq!(after.len(), before.len());
        for (a, b) in after.iter().zip(&before) {
            assert_eq!(a.dims(), b.dims());
            assert_ne!(a, b);
        }
    }

    #[test]
    fn structural_changes_bump_version() {
        let mut net = Network::new();
        let v0 = net.version();
        net.add(FullyConnectedLayer::new(1, 1));
        net.use_loss(LossType::Mse);
        net.activate(ActivationFunction::ReLU);
        assert_eq!(net.version(), v0 + 3);
        assert_eq!(net.loss(), Some(LossType::Mse));
        assert_eq!(net.activation(), Some(ActivationFunction::ReLU));
    }

    #[test]
    fn stop_handle_shares_the_training_flag() {
        let net = small_network();
        let handle = net.stop_handle();
        net.training.start();
        assert!(net.is_training());
        handle.stop();
        assert!(!net.is_training());
    }

    fn load_edited(net: &Network, name: &str, edit: impl FnOnce(&mut serde_json::Value)) -> Result<Network> {
        let mut value = serde_json::to_value(net).unwrap();
        edit(&mut value);
        let path = std::env::temp_dir().join(format!("playground-{name}-{}.json", std::process::id()));
        std::fs::write(&path, serde_json::to_string(&value).unwrap()).unwrap();
        let loaded = Network::load_json(&path);
        let _ = std::fs::remove_file(&path);
        loaded
    }

    #[test]
    fn load_accepts_what_save_wrote() {
        let net = small_network();
        let loaded = load_edited(&net, "intact", |_| {}).unwrap();
        assert_eq!(loaded.widths(), vec![2, 3, 1]);
        assert_eq!(loaded.layers().len(), net.layers().len());
    }

    #[test]
    fn load_rejects_sizes_that_disagree_with_weights() {
        let net = small_network();
        let result = load_edited(&net, "sizes", |v| v["layers"][0]["input_size"] = 5.into());
        assert!(matches!(result, Err(Error::DimensionMismatch { op: "weights", .. })));
    }

    #[test]
    fn load_rejects_layers_that_do_not_chain() {
        let net = small_network();
        let result = load_edited(&net, "chain", |v| {
            let wide = FullyConnectedLayer::new(4, 1);
            v["layers"][2]["input_size"] = 4.into();
            v["layers"][2]["weights"] = serde_json::to_value(&wide.weights).unwrap();
        });
        assert!(matches!(result, Err(Error::DimensionMismatch { op: "layer chain", .. })));
    }

    #[test]
    fn clone_has_independent_training_flag() {
        let net = small_network();
        net.training.start();
        let copy = net.clone();
        assert!(!copy.is_training());
        assert_eq!(copy.layers().len(), net.layers().len());
    }
}
