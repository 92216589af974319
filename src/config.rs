use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::dataset::features::Feature;
use crate::dataset::generators::DatasetKind;
use crate::dataset::point::PointColor;
use crate::error::{Error, Result};
use crate::layers::layer::Layer;
use crate::loss::loss_type::LossType;
use crate::network::network::Network;
use crate::network::topology::MAX_NODES;
use crate::train::train_config::TrainConfig;

/// Grid density of the decision-boundary heat map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    Low,
    Regular,
    High,
}

impl Resolution {
    pub fn cells(&self) -> usize {
        match self {
            Resolution::Low => 75,
            Resolution::Regular => 100,
            Resolution::High => 125,
        }
    }
}

/// One playground session: the data, the architecture and how to train it.
///
/// Every field has a default, so a JSON file only needs the fields it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaygroundConfig {
    pub dataset: DatasetKind,
    /// Number of generated points; `None` uses the dataset's usual size.
    pub dataset_size: Option<usize>,
    /// Number of labels, between 2 and the size of the color palette.
    pub outputs: usize,
    pub features: Vec<Feature>,
    pub hidden_layers: Vec<usize>,
    pub activation: ActivationFunction,
    pub loss: LossType,
    pub learning_rate: f64,
    pub epochs: usize,
    pub resolution: Resolution,
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        PlaygroundConfig {
            dataset: DatasetKind::Bunches,
            dataset_size: None,
            outputs: 2,
            features: vec![Feature::X, Feature::Y],
            hidden_layers: vec![5],
            activation: ActivationFunction::Tanh,
            loss: LossType::Mse,
            learning_rate: 0.3,
            epochs: 100,
            resolution: Resolution::Regular,
        }
    }
}

impl PlaygroundConfig {
    pub fn validate(&self) -> Result<()> {
        if self.outputs < 2 || self.outputs > PointColor::ALL.len() {
            return Err(Error::Config(format!(
                "outputs must be between 2 and {}, got {}",
                PointColor::ALL.len(),
                self.outputs
            )));
        }
        if self.features.is_empty() {
            return Err(Error::Config("at least one feature must be selected".into()));
        }
        if let Some(width) = self.hidden_layers.iter().find(|&&w| w == 0 || w > MAX_NODES) {
            return Err(Error::Config(format!(
                "hidden layer width must be between 1 and {MAX_NODES}, got {width}"
            )));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(Error::Config(format!("learning rate must be positive, got {}", self.learning_rate)));
        }
        Ok(())
    }

    pub fn dataset_size(&self) -> usize {
        self.dataset_size.unwrap_or_else(|| self.dataset.default_size())
    }

    pub fn train_config(&self) -> TrainConfig {
        TrainConfig::new(self.epochs, self.learning_rate)
    }

    /// Dense+activation pairs from the selected features through the hidden
    /// layers to the outputs, with loss and activation configured.
    pub fn build_network(&self) -> Result<Network> {
        self.validate()?;

        let widths: Vec<usize> = std::iter::once(self.features.len())
            .chain(self.hidden_layers.iter().copied())
            .chain(std::iter::once(self.outputs))
            .collect();

        let mut network = Network::new();
        for pair in widths.windows(2) {
            network.add(Layer::fully_connected(pair[0], pair[1]));
            network.add(Layer::activation(self.activation));
        }
        network.use_loss(self.loss);
        network.activate(self.activation);
        Ok(network)
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<PlaygroundConfig> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let config: PlaygroundConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_playground_network() {
        let config = PlaygroundConfig::default();
        let net = config.build_network().unwrap();
        assert_eq!(net.widths(), vec![2, 5, 2]);
        assert_eq!(net.layers().len(), 4);
        assert_eq!(net.loss(), Some(LossType::Mse));
        assert_eq!(net.activation(), Some(ActivationFunction::Tanh));
        assert_eq!(config.dataset_size(), 200);
        assert_eq!(config.resolution.cells(), 100);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: PlaygroundConfig = serde_json::from_str(
            r#"{ "dataset": "circles", "outputs": 3, "features": ["x^2", "y^2"], "activation": "relu" }"#,
        ).unwrap();
        assert_eq!(config.dataset, DatasetKind::Circles);
        assert_eq!(config.dataset_size(), 300);
        assert_eq!(config.hidden_layers, vec![5]);
        assert_eq!(config.learning_rate, 0.3);
        assert_eq!(config.build_network().unwrap().widths(), vec![2, 5, 3]);
    }

    #[test]
    fn validation_rejects_bad_values() {
        let bad = [
            PlaygroundConfig { outputs: 1, ..Default::default() },
            PlaygroundConfig { outputs: 7, ..Default::default() },
            PlaygroundConfig { features: vec![], ..Default::default() },
            PlaygroundConfig { hidden_layers: vec![4, 0], ..Default::default() },
            PlaygroundConfig { learning_rate: 0.0, ..Default::default() },
        ];
        for config in bad {
            assert!(matches!(config.validate(), Err(Error::Config(_))), "{config:?}");
        }
    }

    #[test]
    fn json_file_round_trip() {
        let path = std::env::temp_dir().join(format!("playground-config-{}.json", std::process::id()));
        let config = PlaygroundConfig {
            dataset: DatasetKind::Waves,
            hidden_layers: vec![4, 3],
            resolution: Resolution::High,
            ..Default::default()
        };
        config.save_json(&path).unwrap();
        assert_eq!(PlaygroundConfig::load_json(&path).unwrap(), config);
        let _ = std::fs::remove_file(&path);
    }
}
