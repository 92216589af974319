use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::Result;
use crate::layers::activation_layer::ActivationLayer;
use crate::layers::dense::FullyConnectedLayer;
use crate::math::matrix::Matrix;

/// One stage of the network pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Layer {
    FullyConnected(FullyConnectedLayer),
    Activation(ActivationLayer),
}

impl Layer {
    pub fn fully_connected(input_size: usize, output_size: usize) -> Layer {
        Layer::FullyConnected(FullyConnectedLayer::new(input_size, output_size))
    }

    pub fn activation(activation: ActivationFunction) -> Layer {
        Layer::Activation(ActivationLayer::new(activation))
    }

    pub fn forward_propagate(&mut self, input: &Matrix) -> Result<Matrix> {
        match self {
            Layer::FullyConnected(layer) => layer.forward_propagate(input),
            Layer::Activation(layer) => Ok(layer.forward_propagate(input)),
        }
    }

    /// Activation layers ignore `learning_rate`.
    pub fn backward_propagate(&mut self, output_error: &Matrix, learning_rate: f64) -> Result<Matrix> {
        match self {
            Layer::FullyConnected(layer) => layer.backward_propagate(output_error, learning_rate),
            Layer::Activation(layer) => layer.backward_propagate(output_error),
        }
    }

    pub fn as_fully_connected(&self) -> Option<&FullyConnectedLayer> {
        match self {
            Layer::FullyConnected(layer) => Some(layer),
            Layer::Activation(_) => None,
        }
    }

    pub fn is_fully_connected(&self) -> bool {
        matches!(self, Layer::FullyConnected(_))
    }

    pub fn input(&self) -> Option<&Matrix> {
        match self {
            Layer::FullyConnected(layer) => layer.input(),
            Layer::Activation(layer) => layer.input(),
        }
    }

    pub fn output(&self) -> Option<&Matrix> {
        match self {
            Layer::FullyConnected(layer) => layer.output(),
            Layer::Activation(layer) => layer.output(),
        }
    }
}

impl From<FullyConnectedLayer> for Layer {
    fn from(layer: FullyConnectedLayer) -> Self {
        Layer::FullyConnected(layer)
    }
}

impl From<ActivationLayer> for Layer {
    fn from(layer: ActivationLayer) -> Self {
        Layer::Activation(layer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn dispatch_reaches_both_variants() {
        let mut dense = Layer::fully_connected(2, 3);
        let mut act = Layer::activation(ActivationFunction::Sigmoid);

        let hidden = dense.forward_propagate(&Matrix::row(vec![1.0, -1.0]).unwrap()).unwrap();
        let out = act.forward_propagate(&hidden).unwrap();
        assert_eq!(out.dims(), (1, 3));
        assert!(out.data()[0].iter().all(|&y| y > 0.0 && y < 1.0));

        let err = act.backward_propagate(&Matrix::ones(1, 3), 0.5).unwrap();
        let upstream = dense.backward_propagate(&err, 0.5).unwrap();
        assert_eq!(upstream.dims(), (1, 2));
    }

    #[test]
    fn backward_without_forward_is_rejected_for_every_variant() {
        for mut layer in [Layer::fully_connected(1, 1), Layer::activation(ActivationFunction::Linear)] {
            assert!(matches!(
                layer.backward_propagate(&Matrix::ones(1, 1), 0.1),
                Err(Error::NotPropagated)
            ));
        }
    }

    #[test]
    fn serialized_layers_are_tagged_and_drop_caches() {
        let mut layer = Layer::fully_connected(1, 2);
        layer.forward_propagate(&Matrix::ones(1, 1)).unwrap();
        let json = serde_json::to_string(&layer).unwrap();
        assert!(json.contains("\"type\":\"fully_connected\""));

        let restored: Layer = serde_json::from_str(&json).unwrap();
        assert!(restored.is_fully_connected());
        assert!(restored.input().is_none());
        let (a, b) = match (restored.as_fully_connected(), layer.as_fully_connected()) {
            (Some(a), Some(b)) => (a, b),
            _ => panic!("expected dense layers"),
        };
        assert_eq!(a.weights.dims(), (1, 2));
        for (x, y) in a.weights.data()[0].iter().zip(&b.weights.data()[0]) {
            assert!((x - y).abs() < 1e-12);
        }
    }
}
