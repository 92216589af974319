//! Structural edits of a network laid out as `FC, Act, FC, Act, ..., FC, Act`.
//!
//! Every edit swaps whole `(FullyConnected, Activation)` pairs so that each
//! dense layer's input width keeps matching its upstream neighbour's output
//! width. Layers created here get fresh random parameters; learned weights of
//! replaced layers are discarded.

use tracing::debug;

use crate::error::{Error, Result};
use crate::layers::dense::FullyConnectedLayer;
use crate::layers::layer::Layer;
use crate::network::network::Network;

/// `add_fc_layer` refuses to grow a network that already has more layers.
pub const MAX_LAYERS: usize = 32;
/// `remove_fc_layer` keeps at least one hidden pair.
pub const MIN_LAYERS_FOR_REMOVAL: usize = 6;
/// Widest hidden layer reachable through `edit_fc_layer`.
pub const MAX_NODES: usize = 13;

impl Network {
    /// Inserts a square hidden pair just before the output pair.
    ///
    /// Returns `Ok(false)` without touching the network when no activation is
    /// configured or the network already has more than `MAX_LAYERS` layers.
    pub fn add_fc_layer(&mut self) -> Result<bool> {
        let Some(activation) = self.activation else { return Ok(false) };
        self.check_pairs()?;

        let len = self.layers.len();
        if len > MAX_LAYERS {
            return Ok(false);
        }

        let width = self.dense_at(len - 2)?.input_size;
        self.layers.splice(
            len - 2..len - 2,
            [Layer::fully_connected(width, width), Layer::activation(activation)],
        );
        self.touch();
        debug!(width, layers = self.layers.len(), "hidden layer added");
        Ok(true)
    }

    /// Removes the last hidden pair.
    ///
    /// The output layer is rebuilt when its input width no longer matches
    /// the layer that now feeds it.
    pub fn remove_fc_layer(&mut self) -> Result<bool> {
        if self.activation.is_none() {
            return Ok(false);
        }
        self.check_pairs()?;

        let len = self.layers.len();
        if len < MIN_LAYERS_FOR_REMOVAL {
            return Ok(false);
        }

        self.layers.drain(len - 4..len - 2);

        let len = self.layers.len();
        let upstream = self.dense_at(len - 4)?.output_size;
        let output = self.dense_at(len - 2)?;
        if output.input_size != upstream {
            let output_size = output.output_size;
            self.layers[len - 2] = Layer::fully_connected(upstream, output_size);
        }

        self.touch();
        debug!(layers = self.layers.len(), "hidden layer removed");
        Ok(true)
    }

    /// Changes the width of dense layer `index` by `node_delta`.
    ///
    /// Dense layers `index` and `index + 1` are replaced by fresh layers of
    /// the new shape, each followed by a fresh activation layer. `index`
    /// counts dense layers only and must not name the output layer.
    /// Growing past `MAX_NODES` or shrinking below one node is a no-op.
    pub fn edit_fc_layer(&mut self, index: usize, node_delta: isize) -> Result<bool> {
        let Some(activation) = self.activation else { return Ok(false) };
        self.check_pairs()?;

        let (upstream_idx, downstream_idx) = match index.checked_mul(2) {
            Some(up) if up < self.layers.len().saturating_sub(2) => (up, up + 2),
            _ => {
                return Err(Error::Topology(format!(
                    "dense layer {index} has no downstream dense layer (network has {} dense layers)",
                    self.layers.len() / 2
                )))
            }
        };

        let edited = self.dense_at(upstream_idx)?;
        let (input_size, current) = (edited.input_size, edited.output_size);
        let output_size = self.dense_at(downstream_idx)?.output_size;

        let changed = match current.checked_add_signed(node_delta) {
            Some(n) if n >= 1 && (node_delta <= 0 || n <= MAX_NODES) => n,
            _ => return Ok(false),
        };

        self.layers.splice(
            upstream_idx..downstream_idx + 2,
            [
                Layer::fully_connected(input_size, changed),
                Layer::activation(activation),
                Layer::fully_connected(changed, output_size),
                Layer::activation(activation),
            ],
        );
        self.touch();
        debug!(index, from = current, to = changed, "hidden layer resized");
        Ok(true)
    }

    /// Rebuilds the first dense layer for `input_size` features.
    pub fn set_input_size(&mut self, input_size: usize) -> Result<()> {
        check_width("input", input_size)?;
        self.check_pairs()?;
        let output_size = self.dense_at(0)?.output_size;
        self.layers[0] = Layer::fully_connected(input_size, output_size);
        self.touch();
        Ok(())
    }

    /// Rebuilds the output dense layer for `output_size` labels.
    pub fn set_output_size(&mut self, output_size: usize) -> Result<()> {
        check_width("output", output_size)?;
        self.check_pairs()?;
        let idx = self.layers.len() - 2;
        let input_size = self.dense_at(idx)?.input_size;
        self.layers[idx] = Layer::fully_connected(input_size, output_size);
        self.touch();
        Ok(())
    }

    /// Every dense layer except the output layer.
    pub fn fc_layers(&self) -> Vec<&FullyConnectedLayer> {
        let mut dense: Vec<&FullyConnectedLayer> = self.layers.iter()
            .filter_map(Layer::as_fully_connected)
            .collect();
        dense.pop();
        dense
    }

    /// Widths along the pipeline: input features, each hidden layer, outputs.
    pub fn widths(&self) -> Vec<usize> {
        let dense: Vec<&FullyConnectedLayer> = self.layers.iter()
            .filter_map(Layer::as_fully_connected)
            .collect();
        match dense.first() {
            Some(first) => std::iter::once(first.input_size)
                .chain(dense.iter().map(|l| l.output_size))
                .collect(),
            None => Vec::new(),
        }
    }

    fn dense_at(&self, idx: usize) -> Result<&FullyConnectedLayer> {
        self.layers.get(idx)
            .and_then(Layer::as_fully_connected)
            .ok_or_else(|| Error::Topology(format!("layer {idx} is not a fully connected layer")))
    }

    fn check_pairs(&self) -> Result<()> {
        if self.layers.is_empty() || self.layers.len() % 2 != 0 {
            return Err(Error::Topology(format!(
                "expected (fully connected, activation) pairs, found {} layers",
                self.layers.len()
            )));
        }
        for (i, layer) in self.layers.iter().enumerate() {
            if layer.is_fully_connected() != (i % 2 == 0) {
                return Err(Error::Topology(format!("layer {i} breaks the dense/activation alternation")));
            }
        }
        Ok(())
    }
}

fn check_width(side: &str, width: usize) -> Result<()> {
    if width == 0 {
        return Err(Error::Topology(format!("{side} width must be at least 1")));
    }
    Ok(())
}
