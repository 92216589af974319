use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Affine layer `output = input · weights + bias`.
///
/// `weights` is `input_size × output_size`, `bias` is `1 × output_size`.
/// Both start uniform in `[-0.5, 0.5)` and are updated in place by plain
/// gradient descent during the backward pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullyConnectedLayer {
    pub input_size: usize,
    pub output_size: usize,
    pub weights: Matrix,
    pub bias: Matrix,
    #[serde(skip)]
    input: Option<Matrix>,
    #[serde(skip)]
    output: Option<Matrix>,
}

impl FullyConnectedLayer {
    pub fn new(input_size: usize, output_size: usize) -> FullyConnectedLayer {
        FullyConnectedLayer::with_rng(&mut rand::thread_rng(), input_size, output_size)
    }

    pub fn with_rng<R: Rng + ?Sized>(rng: &mut R, input_size: usize, output_size: usize) -> FullyConnectedLayer {
        FullyConnectedLayer {
            input_size,
            output_size,
            weights: Matrix::random_with(rng, input_size, output_size).sub_scalar(0.5),
            bias: Matrix::random_with(rng, 1, output_size).sub_scalar(0.5),
            input: None,
            output: None,
        }
    }

    /// Draws fresh weights and bias of the same shape and forgets the
    /// cached forward pass.
    pub fn reinitialize(&mut self) {
        *self = FullyConnectedLayer::new(self.input_size, self.output_size);
    }

    pub fn forward_propagate(&mut self, input: &Matrix) -> Result<Matrix> {
        let output = input.mul_matrix(&self.weights)?.add_matrix(&self.bias, Some(0))?;
        self.input = Some(input.clone());
        self.output = Some(output.clone());
        Ok(output)
    }

    /// Returns ∂L/∂input and applies one gradient-descent step to the
    /// weights and bias.
    pub fn backward_propagate(&mut self, output_error: &Matrix, learning_rate: f64) -> Result<Matrix> {
        let (input, _) = match (&self.input, &self.output) {
            (Some(input), Some(output)) => (input, output),
            _ => return Err(Error::NotPropagated),
        };

        let input_error = output_error.mul_matrix(&self.weights.transpose())?;
        let weights_error = input.transpose().mul_matrix(output_error)?;

        // A batch contributes the sum of its rows to the bias gradient.
        let bias_error = output_error.sum_rows();

        let weights = self.weights.sub_matrix(&weights_error.mul_scalar(learning_rate), None)?;
        let bias = self.bias.sub_matrix(&bias_error.mul_scalar(learning_rate), None)?;
        self.weights = weights;
        self.bias = bias;

        Ok(input_error)
    }

    /// Checks that `weights` and `bias` agree with the declared sizes.
    pub fn check_shape(&self) -> Result<()> {
        let declared = (self.input_size, self.output_size);
        if self.weights.dims() != declared {
            return Err(Error::DimensionMismatch { op: "weights", left: self.weights.dims(), right: declared });
        }
        if self.bias.dims() != (1, self.output_size) {
            return Err(Error::DimensionMismatch { op: "bias", left: self.bias.dims(), right: (1, self.output_size) });
        }
        Ok(())
    }

    pub fn input(&self) -> Option<&Matrix> {
        self.input.as_ref()
    }

    pub fn output(&self) -> Option<&Matrix> {
        self.output.as_ref()
    }
}
