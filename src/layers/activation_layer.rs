use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Stateless element-wise nonlinearity between two dense layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivationLayer {
    pub activation: ActivationFunction,
    #[serde(skip)]
    input: Option<Matrix>,
    #[serde(skip)]
    output: Option<Matrix>,
}

impl ActivationLayer {
    pub fn new(activation: ActivationFunction) -> ActivationLayer {
        ActivationLayer { activation, input: None, output: None }
    }

    pub fn forward_propagate(&mut self, input: &Matrix) -> Matrix {
        let output = self.activation.apply(input);
        self.input = Some(input.clone());
        self.output = Some(output.clone());
        output
    }

    /// Chain rule: `activation'(input) ⊙ output_error`. No parameters to learn.
    pub fn backward_propagate(&self, output_error: &Matrix) -> Result<Matrix> {
        match (&self.input, &self.output) {
            (Some(input), Some(_)) => self.activation.apply_prime(input).mul_matrix_elem(output_error),
            _ => Err(Error::NotPropagated),
        }
    }

    pub fn input(&self) -> Option<&Matrix> {
        self.input.as_ref()
    }

    pub fn output(&self) -> Option<&Matrix> {
        self.output.as_ref()
    }
}
