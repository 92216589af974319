use crate::error::Result;
use crate::math::matrix::Matrix;

pub struct MseLoss;

impl MseLoss {
    /// Scalar MSE: mean((expected - predicted)²) over every entry.
    pub fn loss(expected: &Matrix, predicted: &Matrix) -> Result<f64> {
        Ok(expected.sub_matrix(predicted, None)?
            .apply(|x| x.powi(2))
            .mean())
    }

    /// Gradient w.r.t. the prediction: 2·(predicted - expected) / n
    pub fn derivative(expected: &Matrix, predicted: &Matrix) -> Result<Matrix> {
        let n = (expected.rows() * expected.cols()) as f64;
        Ok(predicted.sub_matrix(expected, None)?
            .mul_scalar(2.0)
            .apply(|x| x / n))
    }
}
