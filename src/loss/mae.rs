use crate::error::Result;
use crate::math::matrix::Matrix;

pub struct MaeLoss;

impl MaeLoss {
    /// Scalar MAE: mean(|predicted - expected|)
    pub fn loss(expected: &Matrix, predicted: &Matrix) -> Result<f64> {
        Ok(predicted.sub_matrix(expected, None)?.apply(f64::abs).mean())
    }

    /// Per-output subgradient: sign(predicted - expected) / n  (0 when equal)
    pub fn derivative(expected: &Matrix, predicted: &Matrix) -> Result<Matrix> {
        let n = (expected.rows() * expected.cols()) as f64;
        Ok(predicted.sub_matrix(expected, None)?.apply(|diff| {
            if diff > 0.0 { 1.0 / n } else if diff < 0.0 { -1.0 / n } else { 0.0 }
        }))
    }
}
