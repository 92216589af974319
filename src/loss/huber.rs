use crate::error::Result;
use crate::math::matrix::Matrix;

pub struct HuberLoss;

// Fixed δ keeps `LossType::Huber` a unit variant.
const DELTA: f64 = 1.0;

impl HuberLoss {
    /// Scalar Huber: mean(h(predicted − expected))
    /// where h(x) = 0.5·x²  if |x| ≤ δ
    ///              δ·(|x| − 0.5·δ)  otherwise
    pub fn loss(expected: &Matrix, predicted: &Matrix) -> Result<f64> {
        Ok(predicted.sub_matrix(expected, None)?
            .apply(|x| {
                if x.abs() <= DELTA {
                    0.5 * x * x
                } else {
                    DELTA * (x.abs() - 0.5 * DELTA)
                }
            })
            .mean())
    }

    /// Per-output gradient of the mean: (x if |x| ≤ δ, else δ·sign(x)) / n
    pub fn derivative(expected: &Matrix, predicted: &Matrix) -> Result<Matrix> {
        let n = (expected.rows() * expected.cols()) as f64;
        Ok(predicted.sub_matrix(expected, None)?.apply(|x| {
            let g = if x.abs() <= DELTA { x } else { DELTA * x.signum() };
            g / n
        }))
    }
}
