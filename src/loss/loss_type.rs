use serde::{Serialize, Deserialize};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::loss::{huber::HuberLoss, mae::MaeLoss, mse::MseLoss};
use crate::math::matrix::Matrix;

/// Selects the loss / loss-derivative pair the training loop uses.
///
/// `Mse` is the playground default; `Huber` uses δ = 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossType {
    Mse,
    Mae,
    Huber,
}

impl LossType {
    /// Scalar loss of one sample.
    pub fn loss(&self, expected: &Matrix, predicted: &Matrix) -> Result<f64> {
        match self {
            LossType::Mse => MseLoss::loss(expected, predicted),
            LossType::Mae => MaeLoss::loss(expected, predicted),
            LossType::Huber => HuberLoss::loss(expected, predicted),
        }
    }

    /// Gradient of the loss w.r.t. the prediction, the error the backward
    /// pass starts from.
    pub fn derivative(&self, expected: &Matrix, predicted: &Matrix) -> Result<Matrix> {
        match self {
            LossType::Mse => MseLoss::derivative(expected, predicted),
            LossType::Mae => MaeLoss::derivative(expected, predicted),
            LossType::Huber => HuberLoss::derivative(expected, predicted),
        }
    }
}

impl FromStr for LossType {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mse" => Ok(LossType::Mse),
            "mae" => Ok(LossType::Mae),
            "huber" => Ok(LossType::Huber),
            other => Err(Error::Config(format!("unknown loss '{other}'"))),
        }
    }
}
