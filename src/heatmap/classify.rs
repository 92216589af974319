use serde::{Serialize, Deserialize};

use crate::dataset::features::Span;
use crate::dataset::point::PointColor;
use crate::error::Result;
use crate::network::network::Network;

/// Prediction for one grid cell: the label with the largest absolute
/// output and that output's magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatCell {
    pub x: f64,
    pub y: f64,
    pub label: usize,
    pub value: f64,
}

impl HeatCell {
    pub fn color(&self) -> Option<PointColor> {
        PointColor::from_index(self.label)
    }
}

/// Runs the network over every grid input.
pub fn classify(network: &mut Network, span: &Span) -> Result<Vec<HeatCell>> {
    let predictions = network.predict(&span.inputs)?;

    Ok(predictions.iter()
        .zip(&span.points)
        .map(|(prediction, &(x, y))| {
            let (label, value) = prediction
                .apply(f64::abs)
                .argmax_row(0)
                .unwrap_or((0, 0.0));
            HeatCell { x, y, label, value }
        })
        .collect())
}
