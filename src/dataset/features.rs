use serde::{Serialize, Deserialize};
use std::str::FromStr;
use tracing::warn;

use crate::dataset::point::Point;
use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Scalar feature derived from a point's coordinates; the selected features
/// form one network input row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    #[serde(rename = "x")]
    X,
    #[serde(rename = "y")]
    Y,
    #[serde(rename = "x^2")]
    XSquared,
    #[serde(rename = "y^2")]
    YSquared,
    #[serde(rename = "xy")]
    XY,
    #[serde(rename = "sin(x)")]
    SinX,
    #[serde(rename = "sin(y)")]
    SinY,
}

impl Feature {
    pub fn all() -> [Feature; 7] {
        [
            Feature::X,
            Feature::Y,
            Feature::XSquared,
            Feature::YSquared,
            Feature::XY,
            Feature::SinX,
            Feature::SinY,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Feature::X => "x",
            Feature::Y => "y",
            Feature::XSquared => "x^2",
            Feature::YSquared => "y^2",
            Feature::XY => "xy",
            Feature::SinX => "sin(x)",
            Feature::SinY => "sin(y)",
        }
    }

    pub fn perform(&self, x: f64, y: f64) -> f64 {
        match self {
            Feature::X => x,
            Feature::Y => y,
            Feature::XSquared => x * x,
            Feature::YSquared => y * y,
            Feature::XY => x * y,
            Feature::SinX => x.sin(),
            Feature::SinY => y.sin(),
        }
    }
}

impl FromStr for Feature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Feature::all().into_iter()
            .find(|f| f.name() == s.trim())
            .ok_or_else(|| Error::Config(format!("unknown feature '{s}'")))
    }
}

/// `1 × features.len()` input row for the coordinate `(x, y)`.
pub fn feature_row(features: &[Feature], x: f64, y: f64) -> Result<Matrix> {
    Matrix::row(features.iter().map(|f| f.perform(x, y)).collect())
}

/// Builds network inputs and one-hot targets for `points`.
///
/// A point whose label does not fit in `outputs` gets an all-zero target.
pub fn extract(points: &[Point], features: &[Feature], outputs: usize) -> Result<(Vec<Matrix>, Vec<Matrix>)> {
    if features.is_empty() {
        return Err(Error::Config("at least one feature must be selected".into()));
    }
    if outputs == 0 {
        return Err(Error::Config("output count must be at least 1".into()));
    }

    let mut inputs = Vec::with_capacity(points.len());
    let mut labels = Vec::with_capacity(points.len());
    for point in points {
        inputs.push(feature_row(features, point.x, point.y)?);

        let index = point.color.index();
        if index >= outputs {
            warn!(color = %point.color, outputs, "label outside configured outputs");
        }
        let one_hot = (0..outputs).map(|i| if i == index { 1.0 } else { 0.0 }).collect();
        labels.push(Matrix::row(one_hot)?);
    }
    Ok((inputs, labels))
}

/// Regular `resolution × resolution` grid over `[-1, 1)²` with the matching
/// network inputs, used to paint the decision boundary.
#[derive(Debug, Clone)]
pub struct Span {
    pub resolution: usize,
    pub points: Vec<(f64, f64)>,
    pub inputs: Vec<Matrix>,
}

/// Grid points are ordered by x first, then y.
pub fn span(resolution: usize, features: &[Feature]) -> Result<Span> {
    if features.is_empty() {
        return Err(Error::Config("at least one feature must be selected".into()));
    }

    let size = resolution as f64;
    let mut points = Vec::with_capacity(resolution * resolution);
    let mut inputs = Vec::with_capacity(resolution * resolution);
    for i in 0..resolution {
        for j in 0..resolution {
            let x = (i as f64 / size - 0.5) * 2.0;
            let y = (j as f64 / size - 0.5) * 2.0;
            points.push((x, y));
            inputs.push(feature_row(features, x, y)?);
        }
    }
    Ok(Span { resolution, points, inputs })
}
