//! Synthetic 2D classification sets. Each label gets `size / outputs` points
//! (rounded down), except `random` which labels every point uniformly.

use rand::Rng;
use serde::{Serialize, Deserialize};
use std::f64::consts::PI;
use std::str::FromStr;

use crate::dataset::point::{Point, PointColor};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    Bunches,
    Circles,
    Waves,
    Random,
}

impl DatasetKind {
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R, size: usize, outputs: usize) -> Result<Vec<Point>> {
        match self {
            DatasetKind::Bunches => bunches(rng, size, outputs),
            DatasetKind::Circles => circles(rng, size, outputs),
            DatasetKind::Waves => waves(rng, size, outputs),
            DatasetKind::Random => random(rng, size, outputs),
        }
    }

    /// Point count the playground uses for this kind.
    pub fn default_size(&self) -> usize {
        match self {
            DatasetKind::Bunches => 200,
            DatasetKind::Circles | DatasetKind::Waves => 300,
            DatasetKind::Random => 100,
        }
    }
}

impl FromStr for DatasetKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bunches" => Ok(DatasetKind::Bunches),
            "circles" => Ok(DatasetKind::Circles),
            "waves" => Ok(DatasetKind::Waves),
            "random" => Ok(DatasetKind::Random),
            other => Err(Error::Config(format!("unknown dataset '{other}'"))),
        }
    }
}

/// Uniform points over `[-1, 1)²` with uniformly drawn labels.
pub fn random<R: Rng + ?Sized>(rng: &mut R, size: usize, outputs: usize) -> Result<Vec<Point>> {
    check_outputs(outputs)?;
    Ok((0..size)
        .map(|_| {
            let color = PointColor::ALL[rng.gen_range(0..outputs)];
            Point {
                x: (rng.gen::<f64>() - 0.5) * 2.0,
                y: (rng.gen::<f64>() - 0.5) * 2.0,
                color,
            }
        })
        .collect())
}

/// Concentric rings, one label per ring, radii `0.8/outputs` apart.
pub fn circles<R: Rng + ?Sized>(rng: &mut R, size: usize, outputs: usize) -> Result<Vec<Point>> {
    check_outputs(outputs)?;
    let step = 0.8 / outputs as f64;
    let per_label = size / outputs;

    let mut points = Vec::with_capacity(per_label * outputs);
    for (index, &color) in PointColor::ALL[..outputs].iter().enumerate() {
        let r = step * (index + 1) as f64;
        for _ in 0..per_label {
            let t = rng.gen::<f64>() * PI * 2.0;
            points.push(Point { x: r * t.cos(), y: r * t.sin(), color });
        }
    }
    Ok(points)
}

/// Horizontal sine bands stacked `1.5/outputs` apart and centred on y = 0.
pub fn waves<R: Rng + ?Sized>(rng: &mut R, size: usize, outputs: usize) -> Result<Vec<Point>> {
    check_outputs(outputs)?;
    const X_SPAN: f64 = 10.0;
    const X_HALF: f64 = 5.0;

    let step = 1.5 / outputs as f64;
    let mut y_offset = -step * (outputs - 1) as f64 / 2.0;
    let per_label = size / outputs;

    let mut points = Vec::with_capacity(per_label * outputs);
    for &color in &PointColor::ALL[..outputs] {
        for _ in 0..per_label {
            let x = rng.gen::<f64>() * X_SPAN - X_HALF;
            let y = x.sin() / 3.0 + y_offset;
            points.push(Point { x: x / X_HALF, y, color });
        }
        y_offset += step;
    }
    Ok(points)
}

/// Angular sectors around the origin, one label per sector, starting at a
/// random angle.
pub fn bunches<R: Rng + ?Sized>(rng: &mut R, size: usize, outputs: usize) -> Result<Vec<Point>> {
    check_outputs(outputs)?;
    const BUNCH_SIZE: f64 = 0.5;
    const MARGIN: f64 = 0.1;

    let sector = PI * 2.0 / outputs as f64;
    let t_offset = PI / (5.0 * outputs as f64);
    let mut theta = rng.gen::<f64>() * PI * 2.0;
    let per_label = size / outputs;

    let mut points = Vec::with_capacity(per_label * outputs);
    for &color in &PointColor::ALL[..outputs] {
        let start_t = theta + t_offset;
        let end_t = theta + sector - t_offset;
        for _ in 0..per_label {
            let t = rng.gen::<f64>() * (end_t - start_t) + start_t;
            let r = (MARGIN + BUNCH_SIZE) * rng.gen::<f64>().sqrt() + MARGIN;
            points.push(Point { x: r * t.cos(), y: r * t.sin(), color });
        }
        theta += sector;
    }
    Ok(points)
}

fn check_outputs(outputs: usize) -> Result<()> {
    if outputs == 0 || outputs > PointColor::ALL.len() {
        return Err(Error::Config(format!(
            "output count must be between 1 and {}, got {outputs}",
            PointColor::ALL.len()
        )));
    }
    Ok(())
}
