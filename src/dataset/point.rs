use serde::{Serialize, Deserialize};
use std::fmt;

/// Label tag of a 2D training point. The playground supports at most six
/// classes, one per color, in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointColor {
    Purple,
    Green,
    Red,
    Blue,
    Gray,
    Yellow,
}

impl PointColor {
    pub const ALL: [PointColor; 6] = [
        PointColor::Purple,
        PointColor::Green,
        PointColor::Red,
        PointColor::Blue,
        PointColor::Gray,
        PointColor::Yellow,
    ];

    pub fn from_index(index: usize) -> Option<PointColor> {
        PointColor::ALL.get(index).copied()
    }

    /// Position in `ALL`, which is also the one-hot column of the label.
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn rgb(&self) -> [u8; 3] {
        match self {
            PointColor::Purple => [124, 58, 237],
            PointColor::Green => [22, 163, 74],
            PointColor::Red => [220, 38, 38],
            PointColor::Blue => [37, 99, 235],
            PointColor::Gray => [107, 114, 128],
            PointColor::Yellow => [234, 179, 8],
        }
    }
}

impl fmt::Display for PointColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PointColor::Purple => "purple",
            PointColor::Green => "green",
            PointColor::Red => "red",
            PointColor::Blue => "blue",
            PointColor::Gray => "gray",
            PointColor::Yellow => "yellow",
        };
        f.write_str(name)
    }
}

/// A labelled point of the playground canvas, coordinates roughly in `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub color: PointColor,
}
