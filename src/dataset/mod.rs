pub mod point;
pub mod generators;
pub mod features;

pub use point::{Point, PointColor};
pub use generators::DatasetKind;
pub use features::{extract, span, Feature, Span};
