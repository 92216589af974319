pub mod classify;
pub mod render;

pub use classify::{classify, HeatCell};
pub use render::{render, render_png};
