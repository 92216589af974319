pub mod network;
pub mod topology;

pub use network::{Network, StopHandle};
pub use topology::{MAX_LAYERS, MAX_NODES, MIN_LAYERS_FOR_REMOVAL};
