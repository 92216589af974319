pub mod dense;
pub mod activation_layer;
pub mod layer;

pub use dense::FullyConnectedLayer;
pub use activation_layer::ActivationLayer;
pub use layer::Layer;
