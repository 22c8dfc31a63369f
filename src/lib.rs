pub mod activation;
pub mod data;
pub mod error;
pub mod layers;
pub mod loss;
pub mod math;
pub mod model;

// Convenience re-exports
pub use activation::ActivationFunction;
pub use error::NetError;
pub use layers::Layer;
pub use loss::CrossEntropyLoss;
pub use math::Matrix;
pub use model::{Model, StepStats, TrainConfig, TrainReport};
