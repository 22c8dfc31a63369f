pub mod dense;
pub mod layer;

pub use dense::DenseLayer;
pub use layer::{InputLayer, Layer, SoftmaxLayer};
