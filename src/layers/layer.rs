use rand::Rng;

use crate::activation::ActivationFunction;
use crate::error::{NetError, Result};
use crate::layers::dense::DenseLayer;

/// Pass-through entry layer with a fixed expected input size.
#[derive(Debug, Clone)]
pub struct InputLayer {
    pub size: usize,
}

impl InputLayer {
    /// Validates the buffer length and hands the same buffer back.
    pub fn forward(&self, input: Vec<f32>) -> Result<Vec<f32>> {
        if input.len() != self.size {
            return Err(NetError::shape(
                "input layer",
                self.size.to_string(),
                input.len().to_string(),
            ));
        }
        Ok(input)
    }
}

/// Stateless output normalizer: exponentiates in place and rescales so the
/// components form a probability distribution.
#[derive(Debug, Clone)]
pub struct SoftmaxLayer;

impl SoftmaxLayer {
    pub fn forward(&self, mut input: Vec<f32>) -> Vec<f32> {
        let mut sum = 0.0;
        for v in input.iter_mut() {
            *v = v.exp();
            sum += *v;
        }
        let inv = 1.0 / sum;
        for v in input.iter_mut() {
            *v *= inv;
        }
        input
    }
}

/// Closed set of layer variants dispatched by pattern matching.
///
/// The shared lifecycle is `set_input_size` (exactly once, in sequence
/// order, during model construction), `random_initialize`, then any number
/// of `evaluate` calls.
#[derive(Debug, Clone)]
pub enum Layer {
    Input(InputLayer),
    Dense(DenseLayer),
    Softmax(SoftmaxLayer),
}

impl Layer {
    pub fn input(size: usize) -> Layer {
        Layer::Input(InputLayer { size })
    }

    pub fn dense(size: usize, activation: ActivationFunction) -> Layer {
        Layer::Dense(DenseLayer::new(size, activation))
    }

    pub fn softmax() -> Layer {
        Layer::Softmax(SoftmaxLayer)
    }

    /// Size-negotiation step: given the preceding layer's output size,
    /// allocates parameter buffers and returns this layer's output size.
    pub fn set_input_size(&mut self, input_size: usize) -> Result<usize> {
        match self {
            // The input layer defines the chain's starting size; the
            // incoming value (0 for the first layer) is ignored.
            Layer::Input(layer) => Ok(layer.size),
            Layer::Dense(layer) => layer.set_input_size(input_size),
            Layer::Softmax(_) => Ok(input_size),
        }
    }

    /// No-op for Input and Softmax.
    pub fn random_initialize<R: Rng>(&mut self, rng: &mut R) {
        if let Layer::Dense(layer) = self {
            layer.random_initialize(rng);
        }
    }

    pub fn evaluate(&mut self, input: Vec<f32>) -> Result<Vec<f32>> {
        match self {
            Layer::Input(layer) => layer.forward(input),
            Layer::Dense(layer) => layer.forward(&input),
            Layer::Softmax(layer) => Ok(layer.forward(input)),
        }
    }
}
