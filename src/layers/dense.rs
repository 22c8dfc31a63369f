use rand::Rng;

use crate::activation::ActivationFunction;
use crate::error::{NetError, Result};
use crate::math::{vector, Matrix};

/// Fully-connected layer: `a = activation(W · input + b)`.
///
/// The weight matrix is `(size × input_size)`. `z` and `a` are scratch
/// caches overwritten on every forward pass; the backward pass of the same
/// training step is their only reader.
#[derive(Debug, Clone)]
pub struct DenseLayer {
    pub size: usize,
    pub weights: Matrix,
    pub biases: Vec<f32>,
    /// Pre-activation cache, `z = W·input + b`.
    pub z: Vec<f32>,
    /// Post-activation cache, `a = activation(z)`.
    pub a: Vec<f32>,
    pub activation: ActivationFunction,
}

impl DenseLayer {
    /// The weight matrix is allocated later, once `set_input_size` learns
    /// the fan-in from the preceding layer.
    pub fn new(size: usize, activation: ActivationFunction) -> DenseLayer {
        DenseLayer {
            size,
            weights: Matrix::zeros(0, 0),
            biases: vec![0.0; size],
            z: vec![0.0; size],
            a: vec![0.0; size],
            activation,
        }
    }

    /// Allocates the zero-valued weight matrix and returns this layer's
    /// output size. Must be called exactly once, before any evaluation.
    pub fn set_input_size(&mut self, input_size: usize) -> Result<usize> {
        if self.weights.rows != 0 {
            return Err(NetError::Config(
                "set_input_size called twice on a dense layer".into(),
            ));
        }
        if input_size == 0 {
            return Err(NetError::Config(
                "dense layer received input size 0; it cannot be the first layer".into(),
            ));
        }
        self.weights = Matrix::zeros(self.size, input_size);
        Ok(self.size)
    }

    /// Xavier/Glorot uniform initialization: weights drawn from
    /// `[-limit, limit]` with `limit = sqrt(6 / (fan_in + fan_out))`;
    /// biases stay zero.
    pub fn random_initialize<R: Rng>(&mut self, rng: &mut R) {
        let fan_in = self.weights.cols;
        let fan_out = self.weights.rows;
        let limit = (6.0 / (fan_in + fan_out) as f32).sqrt();
        for row in self.weights.data.iter_mut() {
            for w in row.iter_mut() {
                *w = (rng.gen::<f32>() * 2.0 - 1.0) * limit;
            }
        }
        for b in self.biases.iter_mut() {
            *b = 0.0;
        }
    }

    /// Forward pass into the `z`/`a` caches; returns a copy of `a`.
    pub fn forward(&mut self, input: &[f32]) -> Result<Vec<f32>> {
        self.weights.mul_vec_into(input, &mut self.z)?;
        vector::add_assign(&mut self.z, &self.biases)?;
        self.activation.evaluate_into(&self.z, &mut self.a)?;
        Ok(self.a.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn wiring_allocates_weights_once() {
        let mut layer = DenseLayer::new(3, ActivationFunction::Identity);
        assert_eq!(layer.set_input_size(4).unwrap(), 3);
        assert_eq!((layer.weights.rows, layer.weights.cols), (3, 4));
        assert!(layer.set_input_size(4).is_err());
    }

    #[test]
    fn rejects_zero_input_size() {
        let mut layer = DenseLayer::new(3, ActivationFunction::Identity);
        assert!(layer.set_input_size(0).is_err());
    }

    #[test]
    fn xavier_weights_stay_within_limit() {
        let mut layer = DenseLayer::new(8, ActivationFunction::ReLU);
        layer.set_input_size(16).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        layer.random_initialize(&mut rng);

        let limit = (6.0f32 / (16 + 8) as f32).sqrt();
        for row in &layer.weights.data {
            for &w in row {
                assert!(w.abs() <= limit);
            }
        }
        assert!(layer.biases.iter().all(|&b| b == 0.0));
    }

    #[test]
    fn forward_computes_and_caches_z_and_a() {
        let mut layer = DenseLayer::new(2, ActivationFunction::ReLU);
        layer.set_input_size(2).unwrap();
        layer.weights = Matrix::from_rows(vec![vec![1.0, 0.0], vec![0.0, -1.0]]).unwrap();
        layer.biases = vec![0.5, 0.5];

        let out = layer.forward(&[2.0, 3.0]).unwrap();
        assert_eq!(layer.z, vec![2.5, -2.5]);
        assert_eq!(layer.a, vec![2.5, 0.0]);
        assert_eq!(out, layer.a);
    }

    #[test]
    fn forward_rejects_wrong_input_length() {
        let mut layer = DenseLayer::new(2, ActivationFunction::Identity);
        layer.set_input_size(3).unwrap();
        assert!(layer.forward(&[1.0, 2.0]).is_err());
    }
}
