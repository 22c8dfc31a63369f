use serde::{Deserialize, Serialize};

use crate::error::{NetError, Result};

/// Stateless elementwise activation function.
///
/// The derivative is always evaluated at the pre-activation value `z`
/// (not at `f(z)`), matching the chain-rule convention used by the
/// training loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationFunction {
    Identity,
    ReLU,
}

impl ActivationFunction {
    pub fn function(&self, x: f32) -> f32 {
        match self {
            ActivationFunction::Identity => x,
            ActivationFunction::ReLU => {
                if x > 0.0 {
                    x
                } else {
                    0.0
                }
            }
        }
    }

    /// Elementwise derivative. ReLU's derivative at exactly 0 is 0.
    pub fn derivative(&self, x: f32) -> f32 {
        match self {
            ActivationFunction::Identity => 1.0,
            ActivationFunction::ReLU => {
                if x > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    pub fn evaluate(&self, x: &[f32]) -> Vec<f32> {
        x.iter().map(|&v| self.function(v)).collect()
    }

    pub fn evaluate_into(&self, x: &[f32], out: &mut [f32]) -> Result<()> {
        check_len("activation::evaluate", x.len(), out.len())?;
        for i in 0..x.len() {
            out[i] = self.function(x[i]);
        }
        Ok(())
    }

    pub fn gradient(&self, x: &[f32]) -> Vec<f32> {
        x.iter().map(|&v| self.derivative(v)).collect()
    }

    pub fn gradient_into(&self, x: &[f32], out: &mut [f32]) -> Result<()> {
        check_len("activation::gradient", x.len(), out.len())?;
        for i in 0..x.len() {
            out[i] = self.derivative(x[i]);
        }
        Ok(())
    }
}

fn check_len(op: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(NetError::shape(op, expected.to_string(), actual.to_string()));
    }
    Ok(())
}
