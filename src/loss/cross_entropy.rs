/// Categorical cross-entropy loss for use with a Softmax output layer.
pub struct CrossEntropyLoss;

/// Floor applied inside `ln()` to prevent `ln(0) = -inf`.
const EPS: f32 = 1e-7;

impl CrossEntropyLoss {
    /// Scalar loss: `-Σ expected[i] · ln(max(predicted[i], 1e-7))`.
    ///
    /// `predicted` — softmax probabilities; `expected` — one-hot (or soft)
    /// target distribution of the same length.
    pub fn loss(predicted: &[f32], expected: &[f32]) -> f32 {
        -predicted
            .iter()
            .zip(expected.iter())
            .map(|(p, e)| e * p.max(EPS).ln())
            .sum::<f32>()
    }

    /// Gradient of the combined Softmax + cross-entropy w.r.t. the
    /// pre-softmax logits: `predicted - expected`, elementwise.
    ///
    /// This is the initial delta of the backward pass. It is only valid
    /// when the final two layers are exactly an Identity-activated dense
    /// layer followed by Softmax; model construction enforces that.
    pub fn derivative(predicted: &[f32], expected: &[f32]) -> Vec<f32> {
        predicted
            .iter()
            .zip(expected.iter())
            .map(|(p, e)| p - e)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn perfect_prediction_has_near_zero_loss() {
        let loss = CrossEntropyLoss::loss(&[0.0, 1.0, 0.0], &[0.0, 1.0, 0.0]);
        assert_relative_eq!(loss, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn zero_probability_on_true_class_is_floored() {
        let loss = CrossEntropyLoss::loss(&[1.0, 0.0], &[0.0, 1.0]);
        assert!(loss.is_finite());
        assert_relative_eq!(loss, -(1e-7f32).ln(), max_relative = 1e-5);
    }

    #[test]
    fn derivative_is_predicted_minus_expected() {
        let d = CrossEntropyLoss::derivative(&[0.7, 0.2, 0.1], &[1.0, 0.0, 0.0]);
        assert_relative_eq!(d[0], -0.3, max_relative = 1e-5);
        assert_relative_eq!(d[1], 0.2, max_relative = 1e-5);
        assert_relative_eq!(d[2], 0.1, max_relative = 1e-5);
    }
}
