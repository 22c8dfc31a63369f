use rand::Rng;

use crate::error::{NetError, Result};
use crate::layers::Layer;
use crate::loss::CrossEntropyLoss;
use crate::math::{vector, Matrix};
use crate::model::report::{StepStats, TrainReport};
use crate::model::train_config::TrainConfig;

/// Per-component gradient clip bound applied before the learning rate.
const GRAD_CLIP: f32 = 5.0;

/// An ordered, fixed sequence of layers plus the forward/backward engine.
///
/// Construction wires input sizes through the chain and randomly
/// initializes every dense layer; the layer list is never structurally
/// changed afterwards. Dense caches are per-instance scratch space, so a
/// single `Model` must not be shared across threads without external
/// serialization.
pub struct Model {
    pub layers: Vec<Layer>,
}

impl Model {
    /// Builds a model from an ordered layer list.
    ///
    /// Preconditions, checked here rather than left as numeric
    /// coincidences of the training loop:
    /// - the first layer is an Input layer;
    /// - the last layer is Softmax, directly preceded by an
    ///   Identity-activated dense layer (the `output - target` initial
    ///   delta is only the correct gradient for that pairing).
    pub fn new<R: Rng>(mut layers: Vec<Layer>, rng: &mut R) -> Result<Model> {
        if layers.is_empty() {
            return Err(NetError::Config("layer list is empty".into()));
        }
        if !matches!(layers.first(), Some(Layer::Input(_))) {
            return Err(NetError::Config("first layer must be an input layer".into()));
        }
        if !matches!(layers.last(), Some(Layer::Softmax(_))) {
            return Err(NetError::Config("last layer must be softmax".into()));
        }
        match layers.get(layers.len() - 2) {
            Some(Layer::Dense(dense))
                if dense.activation == crate::ActivationFunction::Identity => {}
            _ => {
                return Err(NetError::Config(
                    "softmax must be preceded by an identity-activated dense layer".into(),
                ));
            }
        }

        // Size negotiation, in sequence order, exactly once per layer.
        let mut size = 0;
        for layer in layers.iter_mut() {
            size = layer.set_input_size(size)?;
            layer.random_initialize(rng);
        }

        Ok(Model { layers })
    }

    /// Forward pass: threads `input` through every layer in order.
    ///
    /// Overwrites the dense layers' `z`/`a` caches as a side effect.
    pub fn evaluate(&mut self, input: &[f32]) -> Result<Vec<f32>> {
        let mut current = input.to_vec();
        for layer in self.layers.iter_mut() {
            current = layer.evaluate(current)?;
        }
        Ok(current)
    }

    /// One-sample-at-a-time SGD with hand-derived backpropagation and
    /// gradient clipping.
    ///
    /// Each step picks one sample uniformly at random (with replacement),
    /// forward-evaluates it, and walks the layers backward updating dense
    /// parameters in place. A NaN/Inf forward output aborts the whole run
    /// before any parameter of that step is touched; the abort step is
    /// recorded in the returned [`TrainReport`].
    pub fn train<R: Rng>(
        &mut self,
        inputs: &[Vec<f32>],
        targets: &[Vec<f32>],
        config: &TrainConfig,
        rng: &mut R,
    ) -> Result<TrainReport> {
        if inputs.is_empty() {
            return Err(NetError::Config("training sample set is empty".into()));
        }
        if inputs.len() != targets.len() {
            return Err(NetError::shape(
                "train (sample set)",
                inputs.len().to_string(),
                targets.len().to_string(),
            ));
        }
        if config.learning_rate <= 0.0 {
            return Err(NetError::Config(format!(
                "learning rate must be positive, got {}",
                config.learning_rate
            )));
        }

        let lr = config.learning_rate;
        let report_every = config.report_every.max(1);
        let mut last_loss = 0.0;
        let mut completed = 0;

        for step in 0..config.steps {
            if let Some(flag) = &config.stop_flag {
                if flag.load(std::sync::atomic::Ordering::Relaxed) {
                    break;
                }
            }

            let idx = rng.gen_range(0..inputs.len());
            let x = &inputs[idx];
            let target = &targets[idx];

            let output = self.evaluate(x)?;

            // Numerical blow-up guard: abort the entire run, leaving all
            // parameters exactly as they were before this step.
            if output.iter().any(|v| !v.is_finite()) {
                eprintln!("NaN/Inf detected in output at step {step}; aborting training run");
                return Ok(TrainReport {
                    requested_steps: config.steps,
                    completed_steps: completed,
                    last_loss,
                    diverged_at: Some(step),
                });
            }

            if target.len() != output.len() {
                return Err(NetError::shape(
                    "train (target)",
                    output.len().to_string(),
                    target.len().to_string(),
                ));
            }

            last_loss = CrossEntropyLoss::loss(&output, target);

            if let Some(tx) = &config.progress_tx {
                if step % report_every == 0 {
                    let stats = StepStats {
                        step,
                        total_steps: config.steps,
                        loss: last_loss,
                    };
                    // A dropped receiver means nobody is listening; stop.
                    if tx.send(stats).is_err() {
                        break;
                    }
                }
            }

            // Combined softmax + cross-entropy gradient w.r.t. the
            // pre-softmax logits.
            let mut delta = CrossEntropyLoss::derivative(&output, target);

            self.backward_step(x, &mut delta, lr)?;
            completed += 1;
        }

        Ok(TrainReport {
            requested_steps: config.steps,
            completed_steps: completed,
            last_loss,
            diverged_at: None,
        })
    }

    /// Walks the layers from second-to-last down to (but excluding) the
    /// input layer, updating each dense layer's parameters in place and
    /// propagating the error signal backward.
    fn backward_step(&mut self, x: &[f32], delta: &mut Vec<f32>, lr: f32) -> Result<()> {
        for j in (1..self.layers.len() - 1).rev() {
            let (below, rest) = self.layers.split_at_mut(j);
            let layer = match &mut rest[0] {
                Layer::Dense(dense) => dense,
                // Non-dense layers carry no parameters; skip.
                _ => continue,
            };
            let prev = &below[j - 1];

            // Input-side activations of this layer.
            let activations: &[f32] = match prev {
                Layer::Dense(p) => &p.a,
                Layer::Input(_) => x,
                Layer::Softmax(_) => {
                    return Err(NetError::Config(format!(
                        "unexpected layer kind below dense layer at index {j}"
                    )));
                }
            };

            // Weight gradient: outer(δ, a_prev), clipped, scaled by lr.
            let mut dw = Matrix::outer(delta, activations);
            dw.clamp(-GRAD_CLIP, GRAD_CLIP);
            dw.scale_in_place(lr);
            layer.weights.sub_assign(&dw)?;

            // Bias gradient: lr·δ, clipped to [-5·lr, 5·lr].
            let mut db = vector::scale(delta, lr);
            vector::clamp(&mut db, -GRAD_CLIP * lr, GRAD_CLIP * lr);
            vector::sub_assign(&mut layer.biases, &db)?;

            // Propagate the error signal unless this was the last dense
            // layer above the input.
            if j > 1 {
                let propagated = layer.weights.vec_mul(delta)?;
                *delta = match prev {
                    Layer::Dense(p) => {
                        let grad = p.activation.gradient(&p.z);
                        vector::mul(&propagated, &grad)?
                    }
                    _ => propagated,
                };
            }
        }
        Ok(())
    }
}
