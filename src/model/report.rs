use serde::{Deserialize, Serialize};

/// Progress snapshot emitted over `TrainConfig::progress_tx` every
/// `report_every` completed steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepStats {
    /// 0-based step index.
    pub step: usize,
    /// Total steps requested for this run.
    pub total_steps: usize,
    /// Cross-entropy loss of the sample trained at this step.
    pub loss: f32,
}

/// Outcome of a training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainReport {
    pub requested_steps: usize,
    /// Steps that completed a full forward + backward + update cycle.
    pub completed_steps: usize,
    /// Loss of the last sample that was forward-evaluated.
    pub last_loss: f32,
    /// Step at which a NaN/Inf output aborted the run, if any. No
    /// parameter was updated during that step.
    pub diverged_at: Option<usize>,
}
