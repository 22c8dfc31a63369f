use std::sync::atomic::AtomicBool;
use std::sync::mpsc;
use std::sync::Arc;

use crate::model::report::StepStats;

/// Configuration for a `Model::train` run.
///
/// # Fields
/// - `steps`         — total one-sample SGD steps
/// - `learning_rate` — plain SGD step size
/// - `report_every`  — emit one `StepStats` every N steps (when a channel
///                     is attached)
/// - `progress_tx`   — optional channel sender; if the receiver is dropped
///                     the run terminates early (clean shutdown)
/// - `stop_flag`     — optional atomic flag; when set from another thread
///                     the run terminates before the next step
pub struct TrainConfig {
    pub steps: usize,
    pub learning_rate: f32,
    pub report_every: usize,
    pub progress_tx: Option<mpsc::Sender<StepStats>>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl TrainConfig {
    /// Minimal config: no progress channel, no stop flag.
    pub fn new(steps: usize, learning_rate: f32) -> Self {
        TrainConfig {
            steps,
            learning_rate,
            report_every: 100,
            progress_tx: None,
            stop_flag: None,
        }
    }
}
