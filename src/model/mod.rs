pub mod model;
pub mod report;
pub mod train_config;

pub use model::Model;
pub use report::{StepStats, TrainReport};
pub use train_config::TrainConfig;
