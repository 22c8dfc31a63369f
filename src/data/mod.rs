pub mod idx;

pub use idx::{load_idx_pair, one_hot, parse_idx_pair, SampleSet};
