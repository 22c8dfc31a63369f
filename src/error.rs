use thiserror::Error;

/// Errors surfaced by the core engine.
///
/// There are exactly two kinds: operand/buffer shape disagreements, and
/// malformed layer stacks discovered during construction or backprop. Both
/// fail fast and propagate synchronously to the immediate caller; the core
/// never retries anything.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetError {
    #[error("shape mismatch in {op}: expected {expected}, got {actual}")]
    ShapeMismatch {
        op: &'static str,
        expected: String,
        actual: String,
    },

    #[error("invalid model configuration: {0}")]
    Config(String),
}

impl NetError {
    pub(crate) fn shape(
        op: &'static str,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> NetError {
        NetError::ShapeMismatch {
            op,
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, NetError>;
