use thiserror::Error;

pub type Result<T> = std::result::Result<T, RangeError>;

/// Errors produced by the cell-range helpers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    /// An input outside the documented domain (negative index, empty count,
    /// malformed label or reference)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl RangeError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        RangeError::InvalidArgument(msg.into())
    }
}
