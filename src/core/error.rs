//! Error types for the ocean simulation

use thiserror::Error;

/// Main error type for the simulation pipeline
#[derive(Debug, Error)]
pub enum Error {
    /// A user-facing parameter is out of range or produced a non-finite derived value.
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// A stage received a grid whose side length does not match the pipeline.
    #[error("grid size mismatch: expected {expected}, got {actual}")]
    GridSizeMismatch { expected: usize, actual: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(String),
}

impl Error {
    pub(crate) fn invalid(name: &'static str, value: impl Into<f64>, reason: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value: value.into(),
            reason,
        }
    }
}
