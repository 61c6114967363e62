use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MvpaError>;

/// Errors raised by classifier inference and class balancing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MvpaError {
    #[error("Dimension mismatch in {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Class {class} has {available} samples but {required} must be drawn without replacement")]
    InsufficientSamples {
        class: usize,
        available: usize,
        required: usize,
    },

    #[error("Invalid balancing method '{0}': expected 'oversample', 'undersample' or a non-negative integer")]
    InvalidMethod(String),

    #[error("Class {0} has no samples to draw from")]
    EmptyClass(usize),
}
