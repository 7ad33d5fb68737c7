//! Error types for the freeze engine

use std::fmt;

/// Errors that can occur while fitting an AR model or extrapolating a signal
#[derive(Debug, Clone, PartialEq)]
pub enum FreezeError {
    /// Model order must be at least 1
    InvalidOrder(usize),

    /// Analysis window too short for the requested order, or it does not fit
    /// inside the signal before the freeze position
    InsufficientWindow(String),

    /// A reflection stage had a zero (or round-off level) denominator, or
    /// produced a non-finite coefficient
    NumericDegeneracy {
        /// Recursion stage (0-based) at which the degeneracy was detected
        stage: usize,
    },

    /// A reflection coefficient has magnitude >= 1
    UnstableModel {
        /// Recursion stage (0-based) of the offending coefficient
        stage: usize,
        /// Magnitude of the offending coefficient
        magnitude: f64,
    },

    /// Invalid input parameters
    InvalidInput(String),

    /// Audio decoding error
    DecodingError(String),

    /// Audio encoding error
    EncodingError(String),
}

impl fmt::Display for FreezeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FreezeError::InvalidOrder(order) => {
                write!(f, "Invalid order: {} (must be >= 1)", order)
            }
            FreezeError::InsufficientWindow(msg) => write!(f, "Insufficient window: {}", msg),
            FreezeError::NumericDegeneracy { stage } => write!(
                f,
                "Numeric degeneracy: zero prediction-error power at reflection stage {}",
                stage
            ),
            FreezeError::UnstableModel { stage, magnitude } => write!(
                f,
                "Unstable model: |reflection[{}]| = {:.6} >= 1",
                stage, magnitude
            ),
            FreezeError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            FreezeError::DecodingError(msg) => write!(f, "Decoding error: {}", msg),
            FreezeError::EncodingError(msg) => write!(f, "Encoding error: {}", msg),
        }
    }
}

impl std::error::Error for FreezeError {}
