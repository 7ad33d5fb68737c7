//! Freeze metadata structures

use serde::{Deserialize, Serialize};

/// Conditions worth surfacing about a freeze run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FreezeFlag {
    /// A reflection coefficient has magnitude >= 1 (synthesis may diverge)
    UnstableModel,
    /// Burg recursion stopped early at a degenerate stage
    TruncatedModel,
    /// Duration was not a multiple of the block size; the remainder was dropped
    PartialBlockDropped,
    /// Extrapolated tail exceeds full scale
    Clipping,
    /// Extrapolated tail contains non-finite samples
    DivergentOutput,
}

/// Freeze metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreezeMetadata {
    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Input length in samples
    pub input_samples: usize,

    /// Output length in samples (prefix + tail)
    pub output_samples: usize,

    /// Freeze position in samples
    pub position: usize,

    /// Requested extrapolation length in samples
    pub requested_duration: usize,

    /// Synthesized samples
    pub extrapolated_samples: usize,

    /// AR model order
    pub order: usize,

    /// Analysis window length
    pub analysis_window: usize,

    /// Block size, if block-wise synthesis was used
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_size: Option<usize>,

    /// Final prediction-error power of the fitted model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_error: Option<f64>,

    /// Largest reflection coefficient magnitude
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_reflection_magnitude: Option<f64>,

    /// Stage at which the recursion was truncated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncated_at: Option<usize>,

    /// Peak absolute value of the synthesized tail
    pub tail_peak: f32,

    /// Processing time in milliseconds
    pub processing_time_ms: f32,

    /// Algorithm version
    pub algorithm_version: String,

    /// Freeze flags
    pub flags: Vec<FreezeFlag>,
}
