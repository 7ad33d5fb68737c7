//! Freeze result types

use super::metadata::{FreezeFlag, FreezeMetadata};
use crate::ar::ArModel;

/// Result of freezing an audio signal
#[derive(Debug, Clone)]
pub struct FreezeResult {
    /// Original samples up to the freeze position followed by the
    /// extrapolated tail
    pub samples: Vec<f32>,

    /// Fitted AR model (`None` for a zero-length freeze)
    pub model: Option<ArModel>,

    /// Freeze metadata
    pub metadata: FreezeMetadata,
}

impl FreezeResult {
    /// Extrapolated samples only
    pub fn tail(&self) -> &[f32] {
        &self.samples[self.metadata.position..]
    }

    /// Whether a flag was raised during the run
    pub fn has_flag(&self, flag: FreezeFlag) -> bool {
        self.metadata.flags.contains(&flag)
    }

    /// Duration of the output in seconds
    pub fn duration_seconds(&self) -> f32 {
        self.samples.len() as f32 / self.metadata.sample_rate as f32
    }
}
