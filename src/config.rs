//! Configuration parameters for freezing audio

/// What to do when a Burg reflection stage has a degenerate denominator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DegeneracyPolicy {
    /// Stop the recursion and zero-pad the remaining stages
    ///
    /// A degenerate stage means the lower-order predictor already explains the
    /// window exactly, so the padded model is the limit of the recursion.
    #[default]
    Truncate,
    /// Fail with [`FreezeError::NumericDegeneracy`](crate::FreezeError::NumericDegeneracy)
    Reject,
}

/// What to do when a reflection coefficient has magnitude >= 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StabilityPolicy {
    /// Keep the model (logged and flagged, output may diverge)
    #[default]
    Permissive,
    /// Fail with [`FreezeError::UnstableModel`](crate::FreezeError::UnstableModel)
    Reject,
}

/// Numerical options for the Burg estimator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EstimatorOptions {
    /// Degenerate stage handling (default: Truncate)
    pub degeneracy: DegeneracyPolicy,

    /// Unstable stage handling (default: Permissive)
    pub stability: StabilityPolicy,
}

/// Freeze configuration parameters
#[derive(Debug, Clone)]
pub struct FreezeConfig {
    // Model
    /// AR model order (default: 4000)
    pub order: usize,

    /// Number of samples before the freeze position used to fit the model
    /// (default: 4000)
    ///
    /// The fitted slice is `signal[position - analysis_window - 1 .. position]`,
    /// so it holds `analysis_window + 1` samples.
    pub analysis_window: usize,

    // Extrapolation
    /// Freeze position in samples (default: 44100)
    pub position: usize,

    /// Number of samples to extrapolate (default: 441000)
    pub duration: usize,

    /// Block size for block-wise synthesis (default: None = single pass)
    ///
    /// Only `duration / block_size` whole blocks are synthesized.
    pub block_size: Option<usize>,

    // Numerics
    /// Estimator options (degeneracy and stability policies)
    pub estimator: EstimatorOptions,
}

impl FreezeConfig {
    /// Block size the `freeze_file` demo uses for a bare `--block` flag
    pub const DEFAULT_BLOCK_SIZE: usize = 1024;

    /// Configuration with the analysis window equal to the order
    pub fn with_order(order: usize) -> Self {
        Self {
            order,
            analysis_window: order,
            ..Self::default()
        }
    }

    /// Change the order in place, resizing the analysis window to match
    ///
    /// Position, duration, block size and estimator options are kept.
    pub fn set_order(&mut self, order: usize) {
        self.order = order;
        self.analysis_window = order;
    }
}

impl Default for FreezeConfig {
    fn default() -> Self {
        Self {
            order: 4000,
            analysis_window: 4000,
            position: 44100,
            duration: 441000,
            block_size: None,
            estimator: EstimatorOptions::default(),
        }
    }
}
