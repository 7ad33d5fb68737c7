//! # Stratum Freeze
//!
//! An audio "freeze" engine: fits an autoregressive model to the audio just
//! before a chosen position and extrapolates the signal from there by running
//! the model's all-pole synthesis filter on zero input.
//!
//! ## Features
//!
//! - **Burg AR estimation**: order-recursive, complex-valued, with explicit
//!   degeneracy and stability policies
//! - **Extrapolation**: IIR continuation seeded from the most recent samples,
//!   in one pass or in fixed-size blocks with carried filter state
//! - **AR spectrum**: Burg power spectral density of the fitted model
//! - **I/O**: Symphonia decoding (mixed to mono) and 32-bit float WAV output
//!
//! ## Quick Start
//!
//! ```no_run
//! use stratum_freeze::{freeze_audio, FreezeConfig};
//!
//! // Load audio samples (mono, f32, normalized)
//! let samples: Vec<f32> = vec![]; // Your audio data
//! let sample_rate = 44100;
//!
//! let config = FreezeConfig {
//!     position: 44100,
//!     duration: 5 * 44100,
//!     ..FreezeConfig::with_order(2000)
//! };
//! let result = freeze_audio(&samples, sample_rate, config)?;
//!
//! println!("Output: {:.2} s", result.duration_seconds());
//! # Ok::<(), stratum_freeze::FreezeError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Audio Input → Channel Mixing → Burg AR Fit → Filter Seeding → Zero-Input Synthesis → Output
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod ar;
pub mod config;
pub mod error;
pub mod io;
pub mod preprocessing;
pub mod synthesis;

// Re-export main types
pub use analysis::metadata::{FreezeFlag, FreezeMetadata};
pub use analysis::result::FreezeResult;
pub use ar::ArModel;
pub use config::{DegeneracyPolicy, EstimatorOptions, FreezeConfig, StabilityPolicy};
pub use error::FreezeError;

use std::path::Path;
use synthesis::extrapolate::{extrapolate_with_model, SynthesisMode};

/// Main freeze function
///
/// Keeps `samples[..config.position]` and appends `config.duration`
/// extrapolated samples (or whole blocks of `config.block_size`).
///
/// # Arguments
///
/// * `samples` - Mono audio samples, normalized to [-1.0, 1.0]
/// * `sample_rate` - Sample rate in Hz (only used for metadata)
/// * `config` - Freeze configuration parameters
///
/// # Returns
///
/// `FreezeResult` with the output samples, the fitted model and metadata
///
/// # Errors
///
/// Returns `FreezeError` for invalid parameters, a window too short for the
/// order, or a model rejected by the configured policies
///
/// # Example
///
/// ```
/// use stratum_freeze::{freeze_audio, FreezeConfig};
///
/// let samples: Vec<f32> = (0..200)
///     .map(|i| (2.0 * std::f32::consts::PI * 2.0 * i as f32 / 100.0).sin())
///     .collect();
/// let config = FreezeConfig {
///     order: 4,
///     analysis_window: 50,
///     position: 150,
///     duration: 50,
///     ..FreezeConfig::default()
/// };
/// let result = freeze_audio(&samples, 100, config)?;
/// assert_eq!(result.samples.len(), 200);
/// # Ok::<(), stratum_freeze::FreezeError>(())
/// ```
pub fn freeze_audio(
    samples: &[f32],
    sample_rate: u32,
    config: FreezeConfig,
) -> Result<FreezeResult, FreezeError> {
    use std::time::Instant;
    let start_time = Instant::now();

    log::debug!(
        "Starting freeze: {} samples at {} Hz, pos={}, dur={}",
        samples.len(),
        sample_rate,
        config.position,
        config.duration
    );

    if samples.is_empty() {
        return Err(FreezeError::InvalidInput("Empty audio samples".to_string()));
    }

    if sample_rate == 0 {
        return Err(FreezeError::InvalidInput("Invalid sample rate".to_string()));
    }

    let mode = match config.block_size {
        Some(block_size) => SynthesisMode::Blocks(block_size),
        None => SynthesisMode::SinglePass,
    };

    let signal: Vec<f64> = samples.iter().map(|&s| s as f64).collect();
    let extrapolation = extrapolate_with_model(
        &signal,
        config.position,
        config.duration,
        config.order,
        config.analysis_window,
        mode,
        config.estimator,
    )?;

    let tail = extrapolation.tail();
    let tail_peak = tail.iter().fold(0.0f64, |acc, &v| acc.max(v.abs())) as f32;
    let flags = freeze_flags(
        extrapolation.model.as_ref(),
        extrapolation.dropped_samples,
        tail,
    );

    let output: Vec<f32> = extrapolation.signal.iter().map(|&s| s as f32).collect();

    let processing_time_ms = start_time.elapsed().as_secs_f32() * 1000.0;

    log::debug!(
        "Freeze done: {} output samples in {:.2} ms, flags={:?}",
        output.len(),
        processing_time_ms,
        flags
    );

    let model = extrapolation.model;
    Ok(FreezeResult {
        metadata: FreezeMetadata {
            sample_rate,
            input_samples: samples.len(),
            output_samples: output.len(),
            position: config.position,
            requested_duration: config.duration,
            extrapolated_samples: output.len() - config.position,
            order: config.order,
            analysis_window: config.analysis_window,
            block_size: config.block_size,
            final_error: model.as_ref().map(|m| m.error),
            max_reflection_magnitude: model.as_ref().map(|m| m.max_reflection_magnitude()),
            truncated_at: model.as_ref().and_then(|m| m.truncated_at),
            tail_peak,
            processing_time_ms,
            algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
            flags,
        },
        samples: output,
        model,
    })
}

/// Flags describing the fitted model and the synthesized tail
fn freeze_flags(
    model: Option<&ArModel>,
    dropped_samples: usize,
    tail: &[f64],
) -> Vec<FreezeFlag> {
    let mut flags = Vec::new();
    if let Some(model) = model {
        if !model.is_stable() {
            flags.push(FreezeFlag::UnstableModel);
        }
        if model.truncated_at.is_some() {
            flags.push(FreezeFlag::TruncatedModel);
        }
    }
    if dropped_samples > 0 {
        flags.push(FreezeFlag::PartialBlockDropped);
    }

    if tail.iter().any(|v| !v.is_finite()) {
        log::warn!("Extrapolated tail contains non-finite samples");
        flags.push(FreezeFlag::DivergentOutput);
    } else {
        let peak = tail.iter().fold(0.0f64, |acc, &v| acc.max(v.abs()));
        if peak > 1.0 {
            log::warn!("Extrapolated tail exceeds full scale (peak {:.3})", peak);
            flags.push(FreezeFlag::Clipping);
        }
    }
    flags
}

/// Decode an audio file, freeze it and write the result as a WAV file
///
/// Multichannel input is averaged to mono before fitting.
///
/// # Errors
///
/// Decoding, freezing and encoding errors are propagated
pub fn freeze_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    config: FreezeConfig,
) -> Result<FreezeResult, FreezeError> {
    use preprocessing::channel_mixer::ChannelMixMode;

    let decoded = io::decode_audio(input, ChannelMixMode::Average)?;
    let result = freeze_audio(&decoded.samples, decoded.sample_rate, config)?;
    io::encode_wav(output, &result.samples, decoded.sample_rate)?;
    Ok(result)
}
