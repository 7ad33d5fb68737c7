//! AR extrapolation ("freeze")
//!
//! Continues a signal past a freeze position with the free response of an
//! all-pole filter fitted to the samples just before that position.
//!
//! # Algorithm
//!
//! 1. Fit a Burg AR model to `signal[pos - window - 1 .. pos]`
//! 2. Use the real part of its coefficients as the denominator of `1 / A(z)`
//! 3. Seed the filter state from `signal[pos - 1], signal[pos - 2], ...`
//! 4. Run the filter on zeros, in one pass or in fixed-size blocks
//! 5. Return `signal[..pos]` followed by the synthesized tail
//!
//! # Example
//!
//! ```
//! use stratum_freeze::synthesis::extrapolate::extrapolate;
//! use stratum_freeze::config::EstimatorOptions;
//!
//! let signal: Vec<f64> = (0..200)
//!     .map(|i| (2.0 * std::f64::consts::PI * 2.0 * i as f64 / 100.0).sin())
//!     .collect();
//! let frozen = extrapolate(&signal, 150, 50, 4, 50, EstimatorOptions::default())?;
//! assert_eq!(frozen.len(), 200);
//! # Ok::<(), stratum_freeze::FreezeError>(())
//! ```

use super::filter::{AllPoleFilter, FilterState};
use crate::ar::burg::estimate_real;
use crate::ar::ArModel;
use crate::config::EstimatorOptions;
use crate::error::FreezeError;

/// How the zero-input response is synthesized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesisMode {
    /// One filter call over the whole duration
    SinglePass,
    /// `duration / n` calls of `n` samples, state carried between calls
    Blocks(usize),
}

/// Output of an extrapolation run
#[derive(Debug, Clone)]
pub struct Extrapolation {
    /// `signal[..pos]` followed by the synthesized tail
    pub signal: Vec<f64>,

    /// Index of the first synthesized sample (the freeze position)
    pub tail_start: usize,

    /// Fitted model (`None` when nothing had to be synthesized)
    pub model: Option<ArModel>,

    /// Requested samples not synthesized because they did not fill a block
    pub dropped_samples: usize,
}

impl Extrapolation {
    /// Synthesized samples only
    pub fn tail(&self) -> &[f64] {
        &self.signal[self.tail_start..]
    }
}

/// Check extrapolation parameters against a signal of `len` samples
///
/// # Errors
///
/// - `InvalidOrder` if `order == 0`
/// - `InvalidInput` if `pos > len` or the block size is 0
/// - `InsufficientWindow` if `analysis_window < order` or the window would
///   start before the first sample
pub fn validate_parameters(
    len: usize,
    pos: usize,
    order: usize,
    analysis_window: usize,
    mode: SynthesisMode,
) -> Result<(), FreezeError> {
    if order == 0 {
        return Err(FreezeError::InvalidOrder(order));
    }
    if let SynthesisMode::Blocks(0) = mode {
        return Err(FreezeError::InvalidInput(
            "Block size must be > 0".to_string(),
        ));
    }
    if pos > len {
        return Err(FreezeError::InvalidInput(format!(
            "Freeze position {} is past the end of the signal ({} samples)",
            pos, len
        )));
    }
    if analysis_window < order {
        return Err(FreezeError::InsufficientWindow(format!(
            "analysis window {} is shorter than order {}",
            analysis_window, order
        )));
    }
    if analysis_window >= pos {
        return Err(FreezeError::InsufficientWindow(format!(
            "analysis window of {} + 1 samples starts before the signal (position {})",
            analysis_window, pos
        )));
    }
    Ok(())
}

/// Fit the model on the window before `pos` and seed the synthesis filter
///
/// Expects parameters already checked by [`validate_parameters`].
pub fn prepare_filter(
    signal: &[f64],
    pos: usize,
    order: usize,
    analysis_window: usize,
    options: EstimatorOptions,
) -> Result<(ArModel, AllPoleFilter, FilterState), FreezeError> {
    let window = &signal[pos - analysis_window - 1..pos];
    let model = estimate_real(window, order, options)?;

    let filter = AllPoleFilter::from_model(&model)
        .map_err(|_| FreezeError::NumericDegeneracy { stage: order })?;

    let history: Vec<f64> = signal[pos - order..pos].iter().rev().copied().collect();
    let state = filter.initial_state(&history)?;

    Ok((model, filter, state))
}

/// Run the filter on zero input for `duration` samples
///
/// Returns the synthesized samples, the final state and the number of
/// requested samples left out (always 0 in single-pass mode).
pub fn synthesize(
    filter: &AllPoleFilter,
    state: FilterState,
    duration: usize,
    mode: SynthesisMode,
) -> (Vec<f64>, FilterState, usize) {
    match mode {
        SynthesisMode::SinglePass => {
            let (output, state) = filter.apply(&vec![0.0; duration], state);
            (output, state, 0)
        }
        SynthesisMode::Blocks(block_size) => {
            let blocks = duration / block_size;
            if blocks == 0 {
                return (Vec::new(), state, duration);
            }
            let zeros = vec![0.0; block_size];
            let mut output = Vec::with_capacity(blocks * block_size);
            let mut state = state;
            for _ in 0..blocks {
                let (block, next) = filter.apply(&zeros, state);
                output.extend_from_slice(&block);
                state = next;
            }
            (output, state, duration - blocks * block_size)
        }
    }
}

/// Extrapolate a signal and keep the fitted model
///
/// # Arguments
///
/// * `signal` - Input samples
/// * `pos` - Freeze position (the tail replaces everything from here on)
/// * `duration` - Number of samples to synthesize
/// * `order` - AR model order
/// * `analysis_window` - Window length; `analysis_window + 1` samples are fitted
/// * `mode` - Single-pass or block-wise synthesis
/// * `options` - Estimator policies
///
/// # Errors
///
/// Parameter errors from [`validate_parameters`] and estimator errors
pub fn extrapolate_with_model(
    signal: &[f64],
    pos: usize,
    duration: usize,
    order: usize,
    analysis_window: usize,
    mode: SynthesisMode,
    options: EstimatorOptions,
) -> Result<Extrapolation, FreezeError> {
    validate_parameters(signal.len(), pos, order, analysis_window, mode)?;

    log::debug!(
        "Extrapolating: {} samples, pos={}, dur={}, order={}, window={}, mode={:?}",
        signal.len(),
        pos,
        duration,
        order,
        analysis_window,
        mode
    );

    if duration == 0 {
        return Ok(Extrapolation {
            signal: signal[..pos].to_vec(),
            tail_start: pos,
            model: None,
            dropped_samples: 0,
        });
    }

    let (model, filter, state) = prepare_filter(signal, pos, order, analysis_window, options)?;
    let (tail, _, dropped_samples) = synthesize(&filter, state, duration, mode);

    if dropped_samples > 0 {
        log::warn!(
            "Duration {} is not a multiple of the block size, {} samples not synthesized",
            duration,
            dropped_samples
        );
    }

    let mut output = Vec::with_capacity(pos + tail.len());
    output.extend_from_slice(&signal[..pos]);
    output.extend_from_slice(&tail);

    Ok(Extrapolation {
        signal: output,
        tail_start: pos,
        model: Some(model),
        dropped_samples,
    })
}

/// Extrapolate a signal in a single synthesis pass
///
/// Returns `signal[..pos]` followed by `duration` synthesized samples.
pub fn extrapolate(
    signal: &[f64],
    pos: usize,
    duration: usize,
    order: usize,
    analysis_window: usize,
    options: EstimatorOptions,
) -> Result<Vec<f64>, FreezeError> {
    extrapolate_with_model(
        signal,
        pos,
        duration,
        order,
        analysis_window,
        SynthesisMode::SinglePass,
        options,
    )
    .map(|e| e.signal)
}

/// Extrapolate a signal block by block
///
/// Returns `signal[..pos]` followed by `(duration / block_size) * block_size`
/// synthesized samples.
pub fn extrapolate_blockwise(
    signal: &[f64],
    pos: usize,
    duration: usize,
    order: usize,
    analysis_window: usize,
    block_size: usize,
    options: EstimatorOptions,
) -> Result<Vec<f64>, FreezeError> {
    extrapolate_with_model(
        signal,
        pos,
        duration,
        order,
        analysis_window,
        SynthesisMode::Blocks(block_size),
        options,
    )
    .map(|e| e.signal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DegeneracyPolicy;
    use std::f64::consts::PI;

    fn sine(len: usize, freq: f64, sample_rate: f64) -> Vec<f64> {
        (0..len)
            .map(|i| (2.0 * PI * freq * i as f64 / sample_rate).sin())
            .collect()
    }

    /// Two damped partials plus LCG noise
    fn test_signal(len: usize) -> Vec<f64> {
        let mut state = 2024u32;
        (0..len)
            .map(|i| {
                state = state.wrapping_mul(1664525).wrapping_add(1013904223);
                let noise = (state >> 8) as f64 / (1u32 << 24) as f64 - 0.5;
                let t = i as f64;
                0.6 * (0.11 * t).sin() + 0.3 * (0.37 * t + 1.0).cos() + 0.05 * noise
            })
            .collect()
    }

    #[test]
    fn test_two_hz_sine_continuation() {
        let signal = sine(200, 2.0, 100.0);
        let out = extrapolate(&signal, 150, 50, 4, 50, EstimatorOptions::default()).unwrap();

        assert_eq!(out.len(), 200);
        assert_eq!(&out[..150], &signal[..150]);

        let peak_error = out[150..]
            .iter()
            .zip(signal[150..].iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0f64, f64::max);
        assert!(peak_error < 0.05, "peak error {}", peak_error);
    }

    #[test]
    fn test_sine_tracks_for_ten_periods() {
        let period = 20usize;
        let signal = sine(600, 1.0, period as f64);
        let pos = 300;
        let duration = 10 * period;
        let result = extrapolate_with_model(
            &signal,
            pos,
            duration,
            6,
            120,
            SynthesisMode::SinglePass,
            EstimatorOptions::default(),
        )
        .unwrap();

        let model = result.model.as_ref().unwrap();
        assert!(model.max_reflection_magnitude() > 0.99);

        let peak_error = result
            .tail()
            .iter()
            .zip(signal[pos..pos + duration].iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0f64, f64::max);
        assert!(peak_error < 1e-3, "peak error {}", peak_error);
    }

    #[test]
    fn test_zero_duration_returns_prefix() {
        let signal = test_signal(100);
        let out = extrapolate(&signal, 60, 0, 4, 20, EstimatorOptions::default()).unwrap();
        assert_eq!(out, signal[..60].to_vec());

        let result = extrapolate_with_model(
            &signal,
            60,
            0,
            4,
            20,
            SynthesisMode::Blocks(8),
            EstimatorOptions::default(),
        )
        .unwrap();
        assert!(result.model.is_none());
        assert!(result.tail().is_empty());
    }

    #[test]
    fn test_blockwise_matches_single_pass() {
        let signal = test_signal(1000);
        let options = EstimatorOptions::default();
        let single = extrapolate(&signal, 800, 512, 16, 300, options).unwrap();
        for block_size in [1, 8, 64, 512] {
            let blocks =
                extrapolate_blockwise(&signal, 800, 512, 16, 300, block_size, options).unwrap();
            assert_eq!(single, blocks, "block size {}", block_size);
        }
    }

    #[test]
    fn test_blockwise_drops_partial_block() {
        let signal = test_signal(500);
        let result = extrapolate_with_model(
            &signal,
            400,
            100,
            8,
            100,
            SynthesisMode::Blocks(32),
            EstimatorOptions::default(),
        )
        .unwrap();
        assert_eq!(result.tail().len(), 96);
        assert_eq!(result.dropped_samples, 4);

        let single = extrapolate(&signal, 400, 96, 8, 100, EstimatorOptions::default()).unwrap();
        assert_eq!(result.signal, single);
    }

    #[test]
    fn test_block_larger_than_duration_synthesizes_nothing() {
        let signal = test_signal(200);
        let result = extrapolate_with_model(
            &signal,
            150,
            50,
            4,
            50,
            SynthesisMode::Blocks(usize::MAX / 4),
            EstimatorOptions::default(),
        )
        .unwrap();
        assert_eq!(result.signal, signal[..150].to_vec());
        assert!(result.tail().is_empty());
        assert_eq!(result.dropped_samples, 50);
    }

    #[test]
    fn test_constant_signal_stays_constant() {
        let signal = vec![0.25; 300];
        for order in [1, 2, 5] {
            let out =
                extrapolate(&signal, 200, 100, order, 50, EstimatorOptions::default()).unwrap();
            assert_eq!(out.len(), 300);
            for v in &out[200..] {
                assert!((v - 0.25).abs() < 1e-12, "order {}: {}", order, v);
            }
        }
    }

    #[test]
    fn test_constant_signal_rejected_when_strict() {
        let signal = vec![0.25; 300];
        let options = EstimatorOptions {
            degeneracy: DegeneracyPolicy::Reject,
            ..EstimatorOptions::default()
        };
        let result = extrapolate(&signal, 200, 100, 3, 50, options);
        assert_eq!(result, Err(FreezeError::NumericDegeneracy { stage: 1 }));
    }

    #[test]
    fn test_parameter_validation() {
        let signal = test_signal(100);
        let options = EstimatorOptions::default();

        assert_eq!(
            extrapolate(&signal, 50, 10, 0, 20, options),
            Err(FreezeError::InvalidOrder(0))
        );
        assert!(matches!(
            extrapolate(&signal, 101, 10, 4, 20, options),
            Err(FreezeError::InvalidInput(_))
        ));
        assert!(matches!(
            extrapolate(&signal, 50, 10, 8, 4, options),
            Err(FreezeError::InsufficientWindow(_))
        ));
        // Window of 50 + 1 samples does not fit before position 50
        assert!(matches!(
            extrapolate(&signal, 50, 10, 4, 50, options),
            Err(FreezeError::InsufficientWindow(_))
        ));
        assert!(matches!(
            extrapolate(&signal, 50, 10, 4, usize::MAX, options),
            Err(FreezeError::InsufficientWindow(_))
        ));
        assert!(matches!(
            extrapolate_blockwise(&signal, 50, 10, 4, 20, 0, options),
            Err(FreezeError::InvalidInput(_))
        ));

        // Window equal to the order, at the earliest valid position
        assert!(extrapolate(&signal, 21, 10, 20, 20, options).is_ok());
        // Freezing at the very end of the signal
        assert_eq!(extrapolate(&signal, 100, 10, 4, 20, options).unwrap().len(), 110);
    }
}
