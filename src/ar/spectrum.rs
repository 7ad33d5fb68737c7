//! AR power spectral density
//!
//! Evaluates the Burg PSD estimate of a fitted model:
//!
//! `P(f) = E / |A(e^{j 2π f / fs})|^2`
//!
//! `A` is sampled on an `nfft`-point grid by zero-padding the coefficient
//! vector and taking its FFT. Only the non-negative frequencies
//! (`0..=nfft/2`) are returned; values are not doubled.

use super::ArModel;
use crate::error::FreezeError;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Floor for `|A|^2` so that poles on the unit circle give a finite peak
const EPSILON: f64 = 1e-300;

/// One-sided AR spectrum
#[derive(Debug, Clone)]
pub struct ArSpectrum {
    /// Bin frequencies in Hz
    pub frequencies: Vec<f64>,

    /// Power spectral density per bin
    pub power: Vec<f64>,
}

impl ArSpectrum {
    /// Frequency (Hz) of the strongest bin, excluding DC
    pub fn peak_frequency(&self) -> Option<f64> {
        self.power
            .iter()
            .enumerate()
            .skip(1)
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| self.frequencies[i])
    }
}

/// Compute the AR power spectral density of a model
///
/// # Arguments
///
/// * `model` - Fitted AR model
/// * `nfft` - FFT length (must be > model order)
/// * `sample_rate` - Sample rate in Hz
///
/// # Errors
///
/// Returns `InvalidInput` if `nfft <= order` or `sample_rate <= 0`
pub fn power_spectral_density(
    model: &ArModel,
    nfft: usize,
    sample_rate: f64,
) -> Result<ArSpectrum, FreezeError> {
    if nfft <= model.order() {
        return Err(FreezeError::InvalidInput(format!(
            "FFT length {} must exceed model order {}",
            nfft,
            model.order()
        )));
    }
    if !sample_rate.is_finite() || sample_rate <= 0.0 {
        return Err(FreezeError::InvalidInput(format!(
            "Invalid sample rate: {}",
            sample_rate
        )));
    }

    log::debug!(
        "AR spectrum: order {}, nfft {}, fs {:.1} Hz",
        model.order(),
        nfft,
        sample_rate
    );

    let mut buffer = vec![Complex::new(0.0, 0.0); nfft];
    buffer[..model.coefficients.len()].copy_from_slice(&model.coefficients);

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(nfft);
    fft.process(&mut buffer);

    let bins = nfft / 2 + 1;
    let frequencies = (0..bins)
        .map(|i| i as f64 * sample_rate / nfft as f64)
        .collect();
    let power = buffer[..bins]
        .iter()
        .map(|h| model.error / h.norm_sqr().max(EPSILON))
        .collect();

    Ok(ArSpectrum { frequencies, power })
}
