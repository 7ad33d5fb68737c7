//! Burg AR estimation
//!
//! Fits an autoregressive model to a window of (complex) samples with Burg's
//! order-recursive method.
//!
//! # Algorithm
//!
//! 1. Start with forward and backward prediction errors equal to the samples
//!    and error power `E[0] = sum(|x|^2) / N`
//! 2. For each stage `m`, drop the first forward error and the last backward
//!    error so both sequences are aligned one lag apart
//! 3. Reflection coefficient: `k[m] = -2 <eb, ef> / (‖ef‖^2 + ‖eb‖^2)`
//! 4. Update errors: `ef' = ef + k eb`, `eb' = eb + conj(k) ef`
//! 5. Levinson order update: `a' = [a, 0] + k * conj(reverse([a, 0]))`
//! 6. Error power: `E[m+1] = (1 - |k|^2) E[m]`
//!
//! No window or taper is applied to the samples.
//!
//! # Reference
//!
//! Marple, S. L. (1987). *Digital Spectral Analysis with Applications*.
//! Prentice-Hall, chapter 8.
//!
//! # Example
//!
//! ```
//! use stratum_freeze::ar::burg::estimate_real;
//! use stratum_freeze::config::EstimatorOptions;
//!
//! let samples: Vec<f64> = (0..64).map(|i| (i as f64 * 0.3).sin()).collect();
//! let model = estimate_real(&samples, 2, EstimatorOptions::default())?;
//! assert_eq!(model.coefficients.len(), 3);
//! # Ok::<(), stratum_freeze::FreezeError>(())
//! ```

use super::{energy, inner_product, ArModel};
use crate::config::{DegeneracyPolicy, EstimatorOptions, StabilityPolicy};
use crate::error::FreezeError;
use rustfft::num_complex::Complex;

/// A stage is degenerate when its denominator falls below this fraction of
/// the stage-0 denominator `2 * N * E[0]`
const DEGENERACY_TOLERANCE: f64 = 1e-20;

/// Estimate an AR model with Burg's method
///
/// # Arguments
///
/// * `samples` - Analysis window (must hold more than `order` samples)
/// * `order` - Model order (>= 1)
/// * `options` - Degeneracy and stability policies
///
/// # Returns
///
/// `ArModel` with `order + 1` coefficients (`a[0] = 1`), the final error
/// power and `order` reflection coefficients
///
/// # Errors
///
/// - `InvalidOrder` if `order == 0`
/// - `InsufficientWindow` if `samples.len() <= order`
/// - `NumericDegeneracy` on a degenerate stage under `DegeneracyPolicy::Reject`
/// - `UnstableModel` if any `|k| >= 1` under `StabilityPolicy::Reject`
pub fn estimate(
    samples: &[Complex<f64>],
    order: usize,
    options: EstimatorOptions,
) -> Result<ArModel, FreezeError> {
    if order == 0 {
        return Err(FreezeError::InvalidOrder(order));
    }

    let n = samples.len();
    if n <= order {
        return Err(FreezeError::InsufficientWindow(format!(
            "{} samples cannot fit an order {} model",
            n, order
        )));
    }

    log::debug!("Burg estimation: {} samples, order {}", n, order);

    let rho = energy(samples) / n as f64;
    let degenerate_below = DEGENERACY_TOLERANCE * 2.0 * n as f64 * rho;

    let mut ef = samples.to_vec();
    let mut eb = samples.to_vec();

    let mut a = Vec::with_capacity(order + 1);
    a.push(Complex::new(1.0, 0.0));
    let mut reflection = Vec::with_capacity(order);
    let mut error_trajectory = Vec::with_capacity(order + 1);
    error_trajectory.push(rho);
    let mut truncated_at = None;

    for m in 0..order {
        let len = ef.len();
        let efp = &ef[1..];
        let ebp = &eb[..len - 1];

        let num = inner_product(ebp, efp) * -2.0;
        let den = energy(efp) + energy(ebp);
        let k = num / den;

        if den <= degenerate_below || !k.is_finite() {
            match options.degeneracy {
                DegeneracyPolicy::Reject => {
                    return Err(FreezeError::NumericDegeneracy { stage: m });
                }
                DegeneracyPolicy::Truncate => {
                    log::debug!(
                        "Degenerate reflection stage {} (den={:.3e}), truncating model",
                        m,
                        den
                    );
                    truncated_at = Some(m);
                    break;
                }
            }
        }

        let (ef_next, eb_next): (Vec<_>, Vec<_>) = efp
            .iter()
            .zip(ebp.iter())
            .map(|(&f, &b)| (f + k * b, b + k.conj() * f))
            .unzip();
        ef = ef_next;
        eb = eb_next;

        a.push(Complex::new(0.0, 0.0));
        let flipped: Vec<Complex<f64>> = a.iter().rev().map(|c| c.conj()).collect();
        for (c, f) in a.iter_mut().zip(flipped) {
            *c += k * f;
        }

        let e = (Complex::new(1.0, 0.0) - k * k.conj()).re * error_trajectory[m];
        error_trajectory.push(e);
        reflection.push(k);
    }

    if truncated_at.is_some() {
        let held = error_trajectory.last().copied().unwrap_or(rho);
        a.resize(order + 1, Complex::new(0.0, 0.0));
        reflection.resize(order, Complex::new(0.0, 0.0));
        error_trajectory.resize(order + 1, held);
    }

    let model = ArModel {
        error: error_trajectory[order],
        coefficients: a,
        reflection,
        error_trajectory,
        truncated_at,
    };

    if let Some((stage, magnitude)) = model.first_unstable_stage() {
        match options.stability {
            StabilityPolicy::Reject => {
                return Err(FreezeError::UnstableModel { stage, magnitude });
            }
            StabilityPolicy::Permissive => {
                log::warn!(
                    "AR model is not strictly stable: |k[{}]| = {:.6}, extrapolation may diverge",
                    stage,
                    magnitude
                );
            }
        }
    }

    log::debug!(
        "Burg estimation done: E[0]={:.6e}, E[{}]={:.6e}, max |k|={:.6}",
        rho,
        order,
        model.error,
        model.max_reflection_magnitude()
    );

    Ok(model)
}

/// Estimate an AR model of a real-valued window
///
/// Same as [`estimate`] with every sample lifted to a complex value with zero
/// imaginary part.
pub fn estimate_real(
    samples: &[f64],
    order: usize,
    options: EstimatorOptions,
) -> Result<ArModel, FreezeError> {
    let lifted: Vec<Complex<f64>> = samples.iter().map(|&x| Complex::new(x, 0.0)).collect();
    estimate(&lifted, order, options)
}
