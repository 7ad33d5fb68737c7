//! Autoregressive modelling modules
//!
//! Fit and inspect AR models of a sample window:
//! - Burg order-recursive estimation
//! - AR power spectral density

pub mod burg;
pub mod spectrum;

use rustfft::num_complex::Complex;

/// Reflection coefficients at or above this magnitude make the synthesis
/// filter marginally stable or unstable
pub const STABILITY_LIMIT: f64 = 1.0;

/// Fitted autoregressive model
///
/// The prediction polynomial is `A(z) = a[0] + a[1] z^-1 + ... + a[p] z^-p`
/// with `a[0] = 1`. The synthesis filter is `1 / A(z)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArModel {
    /// Coefficients `a[0..=order]`, `a[0] = 1`
    pub coefficients: Vec<Complex<f64>>,

    /// Final prediction-error power `E[order]`
    pub error: f64,

    /// Reflection coefficients, one per stage
    pub reflection: Vec<Complex<f64>>,

    /// Prediction-error power after each stage, `E[0..=order]`
    pub error_trajectory: Vec<f64>,

    /// Stage at which the recursion hit a degenerate denominator and was cut
    /// short (remaining stages zero-padded)
    pub truncated_at: Option<usize>,
}

impl ArModel {
    /// Model order `p`
    pub fn order(&self) -> usize {
        self.reflection.len()
    }

    /// Real part of the coefficients, i.e. the denominator of a real
    /// all-pole synthesis filter
    pub fn real_coefficients(&self) -> Vec<f64> {
        self.coefficients.iter().map(|c| c.re).collect()
    }

    /// Largest reflection coefficient magnitude (0.0 for an empty model)
    pub fn max_reflection_magnitude(&self) -> f64 {
        self.reflection
            .iter()
            .map(|k| k.norm())
            .fold(0.0f64, f64::max)
    }

    /// First stage whose reflection coefficient magnitude is >= 1
    pub fn first_unstable_stage(&self) -> Option<(usize, f64)> {
        self.reflection
            .iter()
            .map(|k| k.norm())
            .enumerate()
            .find(|(_, magnitude)| *magnitude >= STABILITY_LIMIT)
    }

    /// True if every reflection coefficient has magnitude < 1
    pub fn is_stable(&self) -> bool {
        self.first_unstable_stage().is_none()
    }
}

/// Conjugate inner product `<u, v> = sum(conj(u_i) * v_i)`
///
/// Extra elements of the longer slice are ignored.
pub fn inner_product(u: &[Complex<f64>], v: &[Complex<f64>]) -> Complex<f64> {
    u.iter()
        .zip(v.iter())
        .fold(Complex::new(0.0, 0.0), |acc, (x, y)| acc + x.conj() * y)
}

/// Squared norm `‖u‖^2 = sum(|u_i|^2)`
pub fn energy(u: &[Complex<f64>]) -> f64 {
    u.iter().map(|x| x.norm_sqr()).sum()
}
