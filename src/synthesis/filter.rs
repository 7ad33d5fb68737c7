//! All-pole IIR filtering with explicit state
//!
//! Implements `y[n] = x[n] / a[0] - (a[1] y[n-1] + ... + a[p] y[n-p]) / a[0]`
//! in direct form II transposed, the same recurrence and state layout as
//! `scipy.signal.lfilter` with numerator `[1]`.
//!
//! The state is threaded by value through [`AllPoleFilter::apply`], so a long
//! input can be filtered in chunks and give exactly the same output as one
//! call over the whole input.

use crate::ar::ArModel;
use crate::error::FreezeError;

/// Delay line of an all-pole filter (`order` values)
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    delay: Vec<f64>,
}

impl FilterState {
    /// Zero state (filter at rest)
    pub fn zeros(order: usize) -> Self {
        Self {
            delay: vec![0.0; order],
        }
    }

    /// Delay line values
    pub fn as_slice(&self) -> &[f64] {
        &self.delay
    }

    /// Number of delay elements
    pub fn len(&self) -> usize {
        self.delay.len()
    }

    /// True for an order-0 filter
    pub fn is_empty(&self) -> bool {
        self.delay.is_empty()
    }
}

/// All-pole synthesis filter `1 / A(z)`
#[derive(Debug, Clone)]
pub struct AllPoleFilter {
    /// Denominator normalized so that `a[0] = 1`
    a: Vec<f64>,
    /// `1 / a[0]` of the original denominator
    gain: f64,
}

impl AllPoleFilter {
    /// Create a filter from denominator coefficients `a[0..=p]`
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the denominator is empty, `a[0]` is zero, or
    /// any coefficient is non-finite
    pub fn new(denominator: &[f64]) -> Result<Self, FreezeError> {
        let a0 = match denominator.first() {
            Some(&a0) => a0,
            None => {
                return Err(FreezeError::InvalidInput(
                    "Empty filter denominator".to_string(),
                ))
            }
        };
        if a0 == 0.0 {
            return Err(FreezeError::InvalidInput(
                "Filter denominator a[0] must be non-zero".to_string(),
            ));
        }
        if denominator.iter().any(|c| !c.is_finite()) {
            return Err(FreezeError::InvalidInput(
                "Filter denominator must be finite".to_string(),
            ));
        }

        let a = denominator.iter().map(|c| c / a0).collect();
        Ok(Self { a, gain: 1.0 / a0 })
    }

    /// Synthesis filter of a fitted model (real part of its coefficients)
    pub fn from_model(model: &ArModel) -> Result<Self, FreezeError> {
        Self::new(&model.real_coefficients())
    }

    /// Filter order `p`
    pub fn order(&self) -> usize {
        self.a.len() - 1
    }

    /// Normalized denominator coefficients
    pub fn coefficients(&self) -> &[f64] {
        &self.a
    }

    /// Initial state that continues a known output history with zero input
    ///
    /// `history[j]` is the output `j + 1` samples in the past (most recent
    /// first). Past inputs are taken as zero, so
    /// `z[m] = -sum_{j=0}^{p-m-1} a[m+1+j] * history[j]`.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientWindow` if fewer than `order` history samples are
    /// given
    pub fn initial_state(&self, history: &[f64]) -> Result<FilterState, FreezeError> {
        let order = self.order();
        if history.len() < order {
            return Err(FreezeError::InsufficientWindow(format!(
                "{} history samples cannot seed an order {} filter",
                history.len(),
                order
            )));
        }

        let delay = (0..order)
            .map(|m| {
                -self.a[m + 1..]
                    .iter()
                    .zip(history.iter())
                    .map(|(a, y)| a * y)
                    .sum::<f64>()
            })
            .collect();
        Ok(FilterState { delay })
    }

    /// Filter `input` starting from `state`
    ///
    /// Returns the output (same length as `input`) and the state after the
    /// last sample.
    pub fn apply(&self, input: &[f64], state: FilterState) -> (Vec<f64>, FilterState) {
        let order = self.order();
        debug_assert_eq!(state.len(), order, "state does not match filter order");

        let mut z = state.delay;
        let mut output = Vec::with_capacity(input.len());

        for &x in input {
            let y = if order == 0 {
                self.gain * x
            } else {
                self.gain * x + z[0]
            };
            for i in 0..order.saturating_sub(1) {
                z[i] = z[i + 1] - self.a[i + 1] * y;
            }
            if order > 0 {
                z[order - 1] = -self.a[order] * y;
            }
            output.push(y);
        }

        (output, FilterState { delay: z })
    }
}
