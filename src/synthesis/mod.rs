//! Synthesis modules
//!
//! Regenerate a signal from a fitted AR model:
//! - All-pole IIR filtering with explicit, carried state
//! - Zero-input extrapolation past a freeze position (single pass or blocks)

pub mod extrapolate;
pub mod filter;

pub use extrapolate::{extrapolate, extrapolate_blockwise, Extrapolation, SynthesisMode};
pub use filter::{AllPoleFilter, FilterState};
