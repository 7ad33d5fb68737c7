//! Result aggregation modules
//!
//! Collects the output of a freeze run:
//! - Result types
//! - Metadata and flags

pub mod metadata;
pub mod result;
