//! Audio I/O modules
//!
//! Audio decoding with Symphonia and WAV encoding with hound.

pub mod decoder;
pub mod encoder;

pub use decoder::{decode_audio, DecodedAudio};
pub use encoder::encode_wav;
