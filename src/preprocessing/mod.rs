//! Audio preprocessing modules
//!
//! This module contains utilities for preparing audio before freezing:
//! - Channel mixing (multichannel to mono)

pub mod channel_mixer;
