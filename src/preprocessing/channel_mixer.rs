//! Channel mixing utilities (multichannel to mono conversion)

use crate::error::FreezeError;

/// Channel mixing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelMixMode {
    /// Per-frame average of all channels: (L + R) / 2 for stereo
    #[default]
    Average,
    /// Keep the channel with the highest RMS
    Dominant,
}

/// Convert planar multichannel audio to mono
///
/// # Arguments
///
/// * `channels` - One sample slice per channel, all of the same length
/// * `mode` - Mixing mode
///
/// # Returns
///
/// Mono samples
///
/// # Errors
///
/// Returns `InvalidInput` if no channels are given or their lengths differ
pub fn mix_to_mono<C: AsRef<[f32]>>(
    channels: &[C],
    mode: ChannelMixMode,
) -> Result<Vec<f32>, FreezeError> {
    let first = channels
        .first()
        .ok_or_else(|| FreezeError::InvalidInput("No channels to mix".to_string()))?
        .as_ref();
    let frames = first.len();

    if channels.iter().any(|c| c.as_ref().len() != frames) {
        return Err(FreezeError::InvalidInput(
            "Channels have different lengths".to_string(),
        ));
    }

    log::debug!(
        "Mixing {} channels x {} frames to mono using {:?}",
        channels.len(),
        frames,
        mode
    );

    if channels.len() == 1 {
        return Ok(first.to_vec());
    }

    match mode {
        ChannelMixMode::Average => {
            let scale = 1.0 / channels.len() as f32;
            Ok((0..frames)
                .map(|i| channels.iter().map(|c| c.as_ref()[i]).sum::<f32>() * scale)
                .collect())
        }
        ChannelMixMode::Dominant => {
            let energy = |c: &[f32]| c.iter().map(|&x| x as f64 * x as f64).sum::<f64>();
            let loudest = channels
                .iter()
                .map(|c| c.as_ref())
                .max_by(|a, b| {
                    energy(*a)
                        .partial_cmp(&energy(*b))
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .unwrap_or(first);
            Ok(loudest.to_vec())
        }
    }
}

/// Convert stereo to mono
///
/// # Arguments
///
/// * `left` - Left channel samples
/// * `right` - Right channel samples
/// * `mode` - Mixing mode
///
/// # Returns
///
/// Mono samples
pub fn stereo_to_mono(
    left: &[f32],
    right: &[f32],
    mode: ChannelMixMode,
) -> Result<Vec<f32>, FreezeError> {
    mix_to_mono(&[left, right], mode)
}

/// Convert interleaved multichannel audio to mono
///
/// A trailing partial frame is ignored.
pub fn interleaved_to_mono(
    samples: &[f32],
    channels: usize,
    mode: ChannelMixMode,
) -> Result<Vec<f32>, FreezeError> {
    if channels == 0 {
        return Err(FreezeError::InvalidInput(
            "Channel count must be > 0".to_string(),
        ));
    }

    let frames = samples.len() / channels;
    let planar: Vec<Vec<f32>> = (0..channels)
        .map(|ch| (0..frames).map(|i| samples[i * channels + ch]).collect())
        .collect();
    mix_to_mono(&planar, mode)
}
