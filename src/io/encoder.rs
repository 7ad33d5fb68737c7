//! Audio encoding using hound (32-bit float WAV)

use crate::error::FreezeError;
use std::path::Path;

/// Write mono samples to a 32-bit float WAV file
///
/// # Arguments
///
/// * `path` - Output path
/// * `samples` - Mono samples
/// * `sample_rate` - Sample rate in Hz
///
/// # Errors
///
/// Returns `InvalidInput` for a zero sample rate and `EncodingError` if the
/// file cannot be written
pub fn encode_wav<P: AsRef<Path>>(
    path: P,
    samples: &[f32],
    sample_rate: u32,
) -> Result<(), FreezeError> {
    if sample_rate == 0 {
        return Err(FreezeError::InvalidInput("Invalid sample rate".to_string()));
    }

    let path = path.as_ref();
    log::debug!(
        "Encoding {} samples at {} Hz to {}",
        samples.len(),
        sample_rate,
        path.display()
    );

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let encoding_error = |e: hound::Error| FreezeError::EncodingError(e.to_string());

    let mut writer = hound::WavWriter::create(path, spec).map_err(encoding_error)?;
    for &sample in samples {
        writer.write_sample(sample).map_err(encoding_error)?;
    }
    writer.finalize().map_err(encoding_error)
}
