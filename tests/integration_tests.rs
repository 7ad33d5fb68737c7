//! Integration tests for the freeze engine

use std::path::PathBuf;
use stratum_freeze::{
    freeze_audio, freeze_file, DegeneracyPolicy, EstimatorOptions, FreezeConfig, FreezeError,
    FreezeFlag, StabilityPolicy,
};

/// Load a WAV file and return (mono samples, sample_rate)
fn load_wav(path: &str) -> Result<(Vec<f32>, u32), Box<dyn std::error::Error>> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?,
        hound::SampleFormat::Int => {
            let max_value = (1 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|s| s as f32 / max_value))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    // Convert to mono if stereo
    let mono_samples = if spec.channels == 2 {
        samples
            .chunks(2)
            .map(|chunk| (chunk[0] + chunk[1]) / 2.0)
            .collect()
    } else {
        samples
    };

    Ok((mono_samples, spec.sample_rate))
}

/// Write a 16-bit stereo WAV file with different content per channel
fn write_stereo_fixture(path: &PathBuf, left: &[f32], right: &[f32], sample_rate: u32) {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).expect("create fixture");
    for (l, r) in left.iter().zip(right.iter()) {
        writer
            .write_sample((l * 32767.0) as i16)
            .expect("write left");
        writer
            .write_sample((r * 32767.0) as i16)
            .expect("write right");
    }
    writer.finalize().expect("finalize fixture");
}

fn temp_path(filename: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "stratum_freeze_it_{}_{}",
        std::process::id(),
        filename
    ))
}

fn sine(len: usize, freq: f32, sample_rate: f32, amplitude: f32) -> Vec<f32> {
    (0..len)
        .map(|i| amplitude * (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate).sin())
        .collect()
}

fn peak_error(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0f32, f32::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_freeze_two_hz_sine() {
        let samples = sine(200, 2.0, 100.0, 1.0);
        let config = FreezeConfig {
            order: 4,
            analysis_window: 50,
            position: 150,
            duration: 50,
            ..FreezeConfig::default()
        };

        let result = freeze_audio(&samples, 100, config).expect("Freeze should succeed");

        assert_eq!(result.samples.len(), 200);
        assert_eq!(&result.samples[..150], &samples[..150]);
        let error = peak_error(result.tail(), &samples[150..]);
        assert!(error < 0.05, "peak error {:.6}", error);

        assert_eq!(result.metadata.extrapolated_samples, 50);
        assert!(result.metadata.max_reflection_magnitude.unwrap() > 0.99);
        assert!(!result.has_flag(FreezeFlag::Clipping));
    }

    #[test]
    fn test_freeze_sustains_tone_for_ten_periods() {
        // 441 Hz at 44.1 kHz: 100-sample period
        let samples = sine(8000, 441.0, 44100.0, 0.5);
        let config = FreezeConfig {
            order: 4,
            analysis_window: 400,
            position: 4000,
            duration: 1000,
            ..FreezeConfig::default()
        };

        let result = freeze_audio(&samples, 44100, config).expect("Freeze should succeed");
        let error = peak_error(result.tail(), &samples[4000..5000]);
        assert!(error < 1e-3, "peak error {:.6}", error);
    }

    #[test]
    fn test_loud_tone_is_flagged_as_clipping() {
        let samples = sine(8000, 441.0, 44100.0, 1.5);
        let config = FreezeConfig {
            order: 4,
            analysis_window: 400,
            position: 4000,
            duration: 1000,
            ..FreezeConfig::default()
        };

        let result = freeze_audio(&samples, 44100, config).expect("Freeze should succeed");
        assert!(result.has_flag(FreezeFlag::Clipping));
        assert!(!result.has_flag(FreezeFlag::DivergentOutput));
        assert!(result.metadata.tail_peak > 1.0);
        // Not clamped
        assert!(result.tail().iter().any(|v| v.abs() > 1.4));
    }

    #[test]
    fn test_blockwise_matches_single_pass() {
        let samples: Vec<f32> = (0..6000)
            .map(|i| {
                let t = i as f32;
                0.4 * (0.05 * t).sin() + 0.2 * (0.31 * t).sin() + 0.1 * (0.013 * t * t).sin()
            })
            .collect();
        let base = FreezeConfig {
            position: 5000,
            duration: 2048,
            ..FreezeConfig::with_order(64)
        };

        let single = freeze_audio(&samples, 44100, base.clone()).unwrap();
        let blocks = freeze_audio(
            &samples,
            44100,
            FreezeConfig {
                block_size: Some(256),
                ..base
            },
        )
        .unwrap();

        assert_eq!(single.samples, blocks.samples);
        assert!(!blocks.has_flag(FreezeFlag::PartialBlockDropped));
        assert_eq!(blocks.metadata.block_size, Some(256));
    }

    #[test]
    fn test_blockwise_partial_block_is_dropped() {
        let samples = sine(3000, 300.0, 44100.0, 0.5);
        let config = FreezeConfig {
            position: 2000,
            duration: 1000,
            block_size: Some(FreezeConfig::DEFAULT_BLOCK_SIZE / 4),
            ..FreezeConfig::with_order(16)
        };

        let result = freeze_audio(&samples, 44100, config).unwrap();
        assert_eq!(result.metadata.extrapolated_samples, 768);
        assert_eq!(result.samples.len(), 2768);
        assert!(result.has_flag(FreezeFlag::PartialBlockDropped));
    }

    #[test]
    fn test_zero_duration_keeps_prefix() {
        let samples = sine(1000, 100.0, 8000.0, 0.5);
        let config = FreezeConfig {
            position: 600,
            duration: 0,
            ..FreezeConfig::with_order(16)
        };

        let result = freeze_audio(&samples, 8000, config).unwrap();
        assert_eq!(result.samples, samples[..600].to_vec());
        assert!(result.model.is_none());
        assert!(result.metadata.final_error.is_none());
    }

    #[test]
    fn test_constant_signal_policies() {
        let samples = vec![0.3f32; 1000];
        let config = FreezeConfig {
            position: 800,
            duration: 200,
            ..FreezeConfig::with_order(8)
        };

        let result = freeze_audio(&samples, 8000, config.clone()).unwrap();
        for v in result.tail() {
            assert!((v - 0.3).abs() < 1e-6, "tail sample {}", v);
        }
        // Unit first reflection, then nothing left to model
        assert!(result.has_flag(FreezeFlag::UnstableModel));
        assert!(result.has_flag(FreezeFlag::TruncatedModel));
        assert_eq!(result.metadata.truncated_at, Some(1));
        assert!(!result.has_flag(FreezeFlag::Clipping));

        let strict = FreezeConfig {
            estimator: EstimatorOptions {
                degeneracy: DegeneracyPolicy::Reject,
                stability: StabilityPolicy::Permissive,
            },
            ..config.clone()
        };
        let err = freeze_audio(&samples, 8000, strict).unwrap_err();
        assert_eq!(err, FreezeError::NumericDegeneracy { stage: 1 });

        let stable_only = FreezeConfig {
            estimator: EstimatorOptions {
                degeneracy: DegeneracyPolicy::Truncate,
                stability: StabilityPolicy::Reject,
            },
            ..config
        };
        let err = freeze_audio(&samples, 8000, stable_only).unwrap_err();
        assert!(matches!(err, FreezeError::UnstableModel { stage: 0, .. }));
    }

    #[test]
    fn test_invalid_inputs() {
        let samples = sine(1000, 100.0, 8000.0, 0.5);

        let err = freeze_audio(&[], 8000, FreezeConfig::default()).unwrap_err();
        assert!(err.to_string().contains("Empty"));

        let err = freeze_audio(&samples, 0, FreezeConfig::default()).unwrap_err();
        assert!(matches!(err, FreezeError::InvalidInput(_)));

        // Default config freezes at 44100, past the end of this signal
        let err = freeze_audio(&samples, 8000, FreezeConfig::default()).unwrap_err();
        assert!(matches!(err, FreezeError::InvalidInput(_)));

        let err = freeze_audio(
            &samples,
            8000,
            FreezeConfig {
                position: 500,
                duration: 10,
                ..FreezeConfig::with_order(600)
            },
        )
        .unwrap_err();
        assert!(matches!(err, FreezeError::InsufficientWindow(_)));

        let err = freeze_audio(
            &samples,
            8000,
            FreezeConfig {
                position: 500,
                duration: 10,
                ..FreezeConfig::with_order(0)
            },
        )
        .unwrap_err();
        assert_eq!(err, FreezeError::InvalidOrder(0));
    }

    #[test]
    fn test_metadata_serializes_to_json() {
        let samples = sine(1000, 100.0, 8000.0, 0.5);
        let config = FreezeConfig {
            position: 600,
            duration: 100,
            ..FreezeConfig::with_order(16)
        };
        let result = freeze_audio(&samples, 8000, config).unwrap();

        let json = serde_json::to_string(&result.metadata).expect("serialize metadata");
        assert!(json.contains("\"order\":16"));
        assert!(json.contains("\"sample_rate\":8000"));
        assert!(!json.contains("block_size"));
    }

    #[test]
    fn test_freeze_stereo_file() {
        let input = temp_path("stereo_in.wav");
        let output = temp_path("frozen_out.wav");

        let left = sine(4000, 220.0, 22050.0, 0.4);
        let right = sine(4000, 220.0, 22050.0, 0.2);
        write_stereo_fixture(&input, &left, &right, 22050);

        let config = FreezeConfig {
            order: 2,
            analysis_window: 1000,
            position: 3000,
            duration: 2000,
            ..FreezeConfig::default()
        };
        let result = freeze_file(&input, &output, config).expect("Freeze should succeed");

        let (written, sample_rate) =
            load_wav(output.to_str().unwrap()).expect("Failed to load frozen output");
        let _ = std::fs::remove_file(&input);
        let _ = std::fs::remove_file(&output);

        assert_eq!(sample_rate, 22050);
        assert_eq!(written.len(), 5000);
        assert_eq!(written, result.samples);

        // Channel average of 0.4 and 0.2 amplitude is a 0.3 amplitude sine.
        // 16-bit quantization biases the fitted frequency slightly, so the
        // phase drifts slowly while the amplitude holds.
        let expected = sine(5000, 220.0, 22050.0, 0.3);
        let error = peak_error(&written[3000..3200], &expected[3000..3200]);
        assert!(error < 0.01, "peak error {:.6}", error);
        let tail_peak = written[3000..].iter().fold(0.0f32, |acc, v| acc.max(v.abs()));
        assert!(tail_peak > 0.28 && tail_peak < 0.32, "tail peak {:.4}", tail_peak);
    }
}
