//! Example: Freeze a single audio file
//!
//! Usage:
//!   cargo run --release --example freeze_file -- <input> <output> [-n ORDER] [-x POS] [-d DUR]
//!       [--window N] [--block N] [--strict] [--psd] [--json]
//!
//! Notes:
//! - Multichannel input is averaged to mono; output is a 32-bit float mono WAV.
//! - The analysis window defaults to the order.

use std::env;
use stratum_freeze::ar::spectrum::power_spectral_density;
use stratum_freeze::{
    freeze_file, DegeneracyPolicy, EstimatorOptions, FreezeConfig, StabilityPolicy,
};

fn parse_value(args: &mut Vec<String>, flag: &str) -> Result<usize, Box<dyn std::error::Error>> {
    let v = args
        .first()
        .ok_or_else(|| format!("{} requires a value", flag))?
        .parse::<usize>()?;
    args.remove(0);
    Ok(v)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args: Vec<String> = env::args().skip(1).collect();

    let defaults = FreezeConfig::default();
    let mut order = defaults.order;
    let mut position = defaults.position;
    let mut duration = defaults.duration;
    let mut window: Option<usize> = None;
    let mut block_size: Option<usize> = None;
    let mut strict = false;
    let mut psd = false;
    let mut json = false;
    let mut paths: Vec<String> = Vec::new();

    while let Some(a) = args.first().cloned() {
        args.remove(0);
        match a.as_str() {
            "-n" | "--n" => order = parse_value(&mut args, "-n")?,
            "-x" | "--x" => position = parse_value(&mut args, "-x")?,
            "-d" | "--d" => duration = parse_value(&mut args, "-d")?,
            "--window" => window = Some(parse_value(&mut args, "--window")?),
            "--block" => {
                let explicit = args.first().and_then(|v| v.parse::<usize>().ok());
                if explicit.is_some() {
                    args.remove(0);
                }
                block_size = Some(explicit.unwrap_or(FreezeConfig::DEFAULT_BLOCK_SIZE));
            }
            "--strict" => strict = true,
            "--psd" => psd = true,
            "--json" => json = true,
            "--help" | "-h" => {
                eprintln!(
                    "Usage: freeze_file <input> <output> [options]\n\
                     \n\
                     -n ORDER     AR model order (default: {})\n\
                     -x POS       Extrapolation start sample (default: {})\n\
                     -d DUR       Extrapolation length in samples (default: {})\n\
                     --window N   Analysis window in samples (default: ORDER)\n\
                     --block [N]  Block-wise synthesis with N-sample blocks (default: {})\n\
                     --strict     Reject degenerate or unstable models\n\
                     --psd        Print the dominant frequency of the fitted model\n\
                     --json       Print metadata as JSON\n",
                    defaults.order,
                    defaults.position,
                    defaults.duration,
                    FreezeConfig::DEFAULT_BLOCK_SIZE
                );
                return Ok(());
            }
            _ => paths.push(a),
        }
    }

    if paths.len() != 2 {
        eprintln!("ERROR: Provide an input and an output path. Use --help for usage.");
        std::process::exit(2);
    }

    let estimator = if strict {
        EstimatorOptions {
            degeneracy: DegeneracyPolicy::Reject,
            stability: StabilityPolicy::Reject,
        }
    } else {
        EstimatorOptions::default()
    };

    let config = FreezeConfig {
        order,
        analysis_window: window.unwrap_or(order),
        position,
        duration,
        block_size,
        estimator,
    };

    let result = freeze_file(&paths[0], &paths[1], config)?;

    if json {
        println!("{}", serde_json::to_string(&result.metadata)?);
    } else {
        println!("Freeze Results:");
        println!("  Output: {} ({:.2} s)", paths[1], result.duration_seconds());
        println!(
            "  Extrapolated: {} samples from {}",
            result.metadata.extrapolated_samples, result.metadata.position
        );
        if let Some(e) = result.metadata.final_error {
            println!("  Final prediction error: {:.3e}", e);
        }
        if let Some(k) = result.metadata.max_reflection_magnitude {
            println!("  Max |reflection|: {:.6}", k);
        }
        println!("  Flags: {:?}", result.metadata.flags);
        println!("  Processing time: {:.2} ms", result.metadata.processing_time_ms);
    }

    if psd {
        if let Some(model) = &result.model {
            let nfft = (model.order() + 1).next_power_of_two().max(8192);
            let spectrum =
                power_spectral_density(model, nfft, result.metadata.sample_rate as f64)?;
            if let Some(f) = spectrum.peak_frequency() {
                println!("  Dominant frequency: {:.1} Hz", f);
            }
        }
    }

    Ok(())
}
