//! Example: Freeze multiple audio files in parallel
//!
//! Usage:
//!   cargo run --release --example freeze_batch -- [--jobs N] [--json] [-n ORDER] [-x POS] [-d DUR]
//!       --out-dir DIR <file1> <file2> ...
//!
//! Notes:
//! - Parallelism is across files (batch-level). Each freeze is still single-threaded.
//! - Default workers: (available CPU threads - 1), keeping one core free for the system.
//! - Each output is written as `<out-dir>/<file stem>_frozen.wav`.

use rayon::prelude::*;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Instant;
use stratum_freeze::{freeze_file, FreezeConfig, FreezeMetadata};

fn default_jobs() -> usize {
    let n = std::thread::available_parallelism()
        .map(|v| v.get())
        .unwrap_or(1);
    std::cmp::max(1, n.saturating_sub(1))
}

fn output_path(out_dir: &Path, input: &str) -> PathBuf {
    let stem = Path::new(input)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    out_dir.join(format!("{}_frozen.wav", stem))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args: Vec<String> = env::args().skip(1).collect();

    let mut json = false;
    let mut jobs: Option<usize> = None;
    let mut out_dir: Option<PathBuf> = None;
    let mut config = FreezeConfig::default();
    let mut paths: Vec<String> = Vec::new();

    while let Some(a) = args.first().cloned() {
        args.remove(0);
        match a.as_str() {
            "--json" => json = true,
            "--jobs" | "-n" | "-x" | "-d" | "--out-dir" => {
                let v = args
                    .first()
                    .cloned()
                    .ok_or_else(|| format!("{} requires a value", a))?;
                args.remove(0);
                match a.as_str() {
                    "--jobs" => jobs = Some(std::cmp::max(1, v.parse::<usize>()?)),
                    "-n" => config.set_order(v.parse()?),
                    "-x" => config.position = v.parse()?,
                    "-d" => config.duration = v.parse()?,
                    _ => out_dir = Some(PathBuf::from(v)),
                }
            }
            "--help" | "-h" => {
                eprintln!(
                    "Usage: freeze_batch [--jobs N] [--json] [-n ORDER] [-x POS] [-d DUR] --out-dir DIR <file1> ...\n\
                     \n\
                     --jobs N      Parallel workers (default: CPU-1)\n\
                     --json        Emit one JSON object per line (JSONL)\n\
                     --out-dir DIR Directory for frozen WAV files\n"
                );
                return Ok(());
            }
            _ => paths.push(a),
        }
    }

    let out_dir = match out_dir {
        Some(dir) => dir,
        None => {
            eprintln!("ERROR: --out-dir is required. Use --help for usage.");
            std::process::exit(2);
        }
    };
    if paths.is_empty() {
        eprintln!("ERROR: Provide at least one audio file path. Use --help for usage.");
        std::process::exit(2);
    }
    std::fs::create_dir_all(&out_dir)?;

    let jobs = jobs.unwrap_or_else(default_jobs);
    eprintln!("Batch: {} files, jobs={}", paths.len(), jobs);

    let t0 = Instant::now();
    let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;

    let outs: Vec<(String, Result<FreezeMetadata, String>)> = pool.install(|| {
        paths
            .par_iter()
            .map(|path| {
                let target = output_path(&out_dir, path);
                let outcome = freeze_file(path, &target, config.clone())
                    .map(|r| r.metadata)
                    .map_err(|e| e.to_string());
                (path.clone(), outcome)
            })
            .collect()
    });

    for (idx, (path, outcome)) in outs.iter().enumerate() {
        match (outcome, json) {
            (Ok(meta), true) => println!(
                "{{\"file\":{},\"metadata\":{}}}",
                serde_json::to_string(path)?,
                serde_json::to_string(meta)?
            ),
            (Err(e), true) => println!(
                "{{\"file\":{},\"error\":{}}}",
                serde_json::to_string(path)?,
                serde_json::to_string(e)?
            ),
            (Ok(meta), false) => println!(
                "[{}/{}] {}: {} samples extrapolated, flags={:?}, time={:.2}ms",
                idx + 1,
                outs.len(),
                path,
                meta.extrapolated_samples,
                meta.flags,
                meta.processing_time_ms
            ),
            (Err(e), false) => println!("[{}/{}] {}: ERROR: {}", idx + 1, outs.len(), path, e),
        }
    }

    let ok = outs.iter().filter(|(_, o)| o.is_ok()).count();
    eprintln!(
        "Done: ok={}/{} wall={:.0}ms",
        ok,
        outs.len(),
        t0.elapsed().as_secs_f64() * 1000.0
    );

    Ok(())
}
