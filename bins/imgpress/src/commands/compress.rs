//! `compress` command

use super::{compress_recorded, report_error};
use crate::exit_codes;
use anyhow::{Context, Result};
use imgpress_cli::output::{format_duration, summary_line, Status};
use imgpress_engine::{
    decode_base64, output_filename, CompressionError, CompressionRequest, CompressionResult,
    Compressor,
};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};
use std::time::Duration;

pub struct Args {
    pub input: PathBuf,
    pub format: String,
    pub quality: u32,
    pub output: Option<PathBuf>,
    pub base64: bool,
    pub json: bool,
    pub timeout: Option<u64>,
    pub filename: Option<String>,
}

pub fn run(compressor: Compressor, args: Args) -> Result<i32> {
    let raw = read_input(&args.input)?;

    let image = if args.base64 {
        let text = String::from_utf8_lossy(&raw);
        match decode_base64(&text) {
            Ok(bytes) => bytes,
            Err(err) => {
                report_error(&err, args.json)?;
                return Ok(exit_codes::for_kind(err.kind));
            }
        }
    } else {
        raw
    };

    let filename = args.filename.clone().or_else(|| input_name(&args.input));
    let mut request = CompressionRequest::new(image, args.format.clone(), args.quality);
    if let Some(name) = filename {
        request = request.with_filename(name);
    }

    let outcome = match args.timeout {
        Some(secs) => match run_with_timeout(compressor, request, Duration::from_secs(secs)) {
            Some(outcome) => outcome,
            None => {
                tracing::warn!(timeout_secs = secs, "Compression timed out");
                Status::error(&format!("Compression did not finish within {}s", secs));
                return Ok(exit_codes::TIMEOUT);
            }
        },
        None => compress_recorded(&compressor, &request),
    };

    let result = match outcome {
        Ok(result) => result,
        Err(err) => {
            report_error(&err, args.json)?;
            return Ok(exit_codes::for_kind(err.kind));
        }
    };

    if let Some(path) = &args.output {
        write_output(path, &result.data)?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result.to_response())?);
        return Ok(exit_codes::SUCCESS);
    }

    let path = match &args.output {
        Some(path) => path.clone(),
        None => {
            let path = default_output_path(&args.input, &result);
            write_output(&path, &result.data)?;
            path
        }
    };

    Status::success(&format!(
        "{} in {}",
        summary_line(&path.display().to_string(), &result),
        format_duration(result.elapsed)
    ));
    Ok(exit_codes::SUCCESS)
}

/// Runs the compression on a worker thread. `None` when the deadline passes
/// first; the worker is left to finish on its own.
fn run_with_timeout(
    compressor: Compressor,
    request: CompressionRequest,
    timeout: Duration,
) -> Option<Result<CompressionResult, CompressionError>> {
    let compressor = Arc::new(compressor);
    let (tx, rx) = mpsc::channel();

    std::thread::spawn(move || {
        let outcome = compress_recorded(&compressor, &request);
        let _ = tx.send(outcome);
    });

    rx.recv_timeout(timeout).ok()
}

fn read_input(input: &Path) -> Result<Vec<u8>> {
    if input.as_os_str() == "-" {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("Failed to read stdin")?;
        return Ok(buf);
    }

    std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))
}

fn input_name(input: &Path) -> Option<String> {
    if input.as_os_str() == "-" {
        return None;
    }
    input.file_name().and_then(|n| n.to_str()).map(str::to_string)
}

fn write_output(path: &Path, data: &[u8]) -> Result<()> {
    std::fs::write(path, data).with_context(|| format!("Failed to write {}", path.display()))
}

/// Sibling of the input named for the produced format. Never the input itself.
fn default_output_path(input: &Path, result: &CompressionResult) -> PathBuf {
    let dir = match input.parent() {
        Some(parent) if input.as_os_str() != "-" => parent.to_path_buf(),
        _ => PathBuf::new(),
    };

    let candidate = dir.join(output_filename(result.filename.as_deref(), result.format_used));
    if candidate != input {
        return candidate;
    }

    let stem = candidate
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image")
        .to_string();
    dir.join(format!("{}.min.{}", stem, result.format_used.extension()))
}
