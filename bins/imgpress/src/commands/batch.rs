//! `batch` command

use super::{compress_recorded, report_error};
use crate::exit_codes;
use anyhow::{Context, Result};
use imgpress_cli::output::{format_count, format_duration, format_stats, Status};
use imgpress_cli::progress::{batch_progress, finish_error, finish_success};
use imgpress_engine::payload::DEFAULT_STEM;
use imgpress_engine::{
    output_filename, CanonicalFormat, CompressionError, CompressionRequest, Compressor,
    ErrorReport, Quality, SourceFormat, Stats,
};
use indicatif::ParallelProgressIterator;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

pub struct Args {
    pub dir: PathBuf,
    pub format: String,
    pub quality: u32,
    pub output: Option<PathBuf>,
    pub jobs: Option<usize>,
    pub json: bool,
}

/// Per-file entry of the JSON listing.
#[derive(Debug, Serialize)]
struct FileOutcome {
    path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<Stats>,
    /// Engine failure
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorReport>,
    /// Reading the source or writing the output failed
    #[serde(skip_serializing_if = "Option::is_none")]
    io_error: Option<String>,
}

impl FileOutcome {
    fn failed(&self) -> bool {
        self.error.is_some() || self.io_error.is_some()
    }
}

pub fn run(compressor: &Compressor, args: Args) -> Result<i32> {
    // A bad token or quality fails the run once instead of once per file.
    let format = match check_request(compressor, &args) {
        Ok(format) => format,
        Err(err) => {
            report_error(&err, args.json)?;
            return Ok(exit_codes::for_kind(err.kind));
        }
    };

    let root = std::fs::canonicalize(&args.dir)
        .with_context(|| format!("Failed to open {}", args.dir.display()))?;
    let files = collect_images(&root);
    if files.is_empty() {
        if args.json {
            println!("[]");
        } else {
            Status::warning(&format!("No images found under {}", args.dir.display()));
        }
        return Ok(exit_codes::SUCCESS);
    }

    let targets: Vec<Option<PathBuf>> = match &args.output {
        Some(out_dir) => {
            std::fs::create_dir_all(out_dir)
                .with_context(|| format!("Failed to create {}", out_dir.display()))?;
            let out_dir = std::fs::canonicalize(out_dir)
                .with_context(|| format!("Failed to open {}", out_dir.display()))?;
            plan_targets(&root, &out_dir, &files, format)
                .into_iter()
                .map(Some)
                .collect()
        }
        None => vec![None; files.len()],
    };

    let mut pool = rayon::ThreadPoolBuilder::new();
    if let Some(jobs) = args.jobs {
        pool = pool.num_threads(jobs.max(1));
    }
    let pool = pool.build().context("Failed to build worker pool")?;

    tracing::info!(
        files = files.len(),
        format = %args.format,
        quality = args.quality,
        threads = pool.current_num_threads(),
        "Starting batch"
    );

    let pb = batch_progress(files.len() as u64)?;
    let started = Instant::now();

    let outcomes: Vec<FileOutcome> = pool.install(|| {
        files
            .par_iter()
            .zip(targets.par_iter())
            .progress_with(pb.clone())
            .map(|(path, target)| process_file(compressor, &args, path, target.as_deref()))
            .collect()
    });

    let failed = outcomes.iter().filter(|o| o.failed()).count();
    let succeeded = outcomes.len() - failed;

    if failed == 0 {
        finish_success(&pb, "done");
    } else {
        finish_error(&pb, &format!("{} failed", failed));
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
    } else {
        for outcome in &outcomes {
            if let Some(report) = &outcome.error {
                Status::error(&format!("{}: {}", outcome.path.display(), report.error));
            }
            if let Some(io_error) = &outcome.io_error {
                Status::error(io_error);
            }
        }

        let (original, compressed) = outcomes
            .iter()
            .filter_map(|o| o.stats.as_ref())
            .fold((0u64, 0u64), |(a, b), s| (a + s.original_size, b + s.compressed_size));

        let mut summary = format!(
            "{} compressed in {}",
            format_count(succeeded, "image", "images"),
            format_duration(started.elapsed())
        );
        if let Ok(total) = Stats::compute(original, compressed) {
            summary.push_str(&format!(": {}", format_stats(&total)));
        }
        Status::success(&summary);

        if args.output.is_none() {
            Status::info("No output directory given; nothing was written");
        }
    }

    Ok(if failed == 0 {
        exit_codes::SUCCESS
    } else {
        exit_codes::FAILURE
    })
}

/// Validates token and quality, returning the format every file will produce.
fn check_request(
    compressor: &Compressor,
    args: &Args,
) -> Result<CanonicalFormat, CompressionError> {
    let resolution = compressor.resolver().resolve(&args.format)?;
    Quality::new(args.quality).map_err(|e| {
        CompressionError::invalid_input(e.message).with_detail(args.quality.to_string())
    })?;
    Ok(resolution.format)
}

/// Files under `dir` whose extension names a supported source format.
fn collect_images(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|ext| ext.to_str())
                .and_then(SourceFormat::from_extension)
                .is_some()
        })
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

/// One output path per file, mirroring the tree under `root` into `out_dir`.
///
/// Targets are unique and never name a source file. The plain
/// `<stem>.<ext>` name is preferred; a clash with another output keeps the
/// source extension (`a.png.webp`), a clash with the file itself becomes
/// `<stem>.min.<ext>`, and anything left gets a counter.
fn plan_targets(
    root: &Path,
    out_dir: &Path,
    files: &[PathBuf],
    format: CanonicalFormat,
) -> Vec<PathBuf> {
    let sources: HashSet<&Path> = files.iter().map(PathBuf::as_path).collect();
    let mut taken: HashSet<PathBuf> = HashSet::with_capacity(files.len());
    let ext = format.extension();

    files
        .iter()
        .map(|file| {
            let dir = out_dir.join(
                file.parent()
                    .and_then(|parent| parent.strip_prefix(root).ok())
                    .unwrap_or_else(|| Path::new("")),
            );
            let stem = file
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| DEFAULT_STEM.to_string());
            let source_ext = file
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default();

            let name = file.file_name().and_then(|n| n.to_str());
            let plain = dir.join(output_filename(name, format));
            let minified = dir.join(format!("{}.min.{}", stem, ext));
            let suffixed = dir.join(format!("{}.{}.{}", stem, source_ext, ext));

            let preferred = if plain == *file {
                [plain, minified, suffixed]
            } else {
                [plain, suffixed, minified]
            };

            let is_free =
                |candidate: &Path| !sources.contains(candidate) && !taken.contains(candidate);
            let target = match preferred.into_iter().find(|c| is_free(c.as_path())) {
                Some(target) => target,
                None => {
                    let mut n = 2usize;
                    loop {
                        let candidate = dir.join(format!("{}.{}.{}", stem, n, ext));
                        if is_free(candidate.as_path()) {
                            break candidate;
                        }
                        n += 1;
                    }
                }
            };

            taken.insert(target.clone());
            target
        })
        .collect()
}

fn process_file(
    compressor: &Compressor,
    args: &Args,
    path: &Path,
    target: Option<&Path>,
) -> FileOutcome {
    let mut outcome = FileOutcome {
        path: path.to_path_buf(),
        output: None,
        stats: None,
        error: None,
        io_error: None,
    };

    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(e) => {
            outcome.io_error = Some(format!("Failed to read {}: {}", path.display(), e));
            return outcome;
        }
    };

    let mut request = CompressionRequest::new(data, args.format.clone(), args.quality);
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        request = request.with_filename(name);
    }

    let result = match compress_recorded(compressor, &request) {
        Ok(result) => result,
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "Compression failed");
            outcome.error = Some(err.to_report());
            return outcome;
        }
    };
    outcome.stats = Some(result.stats);

    if let Some(target) = target {
        match write_output(target, &result.data) {
            Ok(()) => outcome.output = Some(target.to_path_buf()),
            Err(e) => {
                outcome.io_error = Some(format!("Failed to write {}: {}", target.display(), e))
            }
        }
    }

    outcome
}

fn write_output(target: &Path, data: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(target, data)
}
