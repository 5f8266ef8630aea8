//! imgpress: recompress images into web-friendly formats.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use imgpress_engine::{Compressor, EngineConfig};
use imgpress_telemetry::TelemetryConfig;
use std::path::PathBuf;

mod commands;
mod exit_codes;

#[derive(Parser)]
#[command(name = "imgpress")]
#[command(about = "Recompress images to WebP, JPEG, PNG or AVIF")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a single image
    Compress {
        /// Image file, or `-` for stdin
        input: PathBuf,
        /// Output format token (webp, mozjpeg, avif, oxipng, jpeg, jpg, png)
        #[arg(short, long)]
        format: Option<String>,
        /// Quality, 1-100
        #[arg(short, long)]
        quality: Option<u32>,
        /// Where to write the compressed image
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Treat INPUT as base64 text (a `data:` URL is accepted)
        #[arg(long)]
        base64: bool,
        /// Print a JSON response document instead of writing a file
        #[arg(long)]
        json: bool,
        /// Give up after this many seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
        /// Filename echoed in the response (defaults to the input name)
        #[arg(long)]
        filename: Option<String>,
    },

    /// Compress every supported image under a directory
    Batch {
        /// Directory to scan
        dir: PathBuf,
        /// Output format token
        #[arg(short, long)]
        format: Option<String>,
        /// Quality, 1-100
        #[arg(short, long)]
        quality: Option<u32>,
        /// Output directory (mirrors the input tree); without it nothing is written
        #[arg(short, long, value_name = "OUT_DIR")]
        output: Option<PathBuf>,
        /// Worker threads (defaults to the number of CPUs)
        #[arg(short, long)]
        jobs: Option<usize>,
        /// Print per-file results as JSON
        #[arg(long)]
        json: bool,
    },

    /// List accepted format tokens
    Formats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        owo_colors::set_override(false);
    }

    imgpress_telemetry::init_with_config(
        TelemetryConfig::default()
            .with_verbosity(cli.verbose)
            .with_json(cli.log_json),
    )?;

    let config = EngineConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let compressor = Compressor::new(&config);

    let exit_code = match cli.command {
        Commands::Compress {
            input,
            format,
            quality,
            output,
            base64,
            json,
            timeout,
            filename,
        } => commands::compress::run(
            compressor,
            commands::compress::Args {
                input,
                format: format.unwrap_or_else(|| config.defaults.format.clone()),
                quality: quality.unwrap_or(config.defaults.quality),
                output,
                base64,
                json,
                timeout,
                filename,
            },
        )?,
        Commands::Batch {
            dir,
            format,
            quality,
            output,
            jobs,
            json,
        } => commands::batch::run(
            &compressor,
            commands::batch::Args {
                dir,
                format: format.unwrap_or_else(|| config.defaults.format.clone()),
                quality: quality.unwrap_or(config.defaults.quality),
                output,
                jobs,
                json,
            },
        )?,
        Commands::Formats { json } => commands::formats::run(&compressor, json)?,
    };

    tracing::debug!(
        session_id = imgpress_telemetry::session_id(),
        metrics = %imgpress_telemetry::metrics().export_json(),
        "Run finished"
    );

    std::process::exit(exit_code);
}
