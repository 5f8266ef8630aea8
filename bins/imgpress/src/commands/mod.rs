//! CLI command implementations

pub mod batch;
pub mod compress;
pub mod formats;

use imgpress_cli::output::Status;
use imgpress_engine::{CompressionError, CompressionRequest, CompressionResult, Compressor};
use imgpress_telemetry::{metrics, Timer};

/// Run one compression and record its outcome in the metrics registry.
pub(crate) fn compress_recorded(
    compressor: &Compressor,
    request: &CompressionRequest,
) -> Result<CompressionResult, CompressionError> {
    let timer = Timer::start("compress.duration");
    let outcome = compressor.compress(request);
    timer.stop();

    match &outcome {
        Ok(_) => metrics().increment("compress.success"),
        Err(err) => metrics().increment(&format!(
            "compress.failure.{}",
            err.kind.as_str().to_ascii_lowercase()
        )),
    }
    outcome
}

/// Print an engine error as a JSON report on stdout or a status line on stderr.
pub(crate) fn report_error(err: &CompressionError, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&err.to_report())?);
    } else {
        Status::error(&err.to_string());
    }
    Ok(())
}
