//! Helpers for boundary collaborators that carry images as text.

use crate::format::CanonicalFormat;
use crate::{CompressionError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;

/// Stem used when a request carries no filename.
pub const DEFAULT_STEM: &str = "image";

/// Decode a base64 image payload.
///
/// Accepts an optional `data:<mime>;base64,` prefix and ignores surrounding
/// and embedded whitespace (line-wrapped input).
pub fn decode_base64(payload: &str) -> Result<Vec<u8>> {
    let trimmed = payload.trim();
    let body = match trimmed.strip_prefix("data:") {
        Some(rest) => rest
            .split_once(',')
            .map(|(_, data)| data)
            .ok_or_else(|| CompressionError::invalid_input("Malformed data URL: missing ','"))?,
        None => trimmed,
    };

    let compact: String = body.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    STANDARD.decode(compact.as_bytes()).map_err(|e| {
        CompressionError::invalid_input("Payload is not valid base64")
            .with_detail(e.to_string())
            .with_source(e)
    })
}

/// Encode bytes as standard base64.
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Output filename for `format`, keeping the stem of `filename`.
///
/// ```
/// use imgpress_engine::{output_filename, CanonicalFormat};
///
/// assert_eq!(output_filename(Some("holiday.PNG"), CanonicalFormat::Webp), "holiday.webp");
/// assert_eq!(output_filename(None, CanonicalFormat::Jpeg), "image.jpg");
/// ```
pub fn output_filename(filename: Option<&str>, format: CanonicalFormat) -> String {
    let stem = filename
        .map(Path::new)
        .and_then(Path::file_stem)
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_STEM);

    format!("{}.{}", stem, format.extension())
}
