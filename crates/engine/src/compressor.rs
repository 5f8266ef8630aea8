//! The compression operation: resolve, validate, decode, encode, measure.

use crate::config::EngineConfig;
use crate::encode::{encode_with_quality, CodecSet};
use crate::format::{CanonicalFormat, FormatAlias, FormatResolver, FORMAT_ALIASES};
use crate::payload::encode_base64;
use crate::quality::{Quality, MAX_QUALITY, MIN_QUALITY};
use crate::stats::Stats;
use crate::{CompressionError, Result};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// One compression request. Owns its input bytes.
#[derive(Debug, Clone)]
pub struct CompressionRequest {
    /// Encoded source image
    pub image: Vec<u8>,
    /// Requested format token, e.g. `"jpg"`
    pub format: String,
    /// Quality, 1-100 inclusive
    pub quality: u32,
    /// Opaque metadata echoed back in the result
    pub filename: Option<String>,
}

impl CompressionRequest {
    pub fn new(image: Vec<u8>, format: impl Into<String>, quality: u32) -> Self {
        Self {
            image,
            format: format.into(),
            quality,
            filename: None,
        }
    }

    /// Attach the original filename.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

/// Record of the fallback policy replacing the requested format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substitution {
    pub requested: CanonicalFormat,
    pub used: CanonicalFormat,
}

/// Outcome of a successful compression.
#[derive(Debug, Clone)]
pub struct CompressionResult {
    /// Encoded output
    pub data: Vec<u8>,
    /// Token exactly as the caller sent it
    pub requested_format: String,
    /// Format actually produced
    pub format_used: CanonicalFormat,
    /// Set when the fallback policy replaced the requested format
    pub substitution: Option<Substitution>,
    pub quality_used: u8,
    pub stats: Stats,
    /// Echo of the request filename
    pub filename: Option<String>,
    /// Wall time of the decode and encode steps
    pub elapsed: Duration,
}

impl CompressionResult {
    /// Whether the produced format differs from the one requested.
    pub fn is_substituted(&self) -> bool {
        self.substitution.is_some()
    }

    /// Serializable response document with base64 output.
    pub fn to_response(&self) -> CompressionResponse {
        CompressionResponse {
            success: true,
            compressed_image_base64: encode_base64(&self.data),
            format: self.format_used,
            requested_format: self.requested_format.clone(),
            substitution: self.substitution,
            quality: self.quality_used,
            stats: self.stats,
            filename: self.filename.clone(),
        }
    }
}

/// Response document for boundary collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionResponse {
    pub success: bool,
    pub compressed_image_base64: String,
    pub format: CanonicalFormat,
    pub requested_format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub substitution: Option<Substitution>,
    pub quality: u8,
    pub stats: Stats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

/// Entry of the supported-format listing.
#[derive(Debug, Clone, Serialize)]
pub struct FormatInfo {
    pub token: &'static str,
    pub description: &'static str,
    /// Format a request with this token produces
    pub produces: CanonicalFormat,
}

/// Stateless compression engine. Safe to share across threads.
#[derive(Debug)]
pub struct Compressor {
    resolver: FormatResolver,
    codecs: CodecSet,
}

impl Compressor {
    /// Engine with the standard codec backends.
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_codecs(config, CodecSet::standard(config))
    }

    /// Engine with caller-supplied codecs.
    ///
    /// AVIF is encoded natively only if the configuration allows it and
    /// `codecs` carries an AVIF encoder.
    pub fn with_codecs(config: &EngineConfig, codecs: CodecSet) -> Self {
        let avif_native = config.avif_native_supported && codecs.has_native_avif();
        if config.avif_native_supported && !avif_native {
            tracing::warn!("Native AVIF requested but no AVIF encoder is available; using WebP");
        }

        Self {
            resolver: FormatResolver::new(avif_native),
            codecs,
        }
    }

    pub fn resolver(&self) -> &FormatResolver {
        &self.resolver
    }

    /// Static listing of accepted tokens and what they produce.
    pub fn supported_formats(&self) -> Vec<FormatInfo> {
        FORMAT_ALIASES
            .iter()
            .map(|alias: &FormatAlias| FormatInfo {
                token: alias.token,
                description: alias.description,
                produces: self
                    .resolver
                    .resolve(alias.token)
                    .map(|r| r.format)
                    .unwrap_or(alias.target),
            })
            .collect()
    }

    /// Run one compression. No step is retried.
    pub fn compress(&self, request: &CompressionRequest) -> Result<CompressionResult> {
        let span = tracing::info_span!(
            "compress",
            format = %request.format,
            quality = request.quality,
            input_bytes = request.image.len()
        );
        let _enter = span.enter();

        let resolution = self.resolver.resolve(&request.format)?;
        let quality = validate_quality(request.quality)?;

        let started = Instant::now();
        let pixels = self.codecs.decoder().decode(&request.image)?;
        let data = encode_with_quality(&self.codecs, &pixels, resolution.format, quality)?;
        let elapsed = started.elapsed();

        let stats = Stats::compute(request.image.len() as u64, data.len() as u64)?;

        let substitution = resolution.is_substituted().then(|| {
            tracing::info!(
                requested = %resolution.requested,
                used = %resolution.format,
                "Requested format substituted"
            );
            Substitution {
                requested: resolution.requested,
                used: resolution.format,
            }
        });

        tracing::debug!(
            format = %resolution.format,
            compressed_bytes = stats.compressed_size,
            reduction = stats.reduction_display(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Compression complete"
        );

        Ok(CompressionResult {
            data,
            requested_format: request.format.clone(),
            format_used: resolution.format,
            substitution,
            quality_used: quality.get(),
            stats,
            filename: request.filename.clone(),
            elapsed,
        })
    }
}

/// Request-level quality check, reported as invalid input.
fn validate_quality(value: u32) -> Result<Quality> {
    Quality::new(value).map_err(|_| {
        CompressionError::invalid_input(format!(
            "Quality must be between {} and {}",
            MIN_QUALITY, MAX_QUALITY
        ))
        .with_detail(value.to_string())
    })
}
