//! Canonical output formats and user-facing format tokens.

use crate::quality::QualityScale;
use crate::{CompressionError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Output encodings the engine can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CanonicalFormat {
    /// Lossy WebP (libwebp)
    Webp,
    /// Baseline JPEG
    Jpeg,
    /// Lossless PNG, optimized with oxipng
    Png,
    /// AV1 still image (only with a native encoder wired in)
    Avif,
}

impl CanonicalFormat {
    /// Every canonical format, in listing order.
    pub const ALL: [CanonicalFormat; 4] = [
        CanonicalFormat::Webp,
        CanonicalFormat::Jpeg,
        CanonicalFormat::Png,
        CanonicalFormat::Avif,
    ];

    /// Get the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            CanonicalFormat::Webp => "image/webp",
            CanonicalFormat::Jpeg => "image/jpeg",
            CanonicalFormat::Png => "image/png",
            CanonicalFormat::Avif => "image/avif",
        }
    }

    /// Preferred file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            CanonicalFormat::Webp => "webp",
            CanonicalFormat::Jpeg => "jpg",
            CanonicalFormat::Png => "png",
            CanonicalFormat::Avif => "avif",
        }
    }

    /// How the 1-100 quality value is interpreted for this format.
    pub fn quality_scale(&self) -> QualityScale {
        match self {
            CanonicalFormat::Webp | CanonicalFormat::Jpeg | CanonicalFormat::Avif => {
                QualityScale::Fidelity
            }
            CanonicalFormat::Png => QualityScale::Effort,
        }
    }

    /// Whether the container can carry an alpha channel.
    pub fn supports_transparency(&self) -> bool {
        !matches!(self, CanonicalFormat::Jpeg)
    }
}

impl fmt::Display for CanonicalFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CanonicalFormat::Webp => "WEBP",
            CanonicalFormat::Jpeg => "JPEG",
            CanonicalFormat::Png => "PNG",
            CanonicalFormat::Avif => "AVIF",
        };
        f.write_str(name)
    }
}

/// One entry of the alias table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormatAlias {
    /// Lowercase token accepted from callers
    pub token: &'static str,
    /// Format the token names
    pub target: CanonicalFormat,
    /// One-line description for format listings
    pub description: &'static str,
}

/// Accepted format tokens.
pub const FORMAT_ALIASES: &[FormatAlias] = &[
    FormatAlias {
        token: "webp",
        target: CanonicalFormat::Webp,
        description: "WebP - Excellent universal compression",
    },
    FormatAlias {
        token: "mozjpeg",
        target: CanonicalFormat::Jpeg,
        description: "MozJPEG - Best for photographs",
    },
    FormatAlias {
        token: "avif",
        target: CanonicalFormat::Avif,
        description: "AVIF - Maximum compression (falls back to WebP without a native encoder)",
    },
    FormatAlias {
        token: "oxipng",
        target: CanonicalFormat::Png,
        description: "OxiPNG - PNG optimization without loss",
    },
    FormatAlias {
        token: "jpeg",
        target: CanonicalFormat::Jpeg,
        description: "JPEG - Alias for mozJPEG",
    },
    FormatAlias {
        token: "jpg",
        target: CanonicalFormat::Jpeg,
        description: "JPG - Alias for mozJPEG",
    },
    FormatAlias {
        token: "png",
        target: CanonicalFormat::Png,
        description: "PNG - Alias for oxiPNG",
    },
];

/// Look up a token in the alias table (case-insensitive).
pub fn lookup_alias(token: &str) -> Option<&'static FormatAlias> {
    let token = token.trim();
    FORMAT_ALIASES
        .iter()
        .find(|alias| alias.token.eq_ignore_ascii_case(token))
}

/// Outcome of resolving a format token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Format named by the token
    pub requested: CanonicalFormat,
    /// Format that will actually be produced
    pub format: CanonicalFormat,
}

impl Resolution {
    /// True when the fallback policy replaced the requested format.
    pub fn is_substituted(&self) -> bool {
        self.requested != self.format
    }
}

/// Maps user tokens onto canonical formats, applying the AVIF fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatResolver {
    avif_native: bool,
}

impl FormatResolver {
    /// Create a resolver. `avif_native` selects whether `avif` is encoded as
    /// AVIF or substituted with WebP.
    pub fn new(avif_native: bool) -> Self {
        Self { avif_native }
    }

    /// Whether AVIF requests are honoured natively.
    pub fn avif_native(&self) -> bool {
        self.avif_native
    }

    /// Resolve a format token.
    ///
    /// # Example
    /// ```
    /// use imgpress_engine::{CanonicalFormat, FormatResolver};
    ///
    /// let resolver = FormatResolver::new(false);
    /// assert_eq!(resolver.resolve("JPG").unwrap().format, CanonicalFormat::Jpeg);
    ///
    /// let avif = resolver.resolve("avif").unwrap();
    /// assert_eq!(avif.format, CanonicalFormat::Webp);
    /// assert!(avif.is_substituted());
    /// ```
    pub fn resolve(&self, token: &str) -> Result<Resolution> {
        let alias = lookup_alias(token).ok_or_else(|| CompressionError::unsupported_format(token))?;

        let format = match alias.target {
            CanonicalFormat::Avif if !self.avif_native => CanonicalFormat::Webp,
            other => other,
        };

        tracing::debug!(
            token,
            requested = %alias.target,
            format = %format,
            "Resolved format token"
        );

        Ok(Resolution {
            requested: alias.target,
            format,
        })
    }
}
