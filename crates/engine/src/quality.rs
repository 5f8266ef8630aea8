//! Quality parameter and its per-format meaning.

use crate::{CompressionError, EncodeFailure, Result};
use serde::{Deserialize, Serialize};

/// Lowest accepted quality value.
pub const MIN_QUALITY: u32 = 1;
/// Highest accepted quality value.
pub const MAX_QUALITY: u32 = 100;

/// How a format interprets the quality value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityScale {
    /// Lossy: higher keeps more detail and produces larger output
    Fidelity,
    /// Lossless: higher spends more time searching for smaller output
    Effort,
}

/// A quality value known to lie in `1..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Quality(u8);

impl Quality {
    /// Validate a raw quality value. Out-of-range values are rejected, never clamped.
    pub fn new(value: u32) -> Result<Self> {
        if !(MIN_QUALITY..=MAX_QUALITY).contains(&value) {
            return Err(CompressionError::encode(
                EncodeFailure::InvalidParameter,
                format!("Quality must be between {} and {}", MIN_QUALITY, MAX_QUALITY),
            )
            .with_detail(value.to_string()));
        }
        Ok(Self(value as u8))
    }

    /// The raw value.
    pub fn get(&self) -> u8 {
        self.0
    }

    /// Quality as the float scale used by libwebp and ravif.
    pub fn as_f32(&self) -> f32 {
        f32::from(self.0)
    }

    /// oxipng optimization preset (0-6) for this value.
    ///
    /// `(quality - 1) * 7 / 100`: 1-15 → 0, 16-29 → 1, 30-43 → 2, 44-58 → 3,
    /// 59-72 → 4, 73-86 → 5, 87-100 → 6.
    pub fn png_preset(&self) -> u8 {
        ((u32::from(self.0) - 1) * 7 / 100) as u8
    }
}
