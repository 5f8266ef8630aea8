//! Size statistics comparing input and output.

use crate::{CompressionError, EncodeFailure, Result};
use serde::{Deserialize, Serialize};

/// Size comparison between original and compressed bytes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    /// Input length in bytes
    pub original_size: u64,
    /// Output length in bytes
    pub compressed_size: u64,
    /// `(1 - compressed / original) * 100`; negative when output grew
    pub reduction_percent: f64,
    /// `original / compressed`
    pub compression_ratio: f64,
}

impl Stats {
    /// Compute statistics from two byte lengths.
    ///
    /// # Example
    /// ```
    /// use imgpress_engine::Stats;
    ///
    /// let stats = Stats::compute(1000, 400).unwrap();
    /// assert_eq!(stats.reduction_display(), 60.0);
    /// assert_eq!(stats.compression_ratio, 2.5);
    ///
    /// let grown = Stats::compute(400, 1000).unwrap();
    /// assert_eq!(grown.reduction_display(), -150.0);
    /// ```
    pub fn compute(original_size: u64, compressed_size: u64) -> Result<Self> {
        if original_size == 0 {
            return Err(CompressionError::invalid_input("Original image is empty")
                .with_detail("original_size is 0"));
        }
        if compressed_size == 0 {
            return Err(CompressionError::encode(
                EncodeFailure::DegenerateOutput,
                "Encoder produced no bytes",
            )
            .with_detail("compressed_size is 0"));
        }

        let (original, compressed) = (original_size as f64, compressed_size as f64);

        Ok(Self {
            original_size,
            compressed_size,
            reduction_percent: (1.0 - compressed / original) * 100.0,
            compression_ratio: original / compressed,
        })
    }

    /// Reduction rounded to one decimal place.
    pub fn reduction_display(&self) -> f64 {
        round_to(self.reduction_percent, 1)
    }

    /// Ratio rounded to two decimal places.
    pub fn ratio_display(&self) -> f64 {
        round_to(self.compression_ratio, 2)
    }

    /// Bytes saved; negative when the output grew.
    pub fn bytes_saved(&self) -> i64 {
        self.original_size as i64 - self.compressed_size as i64
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
