//! Terminal helpers for the imgpress command line
//!
//! Provides shared CLI functionality:
//! - Status messages on stderr
//! - Size, duration and reduction formatting
//! - Progress bars for batch runs

pub mod output;
pub mod progress;
