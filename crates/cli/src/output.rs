//! Terminal output utilities
//!
//! Status lines go to stderr; stdout is reserved for command output such as
//! JSON documents and listings.

use imgpress_engine::{CompressionResult, FormatInfo, Stats};
use owo_colors::OwoColorize;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        eprintln!("{} {}", "ℹ".blue(), message);
    }
}

/// Format a duration for display
pub fn format_duration(duration: std::time::Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1000 {
        format!("{}ms", millis)
    } else if millis < 60_000 {
        format!("{:.1}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// Format a file size for display
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

/// `"12.00 KB -> 4.00 KB (66.7% smaller)"`; growth reads as `larger`.
pub fn format_stats(stats: &Stats) -> String {
    let change = if stats.reduction_percent >= 0.0 {
        format!("{:.1}% smaller", stats.reduction_percent)
    } else {
        format!("{:.1}% larger", -stats.reduction_percent)
    };

    format!(
        "{} -> {} ({})",
        format_size(stats.original_size),
        format_size(stats.compressed_size),
        change
    )
}

/// One-line human summary of a compression.
pub fn summary_line(label: &str, result: &CompressionResult) -> String {
    let mut line = format!(
        "{} -> {} q{}: {}",
        label,
        result.format_used,
        result.quality_used,
        format_stats(&result.stats)
    );
    if let Some(sub) = result.substitution {
        line.push_str(&format!(" [{} substituted by {}]", sub.requested, sub.used));
    }
    line
}

/// Print the supported-format table to stdout.
pub fn print_formats(formats: &[FormatInfo]) {
    let width = formats.iter().map(|f| f.token.len()).max().unwrap_or(0);
    for info in formats {
        println!(
            "{:width$}  {:4}  {}",
            info.token.bold(),
            info.produces.extension(),
            info.description.dimmed(),
            width = width
        );
    }
}
