//! Progress indicators for batch runs.

use console::Term;
use indicatif::style::TemplateError;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress bar over `total` images. Hidden when stderr is not a terminal.
pub fn batch_progress(total: u64) -> Result<ProgressBar, TemplateError> {
    if !Term::stderr().is_term() {
        return Ok(ProgressBar::hidden());
    }

    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} images ({eta}) {msg}")?
            .progress_chars("█▓░"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

/// Finish a progress bar with a success message
pub fn finish_success(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✓ {}", message));
}

/// Finish a progress bar with an error message
pub fn finish_error(pb: &ProgressBar, message: &str) {
    pb.abandon_with_message(format!("✗ {}", message));
}
