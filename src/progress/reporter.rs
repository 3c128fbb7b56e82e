//! Request progress reporter
//!
//! Uses indicatif for a spinner while a one-shot command waits on the
//! inventory service:
//! - Spinner with the request description
//! - Elapsed time
//! - Success / failure mark on completion

use console::style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Spinner shown while a request is in flight
pub struct RequestSpinner {
    /// Spinner line
    bar: ProgressBar,
    /// Start time
    start_time: Instant,
    /// Is the spinner drawn
    enabled: AtomicBool,
}

impl RequestSpinner {
    /// Create a spinner with a status message
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg} {elapsed:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));

        Self {
            bar,
            start_time: Instant::now(),
            enabled: AtomicBool::new(true),
        }
    }

    /// Create a hidden spinner (for quiet mode and JSON output)
    pub fn disabled() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_draw_target(ProgressDrawTarget::hidden());
        Self {
            bar,
            start_time: Instant::now(),
            enabled: AtomicBool::new(false),
        }
    }

    /// Visible unless `quiet`
    pub fn for_mode(message: &str, quiet: bool) -> Self {
        if quiet {
            Self::disabled()
        } else {
            Self::new(message)
        }
    }

    /// Get elapsed time
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Finish with success message
    pub fn finish_success(&self, message: &str) {
        if self.is_enabled() {
            self.bar
                .finish_with_message(format!("{} {}", style("✓").green(), message));
        } else {
            self.bar.finish_and_clear();
        }
    }

    /// Finish with error message
    pub fn finish_error(&self, message: &str) {
        if self.is_enabled() {
            self.bar
                .abandon_with_message(format!("{} {}", style("✗").red(), message));
        } else {
            self.bar.finish_and_clear();
        }
    }

    /// Remove the spinner line without a message
    pub fn clear(&self) {
        self.bar.finish_and_clear();
    }

    /// Check if the spinner is drawn
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_spinner() {
        let spinner = RequestSpinner::for_mode("Loading vehicles", true);
        assert!(!spinner.is_enabled());
        spinner.finish_success("done");
        assert!(spinner.elapsed() < Duration::from_secs(60));
    }

    #[test]
    fn test_visible_spinner_finishes_with_mark() {
        let spinner = RequestSpinner::for_mode("Adding vehicle...", false);
        assert!(spinner.is_enabled());
        spinner.finish_success("Vehicle added successfully!");
        assert!(spinner.elapsed() < Duration::from_secs(60));
    }
}
