use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use crate::core::models::Outcome;
use crate::ui::printer;

/// Spinner for the stage currently waiting on an external tool. Status lines
/// are printed above it so they survive in logs and pipes.
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]") {
            bar.set_style(style);
        }
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar }
    }

    #[cfg(test)]
    pub fn hidden() -> Self {
        Self { bar: ProgressBar::hidden() }
    }

    pub fn update(&self, message: &str) {
        self.bar.set_message(message.to_string());
    }

    /// Prints a `[+] stage` line and shows the stage on the spinner.
    pub fn stage(&self, message: &str) {
        self.bar.suspend(|| println!("{}", printer::stage_line(message)));
        self.update(message);
    }

    pub fn report(&self, outcome: &Outcome) {
        self.bar.suspend(|| println!("{}", printer::status_line(outcome)));
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}
