//! Progress bar for sync phases

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use reconcile::{Action, ItemResult, ProgressCallback, SyncOutcome};

/// Renders one progress bar per entity phase
///
/// Item failures are printed above the bar as they happen.
pub struct BarProgress {
    bar: Option<ProgressBar>,
    enabled: bool,
}

impl BarProgress {
    pub fn new(enabled: bool) -> Self {
        Self { bar: None, enabled }
    }

    /// Line printed for a failed item, or nothing when output is disabled
    fn failure_line(&self, code: &str, action: Action, result: &ItemResult) -> Option<String> {
        match result {
            ItemResult::Failed { error } if self.enabled => {
                Some(format!("  {} {action} {code}: {error}", "✗".red()))
            }
            _ => None,
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }
}

impl ProgressCallback for BarProgress {
    fn on_phase_start(&mut self, kind: &str, count: usize) {
        let bar = if self.enabled && count > 0 {
            ProgressBar::new(count as u64)
        } else {
            ProgressBar::hidden()
        };
        bar.set_style(Self::style());
        bar.set_prefix(format!("{kind}s"));
        self.bar = Some(bar);
    }

    fn on_item_complete(&mut self, code: &str, action: Action, result: &ItemResult) {
        let Some(bar) = &self.bar else { return };

        bar.set_message(code.to_string());
        if let Some(line) = self.failure_line(code, action, result) {
            bar.suspend(|| eprintln!("{line}"));
        }
        bar.inc(1);
    }

    fn on_phase_complete(&mut self, _kind: &str, _outcome: &SyncOutcome) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}
