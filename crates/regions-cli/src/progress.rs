//! Terminal progress bar driven by the import pipeline.

use std::ops::ControlFlow;

use indicatif::{ProgressBar, ProgressStyle};
use regions_ingest::ProgressObserver;

const TEMPLATE: &str = "{spinner} {msg} [{bar:30}] {pos}/{len} regions ({elapsed})";

/// Shows one bar tick per finished region group.
pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub fn new(message: impl Into<String>) -> Self {
        let bar = ProgressBar::new(0);
        if let Ok(style) = ProgressStyle::with_template(TEMPLATE) {
            bar.set_style(style.progress_chars("=> "));
        }
        bar.set_message(message.into());
        Self { bar }
    }

    /// A bar that draws nothing.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }
}

impl ProgressObserver for BarProgress {
    fn start(&mut self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(0);
    }

    fn advance(&mut self, done: usize) -> ControlFlow<()> {
        self.bar.set_position(done as u64);
        ControlFlow::Continue(())
    }

    fn finish(&mut self) {
        self.bar.finish_and_clear();
    }
}

impl Drop for BarProgress {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.abandon();
        }
    }
}
