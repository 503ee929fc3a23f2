//! Terminal progress bar for renders.

use glint_renderer::ProgressSink;
use indicatif::{style::TemplateError, ProgressBar, ProgressStyle};

/// Bar resolution; render fractions are mapped onto this many steps.
const PROGRESS_STEPS: u64 = 1000;

const PROGRESS_TEMPLATE: &str = "[{elapsed_precise}] [{wide_bar}] {percent}% ETA: {eta}";

/// Forwards render progress to an `indicatif` bar on stderr.
pub struct ConsoleProgress {
    bar: ProgressBar,
}

impl ConsoleProgress {
    pub fn new() -> Result<Self, TemplateError> {
        let bar = ProgressBar::new(PROGRESS_STEPS);
        bar.set_style(ProgressStyle::with_template(PROGRESS_TEMPLATE)?.progress_chars("#>-"));
        Ok(Self::with_bar(bar))
    }

    /// Drive an existing bar, e.g. a hidden one.
    pub fn with_bar(bar: ProgressBar) -> Self {
        bar.set_length(PROGRESS_STEPS);
        Self { bar }
    }
}

impl ProgressSink for ConsoleProgress {
    fn update(&self, fraction: f32) {
        let fraction = fraction.clamp(0.0, 1.0);
        self.bar.set_position((fraction * PROGRESS_STEPS as f32) as u64);
        if fraction >= 1.0 {
            self.bar.finish();
        }
    }
}
