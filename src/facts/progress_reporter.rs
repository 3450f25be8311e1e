//! Terminal progress for the `analyze` command.

use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::Arc;
use std::time::Instant;

const BAR_TEMPLATE: &str = "{prefix:>12.bold.cyan} [{bar:25}] {msg}";

#[derive(Debug)]
struct DelayedProgressState {
    start_time: Instant,
    delay: Duration,
    visible: AtomicBool,
    has_content: AtomicBool,
}

/// A progress bar that stays hidden until an operation has been running for a while.
///
/// Quick analyses (for example cache hits) never flash a bar on screen.
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    bar: ProgressBar,
    state: Arc<DelayedProgressState>,
}

impl ProgressReporter {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_style(
            ProgressStyle::default_bar()
                .template(BAR_TEMPLATE)
                .expect("Failed to create progress style")
                .progress_chars("=> "),
        );
        bar.set_length(0);
        bar.set_prefix("Fetching");

        Self {
            bar,
            state: Arc::new(DelayedProgressState {
                start_time: Instant::now(),
                delay,
                visible: AtomicBool::new(false),
                has_content: AtomicBool::new(false),
            }),
        }
    }

    fn ensure_visible(&self) {
        if !self.state.visible.load(Ordering::Relaxed)
            && self.state.has_content.load(Ordering::Relaxed)
            && self.state.start_time.elapsed() >= self.state.delay
        {
            self.state.visible.store(true, Ordering::Relaxed);
            self.bar.set_draw_target(ProgressDrawTarget::stderr_with_hz(10));
        }
    }

    /// Set the total number of steps.
    pub fn enable_determinate_mode(&self, len: u64) {
        if len > 0 {
            self.state.has_content.store(true, Ordering::Relaxed);
        }
        self.ensure_visible();
        self.bar.set_length(len);
    }

    pub fn set_position(&self, pos: u64) {
        self.ensure_visible();
        self.bar.set_position(pos);
    }

    pub fn set_message(&self, msg: impl AsRef<str>) {
        let msg = msg.as_ref();
        if !msg.is_empty() {
            self.state.has_content.store(true, Ordering::Relaxed);
        }
        self.ensure_visible();
        self.bar.set_message(msg.to_string());
    }

    #[must_use]
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    #[must_use]
    pub fn length(&self) -> Option<u64> {
        self.bar.length()
    }

    /// Finish and clear the progress indicator.
    pub fn finish_and_clear(&self) {
        if self.state.visible.load(Ordering::Relaxed) {
            self.bar.finish_and_clear();
        }
    }
}
