// src/progress.rs
//! Indeterminate progress spinner for the blocking search call.
//!
//! The search service gives no progress signal, so the spinner only shows
//! that the call is still pending. It ticks on its own timer, and stopping it
//! never touches the call it decorates.

use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::time::Duration;

const TICK: Duration = Duration::from_millis(120);
const TEMPLATE: &str = "{spinner} {msg} ({elapsed}, no progress information)";

pub struct IndeterminateProgress {
    bar: ProgressBar,
}

impl IndeterminateProgress {
    pub fn start(label: impl Into<String>) -> Self {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("|/-\\ ");
        bar.set_style(style);
        bar.set_message(label.into());
        bar.enable_steady_tick(TICK);

        Self { bar }
    }
}

impl Drop for IndeterminateProgress {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

/// Await `fut` with a spinner running next to it when `enabled`.
/// The future always runs to completion.
pub async fn with_indicator<F>(label: &str, enabled: bool, fut: F) -> F::Output
where
    F: Future,
{
    let spinner = enabled.then(|| IndeterminateProgress::start(label));
    let output = fut.await;
    drop(spinner);
    output
}
