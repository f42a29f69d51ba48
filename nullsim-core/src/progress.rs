//! Progress reporting for long null-distribution runs.
//!
//! Reporting is cosmetic: reporters only observe trial indices and never touch
//! the random streams or the results.

use std::io::Write;
use std::sync::Mutex;

/// A marker every this many trials.
pub const MARK_EVERY: u64 = 1_000;

/// A line break every this many trials.
pub const LINE_EVERY: u64 = 100_000;

/// Progress callback for the null distribution sampler.
pub trait TrialProgress: Send + Sync {
    /// Called after the trial with 0-based `index` completes.
    fn on_trial(&self, index: u64, total: u64);

    /// Called once after all trials completed successfully.
    fn on_finish(&self, total: u64);
}

/// Silent reporter.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl TrialProgress for NoProgress {
    fn on_trial(&self, _index: u64, _total: u64) {}

    fn on_finish(&self, _total: u64) {}
}

/// Marker text for a trial index, if any.
pub fn marker(index: u64) -> Option<&'static str> {
    if index % LINE_EVERY == 0 {
        Some("#\n")
    } else if index % MARK_EVERY == 0 {
        Some("#")
    } else {
        None
    }
}

/// Writes `#` every [`MARK_EVERY`] trials and ends the line every [`LINE_EVERY`].
pub struct HashMarks<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> HashMarks<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl HashMarks<std::io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

impl<W: Write + Send> TrialProgress for HashMarks<W> {
    fn on_trial(&self, index: u64, _total: u64) {
        if let Some(mark) = marker(index) {
            if let Ok(mut out) = self.out.lock() {
                let _ = out.write_all(mark.as_bytes());
                let _ = out.flush();
            }
        }
    }

    fn on_finish(&self, _total: u64) {
        if let Ok(mut out) = self.out.lock() {
            let _ = out.write_all(b"\n");
            let _ = out.flush();
        }
    }
}
