use std::panic::{AssertUnwindSafe, catch_unwind};

use convoy_model::Progress;
use tracing::warn;

/// Observer of run progress.
///
/// Called after every state change of a run; purely observational.
pub trait ProgressReporter: Send + Sync + 'static {
    fn report(&self, progress: Progress);
}

impl<F> ProgressReporter for F
where
    F: Fn(Progress) + Send + Sync + 'static,
{
    fn report(&self, progress: Progress) {
        self(progress)
    }
}

/// Reporter that drops every tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    #[inline]
    fn report(&self, _progress: Progress) {}
}

/// Deliver a tick without letting a misbehaving reporter affect the caller.
pub(crate) fn report_quietly(reporter: &dyn ProgressReporter, progress: Progress) {
    if catch_unwind(AssertUnwindSafe(|| reporter.report(progress))).is_err() {
        warn!(%progress, "progress reporter panicked; tick dropped");
    }
}
