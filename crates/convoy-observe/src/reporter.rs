use convoy_core::ProgressReporter;
use convoy_model::Progress;
use tracing::{debug, info};

/// Progress reporter that writes each tick to the log.
///
/// The final tick of a run is logged at `info`, everything before it at `debug`.
#[derive(Debug, Clone, Default)]
pub struct LogReporter {
    label: Option<String>,
}

impl LogReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag every line with `label`, e.g. the batch file name.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

impl ProgressReporter for LogReporter {
    fn report(&self, progress: Progress) {
        let label = self.label.as_deref().unwrap_or("");
        if progress.is_done() {
            info!(
                target: "convoy::progress",
                label,
                completed = progress.completed,
                total = progress.total,
                "all tasks reported"
            );
        } else {
            debug!(
                target: "convoy::progress",
                label,
                completed = progress.completed,
                total = progress.total,
                "progress {progress}"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    use tracing::Level;

    use super::*;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(max: Level, f: impl FnOnce()) -> String {
        let buf = Buffer::default();
        let writer = buf.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(max)
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = buf.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn intermediate_ticks_are_debug() {
        let reporter = LogReporter::new();
        let out = capture(Level::INFO, || reporter.report(Progress::new(1, 3)));
        assert!(out.is_empty());

        let out = capture(Level::DEBUG, || reporter.report(Progress::new(1, 3)));
        assert!(out.contains("progress 1/3"));
    }

    #[test]
    fn completion_is_info() {
        let reporter = LogReporter::new().with_label("nightly");
        let out = capture(Level::INFO, || reporter.report(Progress::new(3, 3)));
        assert!(out.contains("all tasks reported"));
        assert!(out.contains("nightly"));
    }
}
