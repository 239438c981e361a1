#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use convoy_core::{ProgressReporter, ResultEvent, Scheduler, SchedulerError, TaskHandle};
use convoy_model::{Options, Progress, TargetRef, TaskResult};
use futures::{future, stream};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// How the scripted scheduler answers a request for one label.
pub enum Script {
    /// Handle that yields these events, then closes.
    Emit(Vec<ResultEvent>),
    /// Handle fed by the test through the matching sender.
    Channel(mpsc::Receiver<ResultEvent>),
    /// Scheduling fails.
    Reject(String),
    /// Scheduling never completes.
    Hang,
}

pub fn channel() -> (mpsc::Sender<ResultEvent>, Script) {
    let (tx, rx) = mpsc::channel(16);
    (tx, Script::Channel(rx))
}

pub fn emit_ok() -> Script {
    Script::Emit(vec![Ok(TaskResult::ok())])
}

pub fn emit_failed(reason: &str) -> Script {
    Script::Emit(vec![Ok(TaskResult::failed(reason))])
}

/// In-memory scheduler keyed by spec label (`project:target[:config]` or builder id).
/// Unscripted labels get a single successful result.
#[derive(Default)]
pub struct ScriptedScheduler {
    scripts: Mutex<HashMap<String, Script>>,
    requested: Mutex<Vec<String>>,
    tokens: Mutex<Vec<CancellationToken>>,
}

impl ScriptedScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(self, label: &str, script: Script) -> Self {
        self.scripts.lock().unwrap().insert(label.to_string(), script);
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }

    /// Tokens of every handle handed out so far.
    pub fn tokens(&self) -> Vec<CancellationToken> {
        self.tokens.lock().unwrap().clone()
    }

    async fn handle_for(&self, label: String) -> Result<TaskHandle, SchedulerError> {
        self.requested.lock().unwrap().push(label.clone());
        let script = self
            .scripts
            .lock()
            .unwrap()
            .remove(&label)
            .unwrap_or_else(emit_ok);

        let token = CancellationToken::new();
        let handle = match script {
            Script::Emit(events) => TaskHandle::new(stream::iter(events), token.clone()),
            Script::Channel(rx) => TaskHandle::from_receiver(rx, token.clone()),
            Script::Reject(reason) => return Err(SchedulerError::Rejected(reason)),
            Script::Hang => return future::pending().await,
        };
        self.tokens.lock().unwrap().push(token);
        Ok(handle)
    }
}

#[async_trait]
impl Scheduler for ScriptedScheduler {
    async fn request_target(
        &self,
        target: &TargetRef,
        _overrides: &Options,
    ) -> Result<TaskHandle, SchedulerError> {
        self.handle_for(target.to_string()).await
    }

    async fn request_inline(
        &self,
        builder: &str,
        _options: &Options,
    ) -> Result<TaskHandle, SchedulerError> {
        self.handle_for(builder.to_string()).await
    }
}

/// Reporter that keeps every tick.
#[derive(Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<Progress>>>);

impl Recorder {
    pub fn ticks(&self) -> Vec<Progress> {
        self.0.lock().unwrap().clone()
    }
}

impl ProgressReporter for Recorder {
    fn report(&self, progress: Progress) {
        self.0.lock().unwrap().push(progress);
    }
}

pub fn ticks(pairs: &[(usize, usize)]) -> Vec<Progress> {
    pairs.iter().map(|&(c, t)| Progress::new(c, t)).collect()
}

pub fn assert_monotonic(ticks: &[Progress]) {
    for pair in ticks.windows(2) {
        assert!(
            pair[0].completed <= pair[1].completed,
            "progress went backwards: {ticks:?}"
        );
    }
}
