//! Fan-out / fan-in engine that turns a batch of specs into one verdict.
//!
//! A run is a lazy stream: nothing is scheduled until it is polled, and dropping it releases every pending
//! scheduling request and every obtained handle (which cancels the underlying work).

use std::{mem, sync::Arc};

use convoy_model::{AggregateVerdict, BatchRequest, TaskSpec};
use futures::{
    FutureExt, StreamExt,
    future::{self, BoxFuture},
    stream::{self, BoxStream, FuturesUnordered, SelectAll},
};
use tracing::{Instrument, Span, debug, info, info_span, trace, warn};
use uuid::Uuid;

use crate::{
    aggregator::ResultAggregator,
    error::{CoreError, SchedulerError},
    handle::{ResultEvent, TaskHandle},
    progress::{NoopReporter, ProgressReporter, report_quietly},
    scheduler::Scheduler,
};

mod config;
pub use config::{ChannelErrorPolicy, OrchestratorConfig};

/// Stream returned by [`Orchestrator::run`].
///
/// Yields at most one item unless [`OrchestratorConfig::watch`] is set.
pub type VerdictStream = BoxStream<'static, Result<AggregateVerdict, CoreError>>;

type Scheduled = BoxFuture<'static, (usize, Result<TaskHandle, SchedulerError>)>;
type Indexed = BoxStream<'static, (usize, ResultEvent)>;

pub struct Orchestrator {
    scheduler: Arc<dyn Scheduler>,
    reporter: Arc<dyn ProgressReporter>,
    config: OrchestratorConfig,
}

impl Orchestrator {
    pub fn new(scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            scheduler,
            reporter: Arc::new(NoopReporter),
            config: OrchestratorConfig::default(),
        }
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_config(mut self, config: OrchestratorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Run `specs`; the index of each spec in the vector identifies its slot.
    pub fn run(&self, specs: Vec<TaskSpec>) -> VerdictStream {
        let run = Run::new(
            specs,
            Arc::clone(&self.scheduler),
            Arc::clone(&self.reporter),
            self.config.clone(),
        );
        stream::unfold(run, |mut run| async move {
            let span = run.span.clone();
            let item = run.next_verdict().instrument(span).await?;
            Some((item, run))
        })
        .boxed()
    }

    /// Parse a raw request and run it. A malformed request yields a single error item.
    pub fn run_batch(&self, request: BatchRequest) -> VerdictStream {
        match request.into_specs() {
            Ok(specs) => self.run(specs),
            Err(e) => stream::once(future::ready(Err(CoreError::from(e)))).boxed(),
        }
    }

    /// Drive a run to its first verdict. `Ok(None)` means every channel closed before all tasks reported.
    pub async fn run_to_verdict(
        &self,
        specs: Vec<TaskSpec>,
    ) -> Result<Option<AggregateVerdict>, CoreError> {
        self.run(specs).next().await.transpose()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Running,
    Finished,
}

/// State of one run; owned by its stream and only touched from there.
struct Run {
    specs: Vec<TaskSpec>,
    scheduler: Arc<dyn Scheduler>,
    reporter: Arc<dyn ProgressReporter>,
    config: OrchestratorConfig,
    aggregator: ResultAggregator,
    requests: FuturesUnordered<Scheduled>,
    channels: SelectAll<Indexed>,
    phase: Phase,
    span: Span,
}

impl Run {
    fn new(
        specs: Vec<TaskSpec>,
        scheduler: Arc<dyn Scheduler>,
        reporter: Arc<dyn ProgressReporter>,
        config: OrchestratorConfig,
    ) -> Self {
        let total = specs.len();
        let span = info_span!("run", id = %Uuid::new_v4(), total);
        Self {
            specs,
            scheduler,
            reporter,
            config,
            aggregator: ResultAggregator::new(total),
            requests: FuturesUnordered::new(),
            channels: SelectAll::new(),
            phase: Phase::Idle,
            span,
        }
    }

    async fn next_verdict(&mut self) -> Option<Result<AggregateVerdict, CoreError>> {
        match self.phase {
            Phase::Finished => return None,
            Phase::Idle => {
                if let Some(verdict) = self.start() {
                    return Some(Ok(verdict));
                }
            }
            Phase::Running => {}
        }

        loop {
            tokio::select! {
                Some((index, scheduled)) = self.requests.next(), if !self.requests.is_empty() => {
                    match scheduled {
                        Ok(handle) => {
                            debug!(index, "task scheduled");
                            self.channels.push(handle.map(move |event| (index, event)).boxed());
                        }
                        Err(source) => {
                            warn!(index, error = %source, "scheduling failed; aborting run");
                            self.finish();
                            return Some(Err(CoreError::Scheduling { index, source }));
                        }
                    }
                }
                Some((index, event)) = self.channels.next(), if !self.channels.is_empty() => {
                    if let Some(item) = self.on_event(index, event) {
                        return Some(item);
                    }
                }
                else => {
                    if !self.aggregator.is_complete() {
                        warn!(
                            progress = %self.aggregator.progress(),
                            "every result channel closed before all tasks reported"
                        );
                    }
                    debug!("run drained");
                    self.finish();
                    return None;
                }
            }
        }
    }

    /// Report the initial tick and fan out every scheduling request.
    ///
    /// Returns the verdict right away for an empty batch.
    fn start(&mut self) -> Option<AggregateVerdict> {
        info!("run started");
        report_quietly(self.reporter.as_ref(), self.aggregator.progress());

        if self.aggregator.total() == 0 {
            self.phase = Phase::Finished;
            return self.aggregator.verdict();
        }

        for (index, spec) in mem::take(&mut self.specs).into_iter().enumerate() {
            trace!(index, kind = spec.kind(), task = %spec.label(), "requesting handle");
            let scheduler = Arc::clone(&self.scheduler);
            self.requests.push(
                async move {
                    let scheduled = scheduler.schedule(&spec).await;
                    (index, scheduled)
                }
                .boxed(),
            );
        }
        self.phase = Phase::Running;
        None
    }

    fn on_event(
        &mut self,
        index: usize,
        event: ResultEvent,
    ) -> Option<Result<AggregateVerdict, CoreError>> {
        match event {
            Ok(result) => {
                trace!(index, success = result.success, "result received");
                self.aggregator.record(index, result);
                report_quietly(self.reporter.as_ref(), self.aggregator.progress());

                let verdict = self.aggregator.verdict()?;
                info!(success = verdict.success, "all tasks reported");
                if !self.config.watch {
                    self.finish();
                }
                Some(Ok(verdict))
            }
            Err(source) => match self.config.channel_errors {
                ChannelErrorPolicy::Abort => {
                    warn!(index, error = %source, "result channel failed; aborting run");
                    self.finish();
                    Some(Err(CoreError::Channel { index, source }))
                }
                ChannelErrorPolicy::KeepPending => {
                    warn!(index, error = %source, "result channel failed; slot keeps its state");
                    None
                }
            },
        }
    }

    /// Stop the run, dropping (and thereby cancelling) every outstanding request and handle.
    fn finish(&mut self) {
        self.phase = Phase::Finished;
        self.requests = FuturesUnordered::new();
        self.channels = SelectAll::new();
    }
}
