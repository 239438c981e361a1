use std::path::{Path, PathBuf};

use async_trait::async_trait;
use convoy_model::{Options, TargetRef, TaskResult};
use serde::de::DeserializeOwned;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::{
    error::{HandleError, SchedulerError},
    handle::ResultEvent,
};

/// Implementation behind a target or an inline task.
///
/// A builder runs until its work is finished, emitting one or more results through the context.
/// Returning `Err` reports a channel failure for the task instead of a result.
#[async_trait]
pub trait Builder: Send + Sync + 'static {
    /// Id used in workspace definitions and inline specs.
    fn name(&self) -> &str;

    /// Reject unusable options before the task is started.
    fn validate(&self, _options: &Options) -> Result<(), SchedulerError> {
        Ok(())
    }

    async fn run(&self, ctx: BuilderContext) -> Result<(), HandleError>;
}

/// Everything a running builder gets from the scheduler.
pub struct BuilderContext {
    target: Option<TargetRef>,
    options: Options,
    root: Option<PathBuf>,
    results: mpsc::Sender<ResultEvent>,
    cancel: CancellationToken,
}

impl BuilderContext {
    pub fn new(
        target: Option<TargetRef>,
        options: Options,
        root: Option<PathBuf>,
        results: mpsc::Sender<ResultEvent>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            target,
            options,
            root,
            results,
            cancel,
        }
    }

    /// Target being run, `None` for inline tasks.
    pub fn target(&self) -> Option<&TargetRef> {
        self.target.as_ref()
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Project root of the target, if the workspace declares one.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Read the options into the builder's schema.
    pub fn options_as<T: DeserializeOwned>(&self) -> Result<T, HandleError> {
        self.options
            .to_typed()
            .map_err(|e| HandleError::new(e.to_string()))
    }

    /// Publish a result; fails once nobody listens to the handle anymore.
    pub async fn emit(&self, result: TaskResult) -> Result<(), HandleError> {
        self.results
            .send(Ok(result))
            .await
            .map_err(|_| HandleError::new("result channel closed"))
    }
}
