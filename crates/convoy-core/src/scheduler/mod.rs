use async_trait::async_trait;
use convoy_model::{Options, TargetRef, TaskSpec};

use crate::{error::SchedulerError, handle::TaskHandle};

mod local;
pub use local::LocalScheduler;

/// Resolves task specs into running handles.
///
/// Implementations own task execution; the orchestrator only consumes the returned handles.
#[async_trait]
pub trait Scheduler: Send + Sync + 'static {
    /// Start a target registered under `target`, with `overrides` applied on top of its options.
    async fn request_target(
        &self,
        target: &TargetRef,
        overrides: &Options,
    ) -> Result<TaskHandle, SchedulerError>;

    /// Start the builder named `builder` directly.
    async fn request_inline(
        &self,
        builder: &str,
        options: &Options,
    ) -> Result<TaskHandle, SchedulerError>;

    /// Dispatch on the [`TaskSpec`] variant.
    async fn schedule(&self, spec: &TaskSpec) -> Result<TaskHandle, SchedulerError> {
        match spec {
            TaskSpec::ByReference { target, overrides } => {
                self.request_target(target, overrides).await
            }
            TaskSpec::Inline { builder, options } => self.request_inline(builder, options).await,
        }
    }
}
