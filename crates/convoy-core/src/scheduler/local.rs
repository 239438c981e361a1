use std::{collections::HashMap, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use convoy_model::{Options, TargetRef, Workspace};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, debug_span, instrument, trace};

use crate::{
    builder::{Builder, BuilderContext},
    error::SchedulerError,
    handle::TaskHandle,
    scheduler::Scheduler,
};

const DEFAULT_BUFFER: usize = 16;

/// In-process scheduler: resolves targets through a [`Workspace`] and runs builders on the tokio runtime.
pub struct LocalScheduler {
    workspace: Workspace,
    builders: HashMap<String, Arc<dyn Builder>>,
    buffer: usize,
}

impl LocalScheduler {
    #[inline]
    pub fn new(workspace: Workspace) -> Self {
        Self {
            workspace,
            builders: HashMap::new(),
            buffer: DEFAULT_BUFFER,
        }
    }

    /// Capacity of each task's result channel.
    #[inline]
    pub fn with_buffer(mut self, buffer: usize) -> Self {
        self.buffer = buffer.max(1);
        self
    }

    /// Register a builder under its own name; a later registration with the same name replaces the earlier one.
    pub fn register(&mut self, builder: Arc<dyn Builder>) {
        let name = builder.name().to_string();
        trace!(builder = %name, "builder registered");
        self.builders.insert(name, builder);
    }

    pub fn with_builder(mut self, builder: Arc<dyn Builder>) -> Self {
        self.register(builder);
        self
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn pick(&self, name: &str) -> Result<&Arc<dyn Builder>, SchedulerError> {
        self.builders
            .get(name)
            .ok_or_else(|| SchedulerError::UnknownBuilder(name.to_string()))
    }

    fn launch(
        &self,
        builder: Arc<dyn Builder>,
        target: Option<TargetRef>,
        options: Options,
        root: Option<PathBuf>,
    ) -> TaskHandle {
        let (tx, rx) = mpsc::channel(self.buffer);
        let cancel = CancellationToken::new();
        let ctx = BuilderContext::new(target.clone(), options, root, tx.clone(), cancel.clone());

        let label = target.as_ref().map(ToString::to_string).unwrap_or_default();
        let span = debug_span!("builder", builder = builder.name(), task = %label);
        let token = cancel.clone();
        tokio::spawn(
            async move {
                tokio::select! {
                    res = builder.run(ctx) => {
                        if let Err(e) = res {
                            debug!(error = %e, "builder failed");
                            let _ = tx.send(Err(e)).await;
                        } else {
                            trace!("builder finished");
                        }
                    }
                    _ = token.cancelled() => {
                        debug!("builder cancelled");
                    }
                }
            }
            .instrument(span),
        );

        TaskHandle::from_receiver(rx, cancel)
    }
}

#[async_trait]
impl Scheduler for LocalScheduler {
    #[instrument(level = "debug", skip(self, target, overrides), fields(task = %target))]
    async fn request_target(
        &self,
        target: &TargetRef,
        overrides: &Options,
    ) -> Result<TaskHandle, SchedulerError> {
        let resolved = self.workspace.resolve(target, overrides)?;
        let builder = self.pick(&resolved.builder)?;
        builder.validate(&resolved.options)?;

        debug!(builder = %resolved.builder, "target resolved");
        Ok(self.launch(
            Arc::clone(builder),
            Some(target.clone()),
            resolved.options,
            resolved.root,
        ))
    }

    #[instrument(level = "debug", skip(self, options))]
    async fn request_inline(
        &self,
        builder: &str,
        options: &Options,
    ) -> Result<TaskHandle, SchedulerError> {
        let b = self.pick(builder)?;
        b.validate(options)?;
        Ok(self.launch(Arc::clone(b), None, options.clone(), None))
    }
}
