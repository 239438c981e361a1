use std::{future::Future, sync::Arc};

use async_trait::async_trait;
use convoy_core::{Builder, BuilderContext, HandleError};
use futures::{FutureExt, future::BoxFuture};

type BuildFn = dyn Fn(BuilderContext) -> BoxFuture<'static, Result<(), HandleError>> + Send + Sync;

/// Builder backed by an async closure.
///
/// Handy for in-process work and for tests:
///
/// ```ignore
/// let lint = FnBuilder::new("lint", |ctx| async move {
///     ctx.emit(TaskResult::ok()).await
/// });
/// ```
pub struct FnBuilder {
    name: String,
    func: Arc<BuildFn>,
}

impl FnBuilder {
    pub fn new<F, Fut>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(BuilderContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandleError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(move |ctx| func(ctx).boxed()),
        }
    }
}

#[async_trait]
impl Builder for FnBuilder {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, ctx: BuilderContext) -> Result<(), HandleError> {
        (self.func)(ctx).await
    }
}
