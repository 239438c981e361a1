use std::{
    fmt,
    pin::Pin,
    task::{Context, Poll},
};

use convoy_model::TaskResult;
use futures::{Stream, StreamExt, stream::BoxStream};
use tokio::sync::mpsc;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::error::HandleError;

/// Item type of a handle's result channel.
pub type ResultEvent = Result<TaskResult, HandleError>;

/// Live reference to scheduled work.
///
/// The handle is a stream of result events; a task may emit any number of them before the stream ends.
/// Dropping the handle cancels the work, so a discarded handle never leaves an orphaned task behind.
pub struct TaskHandle {
    results: BoxStream<'static, ResultEvent>,
    cancel: CancellationToken,
    _guard: DropGuard,
}

impl TaskHandle {
    /// Wrap an arbitrary result stream; `cancel` is triggered when the handle is cancelled or dropped.
    pub fn new<S>(results: S, cancel: CancellationToken) -> Self
    where
        S: Stream<Item = ResultEvent> + Send + 'static,
    {
        let guard = cancel.clone().drop_guard();
        Self {
            results: results.boxed(),
            cancel,
            _guard: guard,
        }
    }

    /// Handle backed by a channel; the stream ends once every sender is dropped.
    pub fn from_receiver(rx: mpsc::Receiver<ResultEvent>, cancel: CancellationToken) -> Self {
        let results = futures::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|event| (event, rx))
        });
        Self::new(results, cancel)
    }

    #[inline]
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Token observed by the running work.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

impl Stream for TaskHandle {
    type Item = ResultEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.results.poll_next_unpin(cx)
    }
}

impl fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle")
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}
