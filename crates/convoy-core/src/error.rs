use convoy_model::ModelError;
use thiserror::Error;

/// Failure to turn a spec into a running handle.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("no builder registered for '{0}'")]
    UnknownBuilder(String),

    #[error("invalid options for builder '{builder}': {reason}")]
    InvalidOptions { builder: String, reason: String },

    #[error(transparent)]
    Workspace(#[from] ModelError),

    #[error("scheduling rejected: {0}")]
    Rejected(String),
}

/// Failure reported on a handle's result channel instead of a result.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{reason}")]
pub struct HandleError {
    pub reason: String,
}

impl HandleError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("failed to schedule task #{index}: {source}")]
    Scheduling {
        index: usize,
        #[source]
        source: SchedulerError,
    },

    #[error("result channel of task #{index} failed: {source}")]
    Channel {
        index: usize,
        #[source]
        source: HandleError,
    },

    #[error("invalid request: {0}")]
    Model(#[from] ModelError),
}
