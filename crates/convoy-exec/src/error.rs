use convoy_core::{HandleError, SchedulerError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecError {
    #[error("invalid options: {0}")]
    InvalidOptions(String),
    #[error("missing command")]
    MissingCommand,
    #[error("empty shell script")]
    EmptyScript,
    #[error("spawn failed: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("wait failed: {0}")]
    Wait(#[source] std::io::Error),
}

pub type ExecResult<T> = Result<T, ExecError>;

impl ExecError {
    /// Validation failure as seen by the scheduler.
    pub fn into_scheduler(self, builder: &str) -> SchedulerError {
        SchedulerError::InvalidOptions {
            builder: builder.to_string(),
            reason: self.to_string(),
        }
    }
}

impl From<ExecError> for HandleError {
    fn from(e: ExecError) -> Self {
        HandleError::new(e.to_string())
    }
}

impl From<convoy_model::ModelError> for ExecError {
    fn from(e: convoy_model::ModelError) -> Self {
        ExecError::InvalidOptions(e.to_string())
    }
}
