use std::fmt;

use serde::{Deserialize, Serialize};

/// Completion counter reported after every state change of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Slots holding at least one result.
    pub completed: usize,
    /// Number of tasks in the run.
    pub total: usize,
}

impl Progress {
    #[inline]
    pub fn new(completed: usize, total: usize) -> Self {
        Self { completed, total }
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.completed >= self.total
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.completed, self.total)
    }
}
