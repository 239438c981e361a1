use serde::{Deserialize, Serialize};

use crate::TaskResult;

/// Overall outcome of one orchestration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateVerdict {
    pub success: bool,
}

impl AggregateVerdict {
    /// AND-reduction over individual results; vacuously successful for no results.
    pub fn from_results<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = &'a TaskResult>,
    {
        Self {
            success: results.into_iter().all(|r| r.success),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_success() {
        assert!(AggregateVerdict::from_results(std::iter::empty()).success);
    }

    #[test]
    fn any_failure_fails() {
        let results = [TaskResult::ok(), TaskResult::failed("boom"), TaskResult::ok()];
        assert!(!AggregateVerdict::from_results(&results).success);
    }
}
