use convoy_model::{AggregateVerdict, Progress, TaskResult};
use tracing::warn;

/// Storage for the latest result of one task.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultSlot {
    /// No result observed yet.
    Pending,
    Filled(TaskResult),
}

impl ResultSlot {
    #[inline]
    pub fn is_pending(&self) -> bool {
        matches!(self, ResultSlot::Pending)
    }
}

/// Index-keyed result table for one orchestration run.
///
/// Slots only move from `Pending` to `Filled`; recording again at an index replaces the stored result.
#[derive(Debug, Clone)]
pub struct ResultAggregator {
    slots: Vec<ResultSlot>,
    completed: usize,
}

impl ResultAggregator {
    /// Create `total` pending slots.
    pub fn new(total: usize) -> Self {
        Self {
            slots: vec![ResultSlot::Pending; total],
            completed: 0,
        }
    }

    /// Store `result` at `index`, replacing any earlier result there.
    ///
    /// Returns `true` when the slot was pending before this call.
    /// Indices outside the table are ignored.
    pub fn record(&mut self, index: usize, result: TaskResult) -> bool {
        let Some(slot) = self.slots.get_mut(index) else {
            warn!(index, total = self.slots.len(), "result for unknown slot ignored");
            return false;
        };
        let first = slot.is_pending();
        *slot = ResultSlot::Filled(result);
        if first {
            self.completed += 1;
        }
        first
    }

    #[inline]
    pub fn total(&self) -> usize {
        self.slots.len()
    }

    /// Number of filled slots.
    #[inline]
    pub fn completed(&self) -> usize {
        self.completed
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.completed == self.slots.len()
    }

    #[inline]
    pub fn progress(&self) -> Progress {
        Progress::new(self.completed, self.slots.len())
    }

    pub fn slot(&self, index: usize) -> Option<&ResultSlot> {
        self.slots.get(index)
    }

    /// AND of every stored result, or `None` while any slot is still pending.
    pub fn verdict(&self) -> Option<AggregateVerdict> {
        if !self.is_complete() {
            return None;
        }
        Some(AggregateVerdict::from_results(self.slots.iter().filter_map(
            |slot| match slot {
                ResultSlot::Filled(result) => Some(result),
                ResultSlot::Pending => None,
            },
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_pending() {
        let agg = ResultAggregator::new(3);
        assert_eq!(agg.total(), 3);
        assert_eq!(agg.completed(), 0);
        assert!(!agg.is_complete());
        assert!(agg.verdict().is_none());
        assert_eq!(agg.slot(1), Some(&ResultSlot::Pending));
    }

    #[test]
    fn empty_table_is_complete_and_successful() {
        let agg = ResultAggregator::new(0);
        assert!(agg.is_complete());
        assert_eq!(agg.verdict(), Some(AggregateVerdict { success: true }));
        assert_eq!(agg.progress(), Progress::new(0, 0));
    }

    #[test]
    fn verdict_only_after_every_slot_filled() {
        let mut agg = ResultAggregator::new(2);
        assert!(agg.record(1, TaskResult::ok()));
        assert!(agg.verdict().is_none());

        assert!(agg.record(0, TaskResult::failed("lint errors")));
        assert_eq!(agg.verdict(), Some(AggregateVerdict { success: false }));
    }

    #[test]
    fn rerecording_overwrites_without_double_counting() {
        let mut agg = ResultAggregator::new(2);
        agg.record(0, TaskResult::failed("first build broken"));
        assert!(!agg.record(0, TaskResult::ok()));
        assert!(!agg.record(0, TaskResult::ok()));
        assert_eq!(agg.completed(), 1);

        agg.record(1, TaskResult::ok());
        assert_eq!(agg.progress(), Progress::new(2, 2));
        assert_eq!(agg.verdict(), Some(AggregateVerdict { success: true }));
    }

    #[test]
    fn arrival_order_does_not_change_verdict() {
        let results = [
            TaskResult::ok(),
            TaskResult::failed("x"),
            TaskResult::ok(),
        ];
        let orders: [[usize; 3]; 3] = [[0, 1, 2], [2, 1, 0], [1, 2, 0]];

        for order in orders {
            let mut agg = ResultAggregator::new(3);
            for i in order {
                agg.record(i, results[i].clone());
            }
            assert_eq!(agg.verdict(), Some(AggregateVerdict { success: false }));
        }
    }

    #[test]
    fn out_of_range_index_is_ignored() {
        let mut agg = ResultAggregator::new(1);
        assert!(!agg.record(5, TaskResult::ok()));
        assert_eq!(agg.completed(), 0);
    }
}
