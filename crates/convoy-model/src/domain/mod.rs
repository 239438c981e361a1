mod options;
pub use options::Options;

mod target_ref;
pub use target_ref::TargetRef;

mod task_result;
pub use task_result::TaskResult;

mod verdict;
pub use verdict::AggregateVerdict;

mod progress;
pub use progress::Progress;

/// Separator between the segments of a composite target reference.
pub const TARGET_SEPARATOR: char = ':';

/// Separator between configuration names inside the configuration segment.
pub const CONFIGURATION_SEPARATOR: char = ',';
