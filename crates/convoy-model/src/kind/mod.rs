mod task;
pub use task::TaskSpec;
