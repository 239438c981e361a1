pub mod aggregator;
pub use aggregator::{ResultAggregator, ResultSlot};

pub mod builder;
pub use builder::{Builder, BuilderContext};

pub mod error;
pub use error::{CoreError, HandleError, SchedulerError};

pub mod handle;
pub use handle::{ResultEvent, TaskHandle};

pub mod orchestrator;
pub use orchestrator::{ChannelErrorPolicy, Orchestrator, OrchestratorConfig, VerdictStream};

pub mod progress;
pub use progress::{NoopReporter, ProgressReporter};

pub mod scheduler;
pub use scheduler::{LocalScheduler, Scheduler};
