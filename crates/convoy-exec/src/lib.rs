//! Concrete builders for the local scheduler.
use std::sync::Arc;

use convoy_core::LocalScheduler;

mod error;
pub use error::{ExecError, ExecResult};

pub mod r#fn;
pub use r#fn::FnBuilder;

pub mod limits;
pub use limits::ProcLimits;

pub mod proc;
pub use proc::{ProcBuilder, ProcOptions};

#[cfg(feature = "shell")]
pub use proc::shell::{ShellBuilder, ShellOptions};

mod util;

/// Register the process builders (`exec`, plus `shell` with the `shell` feature).
pub fn register_builtin(scheduler: &mut LocalScheduler) {
    scheduler.register(Arc::new(ProcBuilder::new()));
    #[cfg(feature = "shell")]
    scheduler.register(Arc::new(ShellBuilder::new()));
}

pub mod prelude {
    pub use crate::error::{ExecError, ExecResult};
    pub use crate::{FnBuilder, ProcBuilder, ProcLimits, register_builtin};
}
