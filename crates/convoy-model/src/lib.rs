//! Plain data types shared by the convoy crates.
//!
//! Nothing here performs I/O except [`Workspace::load`]; scheduling and aggregation live in `convoy-core`.

mod error;
pub use error::ModelError;

mod domain;
pub use domain::*;

mod kind;
pub use kind::TaskSpec;

mod request;
pub use request::{BatchRequest, InlineTaskInput, TargetSpecInput};

mod workspace;
pub use workspace::{Project, ResolvedTarget, TargetDefinition, Workspace};

pub use serde_json::Value;
