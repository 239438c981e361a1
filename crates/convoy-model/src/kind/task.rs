use serde::{Deserialize, Serialize};

use crate::{Options, TargetRef};

/// Declarative description of one unit of work in a batch.
///
/// Each variant names how the scheduler should resolve the work into a running handle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum TaskSpec {
    /// Run a target registered in the workspace.
    ByReference {
        target: TargetRef,
        /// Applied on top of the target's options and configurations.
        #[serde(default, skip_serializing_if = "Options::is_empty")]
        overrides: Options,
    },
    /// Run a builder directly by its id.
    Inline {
        builder: String,
        #[serde(default, skip_serializing_if = "Options::is_empty")]
        options: Options,
    },
}

impl TaskSpec {
    pub fn target(target: TargetRef) -> Self {
        TaskSpec::ByReference {
            target,
            overrides: Options::new(),
        }
    }

    pub fn inline(builder: impl Into<String>) -> Self {
        TaskSpec::Inline {
            builder: builder.into(),
            options: Options::new(),
        }
    }

    /// Short symbolic identifier of the variant, used for logging:
    /// - `"reference"`
    /// - `"inline"`
    pub fn kind(&self) -> &'static str {
        match self {
            TaskSpec::ByReference { .. } => "reference",
            TaskSpec::Inline { .. } => "inline",
        }
    }

    /// Human-readable label: the target reference or the builder id.
    pub fn label(&self) -> String {
        match self {
            TaskSpec::ByReference { target, .. } => target.to_string(),
            TaskSpec::Inline { builder, .. } => builder.clone(),
        }
    }
}
