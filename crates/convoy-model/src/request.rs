use serde::{Deserialize, Serialize};

use crate::{ModelError, Options, TargetRef, TaskSpec};

/// Raw orchestration request, as read from a batch file or built by a caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRequest {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<TargetSpecInput>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<InlineTaskInput>,
}

/// By-reference entry: a composite `project:target[:configuration]` string plus overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetSpecInput {
    pub target: String,
    #[serde(default, skip_serializing_if = "Options::is_empty")]
    pub overrides: Options,
}

/// Inline entry: a builder id plus its options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineTaskInput {
    pub builder: String,
    #[serde(default, skip_serializing_if = "Options::is_empty")]
    pub options: Options,
}

impl BatchRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.targets.push(TargetSpecInput {
            target: target.into(),
            overrides: Options::new(),
        });
        self
    }

    pub fn with_task(mut self, builder: impl Into<String>, options: Options) -> Self {
        self.tasks.push(InlineTaskInput {
            builder: builder.into(),
            options,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.targets.len() + self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty() && self.tasks.is_empty()
    }

    /// Turn the request into the ordered spec list.
    ///
    /// Targets come first, then inline tasks, each in declared order.
    /// The position in the returned vector is the index used for every later correlation.
    pub fn into_specs(self) -> Result<Vec<TaskSpec>, ModelError> {
        let offset = self.targets.len();
        let mut specs = Vec::with_capacity(self.len());

        for input in self.targets {
            specs.push(TaskSpec::ByReference {
                target: TargetRef::parse(&input.target)?,
                overrides: input.overrides,
            });
        }
        for (i, input) in self.tasks.into_iter().enumerate() {
            let builder = input.builder.trim();
            if builder.is_empty() {
                return Err(ModelError::EmptyBuilder { index: offset + i });
            }
            specs.push(TaskSpec::Inline {
                builder: builder.to_string(),
                options: input.options,
            });
        }
        Ok(specs)
    }
}
