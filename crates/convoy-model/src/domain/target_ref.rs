use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{CONFIGURATION_SEPARATOR, ModelError, TARGET_SEPARATOR};

/// Reference to a pre-registered target: `project:target[:configuration]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetRef {
    pub project: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<String>,
}

impl TargetRef {
    pub fn new(project: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            target: target.into(),
            configuration: None,
        }
    }

    pub fn with_configuration(mut self, configuration: impl Into<String>) -> Self {
        self.configuration = Some(configuration.into());
        self
    }

    /// Parse a composite reference.
    ///
    /// Only the first three `:`-separated segments are read; anything after the configuration segment is dropped.
    /// An empty configuration segment is the same as none.
    pub fn parse(input: &str) -> Result<Self, ModelError> {
        let invalid = |reason| ModelError::InvalidTarget {
            input: input.to_string(),
            reason,
        };

        let mut segments = input.split(TARGET_SEPARATOR).take(3);
        let project = segments
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| invalid("missing project"))?;
        let target = segments
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| invalid("missing target name"))?;
        let configuration = segments
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(Self {
            project: project.to_string(),
            target: target.to_string(),
            configuration,
        })
    }

    /// Configuration names in application order (`"ci,prod"` yields `ci` then `prod`).
    pub fn configurations(&self) -> impl Iterator<Item = &str> {
        self.configuration
            .as_deref()
            .into_iter()
            .flat_map(|c| c.split(CONFIGURATION_SEPARATOR))
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

impl FromStr for TargetRef {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{TARGET_SEPARATOR}{}", self.project, self.target)?;
        if let Some(configuration) = &self.configuration {
            write!(f, "{TARGET_SEPARATOR}{configuration}")?;
        }
        Ok(())
    }
}
