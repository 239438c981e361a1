use std::{collections::BTreeMap, fs, path::Path, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::{ModelError, Options, TargetRef};

/// Registry of projects and their named targets, usually loaded from a JSON file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    #[serde(default)]
    pub projects: BTreeMap<String, Project>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Project directory; builders use it as their default working directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    #[serde(default)]
    pub targets: BTreeMap<String, TargetDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetDefinition {
    /// Id of the builder that runs this target.
    pub builder: String,
    #[serde(default)]
    pub options: Options,
    /// Named option overlays selectable through the reference's configuration segment.
    #[serde(default)]
    pub configurations: BTreeMap<String, Options>,
    /// Used when the reference names no configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_configuration: Option<String>,
}

/// A target after option resolution, ready to hand to a builder.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTarget {
    pub builder: String,
    pub options: Options,
    pub root: Option<PathBuf>,
}

impl Workspace {
    pub fn from_json(input: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn with_target(
        mut self,
        project: impl Into<String>,
        target: impl Into<String>,
        definition: TargetDefinition,
    ) -> Self {
        self.projects
            .entry(project.into())
            .or_default()
            .targets
            .insert(target.into(), definition);
        self
    }

    pub fn target(&self, project: &str, target: &str) -> Result<&TargetDefinition, ModelError> {
        let p = self
            .projects
            .get(project)
            .ok_or_else(|| ModelError::UnknownProject(project.to_string()))?;
        p.targets
            .get(target)
            .ok_or_else(|| ModelError::UnknownTarget {
                project: project.to_string(),
                target: target.to_string(),
            })
    }

    /// Every registered target, ordered by project then target name.
    pub fn targets(&self) -> Vec<TargetRef> {
        self.projects
            .iter()
            .flat_map(|(project, p)| {
                p.targets
                    .keys()
                    .map(move |target| TargetRef::new(project.as_str(), target.as_str()))
            })
            .collect()
    }

    /// Resolve the builder and the final options for a reference.
    ///
    /// Layering: target options, then every selected configuration in order, then `overrides`.
    pub fn resolve(
        &self,
        target: &TargetRef,
        overrides: &Options,
    ) -> Result<ResolvedTarget, ModelError> {
        let def = self.target(&target.project, &target.target)?;
        let mut options = def.options.clone();

        let selected: Vec<&str> = if target.configuration.is_some() {
            target.configurations().collect()
        } else {
            def.default_configuration.as_deref().into_iter().collect()
        };
        for name in selected {
            let overlay =
                def.configurations
                    .get(name)
                    .ok_or_else(|| ModelError::UnknownConfiguration {
                        target: target.to_string(),
                        configuration: name.to_string(),
                    })?;
            options.merge(overlay);
        }
        options.merge(overrides);

        let root = self
            .projects
            .get(&target.project)
            .and_then(|p| p.root.clone());

        Ok(ResolvedTarget {
            builder: def.builder.clone(),
            options,
            root,
        })
    }
}

impl TargetDefinition {
    pub fn new(builder: impl Into<String>) -> Self {
        Self {
            builder: builder.into(),
            options: Options::new(),
            configurations: BTreeMap::new(),
            default_configuration: None,
        }
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    pub fn with_configuration(mut self, name: impl Into<String>, overlay: Options) -> Self {
        self.configurations.insert(name.into(), overlay);
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> Workspace {
        Workspace::from_json(
            r#"{
              "projects": {
                "web": {
                  "root": "apps/web",
                  "targets": {
                    "build": {
                      "builder": "exec",
                      "options": { "command": "make", "args": ["all"], "optimize": false },
                      "configurations": {
                        "production": { "optimize": true },
                        "ci": { "args": ["ci"] }
                      },
                      "defaultConfiguration": "production"
                    },
                    "lint": { "builder": "shell" }
                  }
                }
              }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn default_configuration_applies_when_none_named() {
        let ws = sample();
        let resolved = ws
            .resolve(&TargetRef::new("web", "build"), &Options::new())
            .unwrap();
        assert_eq!(resolved.builder, "exec");
        assert_eq!(resolved.options.get("optimize"), Some(&json!(true)));
        assert_eq!(resolved.root, Some(PathBuf::from("apps/web")));
    }

    #[test]
    fn configurations_then_overrides_layer_in_order() {
        let ws = sample();
        let target = TargetRef::parse("web:build:ci,production").unwrap();
        let overrides = Options::new().with("command", "ninja");

        let resolved = ws.resolve(&target, &overrides).unwrap();
        assert_eq!(resolved.options.get("args"), Some(&json!(["ci"])));
        assert_eq!(resolved.options.get("optimize"), Some(&json!(true)));
        assert_eq!(resolved.options.get("command"), Some(&json!("ninja")));
    }

    #[test]
    fn missing_options_default_to_empty() {
        let ws = sample();
        let resolved = ws
            .resolve(&TargetRef::new("web", "lint"), &Options::new())
            .unwrap();
        assert!(resolved.options.is_empty());
    }

    #[test]
    fn unknown_names_are_reported() {
        let ws = sample();
        assert!(matches!(
            ws.resolve(&TargetRef::new("api", "build"), &Options::new()),
            Err(ModelError::UnknownProject(_))
        ));
        assert!(matches!(
            ws.resolve(&TargetRef::new("web", "serve"), &Options::new()),
            Err(ModelError::UnknownTarget { .. })
        ));
        assert!(matches!(
            ws.resolve(
                &TargetRef::new("web", "build").with_configuration("staging"),
                &Options::new()
            ),
            Err(ModelError::UnknownConfiguration { .. })
        ));
    }

    #[test]
    fn targets_lists_every_definition() {
        let ws = sample().with_target("api", "test", TargetDefinition::new("exec"));
        let names: Vec<_> = ws.targets().iter().map(ToString::to_string).collect();
        assert_eq!(names, vec!["api:test", "web:build", "web:lint"]);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Workspace::load("/definitely/not/here/convoy.json").unwrap_err();
        assert!(matches!(err, ModelError::Io { .. }));
    }
}
