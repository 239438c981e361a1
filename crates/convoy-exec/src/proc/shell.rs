use std::{collections::BTreeMap, path::PathBuf};

use async_trait::async_trait;
use convoy_core::{Builder, BuilderContext, HandleError, SchedulerError};
use convoy_model::Options;
use serde::Deserialize;
use tokio::process::Command;
use tracing::trace;

use crate::{
    error::{ExecError, ExecResult},
    proc::{default_true, supervise},
    util::resolve_cwd,
};

/// Options of the `shell` builder.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShellOptions {
    #[serde(default)]
    pub script: String,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    #[serde(default)]
    pub cwd: Option<PathBuf>,
    #[serde(default = "default_true")]
    pub fail_on_non_zero: bool,
}

impl ShellOptions {
    pub fn parse(options: &Options) -> ExecResult<Self> {
        let opts: Self = options.to_typed()?;
        if opts.script.trim().is_empty() {
            return Err(ExecError::EmptyScript);
        }
        Ok(opts)
    }
}

/// Runs a script through the platform shell (`sh -c` / `cmd /C`).
pub struct ShellBuilder {
    name: String,
}

impl ShellBuilder {
    pub fn new() -> Self {
        Self {
            name: "shell".into(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Default for ShellBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Builder for ShellBuilder {
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self, options: &Options) -> Result<(), SchedulerError> {
        ShellOptions::parse(options)
            .map(drop)
            .map_err(|e| e.into_scheduler(&self.name))
    }

    async fn run(&self, ctx: BuilderContext) -> Result<(), HandleError> {
        let opts = ShellOptions::parse(ctx.options())?;

        cfg_if::cfg_if! {
            if #[cfg(target_family = "windows")] {
                let mut cmd = Command::new("cmd");
                cmd.arg("/C").arg(&opts.script);
            } else {
                let mut cmd = Command::new("sh");
                cmd.arg("-c").arg(&opts.script);
            }
        }

        if let Some(cwd) = resolve_cwd(opts.cwd.as_deref(), ctx.root()) {
            cmd.current_dir(cwd);
        }
        cmd.envs(&opts.env);

        trace!(script = %opts.script, "spawn");
        if let Some(result) = supervise(cmd, opts.fail_on_non_zero, &ctx).await? {
            ctx.emit(result).await?;
        }
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use serde_json::json;
    use tokio::sync::mpsc;
    use tokio_util::sync::CancellationToken;

    use super::*;

    #[test]
    fn blank_script_fails_validation() {
        let opts = Options::from_value(json!({ "script": "  " })).unwrap();
        assert!(ShellBuilder::new().validate(&opts).is_err());
    }

    #[tokio::test]
    async fn script_exit_status_is_reported() {
        let (tx, mut rx) = mpsc::channel(4);
        let opts = Options::from_value(json!({ "script": "echo building && exit 2" })).unwrap();
        let ctx = BuilderContext::new(None, opts, None, tx, CancellationToken::new());

        ShellBuilder::new().run(ctx).await.unwrap();

        let result = rx.recv().await.unwrap().unwrap();
        assert!(!result.success);
        assert_eq!(result.info.get("exitCode"), Some(&json!(2)));
    }
}
