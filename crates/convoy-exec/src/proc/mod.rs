use std::{collections::BTreeMap, path::PathBuf, process::Stdio, time::Duration};

use async_trait::async_trait;
use convoy_core::{Builder, BuilderContext, HandleError, SchedulerError};
use convoy_model::{Options, TaskResult};
use serde::Deserialize;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    process::Command,
};
use tracing::{debug, trace};

use crate::{
    error::{ExecError, ExecResult},
    limits::{ProcLimits, attach_rlimits},
    util::{cmd_program, kill_graceful, resolve_cwd},
};

#[cfg(feature = "shell")]
pub mod shell;

/// How long stdout may keep draining after the child exited.
///
/// Background processes started by the command inherit the pipe and can hold it open indefinitely.
const STDOUT_DRAIN: Duration = Duration::from_millis(250);

/// Options of the `exec` builder.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcOptions {
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    /// Relative paths are taken from the project root; defaults to the root itself.
    #[serde(default)]
    pub cwd: Option<PathBuf>,
    /// Report a failed result when the exit code is non-zero.
    #[serde(default = "default_true")]
    pub fail_on_non_zero: bool,
    #[serde(default)]
    pub limits: ProcLimits,
}

pub(crate) fn default_true() -> bool {
    true
}

impl ProcOptions {
    pub fn parse(options: &Options) -> ExecResult<Self> {
        let opts: Self = options.to_typed()?;
        if opts.command.trim().is_empty() {
            return Err(ExecError::MissingCommand);
        }
        Ok(opts)
    }
}

/// Builder that runs one program and reports its exit status.
pub struct ProcBuilder {
    name: String,
}

impl ProcBuilder {
    pub fn new() -> Self {
        Self {
            name: "exec".into(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Default for ProcBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Builder for ProcBuilder {
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self, options: &Options) -> Result<(), SchedulerError> {
        ProcOptions::parse(options)
            .map(drop)
            .map_err(|e| e.into_scheduler(&self.name))
    }

    async fn run(&self, ctx: BuilderContext) -> Result<(), HandleError> {
        let opts = ProcOptions::parse(ctx.options())?;
        trace!(command = %opts.command, args = ?opts.args, "spawn");

        let mut cmd = cmd_program(&opts.command, &opts.args);
        if let Some(cwd) = resolve_cwd(opts.cwd.as_deref(), ctx.root()) {
            cmd.current_dir(cwd);
        }
        cmd.envs(&opts.env);
        attach_rlimits(&mut cmd, &opts.limits);

        if let Some(result) = supervise(cmd, opts.fail_on_non_zero, &ctx).await? {
            ctx.emit(result).await?;
        }
        Ok(())
    }
}

/// Spawn `cmd` and wait for it, killing the child on cancellation.
///
/// Returns `None` when the task was cancelled before the child exited.
pub(crate) async fn supervise(
    mut cmd: Command,
    fail_on_non_zero: bool,
    ctx: &BuilderContext,
) -> ExecResult<Option<TaskResult>> {
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::inherit());
    cmd.kill_on_drop(true);

    let mut child = cmd.spawn().map_err(ExecError::Spawn)?;

    let mut stdout = child.stdout.take().map(|out| {
        tokio::spawn(async move {
            let mut lines = BufReader::new(out).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(target: "convoy::exec::stdout", %line);
            }
        })
    });

    tokio::select! {
        status = child.wait() => {
            let status = status.map_err(ExecError::Wait)?;
            if let Some(reader) = stdout.as_mut() {
                if tokio::time::timeout(STDOUT_DRAIN, &mut *reader).await.is_err() {
                    trace!("stdout still open after exit; detaching reader");
                    reader.abort();
                }
            }

            let result = match status.code() {
                Some(code) if code != 0 && fail_on_non_zero => {
                    debug!(code, "exit non-zero");
                    TaskResult::failed(format!("exit code: {code}")).with_info("exitCode", code)
                }
                Some(code) => TaskResult::ok().with_info("exitCode", code),
                None if fail_on_non_zero => TaskResult::failed("terminated by signal"),
                None => TaskResult::ok(),
            };
            Ok(Some(result))
        }
        _ = ctx.cancellation().cancelled() => {
            debug!("cancelled; killing child");
            if let Some(reader) = stdout {
                reader.abort();
            }
            let _ = kill_graceful(&mut child).await;
            Ok(None)
        }
    }
}
