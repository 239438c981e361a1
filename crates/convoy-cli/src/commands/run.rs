use std::{fs, path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use clap::Args;
use convoy_core::{ChannelErrorPolicy, LocalScheduler, Orchestrator, OrchestratorConfig};
use convoy_exec::register_builtin;
use convoy_model::{AggregateVerdict, BatchRequest};
use convoy_observe::LogReporter;
use futures::StreamExt;
use tracing::{error, info, warn};

use super::load_workspace;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Workspace file
    #[arg(long, short)]
    pub workspace: PathBuf,

    /// Targets as `project:target[:configuration]`
    pub targets: Vec<String>,

    /// JSON batch file with `targets` and `tasks`; positional targets are appended
    #[arg(long)]
    pub batch: Option<PathBuf>,

    /// Keep running and print a verdict for every later result
    #[arg(long)]
    pub watch: bool,

    /// Log result channel failures instead of aborting the run
    #[arg(long)]
    pub keep_pending: bool,
}

impl RunArgs {
    fn config(&self) -> OrchestratorConfig {
        let policy = if self.keep_pending {
            ChannelErrorPolicy::KeepPending
        } else {
            ChannelErrorPolicy::Abort
        };
        OrchestratorConfig::default()
            .with_watch(self.watch)
            .with_channel_errors(policy)
    }

    fn request(&self) -> Result<BatchRequest> {
        let base = match &self.batch {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("reading batch {}", path.display()))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("parsing batch {}", path.display()))?
            }
            None => BatchRequest::new(),
        };
        Ok(self
            .targets
            .iter()
            .fold(base, |req, target| req.with_target(target.as_str())))
    }
}

pub async fn execute(args: RunArgs) -> Result<ExitCode> {
    let workspace = load_workspace(&args.workspace)?;
    let request = args.request()?;
    if request.is_empty() {
        warn!("nothing to run");
    }

    let mut scheduler = LocalScheduler::new(workspace);
    register_builtin(&mut scheduler);

    let orchestrator = Orchestrator::new(Arc::new(scheduler))
        .with_reporter(Arc::new(LogReporter::new()))
        .with_config(args.config());

    let mut verdicts = orchestrator.run_batch(request);
    let mut last: Option<AggregateVerdict> = None;
    loop {
        tokio::select! {
            item = verdicts.next() => match item {
                Some(Ok(verdict)) => {
                    println!("{}", serde_json::to_string(&verdict)?);
                    last = Some(verdict);
                    if !args.watch {
                        break;
                    }
                }
                Some(Err(e)) => {
                    error!(error = %e, "run failed");
                    return Ok(ExitCode::FAILURE);
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted; cancelling run");
                break;
            }
        }
    }
    drop(verdicts);

    Ok(match last {
        Some(verdict) if verdict.success => ExitCode::SUCCESS,
        Some(_) => ExitCode::FAILURE,
        None => {
            warn!("run ended without a verdict");
            ExitCode::FAILURE
        }
    })
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: RunArgs,
    }

    fn parse(argv: &[&str]) -> RunArgs {
        Harness::parse_from(std::iter::once("convoy").chain(argv.iter().copied())).args
    }

    #[test]
    fn positional_targets_build_the_request() {
        let args = parse(&["-w", "ws.json", "app:build", "app:test:ci"]);
        let request = args.request().unwrap();
        assert_eq!(request.len(), 2);
        assert_eq!(request.targets[1].target, "app:test:ci");
    }

    #[test]
    fn flags_map_to_orchestrator_config() {
        let args = parse(&["--workspace", "ws.json", "--watch", "--keep-pending"]);
        let cfg = args.config();
        assert!(cfg.watch);
        assert_eq!(cfg.channel_errors, ChannelErrorPolicy::KeepPending);

        let cfg = parse(&["-w", "ws.json"]).config();
        assert!(!cfg.watch);
        assert_eq!(cfg.channel_errors, ChannelErrorPolicy::Abort);
    }

    #[test]
    fn missing_batch_file_is_reported() {
        let args = parse(&["-w", "ws.json", "--batch", "/nonexistent/batch.json"]);
        let err = args.request().unwrap_err();
        assert!(err.to_string().contains("reading batch"));
    }
}
