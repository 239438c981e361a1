use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use convoy_observe::{LoggerConfig, LoggerFormat, logger_init};

mod commands;

#[derive(Parser)]
#[command(name = "convoy")]
#[command(about = "Run workspace targets concurrently and report one verdict", long_about = None)]
struct Cli {
    /// Log filter, e.g. `info` or `convoy_core=debug` (overrides CONVOY_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log format: text, json or journald (overrides CONVOY_LOG_FORMAT)
    #[arg(long, global = true)]
    log_format: Option<LoggerFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run targets and inline tasks, print the verdict
    Run(commands::run::RunArgs),
    /// List the targets a workspace defines
    Targets {
        /// Workspace file
        #[arg(long, short)]
        workspace: std::path::PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let log = LoggerConfig::from_env_or(cli.log_level, cli.log_format)?;
    logger_init(&log)?;

    match cli.command {
        Commands::Run(args) => commands::run::execute(args).await,
        Commands::Targets { workspace } => commands::targets::list(&workspace),
    }
}
