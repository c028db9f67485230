use crate::demo::{run_assess, run_batch, run_demo, AssessArgs, BatchArgs, DemoArgs};
use crate::server;
use bnpl_risk::config::AssessmentConfig;
use bnpl_risk::error::AppError;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "BNPL Risk Assessment",
    about = "Score buy-now-pay-later applicants and explain the lending decision",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Assess a single applicant described by command-line flags
    Assess(AssessArgs),
    /// Assess every applicant row in a CSV export
    Batch(BatchArgs),
    /// Walk through approve, conditional, and reject reference applicants
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

/// Model selection shared by the offline commands.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct ModelArgs {
    /// JSON model artifact bundle (defaults to the embedded reference model)
    #[arg(long)]
    pub(crate) artifacts: Option<PathBuf>,
    /// Only list recommended conditions for conditional approvals
    #[arg(long)]
    pub(crate) gate_conditions: bool,
}

impl ModelArgs {
    pub(crate) fn assessment_config(&self) -> AssessmentConfig {
        AssessmentConfig {
            artifacts_path: self.artifacts.clone(),
            gate_conditions: self.gate_conditions,
        }
    }
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Assess(args) => run_assess(args),
        Command::Batch(args) => run_batch(args),
        Command::Demo(args) => run_demo(args),
    }
}
