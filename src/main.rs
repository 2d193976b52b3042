//! `terragram` - CLI orchestrator that drives an external infrastructure
//! planning engine and turns its output into shareable, secret-free
//! artifacts.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use terragram::auth::{self, ApiVerifier, CredentialStore};
use terragram::bus::EventBus;
use terragram::cli::{Cli, Command, RunArgs};
use terragram::errors::PipelineError;
use terragram::exit_codes::exit;
use terragram::pipeline::{Operation, PlanPipeline};
use terragram::progress::TermProgress;
use terragram::runner::CommandRunner;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let exit_code = match cli.command {
        Command::Plan(args) => run_pipeline(Operation::Plan, args)?,
        Command::Destroy(args) => run_pipeline(Operation::Destroy, args)?,
        Command::Login(args) => auth::login(
            args.api_key,
            &ApiVerifier::default(),
            &CredentialStore::default_location()?,
        )?,
    };
    std::process::exit(exit_code);
}

fn run_pipeline(operation: Operation, args: RunArgs) -> Result<i32> {
    let working_dir = match args.chdir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let bus = Arc::new(EventBus::new());
    let pipeline = PlanPipeline::new(bus, CommandRunner, args.engine, working_dir);
    let mut progress = TermProgress::new();

    match pipeline.run(operation, &mut progress) {
        Ok(artifact) => {
            println!("Redacted plan artifact written to {}", artifact.display());
            Ok(exit::SUCCESS)
        }
        Err(err) => {
            // The engine's own diagnostics are passed through unmodified so
            // operators can diagnose the underlying tool's failure.
            match &err {
                PipelineError::Process { stderr } => eprintln!("{stderr}"),
                other => eprintln!("error: {other}"),
            }
            Ok(err.exit_code())
        }
    }
}
