use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Turns infrastructure plans into shareable, secret-free artifacts.
#[derive(Parser)]
#[command(name = "terragram", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate, convert, and redact an execution plan.
    Plan(RunArgs),
    /// Same pipeline for a destroy-style plan.
    Destroy(RunArgs),
    /// Set credentials for communication with the terragram API.
    Login(LoginArgs),
}

#[derive(Args)]
pub struct RunArgs {
    /// Planning engine executable to invoke.
    #[arg(long, default_value = "terraform")]
    pub engine: String,

    /// Working directory (defaults to the current directory).
    #[arg(long)]
    pub chdir: Option<PathBuf>,
}

#[derive(Args)]
pub struct LoginArgs {
    /// API key; prompted for interactively when omitted.
    #[arg(long)]
    pub api_key: Option<String>,
}
