use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "stagehand",
    about = "Replay git status snapshots through the staging engine",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log reconciliation and diff activity
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Reconcile each snapshot in turn and print the file set after each
    Replay(ReplayArgs),
    /// Check whether a snapshot could be committed with the given message
    Validate(ValidateArgs),
}

#[derive(Args)]
pub struct ReplayArgs {
    /// Status snapshot JSON files, applied in order
    #[arg(required = true)]
    pub snapshots: Vec<PathBuf>,
}

#[derive(Args)]
pub struct ValidateArgs {
    pub snapshot: PathBuf,
    #[arg(short, long, default_value = "")]
    pub title: String,
    #[arg(short, long, default_value = "")]
    pub body: String,
    /// Amend HEAD; needs --head-title
    #[arg(long)]
    pub amend: bool,
    /// Title of the HEAD commit to amend
    #[arg(long)]
    pub head_title: Option<String>,
    /// Body of the HEAD commit to amend
    #[arg(long, default_value = "")]
    pub head_body: String,
}
