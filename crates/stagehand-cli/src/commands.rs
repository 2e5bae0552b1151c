use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use stagehand_backend::{InMemoryBackend, ScriptedDialog, StaticCommitGraph};
use stagehand_staging::FileEntity;
use stagehand_types::{HeadCommit, StatusSnapshot};
use stagehand_workflow::{CommitWorkflowController, StagingConfig};
use tracing::debug;

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Replay(args) => cmd_replay(config, args).await,
        Command::Validate(args) => cmd_validate(config, args).await,
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<StagingConfig> {
    match path {
        Some(path) => StagingConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(StagingConfig::default()),
    }
}

fn read_snapshot(path: &Path) -> anyhow::Result<StatusSnapshot> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading snapshot {}", path.display()))?;
    StatusSnapshot::from_json(&json).with_context(|| format!("parsing snapshot {}", path.display()))
}

/// A controller over an in-memory backend; nothing is ever confirmed.
fn replay_controller(
    config: StagingConfig,
    backend: Arc<InMemoryBackend>,
    head: Option<HeadCommit>,
) -> CommitWorkflowController {
    CommitWorkflowController::new(
        config,
        backend,
        Arc::new(StaticCommitGraph::new(head)),
        Arc::new(ScriptedDialog::answering(false)),
    )
}

async fn cmd_replay(config: StagingConfig, args: ReplayArgs) -> anyhow::Result<()> {
    let backend = Arc::new(InMemoryBackend::new());
    for path in &args.snapshots {
        backend.push_snapshot(read_snapshot(path)?)?;
    }
    let mut controller = replay_controller(config, backend, None);

    for path in &args.snapshots {
        let report = controller.refresh().await?;
        debug!(snapshot = %path.display(), added = report.reconciliation.added.len(), "replayed");

        println!("{} {}", "==>".blue().bold(), path.display().to_string().bold());
        for evicted in &report.reconciliation.evicted {
            println!("  {} {}", "-".red(), evicted.dimmed());
        }
        for entity in controller.area().files() {
            print_entity(entity);
        }
        println!("  {}  mode: {}", controller.area().stats(), controller.mode().to_string().cyan());
    }
    Ok(())
}

fn print_entity(entity: &FileEntity) {
    let mark = if entity.staged { "[x]".green() } else { "[ ]".normal() };
    let letter = if entity.conflict {
        "C".red().bold()
    } else if entity.is_new {
        "N".green()
    } else if entity.removed {
        "D".red()
    } else {
        "M".yellow()
    };
    println!("  {} {} {} ({})", mark, letter, entity.path(), entity.file_type());
}

async fn cmd_validate(config: StagingConfig, args: ValidateArgs) -> anyhow::Result<()> {
    let backend = Arc::new(InMemoryBackend::with_snapshot(read_snapshot(&args.snapshot)?));
    let head = args.head_title.map(|title| HeadCommit::new(title, args.head_body));
    let mut controller = replay_controller(config, backend, head);
    controller.refresh().await?;
    if args.amend {
        controller.toggle_amend()?;
    }
    // A merge snapshot supplies the draft; explicit flags override it.
    if !args.title.is_empty() {
        controller.set_title(args.title);
    }
    if !args.body.is_empty() {
        controller.set_body(args.body);
    }

    println!("Mode: {}", controller.mode().to_string().cyan());
    println!("{}", controller.area().stats());
    match controller.validation() {
        None => println!("{} Ready to commit", "✓".green().bold()),
        Some(reason) => println!("{} {}", "✗".red().bold(), reason),
    }
    println!("\n{}", controller.draft().compose());
    Ok(())
}
