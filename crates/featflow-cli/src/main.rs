mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, hook::HookEvent, statusline::StatuslineSubcommand};
use featflow_core::hooks::HookVerdict;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "featflow",
    about = "File-driven feature workflow: status from idea/plan/shipped files, dashboard, statusline",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from docs/features/ or .git/)
    #[arg(long, global = true, env = "FEATFLOW_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List features with their derived status
    List {
        /// Only show features in this status (backlog, in_progress, completed)
        #[arg(long)]
        status: Option<String>,
    },

    /// Show one feature, including dependencies that are not yet completed
    Show { id: String },

    /// Regenerate the dashboard from the feature directories
    Dashboard,

    /// Mark a feature as shipped: write shipped.md, clear the statusline, refresh the dashboard
    Ship {
        id: String,
        /// One-line summary for shipped.md
        summary: Option<String>,
    },

    /// Set, clear or show the feature shown in the terminal statusline
    Statusline {
        #[command(subcommand)]
        subcommand: StatuslineSubcommand,
    },

    /// Editor tool-use hooks; read the hook JSON on stdin
    Hook {
        #[command(subcommand)]
        event: HookEvent,
    },

    /// Show, create or validate .featflow.yaml
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    // stdout carries command output and JSON; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::List { status } => cmd::feature::list(&root, status.as_deref(), cli.json),
        Commands::Show { id } => cmd::feature::show(&root, &id, cli.json),
        Commands::Dashboard => cmd::dashboard::run(&root, cli.json),
        Commands::Ship { id, summary } => cmd::ship::run(&root, &id, summary, cli.json),
        Commands::Statusline { subcommand } => cmd::statusline::run(&root, subcommand, cli.json),
        Commands::Hook { event } => match cmd::hook::run(&root, event) {
            Ok(HookVerdict::Block) => std::process::exit(2),
            Ok(HookVerdict::Allow) => Ok(()),
            Err(e) => Err(e),
        },
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
