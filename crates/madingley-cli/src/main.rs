//! Madingley CLI - run cross-grid-cell ecology from the command line.

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "madingley")]
#[command(author, version, about = "Madingley - cross-grid-cell ecology", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new Madingley project
    Init {
        /// Project directory (default: current directory)
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Run the model, resuming the current snapshot if there is one
    Run {
        /// Number of time steps to run (default: from madingley.toml)
        #[arg(short, long)]
        steps: Option<u64>,

        /// Start from a freshly seeded grid instead of resuming
        #[arg(long)]
        fresh: bool,

        /// Write committed dispersals to this JSON file
        #[arg(short, long)]
        dispersal_log: Option<String>,
    },

    /// Show grid statistics for the current snapshot
    Stats,

    /// Manage saved snapshots
    Session {
        #[command(subcommand)]
        command: SessionCommands,
    },
}

#[derive(Subcommand)]
enum SessionCommands {
    /// Save the current snapshot under a name
    Save {
        /// Session name
        name: String,
    },

    /// Make a saved snapshot current
    Load {
        /// Session name
        name: String,
    },

    /// List saved snapshots
    List,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Init { path } => commands::init::run(path),
        Commands::Run {
            steps,
            fresh,
            dispersal_log,
        } => commands::run::run(steps, fresh, dispersal_log, cli.verbose),
        Commands::Stats => commands::stats::run(),
        Commands::Session { command } => match command {
            SessionCommands::Save { name } => commands::session::save(&name),
            SessionCommands::Load { name } => commands::session::load(&name),
            SessionCommands::List => commands::session::list(),
        },
    }
}
