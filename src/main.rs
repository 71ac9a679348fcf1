//! Ladle - materialize agent model configuration
//!
//! Reads a user config and writes a fully-defaulted `models.json` into the
//! agent directory.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ladle::models::models_json_path;
use ladle::{ensure_models_json_in, resolve_agent_dir, RootConfig};

/// Ladle - writes models.json for your agent
#[derive(Parser, Debug)]
#[command(name = "ladle")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging (equivalent to RUST_LOG=debug)
    #[arg(short = 'd', long, global = true)]
    debug: bool,

    /// Enable verbose logging (equivalent to RUST_LOG=trace)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write models.json from a config file
    Ensure {
        /// Path to the JSON config containing a `models` section
        #[arg(short, long)]
        config: PathBuf,

        /// Agent directory (defaults to LADLE_AGENT_DIR or ~/.ladle/agents/main/agent)
        #[arg(long)]
        agent_dir: Option<PathBuf>,
    },
    /// Print where models.json lives
    Path {
        /// Agent directory (defaults to LADLE_AGENT_DIR or ~/.ladle/agents/main/agent)
        #[arg(long)]
        agent_dir: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args);

    match args.command {
        Command::Ensure { config, agent_dir } => {
            let root = RootConfig::load_from_path(&config)
                .with_context(|| format!("Failed to load config {}", config.display()))?;
            let agent_dir = agent_dir_or_default(agent_dir)?;

            let outcome = ensure_models_json_in(&root, &agent_dir)?;
            if outcome.wrote {
                println!("Wrote {}", outcome.path.display());
            } else {
                println!("Unchanged {}", outcome.path.display());
            }
        }
        Command::Path { agent_dir } => {
            let agent_dir = agent_dir_or_default(agent_dir)?;
            println!("{}", models_json_path(&agent_dir).display());
        }
    }

    Ok(())
}

fn agent_dir_or_default(agent_dir: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    match agent_dir {
        Some(dir) => Ok(dir),
        None => resolve_agent_dir().context("Could not determine the agent directory"),
    }
}

fn init_tracing(args: &Args) {
    let default_filter = if args.verbose {
        "trace"
    } else if args.debug {
        "debug"
    } else {
        "warn"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
