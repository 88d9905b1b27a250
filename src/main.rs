//! doctrack - tracks files changed by AI coding tools for CLAUDE.md upkeep.

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use doctrack::{cli, config, Error};

/// Environment variable holding a tracing filter directive.
const LOG_ENV: &str = "DOCTRACK_LOG";

#[derive(Parser)]
#[command(name = "doctrack")]
#[command(about = "doctrack - records files changed by AI coding tools for CLAUDE.md updates")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// PostToolUse hook: read the tool payload from stdin and record changed files
    PostToolUse,

    /// Print queued dirty files and clear the queue
    Drain {
        /// Leave the queue in place
        #[arg(long)]
        peek: bool,

        /// Print each path once
        #[arg(long)]
        unique: bool,
    },

    /// Show what a shell command would record
    Classify {
        /// Shell command line, quoted as one argument
        command: String,
    },

    /// Register the hook in .claude/settings.json
    Install,

    /// Remove the hook from .claude/settings.json
    Uninstall,
}

fn main() -> Result<(), Error> {
    let cli = Cli::parse();

    // The hook stays silent unless logging is asked for explicitly.
    let quiet = matches!(cli.command, Some(Commands::PostToolUse));
    init_logging(quiet);

    match cli.command {
        None => {
            Cli::command().print_help()?;
            println!();
        }
        Some(Commands::PostToolUse) => {
            cli::post_tool_use::run();
        }
        Some(Commands::Drain { peek, unique }) => {
            cli::drain::run(&config::project_root(), peek, unique)?;
        }
        Some(Commands::Classify { command }) => {
            cli::classify::run(&command, &config::project_root())?;
        }
        Some(Commands::Install) => {
            cli::install::install(&config::project_root())?;
        }
        Some(Commands::Uninstall) => {
            cli::install::uninstall(&config::project_root())?;
        }
    }

    Ok(())
}

fn init_logging(quiet: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if quiet {
            EnvFilter::new("off")
        } else {
            EnvFilter::new("doctrack=info")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
