//! Command-line interface for Huskier
//!
//! Parses arguments with clap, sets up logging and dispatches to the command
//! implementations. Commands report an exit code instead of exiting, `main`
//! is the only place the process terminates.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};

pub mod commands;
mod output;

pub use output::Output;

#[derive(Parser)]
#[command(
    name = "huskier",
    version = env!("CARGO_PKG_VERSION"),
    about = "Git pre-commit hook runner with sequential and parallel execution",
    long_about = "Huskier runs the commands configured under the `huskier` key of package.json \
                  as git hooks, one at a time or all at once, and stops at the first failure."
)]
pub struct Cli {
    /// Run as if started in <DIR> instead of current working directory
    #[arg(short = 'C', long = "directory", global = true)]
    pub directory: Option<String>,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use custom configuration file (package.json style .json, or .toml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the commands configured for a hook
    Run(commands::run::RunArgs),
    /// Install the pre-commit hook and add the huskier key to package.json
    Init(commands::init::InitArgs),
    /// Remove hooks installed by huskier
    Uninstall(commands::uninstall::UninstallArgs),
    /// Show version information
    Version,
}

impl Cli {
    /// Execute the parsed command and return the process exit code
    pub async fn run(self) -> Result<i32> {
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)?;
        }

        setup_logging(self.verbose, self.quiet);
        let output = Output::new(self.verbose > 0, self.quiet);

        match self.command {
            Some(Commands::Run(args)) => {
                commands::run::execute(args, self.config.as_deref(), output).await
            }
            Some(Commands::Init(args)) => commands::init::execute(args, &output).await,
            Some(Commands::Uninstall(args)) => commands::uninstall::execute(args, &output).await,
            Some(Commands::Version) => commands::version::execute(&output).await,
            None => {
                Cli::command().print_help()?;
                Ok(0)
            }
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info"),
            2 => tracing_subscriber::EnvFilter::new("debug"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    // Keep logs off stdout so they never interleave with hook output
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
