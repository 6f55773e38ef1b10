mod commands;

use clap::{Parser, Subcommand};
use dockpost_plugin::{DockerPlugin, Hook, ProcessExecutor};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dockpost")]
#[command(about = "Build and push Docker images after a release is published", long_about = None)]
struct Cli {
    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show plugin metadata and configuration options
    Info {
        /// Print as JSON, including the configuration schema
        #[arg(long)]
        json: bool,
    },
    /// Validate a configuration file
    Validate {
        /// Configuration file (searched for when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Run a release hook against a configuration file
    Run {
        /// Configuration file (searched for when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Version being released, e.g. v1.2.3
        #[arg(long = "version", env = "DOCKPOST_VERSION", value_name = "VERSION")]
        release_version: String,
        /// Hook to run
        #[arg(long, default_value = "post-publish")]
        hook: Hook,
        /// Resolve and validate only, run no docker commands
        #[arg(long)]
        dry_run: bool,
    },
    /// Run a JSON execute request and print the JSON response
    Request {
        /// Request file, or - for stdin
        #[arg(default_value = "-")]
        input: String,
    },
    /// Show version
    Version,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // stdout carries command results
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

/// The plugin wired to real docker processes
fn docker_plugin() -> DockerPlugin {
    DockerPlugin::new(Arc::new(ProcessExecutor::new()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Info { json } => {
            commands::info::handle(&docker_plugin(), json)?;
        }
        Commands::Validate { config } => {
            commands::validate::handle(&docker_plugin(), config)?;
        }
        Commands::Run {
            config,
            release_version,
            hook,
            dry_run,
        } => {
            commands::run::handle(&docker_plugin(), config, release_version, hook, dry_run)
                .await?;
        }
        Commands::Request { input } => {
            commands::request::handle(&docker_plugin(), &input).await?;
        }
        Commands::Version => {
            println!("dockpost {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
