//! Unified Thinking - workflow orchestration server
//!
//! Main entry point for the unified-thinking CLI and server.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use thinking_config::{Config, ConfigError, ConfigLoader, ConfigValidator};

mod server;
mod validate;

/// Unified Thinking CLI.
#[derive(Parser)]
#[command(name = "unified-thinking")]
#[command(about = "Workflow orchestration server for thinking tools")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG, global = true)]
    config: PathBuf,

    /// Log filter, overrides RUST_LOG and the configured level
    #[arg(long, global = true, env = "UNIFIED_THINKING_LOG")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the server in foreground (default)
    Run {
        /// Server host, overrides [server].host
        #[arg(long)]
        host: Option<String>,

        /// Server port, overrides [server].port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Check workflow definition files and print their execution batches
    Validate {
        /// Workflow files or directories
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

const DEFAULT_CONFIG: &str = "config/default.toml";

/// Load the configuration file. A missing default file means built-in
/// defaults; a missing explicit file is an error.
fn load_config(path: &Path) -> Result<Config, ConfigError> {
    match ConfigLoader::load(path) {
        Err(ConfigError::NotFound(_)) if path == Path::new(DEFAULT_CONFIG) => Ok(Config::default()),
        other => other,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut config = load_config(&cli.config)?;

    let command = cli.command.unwrap_or(Commands::Run {
        host: None,
        port: None,
    });
    let serving = matches!(command, Commands::Run { .. });
    server::init_tracing(&config.logging, cli.log_level.as_deref(), serving)?;

    let report = ConfigValidator::validate(&config);
    for warning in &report.warnings {
        warn!("Config: {}", warning);
    }
    for err in &report.errors {
        error!("Config: {}", err);
    }
    report.into_result()?;

    match command {
        Commands::Run { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            info!("Using configuration {}", cli.config.display());
            server::run_server(config).await
        }
        Commands::Validate { files } => validate::run(&files),
    }
}
