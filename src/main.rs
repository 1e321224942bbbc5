#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use calex::config::{default_config_path, Config, LoggingConfig, StorageBackend};
use calex::gateway;
use clap::{Parser, Subcommand};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// CALEX research backend.
#[derive(Parser, Debug)]
#[command(name = "calex", version, about)]
struct Cli {
    /// Config file (default: ~/.calex/config.toml)
    #[arg(long, global = true, env = "CALEX_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default)
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
        /// Directory holding the collections and uploaded files
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// json, sqlite or memory
        #[arg(long)]
        storage: Option<StorageBackend>,
    },
    /// Print the endpoint table
    Routes,
    /// Print the effective configuration as TOML
    Config,
}

fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .with_context(|| format!("Invalid log level: {}", logging.level))?;

    let file_layer = match &logging.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;
    Ok(())
}

fn print_routes() {
    println!("Available endpoints:");
    for (method, path, description) in gateway::ROUTES {
        println!("  {method:<6} {path} - {description}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Command::Serve {
        host: None,
        port: None,
        data_dir: None,
        storage: None,
    }) {
        Command::Routes => {
            print_routes();
            Ok(())
        }
        Command::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
        Command::Serve {
            host,
            port,
            data_dir,
            storage,
        } => {
            if let Some(host) = host {
                config.gateway.host = host;
            }
            if let Some(port) = port {
                config.gateway.port = port;
            }
            if let Some(dir) = data_dir {
                config.storage.data_dir = dir;
            }
            if let Some(backend) = storage {
                config.storage.backend = backend;
            }
            config.normalize();
            config.validate()?;

            init_tracing(&config.logging)?;
            let config_path = cli.config.or_else(default_config_path);
            tracing::info!(
                version = env!("CARGO_PKG_VERSION"),
                config = ?config_path,
                backend = ?config.storage.backend,
                "Starting CALEX backend"
            );
            gateway::run(&config).await
        }
    }
}
