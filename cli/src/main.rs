// Copyright (c) 2026 Explore Service Contributors
// SPDX-License-Identifier: AGPL-3.0

//! # Explore CLI
//!
//! The `explore` binary runs the explore service and talks to a running one.
//!
//! ## Commands
//!
//! - `explore serve` - Load configuration, connect storage, serve gRPC
//! - `explore decide <actor> <recipient> --like|--pass` - Record a decision
//! - `explore likes list|count` - Query liked-you listings and counters
//! - `explore config show|validate|generate` - Configuration management

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing::warn;

use explore_core::domain::config::{LedgerConfig, LoggingConfig};

mod commands;

use commands::{ConfigCommand, DecideArgs, LikesCommand};

/// Explore service - like/pass decisions and "liked you" listings
#[derive(Parser)]
#[command(name = "explore")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "EXPLORE_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// gRPC endpoint of a running explore service
    #[arg(
        long,
        global = true,
        env = "EXPLORE_ENDPOINT",
        default_value = "http://127.0.0.1:9001"
    )]
    endpoint: String,

    /// Log level (trace, debug, info, warn, error); defaults to the configured level
    #[arg(long, global = true, env = "EXPLORE_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the explore gRPC service
    #[command(name = "serve")]
    Serve,

    /// Record a like or pass
    #[command(name = "decide")]
    Decide(DecideArgs),

    /// Query who liked a user
    #[command(name = "likes")]
    Likes {
        #[command(subcommand)]
        command: LikesCommand,
    },

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // No subscriber exists yet, so this first load is silent. Commands that
    // need the full configuration load it again and log discovery then.
    let (logging, load_error) = logging_settings(cli.config.clone());
    init_logging(cli.log_level.as_deref().unwrap_or(&logging.level), &logging)?;
    if let Some(e) = load_error {
        warn!("Using default logging settings: {:#}", e);
    }

    match cli.command {
        Some(Commands::Serve) => commands::serve::execute(cli.config).await,
        Some(Commands::Decide(args)) => commands::decide::execute(args, &cli.endpoint).await,
        Some(Commands::Likes { command }) => {
            commands::likes::handle_command(command, &cli.endpoint).await
        }
        Some(Commands::Config { command }) => {
            commands::config::handle_command(command, cli.config).await
        }
        None => {
            eprintln!("{}", "No command specified. Use --help for usage.".yellow());
            std::process::exit(1);
        }
    }
}

/// Logging section of the configuration, falling back to defaults when it
/// cannot be loaded. The load error is handed back so it can be reported once
/// logging is up.
fn logging_settings(config_path: Option<PathBuf>) -> (LoggingConfig, Option<anyhow::Error>) {
    match LedgerConfig::load_or_default(config_path) {
        Ok(config) => (config.logging, None),
        Err(e) => (LoggingConfig::default(), Some(e)),
    }
}

/// Initialize tracing subscriber for logging; `RUST_LOG` wins over `level`
fn init_logging(level: &str, logging: &LoggingConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.compact().init();
    }

    Ok(())
}
