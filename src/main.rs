//! Hoos Who - classmate finder CLI
//!
#![doc = "Main entry point for the Hoos Who application."]

use std::sync::Arc;

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hooswho::cli::{Cli, Commands};
use hooswho::commands;
use hooswho::config::{ApiKey, Config};
use hooswho::directory::Directory;
use hooswho::error::MISSING_CREDENTIALS_MESSAGE;
use hooswho::providers::create_provider;
use hooswho::security::AuditLog;
use hooswho::server::{self, AppState};
use hooswho::Assistant;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    let featured_count = config.directory.featured_count;

    // Execute command
    match cli.command {
        Commands::Directory { filter } => {
            // The directory listing needs neither the credential nor the audit log
            let directory = Directory::load(&config.directory.path)?;
            commands::directory::run_directory(&directory, filter.as_deref());
            Ok(())
        }
        Commands::Chat => {
            let assistant = build_assistant(&config)?;
            commands::chat::run_chat(&assistant, featured_count).await?;
            Ok(())
        }
        Commands::Ask { question } => {
            tracing::debug!("Answering single question");
            let assistant = build_assistant(&config)?;
            commands::ask::run_ask(&assistant, &question).await?;
            Ok(())
        }
        Commands::Serve { .. } => {
            let assistant = build_assistant(&config)?;
            tracing::info!("Starting HTTP server on {}", config.server.bind);
            let state = AppState::new(
                Arc::new(assistant),
                featured_count,
                config.server.session_idle()?,
            );
            server::serve(&config.server.bind, state).await?;
            Ok(())
        }
    }
}

/// Assemble the chat pipeline for commands that talk to the model API
///
/// Exits with status 1 when the credential is missing, after recording the
/// failure in the audit log.
fn build_assistant(config: &Config) -> Result<Assistant> {
    let audit = Arc::new(AuditLog::open(&config.audit.log_path)?);

    let api_key = match ApiKey::from_env() {
        Ok(key) => key,
        Err(e) => {
            tracing::error!("{}", e);
            audit.record_missing_credentials();
            eprintln!("{}", MISSING_CREDENTIALS_MESSAGE);
            std::process::exit(1);
        }
    };

    let directory = Arc::new(Directory::load(&config.directory.path)?);
    let provider = create_provider(&config.provider, api_key)?;
    Ok(Assistant::from_config(config, provider, directory, audit)?)
}

/// Initialize tracing subscriber with environment filter
///
/// Diagnostics go to stderr so stdout carries only answers.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "hooswho=debug" } else { "hooswho=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
