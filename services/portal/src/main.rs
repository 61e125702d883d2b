use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use common::{FileStore, PortalConfig};
use gateway::{ApiClient, SessionManager};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod commands;
mod console;

use crate::commands::Cli;
use crate::console::{ConsoleNavigator, ConsoleNotifier};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; stdout is reserved for command output
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let cli = Cli::parse();

    let config = PortalConfig::from_env()?;
    info!("Using backend at {}", config.api_base_url);

    let store = FileStore::new(&config.session_file);
    let session = SessionManager::new(Arc::new(store));
    let client = ApiClient::new(
        config,
        session,
        Arc::new(ConsoleNotifier),
        Arc::new(ConsoleNavigator),
    );

    commands::run(cli.command, &client).await
}
