// SPDX-FileCopyrightText: 2026 Tyria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tyria - account inventory viewer for the game's REST API.
//!
//! This is the binary entry point.

mod accounts;
mod listings;
mod unlocks;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::debug;
use tyria_account::{AccountSession, IdentityStore, UnlockKind};
use tyria_cache::ReferenceCache;
use tyria_client::ApiClient;
use tyria_config::TyriaConfig;
use tyria_core::{KeyValueStore, ResourceFetcher, TyriaError};
use tyria_storage::SqliteKvStore;

/// Tyria - account inventory viewer.
#[derive(Parser, Debug)]
#[command(name = "tyria", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the default locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage saved API keys.
    Accounts {
        #[command(subcommand)]
        action: AccountsCommand,
    },
    /// List items across characters, shared inventory and bank.
    Inventory {
        /// Only show items whose name contains this text.
        #[arg(long)]
        search: Option<String>,
    },
    /// Show wallet balances.
    Wallet,
    /// List material storage.
    Materials,
    /// List characters.
    Characters,
    /// Show a character's backstory and builds.
    Character { name: String },
    /// List unlocked cosmetics and progress.
    Unlocks { kind: UnlockKind },
}

#[derive(Subcommand, Debug)]
enum AccountsCommand {
    /// List saved API keys.
    List,
    /// Validate and save an API key.
    Add {
        token: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Forget an API key.
    Remove { token: String },
    /// Make an API key the active one.
    Use { token: String },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => tyria_config::load_and_validate_path(path),
        None => tyria_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            tyria_config::render_errors(&errors);
            std::process::exit(1);
        }
    };
    init_tracing(&config.logging.level);

    if let Err(err) = run(cli.command, &config).await {
        let message = err.user_message().unwrap_or_else(|| err.to_string());
        eprintln!("tyria: {message}");
        debug!(error = %err, "command failed");
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: &TyriaConfig) -> Result<(), TyriaError> {
    let session = open_session(config).await?;
    match command {
        Commands::Accounts { action } => match action {
            AccountsCommand::List => accounts::list(&session).await,
            AccountsCommand::Add { token, description } => {
                accounts::add(&session, &token, description).await
            }
            AccountsCommand::Remove { token } => accounts::remove(&session, &token).await,
            AccountsCommand::Use { token } => accounts::select(&session, &token).await,
        },
        Commands::Inventory { search } => listings::inventory(&session, search.as_deref()).await,
        Commands::Wallet => listings::wallet(&session).await,
        Commands::Materials => listings::materials(&session).await,
        Commands::Characters => listings::characters(&session).await,
        Commands::Character { name } => listings::character(&session, &name).await,
        Commands::Unlocks { kind } => unlocks::run(&session, kind).await,
    }
}

async fn open_session(config: &TyriaConfig) -> Result<AccountSession, TyriaError> {
    let fetcher: Arc<dyn ResourceFetcher> = Arc::new(ApiClient::from_config(config)?);
    let store: Arc<dyn KeyValueStore> = Arc::new(SqliteKvStore::open(&config.storage).await?);
    let identity = Arc::new(IdentityStore::open(store).await?);
    let cache = Arc::new(ReferenceCache::from_config(fetcher.clone(), &config.batch));
    Ok(AccountSession::new(fetcher, cache, identity))
}

/// `TYRIA_LOG` wins over `RUST_LOG`; without either, the configured level
/// applies to the tyria crates and everything else logs warnings.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("TYRIA_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(format!("tyria={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn unlock_kinds_parse_from_the_command_line() {
        let cli = Cli::try_parse_from(["tyria", "unlocks", "mount-skins"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Unlocks {
                kind: UnlockKind::MountSkins
            }
        ));
        assert!(Cli::try_parse_from(["tyria", "unlocks", "dyes"]).is_err());
    }

    #[test]
    fn accounts_add_takes_an_optional_description() {
        let cli = Cli::try_parse_from(["tyria", "accounts", "add", "KEY", "--description", "alt"])
            .unwrap();
        match cli.command {
            Commands::Accounts {
                action: AccountsCommand::Add { token, description },
            } => {
                assert_eq!(token, "KEY");
                assert_eq!(description.as_deref(), Some("alt"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config =
            tyria_config::load_and_validate_str("").expect("default config should be valid");
        assert_eq!(config.batch.max_batch_size, 200);
    }
}
