use std::error::Error as StdError;

use clap::{Parser, Subcommand};
use reservations_app::{config::AppConfig, context::AppContext, database};
use thiserror::Error;

mod codes;
mod grants;
mod tombstones;

#[derive(Debug, Parser)]
#[command(
    name = "reservations-app",
    about = "Reservations operator CLI",
    long_about = None
)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) config: AppConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending schema migrations
    Migrate,

    /// Restore a deleted entity from its tombstone
    Restore(tombstones::RestoreArgs),

    /// List tombstones of one entity type
    Tombstones(tombstones::ListTombstonesArgs),

    /// Check whether an account may write a resource
    CanWrite(grants::CanWriteArgs),

    /// Grant an account write access to a resource
    Grant(grants::GrantArgs),

    /// Send a fresh one-time code to an account
    IssueCode(codes::IssueCodeArgs),

    /// Check a submitted one-time code
    ValidateCode(codes::ValidateCodeArgs),
}

/// How a command failed, so the caller can tell bad input from a broken
/// deployment.
#[derive(Debug, Error)]
pub(crate) enum CommandError {
    #[error("{0}")]
    Rejected(String),

    #[error("service misconfigured: {0}")]
    Misconfigured(String),

    #[error("{0}")]
    Failed(String),
}

impl CommandError {
    fn from_service<E: StdError>(action: &str, is_client_error: bool, error: &E) -> Self {
        if is_client_error {
            Self::Rejected(error.to_string())
        } else {
            Self::Failed(format!("failed to {action}: {}", describe(error)))
        }
    }
}

/// Render an error with its whole source chain.
fn describe(error: &dyn StdError) -> String {
    let mut message = error.to_string();
    let mut source = error.source();

    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    message
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), CommandError> {
        if matches!(self.command, Commands::Migrate) {
            return migrate(&self.config).await;
        }

        let context = AppContext::from_config(&self.config)
            .await
            .map_err(|error| CommandError::Failed(describe(&error)))?;

        match self.command {
            Commands::Migrate => Ok(()),
            Commands::Restore(args) => tombstones::restore(&context, args).await,
            Commands::Tombstones(args) => tombstones::list(&context, args).await,
            Commands::CanWrite(args) => grants::can_write(&context, args).await,
            Commands::Grant(args) => grants::grant(&context, args).await,
            Commands::IssueCode(args) => codes::issue(&context, args).await,
            Commands::ValidateCode(args) => codes::validate(&context, args).await,
        }
    }
}

async fn migrate(config: &AppConfig) -> Result<(), CommandError> {
    let pool = database::connect(&config.database.database_url)
        .await
        .map_err(|error| CommandError::Failed(format!("failed to connect to database: {error}")))?;

    database::migrate(&pool)
        .await
        .map_err(|error| CommandError::Failed(format!("failed to migrate: {}", describe(&error))))?;

    println!("migrations applied");

    Ok(())
}
