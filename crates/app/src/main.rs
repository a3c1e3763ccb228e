//! Reservations operator CLI

use std::process;

use clap::Parser;
use reservations_app::observability;

mod cli;

use cli::{Cli, CommandError};

#[tokio::main]
pub async fn main() {
    _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(error) = observability::init_subscriber(&cli.config.logging) {
        eprintln!("{error}");
        process::exit(1);
    }

    if let Err(error) = cli.run().await {
        match &error {
            CommandError::Rejected(_) => eprintln!("error: {error}"),
            CommandError::Misconfigured(_) => eprintln!("configuration error: {error}"),
            CommandError::Failed(_) => eprintln!("fatal: {error}"),
        }

        process::exit(1);
    }
}
