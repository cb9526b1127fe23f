//! # wallquote
//!
//! Command-line front end for `quote_core`: price walls, measure delivery
//! distances, search places and export PDF quotations.

mod cli;
mod commands;
mod interactive;

use anyhow::Result;
use clap::Parser;
use quote_core::distance::GeoPoint;
use quote_core::errors::QuoteError;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, SettingsCommands};
use commands::ExportArgs;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the quote (or JSON)
    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with_writer(std::io::stderr)
        .init();

    let json = cli.json;
    let result = run(cli).await;

    if let Err(e) = &result {
        if json {
            if let Some(quote_error) = e.downcast_ref::<QuoteError>() {
                if let Ok(error_json) = serde_json::to_string_pretty(quote_error) {
                    eprintln!("{}", error_json);
                }
            }
        }
    }
    result
}

async fn run(cli: Cli) -> Result<()> {
    let json = cli.json;
    let settings = || commands::load_effective_settings(cli.settings.as_deref());

    match &cli.command {
        Commands::Quote { wall, location } => commands::quote(settings()?, json, wall, location).await,
        Commands::Distance { lat, lng, offline } => {
            commands::distance(settings()?, json, GeoPoint::new(*lat, *lng), *offline).await
        }
        Commands::Search { query } => commands::search(settings()?, json, query).await,
        Commands::Export {
            wall,
            location,
            name,
            phone,
            out,
            no_relay,
            save_record,
        } => {
            let args = ExportArgs {
                wall,
                location,
                name,
                phone,
                out,
                no_relay: *no_relay,
                save_record: save_record.as_deref(),
            };
            commands::export(settings()?, json, args).await
        }
        Commands::Settings { command } => match command {
            SettingsCommands::Init { path, force } => commands::settings_init(path, *force),
            SettingsCommands::Show => commands::settings_show(settings()?, json),
        },
        Commands::Interactive { offline } => interactive::run(settings()?, json, *offline).await,
    }
}
