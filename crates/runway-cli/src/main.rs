//! Runway CLI - Meal-credit burn rate tracker
//!
//! Usage:
//!   runway setup --credits 6000 --days 30     Start a period
//!   runway add --cost 120 --meal lunch --item meal
//!   runway status                             Burn rates and safe limit
//!   runway advice                             Ranked recommendations

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    // One clock reading per invocation
    let today = commands::resolve_today(cli.today.as_deref())?;

    match cli.command {
        Commands::Setup {
            credits,
            days,
            start,
            user_type,
            keep_expenses,
        } => {
            let mut store = commands::open_store(&cli.db)?;
            let start = start
                .as_deref()
                .map(commands::parse_date)
                .transpose()?
                .unwrap_or(today);
            commands::cmd_setup(&mut store, &user_type, credits, days, start, keep_expenses)
        }
        Commands::Prefs { update } => {
            let store = commands::open_store(&cli.db)?;
            commands::cmd_prefs(&store, &update)
        }
        Commands::Add {
            cost,
            meal,
            item,
            quantity,
            date,
            notes,
        } => {
            let store = commands::open_store(&cli.db)?;
            let date = date
                .as_deref()
                .map(commands::parse_date)
                .transpose()?
                .unwrap_or(today);
            commands::cmd_add(&store, cost, &meal, &item, quantity, date, notes)
        }
        Commands::Delete { id } => {
            let store = commands::open_store(&cli.db)?;
            commands::cmd_delete(&store, &id)
        }
        Commands::List { limit } => {
            let store = commands::open_store(&cli.db)?;
            commands::cmd_list(&store, limit)
        }
        Commands::Status { json } => {
            let store = commands::open_store(&cli.db)?;
            let config = commands::load_config(cli.config.as_deref())?;
            commands::cmd_status(&store, &config, today, json).map(|_| ())
        }
        Commands::Advice { json } => {
            let store = commands::open_store(&cli.db)?;
            let config = commands::load_config(cli.config.as_deref())?;
            commands::cmd_advice(&store, &config, today, json).map(|_| ())
        }
        Commands::Breakdown => {
            let store = commands::open_store(&cli.db)?;
            commands::cmd_breakdown(&store, today).map(|_| ())
        }
        Commands::Export { export_type } => {
            let store = commands::open_store(&cli.db)?;
            match export_type {
                ExportType::Json { output } => commands::cmd_export_json(&store, &output),
                ExportType::Csv { output } => commands::cmd_export_csv(&store, output.as_deref()),
            }
        }
        Commands::Import { file, yes } => {
            let mut store = commands::open_store(&cli.db)?;
            commands::cmd_import(&mut store, &file, yes)
        }
        Commands::Reset { yes } => {
            let store = commands::open_store(&cli.db)?;
            commands::cmd_reset(&store, yes)
        }
    }
}
