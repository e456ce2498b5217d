//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Runway - Make your meal credits last the whole period
#[derive(Parser)]
#[command(name = "runway")]
#[command(about = "Meal-credit burn rate tracker and advisor", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "runway.db", global = true)]
    pub db: PathBuf,

    /// Engine config file (defaults to the data-dir override, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Evaluate as of this date instead of the system clock (YYYY-MM-DD)
    #[arg(long, global = true)]
    pub today: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up (or replace) the period profile
    Setup {
        /// Credits allotted for the period
        #[arg(long)]
        credits: f64,

        /// Length of the period in days
        #[arg(long, default_value = "30")]
        days: u32,

        /// First day of the period (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        start: Option<String>,

        /// Allowance holder: resident, day_scholar
        #[arg(long, default_value = "resident")]
        user_type: String,

        /// Keep the expenses already recorded
        #[arg(long)]
        keep_expenses: bool,
    },

    /// Update spending preferences
    Prefs {
        #[command(flatten)]
        update: PrefsArgs,
    },

    /// Record a purchase
    Add {
        /// Amount spent
        #[arg(short, long)]
        cost: f64,

        /// Meal: breakfast, lunch, snacks, dinner, other
        #[arg(short, long)]
        meal: String,

        /// Item category: meal, snack, beverage, coffee, dessert, grocery (or any label)
        #[arg(short, long)]
        item: String,

        /// Number of items
        #[arg(short, long, default_value = "1")]
        quantity: u32,

        /// Purchase date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete a recorded purchase
    Delete {
        /// Expense id (a unique prefix is enough)
        id: String,
    },

    /// List recorded purchases, newest first
    List {
        /// Max purchases to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show burn rates, safe limit and forecast
    Status {
        /// Print the metrics snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show ranked spending advice
    Advice {
        /// Print the advice items as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show spending by category, meal and day
    Breakdown,

    /// Export the current period
    Export {
        #[command(subcommand)]
        export_type: ExportType,
    },

    /// Replace the current period with an exported JSON document
    Import {
        /// JSON document to import
        #[arg(short, long)]
        file: PathBuf,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Delete the profile and all recorded purchases
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Preference overrides; anything left out keeps its current value
#[derive(clap::Args, Debug, Default, Clone)]
pub struct PrefsArgs {
    /// Risk tolerance: low, medium, high
    #[arg(long)]
    pub risk_tolerance: Option<String>,

    /// Allow a bigger limit on Saturdays and Sundays
    #[arg(long)]
    pub weekend_boost: Option<bool>,

    /// Allow a slightly bigger limit during exams
    #[arg(long)]
    pub exam_mode: Option<bool>,

    /// Hard cap on the daily safe limit
    #[arg(long, conflicts_with = "no_cap")]
    pub max_per_day: Option<f64>,

    /// Remove the daily cap
    #[arg(long)]
    pub no_cap: bool,

    /// Vegetarian diet
    #[arg(long)]
    pub vegetarian: Option<bool>,

    /// Share of credits used that raises a watch warning (0-1)
    #[arg(long)]
    pub warning: Option<f64>,

    /// Share of credits used that raises a danger warning (0-1)
    #[arg(long)]
    pub danger: Option<f64>,
}

#[derive(Subcommand)]
pub enum ExportType {
    /// Export profile and purchases as a JSON document
    Json {
        /// Output file (required)
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Export purchases to CSV
    Csv {
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
