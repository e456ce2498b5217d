//! Shared utilities for command implementations
//!
//! This module contains:
//! - `open_store` - Open the period store
//! - `load_config` - Resolve the engine config
//! - `resolve_today` - The single clock reading for an invocation
//! - `require_state` - The stored period, or a hint to run setup

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use runway_core::{EngineConfig, PeriodState, Store};

pub fn open_store(db_path: &Path) -> Result<Store> {
    Store::open(db_path).with_context(|| format!("Failed to open store at {}", db_path.display()))
}

/// Engine config; an explicit path must exist
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    if let Some(path) = path {
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
    }
    EngineConfig::load(path).context("Failed to load engine config")
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}' (use YYYY-MM-DD)", s))
}

/// `--today` if given, otherwise the local calendar date
pub fn resolve_today(arg: Option<&str>) -> Result<NaiveDate> {
    match arg {
        Some(s) => parse_date(s),
        None => Ok(Local::now().date_naive()),
    }
}

/// The stored period; unreadable storage is treated as not set up
pub fn require_state(store: &Store) -> Result<PeriodState> {
    store.load_state_or_empty().context(
        "No profile set up yet. Run: runway setup --credits <AMOUNT> --days <DAYS>",
    )
}
