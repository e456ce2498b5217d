//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (open_store, load_config, clock and date parsing)
//! - `expenses` - Purchase commands (add, delete, list)
//! - `import` - Import/export commands (JSON document, CSV)
//! - `profile` - Profile commands (setup, prefs)
//! - `status` - Status/advice/breakdown/reset commands

pub mod core;
pub mod expenses;
pub mod import;
pub mod profile;
pub mod status;

// Re-export command functions for main.rs
pub use core::*;
pub use expenses::*;
pub use import::*;
pub use profile::*;
pub use status::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Credits with two decimals and thousands separators
pub fn format_credits(amount: f64) -> String {
    let negative = amount < 0.0;
    let fixed = format!("{:.2}", amount.abs());
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::new();
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!("{}{}.{}", if negative { "-" } else { "" }, grouped, frac)
}
