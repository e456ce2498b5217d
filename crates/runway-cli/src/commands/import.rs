//! Import/export command implementations (JSON document, CSV)

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use runway_core::{export, Store};

use super::require_state;

/// Export the whole period to a JSON document
pub fn cmd_export_json(store: &Store, output: &Path) -> Result<()> {
    // Check output doesn't already exist
    if output.exists() {
        anyhow::bail!(
            "Output file already exists: {}\nUse a different filename or remove the existing file.",
            output.display()
        );
    }

    println!("📦 Exporting current period...");

    let state = require_state(store)?;
    let document = export::export_document(&state);
    let json = export::to_json(&document).context("Failed to serialize period to JSON")?;

    let mut file = File::create(output)
        .with_context(|| format!("Failed to create output file: {}", output.display()))?;
    file.write_all(json.as_bytes())?;

    println!("✅ Period exported to: {}", output.display());
    println!("   Version: {}", document.metadata.app_version);
    println!("   Purchases: {}", document.expenses.len());

    Ok(())
}

/// Export purchases to CSV, to a file or stdout
pub fn cmd_export_csv(store: &Store, output: Option<&Path>) -> Result<()> {
    let expenses = store.list_expenses().context("Failed to read purchases")?;
    let csv = export::expenses_to_csv(&expenses).context("Failed to build CSV")?;

    match output {
        Some(path) => {
            let mut file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            file.write_all(csv.as_bytes())?;
            println!("✅ Exported {} purchases to {}", expenses.len(), path.display());
        }
        None => {
            // Write to stdout
            print!("{}", csv);
        }
    }

    Ok(())
}

/// Replace the stored period with a JSON document
pub fn cmd_import(store: &mut Store, input: &Path, yes: bool) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Document not found: {}", input.display());
    }

    let json = fs::read_to_string(input)
        .with_context(|| format!("Failed to read document: {}", input.display()))?;
    let document = export::from_json(&json)
        .with_context(|| format!("Invalid period document: {}", input.display()))?;

    println!("📦 Importing period from: {}", input.display());
    println!("   Version: {}", document.metadata.app_version);
    println!("   Exported: {}", document.metadata.exported_at);
    println!(
        "   Period: {} ({} days)",
        document.profile.start_date, document.profile.period_days
    );
    println!("   Purchases: {}", document.expenses.len());
    println!();

    if !yes {
        let current = store
            .list_expenses()
            .map(|e| e.len().to_string())
            .unwrap_or_else(|_| "?".to_string());
        print!("⚠️  This will REPLACE the current profile and purchases.\n");
        print!("   Purchases: {} → {}\n", current, document.expenses.len());
        print!("\nAre you sure? [y/N] ");
        io::stdout().flush()?;

        let mut input_str = String::new();
        io::stdin().read_line(&mut input_str)?;
        if !input_str.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let state = document.into_state();
    store
        .save_state(&state)
        .context("Failed to save imported period")?;

    println!("✅ Import complete: {} purchases", state.expenses.len());

    Ok(())
}
