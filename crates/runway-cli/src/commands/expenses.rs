//! Purchase command implementations (add, delete, list)

use anyhow::{Context, Result};
use chrono::NaiveDate;
use runway_core::{ExpenseRecord, ItemType, MealType, Store};

use super::{format_credits, require_state, truncate};

const SHORT_ID_LEN: usize = 8;

pub fn cmd_add(
    store: &Store,
    cost: f64,
    meal: &str,
    item: &str,
    quantity: u32,
    date: NaiveDate,
    notes: Option<String>,
) -> Result<()> {
    let state = require_state(store)?;

    let meal_type: MealType = meal.parse().map_err(anyhow::Error::msg)?;
    let item_type = ItemType::from_raw(&item.trim().to_lowercase());
    if !item_type.is_known() {
        tracing::info!(item = item_type.as_str(), "Recording custom item category");
    }

    let mut record = ExpenseRecord::new(date, meal_type, item_type, cost).with_quantity(quantity);
    if let Some(notes) = notes.filter(|n| !n.trim().is_empty()) {
        record = record.with_notes(notes);
    }
    record.validate_for(&state.profile)?;

    store
        .insert_expense(&record)
        .context("Failed to save purchase")?;

    println!(
        "✅ Recorded {} for {} {} on {}",
        format_credits(record.cost),
        record.meal_type,
        record.item_type,
        record.date
    );
    println!("   ID: {}", short_id(&record.id));

    Ok(())
}

/// Delete by full id or a unique prefix of it
pub fn cmd_delete(store: &Store, id: &str) -> Result<()> {
    let id = id.trim();
    if id.is_empty() {
        anyhow::bail!("Expense id must not be empty");
    }

    let expenses = store.list_expenses().context("Failed to read purchases")?;
    let matches: Vec<&ExpenseRecord> = expenses.iter().filter(|r| r.id.starts_with(id)).collect();

    let record = match matches.as_slice() {
        [] => anyhow::bail!("No purchase with id {}", id),
        [record] => *record,
        _ => anyhow::bail!(
            "Id prefix '{}' matches {} purchases, use more characters",
            id,
            matches.len()
        ),
    };

    if !store.delete_expense(&record.id)? {
        anyhow::bail!("Purchase {} was already deleted", record.id);
    }

    println!(
        "🗑️  Deleted {} ({} {} on {})",
        short_id(&record.id),
        format_credits(record.cost),
        record.item_type,
        record.date
    );

    Ok(())
}

/// Most recent purchases first; same-day purchases keep entry order
pub fn cmd_list(store: &Store, limit: usize) -> Result<()> {
    let state = require_state(store)?;

    let mut expenses: Vec<&ExpenseRecord> = state.expenses.iter().collect();
    if expenses.is_empty() {
        println!("No purchases recorded yet.");
        return Ok(());
    }
    // Stable sort keeps entry order within a day
    expenses.sort_by(|a, b| b.date.cmp(&a.date));

    println!(
        "{:<10} {:<12} {:<10} {:<12} {:>4} {:>10}  Notes",
        "ID", "Date", "Meal", "Item", "Qty", "Cost"
    );
    println!("{}", "-".repeat(80));

    for record in expenses.iter().take(limit) {
        println!(
            "{:<10} {:<12} {:<10} {:<12} {:>4} {:>10}  {}",
            short_id(&record.id),
            record.date.to_string(),
            record.meal_type.as_str(),
            truncate(record.item_type.as_str(), 12),
            record.quantity,
            format_credits(record.cost),
            truncate(record.notes.as_deref().unwrap_or(""), 30)
        );
    }

    if expenses.len() > limit {
        println!();
        println!("   ... {} more (use --limit to show more)", expenses.len() - limit);
    }

    Ok(())
}

fn short_id(id: &str) -> &str {
    id.get(..SHORT_ID_LEN).unwrap_or(id)
}
