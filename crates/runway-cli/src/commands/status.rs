//! Status-related command implementations (status, advice, breakdown, reset)

use std::io::{self, Write};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use runway_core::projection::{category_totals, daily_totals, meal_type_totals, CategoryTotal};
use runway_core::{
    compute_metrics_with, generate_advice_with, AdviceItem, DaysUntil, DerivedMetrics,
    EngineConfig, RiskLevel, Severity, Store,
};

use super::{format_credits, require_state};

/// Days of history shown by `breakdown`
const BREAKDOWN_RECENT_DAYS: usize = 7;

/// Print the period status and return the metrics it was built from
pub fn cmd_status(
    store: &Store,
    config: &EngineConfig,
    today: NaiveDate,
    json: bool,
) -> Result<DerivedMetrics> {
    let state = require_state(store)?;
    let metrics = compute_metrics_with(config, &state.profile, &state.expenses, today);

    if json {
        let out = serde_json::to_string_pretty(&metrics).context("Failed to serialize metrics")?;
        println!("{}", out);
        return Ok(metrics);
    }

    let profile = &state.profile;
    println!();
    println!("📊 Runway Status ({})", today);
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   Period:     {} to {} (day {} of {})",
        profile.start_date,
        profile.period_end(),
        metrics.days_elapsed.min(profile.period_days),
        profile.period_days
    );
    println!(
        "   Spent:      {} of {} ({:.0}%)",
        format_credits(metrics.total_spent),
        format_credits(profile.monthly_credits),
        metrics.credits_used_ratio * 100.0
    );
    println!("   Remaining:  {}", format_credits(metrics.remaining_credits));
    println!();
    println!("   🎯 Safe to spend today: {}", format_credits(metrics.daily_safe_limit));
    println!("      Spent today:         {}", format_credits(metrics.today_spend));
    println!();
    println!("   Burn rate (period): {}/day", format_credits(metrics.burn_rate_overall));
    println!("   Burn rate (7 days): {}/day", format_credits(metrics.burn_rate_7d));
    println!("   Burn rate (3 days): {}/day", format_credits(metrics.burn_rate_3d));
    println!("   Target pace:        {}/day", format_credits(metrics.target_burn_rate));
    println!();

    match (metrics.exhaustion.days_until, metrics.exhaustion.date) {
        (DaysUntil::Finite(days), Some(date)) => {
            println!("   Credits last: {} more days (until about {})", days, date)
        }
        (DaysUntil::Finite(days), None) => println!("   Credits last: {} more days", days),
        (DaysUntil::Never, _) => println!("   Credits last: no spend yet to project from"),
    }
    if metrics.surplus_or_deficit >= 0.0 {
        println!(
            "   Projected:    {} left over at period end",
            format_credits(metrics.surplus_or_deficit)
        );
    } else {
        println!(
            "   Projected:    {} short at period end",
            format_credits(-metrics.surplus_or_deficit)
        );
    }
    println!();
    println!(
        "   {} Risk: {}   (confidence: {})",
        risk_icon(metrics.risk_level),
        metrics.risk_level,
        metrics.confidence_level
    );
    println!();

    Ok(metrics)
}

/// Print advice for `today` and return the items shown
pub fn cmd_advice(
    store: &Store,
    config: &EngineConfig,
    today: NaiveDate,
    json: bool,
) -> Result<Vec<AdviceItem>> {
    let state = require_state(store)?;
    let metrics = compute_metrics_with(config, &state.profile, &state.expenses, today);
    let items = generate_advice_with(&config.advice, &state.profile, &metrics, &state.expenses);

    if json {
        let out = serde_json::to_string_pretty(&items).context("Failed to serialize advice")?;
        println!("{}", out);
        return Ok(items);
    }

    if items.is_empty() {
        println!("✅ Nothing to flag right now. Keep it up!");
        return Ok(items);
    }

    println!();
    println!("💡 Advice for {}", today);
    println!();
    for item in &items {
        println!(
            "   {} [{}] {}",
            severity_icon(item.severity),
            item.category,
            item.title
        );
        println!("      {}", item.message);
        println!();
    }

    Ok(items)
}

/// Print spending breakdowns and return the per-category totals
pub fn cmd_breakdown(store: &Store, today: NaiveDate) -> Result<Vec<CategoryTotal>> {
    let state = require_state(store)?;
    if state.expenses.is_empty() {
        println!("No purchases recorded yet.");
        return Ok(Vec::new());
    }

    let total: f64 = state.expenses.iter().map(|r| r.cost).sum();
    let categories = category_totals(&state.expenses);

    println!();
    println!("🧾 Spending by category");
    for entry in &categories {
        println!(
            "   {:<14} {:>3} purchases {:>12}  {:>5.1}%",
            entry.item_type.as_str(),
            entry.purchases,
            format_credits(entry.total),
            share(entry.total, total)
        );
    }

    println!();
    println!("🍽️  Spending by meal");
    for entry in meal_type_totals(&state.expenses) {
        println!(
            "   {:<14} {:>3} purchases {:>12}  {:>5.1}%",
            entry.meal_type.as_str(),
            entry.purchases,
            format_credits(entry.total),
            share(entry.total, total)
        );
    }

    let days = daily_totals(&state.expenses, &state.profile, today);
    if !days.is_empty() {
        println!();
        println!("📅 Recent days");
        let skip = days.len().saturating_sub(BREAKDOWN_RECENT_DAYS);
        for day in days.iter().skip(skip) {
            println!(
                "   {}  {:>12}  (running {})",
                day.date,
                format_credits(day.total),
                format_credits(day.cumulative)
            );
        }
    }
    println!();

    Ok(categories)
}

pub fn cmd_reset(store: &Store, yes: bool) -> Result<()> {
    if !yes {
        print!("⚠️  This will delete the profile and every recorded purchase.\n\n");
        print!("Are you sure? [y/N] ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store.reset().context("Failed to reset store")?;
    println!("✅ Reset complete. Run `runway setup` to start a new period.");

    Ok(())
}

fn share(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

fn risk_icon(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Safe => "🟢",
        RiskLevel::Watch => "🟡",
        RiskLevel::Danger => "🔴",
    }
}

fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "❗",
        Severity::Medium => "⚠️ ",
        Severity::Low => "ℹ️ ",
    }
}
