//! Profile command implementations (setup, prefs)

use anyhow::{Context, Result};
use chrono::NaiveDate;
use runway_core::models::{NotificationThresholds, PeriodState, Preferences, Profile};
use runway_core::{RiskTolerance, Store, UserType};

use super::format_credits;
use crate::cli::PrefsArgs;

/// Create or replace the period profile
///
/// Preferences from an existing profile carry over. Expenses are cleared
/// unless `keep_expenses` is set. A stored period that can't be read is
/// replaced with a fresh one.
pub fn cmd_setup(
    store: &mut Store,
    user_type: &str,
    credits: f64,
    days: u32,
    start: NaiveDate,
    keep_expenses: bool,
) -> Result<()> {
    let user_type: UserType = user_type.parse().map_err(anyhow::Error::msg)?;

    let existing = store.load_state_or_empty();
    let preferences = existing
        .as_ref()
        .map(|s| s.profile.preferences.clone())
        .unwrap_or_default();

    let profile = Profile::new(user_type, credits, days, start).with_preferences(preferences);
    profile.validate_entry()?;

    let expenses = match existing {
        Some(state) if keep_expenses => state.expenses,
        _ => Vec::new(),
    };
    let kept = expenses.len();
    let end = profile.period_end();

    store
        .save_state(&PeriodState { profile, expenses })
        .context("Failed to save profile")?;

    println!("✅ Period set up");
    println!("   Credits: {}", format_credits(credits));
    println!("   Period:  {} to {} ({} days)", start, end, days);
    println!("   Holder:  {}", user_type);
    if keep_expenses {
        println!("   Kept {} recorded purchases", kept);
    }
    println!();
    println!("Next steps:");
    println!("  1. Record a purchase: runway add --cost 120 --meal lunch --item meal");
    println!("  2. Check your pace:   runway status");

    Ok(())
}

/// Apply preference overrides as a new profile snapshot
pub fn cmd_prefs(store: &Store, update: &PrefsArgs) -> Result<()> {
    let profile = store
        .load_profile()
        .context("Failed to read profile")?
        .context("No profile set up yet. Run: runway setup --credits <AMOUNT> --days <DAYS>")?;

    let preferences = apply_prefs(&profile.preferences, update)?;
    preferences.validate()?;

    let updated = profile.with_preferences(preferences);
    store.save_profile(&updated).context("Failed to save preferences")?;

    let p = &updated.preferences;
    println!("✅ Preferences updated");
    println!("   Risk tolerance: {}", p.risk_tolerance);
    println!("   Weekend boost:  {}", on_off(p.weekend_boost));
    println!("   Exam mode:      {}", on_off(p.exam_mode));
    match p.max_spend_per_day {
        Some(cap) => println!("   Daily cap:      {}", format_credits(cap)),
        None => println!("   Daily cap:      none"),
    }
    println!("   Vegetarian:     {}", on_off(p.vegetarian));
    println!(
        "   Warnings at:    {:.0}% watch, {:.0}% danger",
        p.notification_thresholds.warning * 100.0,
        p.notification_thresholds.danger * 100.0
    );

    Ok(())
}

/// Overlay the given overrides on `current`
pub fn apply_prefs(current: &Preferences, update: &PrefsArgs) -> Result<Preferences> {
    let risk_tolerance = match &update.risk_tolerance {
        Some(raw) => raw.parse::<RiskTolerance>().map_err(anyhow::Error::msg)?,
        None => current.risk_tolerance,
    };

    let max_spend_per_day = if update.no_cap {
        None
    } else {
        update.max_per_day.or(current.max_spend_per_day)
    };

    Ok(Preferences {
        risk_tolerance,
        weekend_boost: update.weekend_boost.unwrap_or(current.weekend_boost),
        exam_mode: update.exam_mode.unwrap_or(current.exam_mode),
        max_spend_per_day,
        vegetarian: update.vegetarian.unwrap_or(current.vegetarian),
        notification_thresholds: NotificationThresholds {
            warning: update
                .warning
                .unwrap_or(current.notification_thresholds.warning),
            danger: update
                .danger
                .unwrap_or(current.notification_thresholds.danger),
        },
    })
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}
