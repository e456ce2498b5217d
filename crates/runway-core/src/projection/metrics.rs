//! Metrics Engine - the full snapshot for one day of the period

use chrono::NaiveDate;

use crate::config::EngineConfig;
use crate::models::{ConfidenceLevel, DerivedMetrics, ExpenseRecord, Profile};

use super::exhaustion::predict_exhaustion;
use super::risk::{classify_risk, ratio};
use super::safe_limit::safe_limit_with_exponent;
use super::window::window_burn_rate;

const SHORT_WINDOW_DAYS: u32 = 3;
const WEEK_WINDOW_DAYS: u32 = 7;

/// Compute metrics with the default engine configuration
pub fn compute_metrics(
    profile: &Profile,
    records: &[ExpenseRecord],
    today: NaiveDate,
) -> DerivedMetrics {
    compute_metrics_with(&EngineConfig::default(), profile, records, today)
}

/// Compute metrics for `today`
///
/// Total for any input: every division is guarded and the result is always
/// complete. `records` is only read.
pub fn compute_metrics_with(
    config: &EngineConfig,
    profile: &Profile,
    records: &[ExpenseRecord],
    today: NaiveDate,
) -> DerivedMetrics {
    let elapsed = (today - profile.start_date).num_days() + 1;
    let days_elapsed = u32::try_from(elapsed.max(0)).unwrap_or(u32::MAX);
    let remaining_days = profile.period_days.saturating_sub(days_elapsed);

    let total_spent: f64 = records.iter().map(|r| r.cost).sum();
    let remaining_credits = (profile.monthly_credits - total_spent).max(0.0);
    let today_spend: f64 = records
        .iter()
        .filter(|r| r.date == today)
        .map(|r| r.cost)
        .sum();

    let burn_rate_overall = if days_elapsed > 0 {
        total_spent / f64::from(days_elapsed)
    } else {
        0.0
    };
    let burn_rate_7d = window_burn_rate(records, WEEK_WINDOW_DAYS, profile.start_date, today);
    let burn_rate_3d = window_burn_rate(records, SHORT_WINDOW_DAYS, profile.start_date, today);
    let target_burn_rate = ratio(profile.monthly_credits, f64::from(profile.period_days));

    let daily_safe_limit = safe_limit_with_exponent(
        remaining_credits,
        remaining_days,
        burn_rate_overall,
        target_burn_rate,
        &profile.preferences,
        today,
        config.dampening_exponent,
    );

    // Prefer the recent rate; the whole-period rate only stands in when the
    // last week had no spend at all
    let forecast_rate = if burn_rate_7d == 0.0 {
        burn_rate_overall
    } else {
        burn_rate_7d
    };
    let exhaustion = predict_exhaustion(remaining_credits, forecast_rate, today);

    let projected_total_spend = burn_rate_overall * f64::from(profile.period_days);
    let surplus_or_deficit = profile.monthly_credits - projected_total_spend;

    let risk_level = classify_risk(
        total_spent,
        profile.monthly_credits,
        days_elapsed,
        profile.period_days,
        exhaustion.days_until,
        remaining_days,
        &profile.preferences.notification_thresholds,
    );

    let credits_used_ratio = ratio(total_spent, profile.monthly_credits);
    let time_elapsed_ratio = ratio(f64::from(days_elapsed), f64::from(profile.period_days));
    let confidence_level = classify_confidence(records.len(), days_elapsed);

    tracing::debug!(
        %today,
        days_elapsed,
        total_spent,
        daily_safe_limit,
        risk = risk_level.as_str(),
        "Computed period metrics"
    );

    DerivedMetrics {
        computed_for: today,
        days_elapsed,
        remaining_days,
        record_count: records.len(),
        total_spent,
        remaining_credits,
        today_spend,
        burn_rate_overall,
        burn_rate_7d,
        burn_rate_3d,
        target_burn_rate,
        daily_safe_limit,
        exhaustion,
        projected_total_spend,
        surplus_or_deficit,
        risk_level,
        credits_used_ratio,
        time_elapsed_ratio,
        confidence_level,
    }
}

/// How much data backs the projection
pub fn classify_confidence(record_count: usize, days_elapsed: u32) -> ConfidenceLevel {
    if record_count < 3 || days_elapsed < 2 {
        ConfidenceLevel::Low
    } else if record_count < 10 || days_elapsed < 5 {
        ConfidenceLevel::Medium
    } else {
        ConfidenceLevel::High
    }
}
