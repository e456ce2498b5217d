//! Adaptive daily spending ceiling

use chrono::{Datelike, NaiveDate, Weekday};

use crate::models::{Preferences, RiskTolerance};

/// Exponent applied to the overshoot ratio when dampening the limit
///
/// 0.5 is a partial (square-root) correction. Tunable through
/// [`EngineConfig`](crate::config::EngineConfig).
pub const DEFAULT_DAMPENING_EXPONENT: f64 = 0.5;

const WEEKEND_BOOST_FACTOR: f64 = 1.15;
const EXAM_MODE_FACTOR: f64 = 1.05;

fn tolerance_factor(tolerance: RiskTolerance) -> f64 {
    match tolerance {
        RiskTolerance::Low => 0.85,
        RiskTolerance::Medium => 1.0,
        RiskTolerance::High => 1.1,
    }
}

pub(crate) fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Recommended ceiling for today's spend, rounded to whole units
pub fn safe_limit(
    remaining_credits: f64,
    remaining_days: u32,
    average_daily_spend: f64,
    target_burn_rate: f64,
    preferences: &Preferences,
    today: NaiveDate,
) -> f64 {
    safe_limit_with_exponent(
        remaining_credits,
        remaining_days,
        average_daily_spend,
        target_burn_rate,
        preferences,
        today,
        DEFAULT_DAMPENING_EXPONENT,
    )
}

/// [`safe_limit`] with an explicit overshoot dampening exponent
pub fn safe_limit_with_exponent(
    remaining_credits: f64,
    remaining_days: u32,
    average_daily_spend: f64,
    target_burn_rate: f64,
    preferences: &Preferences,
    today: NaiveDate,
    dampening_exponent: f64,
) -> f64 {
    if remaining_days == 0 {
        return 0.0;
    }

    let mut limit = remaining_credits / f64::from(remaining_days);

    if average_daily_spend > 0.0
        && target_burn_rate > 0.0
        && average_daily_spend > target_burn_rate
    {
        let overshoot = average_daily_spend / target_burn_rate;
        limit /= overshoot.powf(dampening_exponent);
    }

    // Boosts compound in this order: tolerance, weekend, exam
    limit *= tolerance_factor(preferences.risk_tolerance);
    if preferences.weekend_boost && is_weekend(today) {
        limit *= WEEKEND_BOOST_FACTOR;
    }
    if preferences.exam_mode {
        limit *= EXAM_MODE_FACTOR;
    }

    if let Some(cap) = preferences.max_spend_per_day.filter(|c| *c > 0.0) {
        limit = limit.min(cap);
    }

    if limit.is_finite() {
        limit.max(0.0).round()
    } else {
        0.0
    }
}
