//! Risk classification

use crate::models::{DaysUntil, NotificationThresholds, RiskLevel};

/// Balance running out this many days before period end is danger
const EXHAUSTION_MARGIN_DAYS: i64 = 3;
const PACE_DANGER_MARGIN: f64 = 0.15;
const PACE_WATCH_MARGIN: f64 = 0.05;

pub(crate) fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Ordered decision list, first match wins
pub fn classify_risk(
    total_spent: f64,
    monthly_credits: f64,
    days_elapsed: u32,
    period_days: u32,
    days_until_exhaustion: DaysUntil,
    remaining_days: u32,
    thresholds: &NotificationThresholds,
) -> RiskLevel {
    if let DaysUntil::Finite(days) = days_until_exhaustion {
        if i64::from(days) < i64::from(remaining_days) - EXHAUSTION_MARGIN_DAYS {
            return RiskLevel::Danger;
        }
    }

    let used = ratio(total_spent, monthly_credits);
    let elapsed = ratio(f64::from(days_elapsed), f64::from(period_days));

    if used >= thresholds.danger {
        RiskLevel::Danger
    } else if used >= thresholds.warning {
        RiskLevel::Watch
    } else if used > elapsed + PACE_DANGER_MARGIN {
        RiskLevel::Danger
    } else if used > elapsed + PACE_WATCH_MARGIN {
        RiskLevel::Watch
    } else {
        RiskLevel::Safe
    }
}
