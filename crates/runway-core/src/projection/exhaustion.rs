//! Exhaustion date forecast

use chrono::{Days, NaiveDate};

use crate::models::{DaysUntil, Exhaustion};

/// Project when `remaining_credits` reaches zero at `burn_rate` per day
pub fn predict_exhaustion(remaining_credits: f64, burn_rate: f64, today: NaiveDate) -> Exhaustion {
    if remaining_credits <= 0.0 {
        return Exhaustion {
            date: Some(today),
            days_until: DaysUntil::Finite(0),
        };
    }

    if !(burn_rate > 0.0 && burn_rate.is_finite()) {
        return Exhaustion {
            date: None,
            days_until: DaysUntil::Never,
        };
    }

    let raw = (remaining_credits / burn_rate).ceil();
    // `as` saturates for values past u32::MAX
    let days = raw as u32;

    Exhaustion {
        date: today.checked_add_days(Days::new(u64::from(days))),
        days_until: DaysUntil::Finite(days),
    }
}
