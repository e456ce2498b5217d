//! Trailing-window burn rates

use chrono::{Days, NaiveDate};

use crate::models::ExpenseRecord;

use super::inclusive_days;

/// Average daily spend over the last `window_days` days ending `today`
///
/// The window is `[max(today - window_days + 1, period_start), today]`.
/// Always finite and non-negative for non-negative costs; the divisor is at
/// least 1.
pub fn window_burn_rate(
    records: &[ExpenseRecord],
    window_days: u32,
    period_start: NaiveDate,
    today: NaiveDate,
) -> f64 {
    let span = u64::from(window_days.max(1) - 1);
    let window_start = today
        .checked_sub_days(Days::new(span))
        .unwrap_or(NaiveDate::MIN)
        .max(period_start);

    let total: f64 = records
        .iter()
        .filter(|r| r.date >= window_start && r.date <= today)
        .map(|r| r.cost)
        .sum();

    let days = inclusive_days(window_start, today).max(1);
    total / days as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ItemType, MealType};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, d).unwrap()
    }

    fn spend(d: u32, cost: f64) -> ExpenseRecord {
        ExpenseRecord::new(date(d), MealType::Lunch, ItemType::Meal, cost)
    }

    #[test]
    fn test_full_window() {
        let records: Vec<_> = (1..=10).map(|d| spend(d, 70.0)).collect();
        let rate = window_burn_rate(&records, 7, date(1), date(10));
        assert!((rate - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_window_clipped_to_period_start() {
        // Day 2 of the period: the 7-day window only covers 2 days
        let records = vec![spend(1, 100.0), spend(2, 60.0)];
        let rate = window_burn_rate(&records, 7, date(1), date(2));
        assert!((rate - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_records_outside_window_ignored() {
        let records = vec![spend(1, 500.0), spend(9, 30.0), spend(10, 30.0)];
        let rate = window_burn_rate(&records, 3, date(1), date(10));
        // Window is days 8..=10
        assert!((rate - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_future_records_ignored() {
        let records = vec![spend(5, 100.0), spend(6, 100.0)];
        let rate = window_burn_rate(&records, 7, date(1), date(5));
        assert!((rate - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_today_before_period_start() {
        let records = vec![spend(5, 100.0)];
        let rate = window_burn_rate(&records, 7, date(5), date(2));
        assert_eq!(rate, 0.0);
    }

    #[test]
    fn test_empty_records() {
        assert_eq!(window_burn_rate(&[], 7, date(1), date(10)), 0.0);
    }
}
