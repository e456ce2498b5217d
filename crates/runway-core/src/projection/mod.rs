//! Projection Engine - where the balance is heading
//!
//! Pure functions that turn a [`Profile`](crate::models::Profile) and its
//! expense records into a [`DerivedMetrics`](crate::models::DerivedMetrics)
//! snapshot. Nothing here reads the clock: every date-dependent function takes
//! `today` explicitly.
//!
//! ## Components
//!
//! - **Window** - trailing burn rates clipped to the period start
//! - **Safe Limit** - adaptive per-day spending ceiling
//! - **Exhaustion** - date the balance reaches zero
//! - **Risk** - safe / watch / danger decision list
//! - **Metrics** - ties the above together
//! - **Breakdown** - per-category, per-meal and per-day totals
//!
//! ## Usage
//!
//! ```rust,ignore
//! use runway_core::projection::compute_metrics;
//!
//! let metrics = compute_metrics(&profile, &expenses, today);
//! println!("Safe to spend today: {}", metrics.daily_safe_limit);
//! ```

pub mod breakdown;
pub mod exhaustion;
pub mod metrics;
pub mod risk;
pub mod safe_limit;
pub mod window;

pub use breakdown::{
    category_totals, daily_totals, meal_type_totals, CategoryTotal, DailyTotal, MealTypeTotal,
};
pub use exhaustion::predict_exhaustion;
pub use metrics::{classify_confidence, compute_metrics, compute_metrics_with};
pub use risk::classify_risk;
pub use safe_limit::{safe_limit, safe_limit_with_exponent, DEFAULT_DAMPENING_EXPONENT};
pub use window::window_burn_rate;

use chrono::NaiveDate;

/// Inclusive day count between two dates, 0 if `end` is before `start`
pub(crate) fn inclusive_days(start: NaiveDate, end: NaiveDate) -> i64 {
    ((end - start).num_days() + 1).max(0)
}
