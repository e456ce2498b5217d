//! Advisory Engine - ranked, human-readable advice
//!
//! Advice comes from a fixed, ordered table of rules. Each rule is a plain
//! value: a predicate over the profile, metrics and records, a message
//! builder, and its severity and category. Every rule is evaluated
//! independently; the firing set is sorted by severity (stable, so table order
//! breaks ties) and truncated.
//!
//! ## Baseline Rules
//!
//! | id | severity |
//! |----|----------|
//! | `on-track` | low |
//! | `early-overspending` | high |
//! | `exhaustion-warning` | high |
//! | `frequent-premium` | medium |
//! | `indulgence-overspend` | medium |
//! | `daily-limit-exceeded` | high |
//! | `weekend-boost-tip` | low |
//! | `surplus-projection` | low |
//! | `critical-balance` | high |
//!
//! ## Usage
//!
//! ```rust,ignore
//! use runway_core::advice::generate_advice;
//!
//! let metrics = compute_metrics(&profile, &expenses, today);
//! for item in generate_advice(&profile, &metrics, &expenses) {
//!     println!("[{}] {}: {}", item.severity, item.title, item.message);
//! }
//! ```

pub mod engine;
pub mod rules;

pub use engine::{generate_advice, generate_advice_with, AdviceEngine};
pub use rules::{AdviceRule, RuleContext, BASELINE_RULES};
