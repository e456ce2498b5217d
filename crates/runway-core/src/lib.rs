//! Runway Core Library
//!
//! Shared functionality for the Runway meal-credit budgeting tool:
//! - Domain models for the period profile and expense records
//! - Projection engine (burn rates, safe daily limit, exhaustion, risk)
//! - Rule-based advice engine
//! - Engine configuration with embedded defaults
//! - SQLite storage for the current period
//! - JSON document and CSV export

pub mod advice;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod projection;
pub mod store;

pub use advice::{generate_advice, generate_advice_with, AdviceEngine, AdviceRule};
pub use config::{AdviceConfig, EngineConfig};
pub use error::{Error, Result};
pub use export::{DocumentMetadata, PeriodDocument};
pub use models::{
    AdviceCategory, AdviceItem, ConfidenceLevel, DaysUntil, DerivedMetrics, Exhaustion,
    ExpenseRecord, ItemType, MealType, NotificationThresholds, PeriodState, Preferences, Profile,
    RiskLevel, RiskTolerance, Severity, UserType,
};
pub use projection::{compute_metrics, compute_metrics_with};
pub use store::{Store, CURRENT_SCHEMA_VERSION};
