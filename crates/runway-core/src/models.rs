//! Domain models for Runway

use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Entry-time bounds for the period allowance
pub const MIN_MONTHLY_CREDITS: f64 = 3000.0;
pub const MAX_MONTHLY_CREDITS: f64 = 10000.0;

/// Entry-time bounds for the period length
pub const MIN_PERIOD_DAYS: u32 = 28;
pub const MAX_PERIOD_DAYS: u32 = 31;

/// Kind of allowance holder. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    /// Lives on campus, all meals from the credit balance
    #[default]
    Resident,
    /// Commutes, partial meals from the credit balance
    DayScholar,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Resident => "resident",
            Self::DayScholar => "day_scholar",
        }
    }
}

impl FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "resident" => Ok(Self::Resident),
            "day_scholar" | "dayscholar" | "day-scholar" => Ok(Self::DayScholar),
            _ => Err(format!("Unknown user type: {}", s)),
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How aggressively the safe limit should be scaled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    Low,
    #[default]
    Medium,
    High,
}

impl RiskTolerance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl FromStr for RiskTolerance {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!("Unknown risk tolerance: {}", s)),
        }
    }
}

impl fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Credits-used fractions at which risk escalates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NotificationThresholds {
    pub warning: f64,
    pub danger: f64,
}

impl Default for NotificationThresholds {
    fn default() -> Self {
        Self {
            warning: 0.7,
            danger: 0.9,
        }
    }
}

/// User preferences that shape the safe limit
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub risk_tolerance: RiskTolerance,
    #[serde(default)]
    pub weekend_boost: bool,
    #[serde(default)]
    pub exam_mode: bool,
    /// Hard cap on the daily safe limit
    #[serde(default)]
    pub max_spend_per_day: Option<f64>,
    #[serde(default)]
    pub vegetarian: bool,
    #[serde(default)]
    pub notification_thresholds: NotificationThresholds,
}

impl Preferences {
    /// Field-level checks for values entered by the user
    pub fn validate(&self) -> Result<()> {
        let t = &self.notification_thresholds;
        for (name, value) in [("warning", t.warning), ("danger", t.danger)] {
            if !(value > 0.0 && value < 1.0) {
                return Err(Error::InvalidData(format!(
                    "{} threshold must be between 0 and 1 (exclusive), got {}",
                    name, value
                )));
            }
        }
        if t.warning >= t.danger {
            return Err(Error::InvalidData(format!(
                "warning threshold ({}) must be below danger threshold ({})",
                t.warning, t.danger
            )));
        }
        if let Some(cap) = self.max_spend_per_day {
            if !(cap > 0.0) {
                return Err(Error::InvalidData(format!(
                    "max spend per day must be positive, got {}",
                    cap
                )));
            }
        }
        Ok(())
    }
}

/// The allowance for one accounting period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub user_type: UserType,
    pub monthly_credits: f64,
    pub period_days: u32,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub preferences: Preferences,
}

impl Profile {
    /// Create a profile with default preferences
    pub fn new(
        user_type: UserType,
        monthly_credits: f64,
        period_days: u32,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            user_type,
            monthly_credits,
            period_days,
            start_date,
            preferences: Preferences::default(),
        }
    }

    /// New snapshot with replaced preferences; `self` is left untouched
    pub fn with_preferences(&self, preferences: Preferences) -> Self {
        Self {
            preferences,
            ..self.clone()
        }
    }

    /// Last day of the period (inclusive)
    pub fn period_end(&self) -> NaiveDate {
        let span = u64::from(self.period_days.saturating_sub(1));
        self.start_date
            .checked_add_days(Days::new(span))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Whether `date` falls inside the period
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.period_days > 0 && date >= self.start_date && date <= self.period_end()
    }

    /// Field-level checks applied at onboarding and re-setup
    ///
    /// The engine tolerates values outside these bounds; this is for callers
    /// accepting user input.
    pub fn validate_entry(&self) -> Result<()> {
        if !(MIN_MONTHLY_CREDITS..=MAX_MONTHLY_CREDITS).contains(&self.monthly_credits) {
            return Err(Error::InvalidData(format!(
                "monthly credits must be between {} and {}, got {}",
                MIN_MONTHLY_CREDITS, MAX_MONTHLY_CREDITS, self.monthly_credits
            )));
        }
        if !(MIN_PERIOD_DAYS..=MAX_PERIOD_DAYS).contains(&self.period_days) {
            return Err(Error::InvalidData(format!(
                "period days must be between {} and {}, got {}",
                MIN_PERIOD_DAYS, MAX_PERIOD_DAYS, self.period_days
            )));
        }
        self.preferences.validate()
    }

    /// Structural checks for profiles restored from storage or documents
    pub fn validate_structure(&self) -> Result<()> {
        if !(self.monthly_credits.is_finite() && self.monthly_credits > 0.0) {
            return Err(Error::InvalidData(format!(
                "monthly credits must be a positive number, got {}",
                self.monthly_credits
            )));
        }
        if self.period_days == 0 {
            return Err(Error::InvalidData(
                "period days must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// When in the day a purchase was made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Snacks,
    Dinner,
    Other,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Snacks => "snacks",
            Self::Dinner => "dinner",
            Self::Other => "other",
        }
    }

    pub fn all() -> &'static [MealType] {
        &[
            Self::Breakfast,
            Self::Lunch,
            Self::Snacks,
            Self::Dinner,
            Self::Other,
        ]
    }
}

impl FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "breakfast" => Ok(Self::Breakfast),
            "lunch" => Ok(Self::Lunch),
            "snacks" | "snack" => Ok(Self::Snacks),
            "dinner" => Ok(Self::Dinner),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown meal type: {}", s)),
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What was bought
///
/// Values outside the six known categories are kept verbatim in `Other`,
/// so aggregation groups on the raw string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemType {
    Meal,
    Snack,
    Beverage,
    Coffee,
    Dessert,
    Grocery,
    Other(String),
}

impl ItemType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Meal => "meal",
            Self::Snack => "snack",
            Self::Beverage => "beverage",
            Self::Coffee => "coffee",
            Self::Dessert => "dessert",
            Self::Grocery => "grocery",
            Self::Other(raw) => raw,
        }
    }

    /// Parse a stored value, keeping unknown strings as-is
    pub fn from_raw(s: &str) -> Self {
        match s {
            "meal" => Self::Meal,
            "snack" => Self::Snack,
            "beverage" => Self::Beverage,
            "coffee" => Self::Coffee,
            "dessert" => Self::Dessert,
            "grocery" => Self::Grocery,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// Label for display; unknown values collapse to "other"
    pub fn display_bucket(&self) -> &str {
        match self {
            Self::Other(_) => "other",
            known => known.as_str(),
        }
    }
}

impl FromStr for ItemType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from_raw(s))
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for ItemType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ItemType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_raw(&raw))
    }
}

fn default_quantity() -> u32 {
    1
}

/// A single purchase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: String,
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub item_type: ItemType,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    pub cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ExpenseRecord {
    /// Create a record with a fresh id and quantity 1
    pub fn new(date: NaiveDate, meal_type: MealType, item_type: ItemType, cost: f64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            date,
            meal_type,
            item_type,
            quantity: 1,
            cost,
            notes: None,
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Field-level checks applied when a purchase is entered
    pub fn validate_for(&self, profile: &Profile) -> Result<()> {
        if !(self.cost.is_finite() && self.cost > 0.0) {
            return Err(Error::InvalidData(format!(
                "cost must be greater than zero, got {}",
                self.cost
            )));
        }
        if self.quantity == 0 {
            return Err(Error::InvalidData(
                "quantity must be at least 1".to_string(),
            ));
        }
        if !profile.contains_date(self.date) {
            return Err(Error::InvalidData(format!(
                "date {} is outside the period {} to {}",
                self.date,
                profile.start_date,
                profile.period_end()
            )));
        }
        Ok(())
    }
}

/// The profile and its expenses for one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodState {
    pub profile: Profile,
    #[serde(default)]
    pub expenses: Vec<ExpenseRecord>,
}

impl PeriodState {
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            expenses: Vec::new(),
        }
    }
}

/// Days until the balance runs out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DaysUntil {
    Finite(u32),
    /// Burn rate is zero, the balance never runs out
    Never,
}

impl DaysUntil {
    pub fn finite(&self) -> Option<u32> {
        match self {
            Self::Finite(n) => Some(*n),
            Self::Never => None,
        }
    }
}

impl fmt::Display for DaysUntil {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(n) => write!(f, "{}", n),
            Self::Never => write!(f, "never"),
        }
    }
}

/// Forecast of when the balance reaches zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exhaustion {
    pub date: Option<NaiveDate>,
    pub days_until: DaysUntil,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Safe,
    Watch,
    Danger,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Watch => "watch",
            Self::Danger => "danger",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How much data backs the projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Snapshot computed from a profile and its expenses on a given day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    /// The "today" these figures were computed for
    pub computed_for: NaiveDate,
    pub days_elapsed: u32,
    pub remaining_days: u32,
    pub record_count: usize,
    pub total_spent: f64,
    /// Never negative; overspend is absorbed
    pub remaining_credits: f64,
    pub today_spend: f64,
    pub burn_rate_overall: f64,
    pub burn_rate_7d: f64,
    pub burn_rate_3d: f64,
    pub target_burn_rate: f64,
    pub daily_safe_limit: f64,
    pub exhaustion: Exhaustion,
    pub projected_total_spend: f64,
    /// Positive means a projected surplus
    pub surplus_or_deficit: f64,
    pub risk_level: RiskLevel,
    pub credits_used_ratio: f64,
    pub time_elapsed_ratio: f64,
    pub confidence_level: ConfidenceLevel,
}

/// Advice severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Sort rank (lower = more urgent)
    pub fn rank(&self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdviceCategory {
    Budget,
    Forecast,
    Habits,
    Daily,
    Tips,
    Alert,
}

impl AdviceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Budget => "budget",
            Self::Forecast => "forecast",
            Self::Habits => "habits",
            Self::Daily => "daily",
            Self::Tips => "tips",
            Self::Alert => "alert",
        }
    }
}

impl fmt::Display for AdviceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single piece of advice from one advisory pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdviceItem {
    pub id: String,
    pub title: String,
    pub message: String,
    pub severity: Severity,
    pub category: AdviceCategory,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn profile() -> Profile {
        Profile::new(UserType::Resident, 6000.0, 30, date(2026, 9, 1))
    }

    #[test]
    fn test_period_end_inclusive() {
        let p = profile();
        assert_eq!(p.period_end(), date(2026, 9, 30));
        assert!(p.contains_date(date(2026, 9, 1)));
        assert!(p.contains_date(date(2026, 9, 30)));
        assert!(!p.contains_date(date(2026, 10, 1)));
        assert!(!p.contains_date(date(2026, 8, 31)));
    }

    #[test]
    fn test_with_preferences_leaves_original() {
        let original = profile();
        let prefs = Preferences {
            exam_mode: true,
            ..Preferences::default()
        };
        let updated = original.with_preferences(prefs);

        assert!(updated.preferences.exam_mode);
        assert!(!original.preferences.exam_mode);
        assert_eq!(updated.monthly_credits, original.monthly_credits);
    }

    #[test]
    fn test_validate_entry_bounds() {
        assert!(profile().validate_entry().is_ok());

        let mut p = profile();
        p.monthly_credits = 2500.0;
        assert!(p.validate_entry().is_err());

        let mut p = profile();
        p.period_days = 32;
        assert!(p.validate_entry().is_err());

        let mut p = profile();
        p.preferences.notification_thresholds = NotificationThresholds {
            warning: 0.9,
            danger: 0.7,
        };
        assert!(p.validate_entry().is_err());
    }

    #[test]
    fn test_expense_validation() {
        let p = profile();
        let ok = ExpenseRecord::new(date(2026, 9, 3), MealType::Lunch, ItemType::Meal, 80.0);
        assert!(ok.validate_for(&p).is_ok());

        let zero = ExpenseRecord::new(date(2026, 9, 3), MealType::Lunch, ItemType::Meal, 0.0);
        assert!(zero.validate_for(&p).is_err());

        let outside = ExpenseRecord::new(date(2026, 10, 3), MealType::Lunch, ItemType::Meal, 80.0);
        assert!(outside.validate_for(&p).is_err());
    }

    #[test]
    fn test_item_type_keeps_unknown_values() {
        assert_eq!(ItemType::from_raw("coffee"), ItemType::Coffee);
        let odd = ItemType::from_raw("bubble_tea");
        assert_eq!(odd, ItemType::Other("bubble_tea".to_string()));
        assert_eq!(odd.as_str(), "bubble_tea");
        assert_eq!(odd.display_bucket(), "other");

        let json = serde_json::to_string(&odd).unwrap();
        assert_eq!(json, "\"bubble_tea\"");
    }

    #[test]
    fn test_expense_quantity_defaults_to_one() {
        let json = r#"{"id":"a","date":"2026-09-02","meal_type":"dinner","item_type":"meal","cost":120.0}"#;
        let record: ExpenseRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.quantity, 1);
        assert!(record.notes.is_none());
    }

    #[test]
    fn test_severity_rank() {
        assert!(Severity::High.rank() < Severity::Medium.rank());
        assert!(Severity::Medium.rank() < Severity::Low.rank());
    }

    #[test]
    fn test_days_until_display() {
        assert_eq!(DaysUntil::Finite(4).to_string(), "4");
        assert_eq!(DaysUntil::Never.to_string(), "never");
        assert_eq!(DaysUntil::Never.finite(), None);
    }
}
