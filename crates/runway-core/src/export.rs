//! Export and import of the current period
//!
//! Supports:
//! - Full JSON document (profile plus every expense) for backup and restore
//! - Expense CSV export for spreadsheets

use std::collections::HashSet;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{ExpenseRecord, PeriodState, Profile};
use crate::store::CURRENT_SCHEMA_VERSION;

/// Document metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Application version that wrote the document
    pub app_version: String,
    /// Store schema the document was written against
    pub schema_version: u32,
    /// When the document was written (RFC 3339)
    pub exported_at: String,
}

/// The whole period as a single JSON document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodDocument {
    pub metadata: DocumentMetadata,
    pub profile: Profile,
    #[serde(default)]
    pub expenses: Vec<ExpenseRecord>,
}

impl PeriodDocument {
    /// Convert into the in-memory period
    pub fn into_state(self) -> PeriodState {
        PeriodState {
            profile: self.profile,
            expenses: self.expenses,
        }
    }

    /// Structural checks run before a document replaces stored data
    pub fn validate_structure(&self) -> Result<()> {
        if self.metadata.schema_version > CURRENT_SCHEMA_VERSION {
            return Err(Error::UnsupportedSchema {
                found: self.metadata.schema_version,
                supported: CURRENT_SCHEMA_VERSION,
            });
        }

        self.profile.validate_structure()?;
        self.profile.preferences.validate()?;

        let mut seen = HashSet::new();
        for record in &self.expenses {
            if !seen.insert(record.id.as_str()) {
                return Err(Error::InvalidData(format!(
                    "duplicate expense id: {}",
                    record.id
                )));
            }
            if !record.cost.is_finite() {
                return Err(Error::InvalidData(format!(
                    "expense {} has a non-numeric cost",
                    record.id
                )));
            }
        }
        Ok(())
    }
}

/// Snapshot a period into a document stamped with this build's version
pub fn export_document(state: &PeriodState) -> PeriodDocument {
    PeriodDocument {
        metadata: DocumentMetadata {
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            schema_version: CURRENT_SCHEMA_VERSION,
            exported_at: Utc::now().to_rfc3339(),
        },
        profile: state.profile.clone(),
        expenses: state.expenses.clone(),
    }
}

/// Pretty-printed JSON
pub fn to_json(document: &PeriodDocument) -> Result<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Parse and validate a document
pub fn from_json(json: &str) -> Result<PeriodDocument> {
    let document: PeriodDocument = serde_json::from_str(json)?;
    document.validate_structure()?;

    tracing::debug!(
        app_version = %document.metadata.app_version,
        schema_version = document.metadata.schema_version,
        expenses = document.expenses.len(),
        "Parsed period document"
    );

    Ok(document)
}

/// Expenses as CSV, one row per record in the given order
pub fn expenses_to_csv(records: &[ExpenseRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "id",
        "date",
        "meal_type",
        "item_type",
        "quantity",
        "cost",
        "notes",
    ])?;

    for record in records {
        writer.write_record([
            record.id.clone(),
            record.date.format("%Y-%m-%d").to_string(),
            record.meal_type.as_str().to_string(),
            record.item_type.as_str().to_string(),
            record.quantity.to_string(),
            format!("{:.2}", record.cost),
            record.notes.clone().unwrap_or_default(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::InvalidData(format!("CSV flush failed: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| Error::InvalidData(format!("CSV is not UTF-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::models::{ItemType, MealType, UserType};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, d).unwrap()
    }

    fn sample_state() -> PeriodState {
        let mut state = PeriodState::new(Profile::new(UserType::Resident, 6000.0, 30, day(1)));
        state.expenses.push(
            ExpenseRecord::new(day(1), MealType::Breakfast, ItemType::Coffee, 45.0)
                .with_notes("oat milk, extra shot"),
        );
        state
            .expenses
            .push(ExpenseRecord::new(day(2), MealType::Lunch, ItemType::Meal, 150.0).with_quantity(2));
        state
    }

    #[test]
    fn test_document_serialization() {
        let document = export_document(&sample_state());
        assert_eq!(document.metadata.schema_version, CURRENT_SCHEMA_VERSION);
        assert_eq!(document.metadata.app_version, env!("CARGO_PKG_VERSION"));

        let json = to_json(&document).unwrap();
        assert!(json.contains("\"monthly_credits\": 6000.0"));
        assert!(json.contains("\"item_type\": \"coffee\""));

        let parsed = from_json(&json).unwrap();
        assert_eq!(parsed, document);

        let state = parsed.into_state();
        assert_eq!(state.profile, document.profile);
        assert_eq!(state.expenses, document.expenses);
    }

    #[test]
    fn test_from_json_rejects_newer_schema() {
        let mut document = export_document(&sample_state());
        document.metadata.schema_version = CURRENT_SCHEMA_VERSION + 1;
        let json = to_json(&document).unwrap();

        assert!(matches!(
            from_json(&json),
            Err(Error::UnsupportedSchema { .. })
        ));
    }

    #[test]
    fn test_from_json_rejects_bad_profile() {
        let mut document = export_document(&sample_state());
        document.profile.period_days = 0;
        let json = to_json(&document).unwrap();
        assert!(matches!(from_json(&json), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_from_json_rejects_bad_preferences() {
        let mut document = export_document(&sample_state());
        document.profile.preferences.notification_thresholds.warning = 0.95;
        document.profile.preferences.notification_thresholds.danger = 0.2;
        let json = to_json(&document).unwrap();
        assert!(matches!(from_json(&json), Err(Error::InvalidData(_))));

        let mut document = export_document(&sample_state());
        document.profile.preferences.max_spend_per_day = Some(-50.0);
        let json = to_json(&document).unwrap();
        assert!(matches!(from_json(&json), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_from_json_rejects_duplicate_ids() {
        let mut document = export_document(&sample_state());
        let copy = document.expenses[0].clone();
        document.expenses.push(copy);
        let json = to_json(&document).unwrap();
        assert!(matches!(from_json(&json), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_from_json_malformed() {
        assert!(matches!(from_json("{not json"), Err(Error::Json(_))));
    }

    #[test]
    fn test_minimal_document_gets_defaults() {
        let json = r#"{
            "metadata": {"app_version": "0.0.1", "schema_version": 1, "exported_at": "2026-09-01T08:00:00Z"},
            "profile": {"monthly_credits": 5000.0, "period_days": 30, "start_date": "2026-09-01"},
            "expenses": [
                {"id": "a", "date": "2026-09-02", "meal_type": "dinner", "item_type": "ramen", "cost": 80.0}
            ]
        }"#;

        let state = from_json(json).unwrap().into_state();
        assert_eq!(state.profile.user_type, UserType::Resident);
        assert_eq!(state.expenses[0].quantity, 1);
        assert_eq!(state.expenses[0].item_type, ItemType::Other("ramen".to_string()));
        assert!(state.expenses[0].notes.is_none());
    }

    #[test]
    fn test_expenses_csv() {
        let state = sample_state();
        let csv = expenses_to_csv(&state.expenses).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "id,date,meal_type,item_type,quantity,cost,notes");
        assert_eq!(lines.len(), 3);
        // Notes with commas are quoted
        assert!(lines[1].ends_with(",2026-09-01,breakfast,coffee,1,45.00,\"oat milk, extra shot\""));
        assert!(lines[2].ends_with(",2026-09-02,lunch,meal,2,150.00,"));
    }
}
