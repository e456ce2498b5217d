//! SQLite storage for the current period
//!
//! Holds one profile and its expense records. The schema version is kept in
//! the `meta` table; opening a store created by an older build runs each
//! forward migration step in turn.

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::models::{
    ExpenseRecord, ItemType, MealType, NotificationThresholds, PeriodState, Preferences, Profile,
    RiskTolerance, UserType,
};

/// Schema version written by this build
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

const SCHEMA_VERSION_KEY: &str = "schema_version";

/// Period storage backed by a single SQLite connection
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) a store file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        let store = Self { conn };
        store.run_migrations()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.run_migrations()?;
        Ok(store)
    }

    /// Schema version recorded in the store
    pub fn schema_version(&self) -> Result<u32> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM meta WHERE key = ?1",
                params![SCHEMA_VERSION_KEY],
                |row| row.get(0),
            )
            .optional()?;

        match value {
            Some(v) => v
                .parse()
                .map_err(|_| Error::InvalidData(format!("Corrupt schema version: {}", v))),
            None => Ok(0),
        }
    }

    fn run_migrations(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            -- Single-row table: the current period's profile
            CREATE TABLE IF NOT EXISTS profile (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                user_type TEXT NOT NULL,
                monthly_credits REAL NOT NULL,
                period_days INTEGER NOT NULL,
                start_date DATE NOT NULL,
                risk_tolerance TEXT NOT NULL DEFAULT 'medium',
                weekend_boost BOOLEAN NOT NULL DEFAULT 0,
                exam_mode BOOLEAN NOT NULL DEFAULT 0,
                max_spend_per_day REAL,
                vegetarian BOOLEAN NOT NULL DEFAULT 0,
                warning_threshold REAL NOT NULL DEFAULT 0.7,
                danger_threshold REAL NOT NULL DEFAULT 0.9,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            -- Expenses, rowid keeps insertion order
            CREATE TABLE IF NOT EXISTS expenses (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                date DATE NOT NULL,
                meal_type TEXT NOT NULL,
                item_type TEXT NOT NULL,
                quantity INTEGER NOT NULL DEFAULT 1,
                cost REAL NOT NULL,
                notes TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date);
            "#,
        )?;

        let stored = self.schema_version()?;
        if stored > CURRENT_SCHEMA_VERSION {
            return Err(Error::UnsupportedSchema {
                found: stored,
                supported: CURRENT_SCHEMA_VERSION,
            });
        }

        // A fresh store has no version row; the tables above are already current
        let mut version = if stored == 0 {
            CURRENT_SCHEMA_VERSION
        } else {
            stored
        };
        while version < CURRENT_SCHEMA_VERSION {
            migrate(&self.conn, version, version + 1)?;
            version += 1;
        }

        if version != stored {
            self.conn.execute(
                "INSERT OR REPLACE INTO meta (key, value) VALUES (?1, ?2)",
                params![SCHEMA_VERSION_KEY, version.to_string()],
            )?;
            info!(from = stored, to = version, "Store schema updated");
        }

        Ok(())
    }

    /// Replace the stored profile
    pub fn save_profile(&self, profile: &Profile) -> Result<()> {
        write_profile(&self.conn, profile)
    }

    pub fn load_profile(&self) -> Result<Option<Profile>> {
        let profile = self
            .conn
            .query_row(
                "SELECT user_type, monthly_credits, period_days, start_date, risk_tolerance,
                        weekend_boost, exam_mode, max_spend_per_day, vegetarian,
                        warning_threshold, danger_threshold
                 FROM profile WHERE id = 1",
                [],
                |row| {
                    Ok(RawProfile {
                        user_type: row.get(0)?,
                        monthly_credits: row.get(1)?,
                        period_days: row.get(2)?,
                        start_date: row.get(3)?,
                        risk_tolerance: row.get(4)?,
                        weekend_boost: row.get(5)?,
                        exam_mode: row.get(6)?,
                        max_spend_per_day: row.get(7)?,
                        vegetarian: row.get(8)?,
                        warning_threshold: row.get(9)?,
                        danger_threshold: row.get(10)?,
                    })
                },
            )
            .optional()?;

        profile.map(RawProfile::into_profile).transpose()
    }

    /// Append an expense record
    pub fn insert_expense(&self, record: &ExpenseRecord) -> Result<()> {
        write_expense(&self.conn, record)
    }

    /// Delete an expense by id, returning whether it existed
    pub fn delete_expense(&self, id: &str) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM expenses WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    /// All expenses in insertion order
    pub fn list_expenses(&self) -> Result<Vec<ExpenseRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, date, meal_type, item_type, quantity, cost, notes
             FROM expenses ORDER BY seq",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(RawExpense {
                id: row.get(0)?,
                date: row.get(1)?,
                meal_type: row.get(2)?,
                item_type: row.get(3)?,
                quantity: row.get(4)?,
                cost: row.get(5)?,
                notes: row.get(6)?,
            })
        })?;

        let records = rows
            .map(|raw| raw?.into_record())
            .collect::<Result<Vec<_>>>()?;
        Ok(records)
    }

    /// Replace the profile and every expense in one transaction
    pub fn save_state(&mut self, state: &PeriodState) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM expenses", [])?;
        write_profile(&tx, &state.profile)?;
        for record in &state.expenses {
            write_expense(&tx, record)?;
        }
        tx.commit()?;

        info!(expenses = state.expenses.len(), "Saved period state");
        Ok(())
    }

    /// The stored period, or `None` if no profile has been set up
    pub fn load_state(&self) -> Result<Option<PeriodState>> {
        let Some(profile) = self.load_profile()? else {
            return Ok(None);
        };
        let expenses = self.list_expenses()?;
        Ok(Some(PeriodState { profile, expenses }))
    }

    /// Like [`load_state`](Self::load_state), but a read failure is logged
    /// and treated as "nothing stored yet"
    pub fn load_state_or_empty(&self) -> Option<PeriodState> {
        match self.load_state() {
            Ok(state) => state,
            Err(e) => {
                warn!(error = %e, "Failed to load stored period, starting empty");
                None
            }
        }
    }

    /// Remove the profile and all expenses
    pub fn reset(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            DELETE FROM expenses;
            DELETE FROM profile;
            "#,
        )?;
        info!("Store reset complete");
        Ok(())
    }
}

/// Forward migration hook, called once per version step
///
/// Version 1 is the first schema, so there are no steps yet.
fn migrate(_conn: &Connection, from: u32, to: u32) -> Result<()> {
    info!(from, to, "Running store migration");
    Ok(())
}

fn write_profile(conn: &Connection, profile: &Profile) -> Result<()> {
    let prefs = &profile.preferences;
    conn.execute(
        "INSERT OR REPLACE INTO profile (
            id, user_type, monthly_credits, period_days, start_date, risk_tolerance,
            weekend_boost, exam_mode, max_spend_per_day, vegetarian,
            warning_threshold, danger_threshold, updated_at
         ) VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, CURRENT_TIMESTAMP)",
        params![
            profile.user_type.as_str(),
            profile.monthly_credits,
            profile.period_days,
            profile.start_date,
            prefs.risk_tolerance.as_str(),
            prefs.weekend_boost,
            prefs.exam_mode,
            prefs.max_spend_per_day,
            prefs.vegetarian,
            prefs.notification_thresholds.warning,
            prefs.notification_thresholds.danger,
        ],
    )?;
    Ok(())
}

fn write_expense(conn: &Connection, record: &ExpenseRecord) -> Result<()> {
    conn.execute(
        "INSERT INTO expenses (id, date, meal_type, item_type, quantity, cost, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            record.id,
            record.date,
            record.meal_type.as_str(),
            record.item_type.as_str(),
            record.quantity,
            record.cost,
            record.notes,
        ],
    )?;
    Ok(())
}

struct RawProfile {
    user_type: String,
    monthly_credits: f64,
    period_days: u32,
    start_date: NaiveDate,
    risk_tolerance: String,
    weekend_boost: bool,
    exam_mode: bool,
    max_spend_per_day: Option<f64>,
    vegetarian: bool,
    warning_threshold: f64,
    danger_threshold: f64,
}

impl RawProfile {
    fn into_profile(self) -> Result<Profile> {
        let user_type: UserType = self.user_type.parse().map_err(Error::InvalidData)?;
        let risk_tolerance: RiskTolerance =
            self.risk_tolerance.parse().map_err(Error::InvalidData)?;

        Ok(Profile {
            user_type,
            monthly_credits: self.monthly_credits,
            period_days: self.period_days,
            start_date: self.start_date,
            preferences: Preferences {
                risk_tolerance,
                weekend_boost: self.weekend_boost,
                exam_mode: self.exam_mode,
                max_spend_per_day: self.max_spend_per_day,
                vegetarian: self.vegetarian,
                notification_thresholds: NotificationThresholds {
                    warning: self.warning_threshold,
                    danger: self.danger_threshold,
                },
            },
        })
    }
}

struct RawExpense {
    id: String,
    date: NaiveDate,
    meal_type: String,
    item_type: String,
    quantity: u32,
    cost: f64,
    notes: Option<String>,
}

impl RawExpense {
    fn into_record(self) -> Result<ExpenseRecord> {
        let meal_type: MealType = self.meal_type.parse().map_err(Error::InvalidData)?;
        Ok(ExpenseRecord {
            id: self.id,
            date: self.date,
            meal_type,
            item_type: ItemType::from_raw(&self.item_type),
            quantity: self.quantity,
            cost: self.cost,
            notes: self.notes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, d).unwrap()
    }

    fn sample_state() -> PeriodState {
        let profile = Profile::new(UserType::DayScholar, 4500.0, 30, day(1)).with_preferences(
            Preferences {
                risk_tolerance: RiskTolerance::Low,
                weekend_boost: true,
                max_spend_per_day: Some(250.0),
                vegetarian: true,
                ..Preferences::default()
            },
        );
        PeriodState {
            profile,
            expenses: vec![
                ExpenseRecord::new(day(2), MealType::Dinner, ItemType::Meal, 120.0),
                ExpenseRecord::new(day(1), MealType::Breakfast, ItemType::Coffee, 45.5)
                    .with_quantity(2)
                    .with_notes("with a friend"),
                ExpenseRecord::new(day(3), MealType::Snacks, ItemType::from_raw("bubble_tea"), 60.0),
            ],
        }
    }

    #[test]
    fn test_fresh_store_is_empty() {
        let store = Store::in_memory().unwrap();
        assert_eq!(store.schema_version().unwrap(), CURRENT_SCHEMA_VERSION);
        assert!(store.load_profile().unwrap().is_none());
        assert!(store.load_state().unwrap().is_none());
        assert!(store.list_expenses().unwrap().is_empty());
    }

    #[test]
    fn test_state_roundtrip() {
        let mut store = Store::in_memory().unwrap();
        let state = sample_state();
        store.save_state(&state).unwrap();

        let loaded = store.load_state().unwrap().unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn test_expenses_keep_insertion_order() {
        let store = Store::in_memory().unwrap();
        let state = sample_state();
        store.save_profile(&state.profile).unwrap();
        for record in &state.expenses {
            store.insert_expense(record).unwrap();
        }

        let ids: Vec<String> = store.list_expenses().unwrap().into_iter().map(|r| r.id).collect();
        let expected: Vec<String> = state.expenses.iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_delete_expense() {
        let mut store = Store::in_memory().unwrap();
        let state = sample_state();
        store.save_state(&state).unwrap();

        let target = state.expenses[1].id.clone();
        assert!(store.delete_expense(&target).unwrap());
        assert!(!store.delete_expense(&target).unwrap());

        let remaining = store.list_expenses().unwrap();
        assert_eq!(remaining.len(), 2);
        assert!(remaining.iter().all(|r| r.id != target));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let store = Store::in_memory().unwrap();
        let record = ExpenseRecord::new(day(2), MealType::Lunch, ItemType::Meal, 90.0);
        store.insert_expense(&record).unwrap();
        assert!(store.insert_expense(&record).is_err());
    }

    #[test]
    fn test_save_state_replaces_expenses() {
        let mut store = Store::in_memory().unwrap();
        store.save_state(&sample_state()).unwrap();

        let replacement = PeriodState::new(Profile::new(UserType::Resident, 6000.0, 31, day(1)));
        store.save_state(&replacement).unwrap();

        let loaded = store.load_state().unwrap().unwrap();
        assert_eq!(loaded, replacement);
    }

    #[test]
    fn test_reset() {
        let mut store = Store::in_memory().unwrap();
        store.save_state(&sample_state()).unwrap();
        store.reset().unwrap();
        assert!(store.load_state().unwrap().is_none());
        assert!(store.load_state_or_empty().is_none());
    }

    #[test]
    fn test_reopen_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runway.db");
        let state = sample_state();

        {
            let mut store = Store::open(&path).unwrap();
            store.save_state(&state).unwrap();
        }

        let store = Store::open(&path).unwrap();
        assert_eq!(store.load_state().unwrap().unwrap(), state);
    }

    #[test]
    fn test_newer_schema_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("future.db");

        {
            let store = Store::open(&path).unwrap();
            store
                .conn
                .execute(
                    "UPDATE meta SET value = '99' WHERE key = ?1",
                    params![SCHEMA_VERSION_KEY],
                )
                .unwrap();
        }

        match Store::open(&path) {
            Err(Error::UnsupportedSchema { found, supported }) => {
                assert_eq!(found, 99);
                assert_eq!(supported, CURRENT_SCHEMA_VERSION);
            }
            Err(e) => panic!("unexpected error: {}", e),
            Ok(_) => panic!("expected newer schema to be rejected"),
        }
    }
}
