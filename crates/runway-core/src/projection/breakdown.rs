//! Spending breakdowns for display
//!
//! Groups expense records by item category, by meal and by day. Categories
//! are grouped on the raw item value, so unknown categories stay separate.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{ExpenseRecord, ItemType, MealType, Profile};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub item_type: ItemType,
    /// Number of records, not the sum of quantities
    pub purchases: usize,
    pub quantity: u64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealTypeTotal {
    pub meal_type: MealType,
    pub purchases: usize,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total: f64,
    /// Running total from the first day of the period
    pub cumulative: f64,
}

/// Totals per item category, largest spend first
pub fn category_totals(records: &[ExpenseRecord]) -> Vec<CategoryTotal> {
    let mut by_type: BTreeMap<&ItemType, CategoryTotal> = BTreeMap::new();

    for record in records {
        let entry = by_type
            .entry(&record.item_type)
            .or_insert_with(|| CategoryTotal {
                item_type: record.item_type.clone(),
                purchases: 0,
                quantity: 0,
                total: 0.0,
            });
        entry.purchases += 1;
        entry.quantity += u64::from(record.quantity);
        entry.total += record.cost;
    }

    let mut totals: Vec<CategoryTotal> = by_type.into_values().collect();
    // Stable sort keeps the BTreeMap order for ties
    totals.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    totals
}

/// Totals per meal, in breakfast..other order, skipping meals with no records
pub fn meal_type_totals(records: &[ExpenseRecord]) -> Vec<MealTypeTotal> {
    MealType::all()
        .iter()
        .filter_map(|meal| {
            let matching: Vec<&ExpenseRecord> =
                records.iter().filter(|r| r.meal_type == *meal).collect();
            if matching.is_empty() {
                return None;
            }
            Some(MealTypeTotal {
                meal_type: *meal,
                purchases: matching.len(),
                total: matching.iter().map(|r| r.cost).sum(),
            })
        })
        .collect()
}

/// One entry per period day from the start through `today` (or period end)
///
/// Days without spend are included with a zero total.
pub fn daily_totals(
    records: &[ExpenseRecord],
    profile: &Profile,
    today: NaiveDate,
) -> Vec<DailyTotal> {
    if profile.period_days == 0 || today < profile.start_date {
        return Vec::new();
    }

    let last = today.min(profile.period_end());
    let mut per_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for record in records {
        if record.date >= profile.start_date && record.date <= last {
            *per_day.entry(record.date).or_insert(0.0) += record.cost;
        }
    }

    let mut cumulative = 0.0;
    profile
        .start_date
        .iter_days()
        .take_while(|d| *d <= last)
        .map(|date| {
            let total = per_day.get(&date).copied().unwrap_or(0.0);
            cumulative += total;
            DailyTotal {
                date,
                total,
                cumulative,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserType;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, d).unwrap()
    }

    #[test]
    fn test_category_totals_group_raw_values() {
        let records = vec![
            ExpenseRecord::new(day(1), MealType::Breakfast, ItemType::Coffee, 40.0),
            ExpenseRecord::new(day(2), MealType::Breakfast, ItemType::Coffee, 40.0).with_quantity(2),
            ExpenseRecord::new(day(2), MealType::Lunch, ItemType::Meal, 150.0),
            ExpenseRecord::new(day(3), MealType::Snacks, ItemType::from_raw("bubble_tea"), 60.0),
            ExpenseRecord::new(day(3), MealType::Snacks, ItemType::from_raw("kombucha"), 30.0),
        ];

        let totals = category_totals(&records);
        assert_eq!(totals.len(), 4);
        assert_eq!(totals[0].item_type, ItemType::Meal);
        assert_eq!(totals[1].item_type, ItemType::Coffee);
        assert_eq!(totals[1].purchases, 2);
        assert_eq!(totals[1].quantity, 3);
        assert_eq!(totals[1].total, 80.0);
        // Unknown categories are not merged
        assert!(totals
            .iter()
            .any(|t| t.item_type == ItemType::Other("kombucha".to_string())));
    }

    #[test]
    fn test_meal_type_totals() {
        let records = vec![
            ExpenseRecord::new(day(1), MealType::Dinner, ItemType::Meal, 120.0),
            ExpenseRecord::new(day(2), MealType::Dinner, ItemType::Meal, 100.0),
            ExpenseRecord::new(day(2), MealType::Breakfast, ItemType::Meal, 50.0),
        ];

        let totals = meal_type_totals(&records);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].meal_type, MealType::Breakfast);
        assert_eq!(totals[1].meal_type, MealType::Dinner);
        assert_eq!(totals[1].purchases, 2);
        assert_eq!(totals[1].total, 220.0);
    }

    #[test]
    fn test_daily_totals_fill_gaps() {
        let profile = Profile::new(UserType::Resident, 6000.0, 30, day(1));
        let records = vec![
            ExpenseRecord::new(day(1), MealType::Lunch, ItemType::Meal, 100.0),
            ExpenseRecord::new(day(3), MealType::Lunch, ItemType::Meal, 50.0),
            ExpenseRecord::new(day(9), MealType::Lunch, ItemType::Meal, 75.0),
        ];

        let days = daily_totals(&records, &profile, day(4));
        assert_eq!(days.len(), 4);
        assert_eq!(days[1].total, 0.0);
        assert_eq!(days[2].total, 50.0);
        assert_eq!(days[3].cumulative, 150.0);
    }

    #[test]
    fn test_daily_totals_stop_at_period_end() {
        let profile = Profile::new(UserType::Resident, 6000.0, 30, day(1));
        let days = daily_totals(&[], &profile, NaiveDate::from_ymd_opt(2026, 10, 20).unwrap());
        assert_eq!(days.len(), 30);
        assert!(daily_totals(&[], &profile, NaiveDate::from_ymd_opt(2026, 8, 20).unwrap()).is_empty());
    }
}
