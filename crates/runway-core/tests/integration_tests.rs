//! Integration tests for runway-core
//!
//! These tests exercise the full record → metrics → advice workflow and the
//! store and document round trips.

use chrono::NaiveDate;
use runway_core::{
    advice::generate_advice,
    compute_metrics, export,
    models::{
        DaysUntil, ExpenseRecord, ItemType, MealType, PeriodState, Preferences, Profile,
        RiskLevel, RiskTolerance, Severity, UserType,
    },
    projection::{classify_risk, predict_exhaustion},
    ConfidenceLevel, NotificationThresholds, Store,
};

fn sep(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 9, d).unwrap()
}

fn oct(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
}

fn september() -> Profile {
    Profile::new(UserType::Resident, 6000.0, 30, sep(1))
}

fn lunch(date: NaiveDate, cost: f64) -> ExpenseRecord {
    ExpenseRecord::new(date, MealType::Lunch, ItemType::Meal, cost)
}

// =============================================================================
// Worked Scenarios
// =============================================================================

#[test]
fn test_scenario_first_day_no_records() {
    let metrics = compute_metrics(&september(), &[], sep(1));

    assert_eq!(metrics.days_elapsed, 1);
    assert_eq!(metrics.total_spent, 0.0);
    assert_eq!(metrics.remaining_credits, 6000.0);
    // 6000 spread over the 29 days still ahead
    assert_eq!(metrics.daily_safe_limit, 207.0);
    assert_eq!(metrics.risk_level, RiskLevel::Safe);
    assert_eq!(metrics.confidence_level, ConfidenceLevel::Low);
}

#[test]
fn test_scenario_heavy_first_day() {
    let profile = september();
    let records = vec![lunch(sep(1), 500.0)];
    let metrics = compute_metrics(&profile, &records, sep(1));

    assert_eq!(metrics.total_spent, 500.0);
    assert_eq!(metrics.today_spend, 500.0);
    assert!(metrics.burn_rate_overall > metrics.target_burn_rate);
    assert!(metrics.daily_safe_limit < (5500.0_f64 / 29.0).round());

    let advice = generate_advice(&profile, &metrics, &records);
    let daily = advice
        .iter()
        .find(|a| a.id == "daily-limit-exceeded")
        .expect("daily limit item");
    assert_eq!(daily.severity, Severity::High);
}

#[test]
fn test_scenario_short_runway() {
    let profile = september();
    // 5550 on day 1, then 50 per day for the week ending day 20
    let mut records = vec![lunch(sep(1), 5550.0)];
    records.extend((14..=20).map(|d| lunch(sep(d), 50.0)));

    let metrics = compute_metrics(&profile, &records, sep(20));
    assert_eq!(metrics.remaining_credits, 100.0);
    assert_eq!(metrics.burn_rate_7d, 50.0);
    assert_eq!(metrics.remaining_days, 10);
    assert_eq!(metrics.exhaustion.days_until, DaysUntil::Finite(2));
    assert_eq!(metrics.exhaustion.date, Some(sep(22)));
    assert_eq!(metrics.risk_level, RiskLevel::Danger);
}

#[test]
fn test_scenario_all_multipliers_compose() {
    let profile = Profile::new(UserType::Resident, 6000.0, 30, oct(1)).with_preferences(
        Preferences {
            risk_tolerance: RiskTolerance::High,
            weekend_boost: true,
            exam_mode: true,
            max_spend_per_day: None,
            ..Preferences::default()
        },
    );

    // 2026-10-17 is a Saturday, 13 days remain
    let metrics = compute_metrics(&profile, &[], oct(17));
    let expected = (6000.0_f64 / 13.0 * 1.1 * 1.15 * 1.05).round();
    assert_eq!(metrics.daily_safe_limit, expected);
    assert_eq!(metrics.daily_safe_limit, 613.0);
}

// =============================================================================
// Engine Properties
// =============================================================================

#[test]
fn test_totals_never_negative() {
    let profile = september();
    for spend in [0.0_f64, 1.0, 200.0, 5999.0, 6000.0, 6001.0, 50_000.0] {
        for today in [sep(1), sep(15), sep(30), oct(20)] {
            let records = vec![lunch(sep(1), spend.max(0.01))];
            let metrics = compute_metrics(&profile, &records, today);
            assert!(metrics.remaining_credits >= 0.0, "spend {}", spend);
            assert!(metrics.daily_safe_limit >= 0.0, "spend {}", spend);
        }
    }
}

#[test]
fn test_exhaustion_is_deterministic() {
    for rate in [-5.0, 0.0, 0.5, 37.0, 1e9] {
        let first = predict_exhaustion(1000.0, rate, sep(10));
        let second = predict_exhaustion(1000.0, rate, sep(10));
        assert_eq!(first, second);
        assert_eq!(first.days_until == DaysUntil::Never, rate <= 0.0);
    }
}

#[test]
fn test_risk_classification_is_pure() {
    let thresholds = NotificationThresholds::default();
    let args = (4000.0, 6000.0, 10, 30, DaysUntil::Finite(12), 20);
    let first = classify_risk(args.0, args.1, args.2, args.3, args.4, args.5, &thresholds);
    for _ in 0..3 {
        let again = classify_risk(args.0, args.1, args.2, args.3, args.4, args.5, &thresholds);
        assert_eq!(first, again);
    }
    // Exhaustion margin check runs before the ratio rules
    assert_eq!(first, RiskLevel::Danger);
}

#[test]
fn test_advice_bounded_and_ranked() {
    let profile = september();
    let scenarios: Vec<(Vec<ExpenseRecord>, NaiveDate)> = vec![
        (vec![], sep(1)),
        (vec![lunch(sep(1), 500.0)], sep(1)),
        (
            (1..=10)
                .map(|d| ExpenseRecord::new(sep(d), MealType::Breakfast, ItemType::Coffee, 300.0))
                .chain(std::iter::once(ExpenseRecord::new(
                    sep(10),
                    MealType::Dinner,
                    ItemType::Dessert,
                    2900.0,
                )))
                .collect(),
            sep(10),
        ),
        ((1..=20).map(|d| lunch(sep(d), 120.0)).collect(), sep(20)),
    ];

    for (records, today) in scenarios {
        let metrics = compute_metrics(&profile, &records, today);
        let advice = generate_advice(&profile, &metrics, &records);
        assert!(advice.len() <= 5);
        let ranks: Vec<u8> = advice.iter().map(|a| a.severity.rank()).collect();
        assert!(ranks.windows(2).all(|w| w[0] <= w[1]), "{:?}", ranks);
    }
}

#[test]
fn test_preference_update_leaves_old_snapshot_valid() {
    let profile = september();
    let records = vec![lunch(sep(2), 150.0)];
    let before = compute_metrics(&profile, &records, sep(5));

    let boosted = profile.with_preferences(Preferences {
        exam_mode: true,
        ..Preferences::default()
    });
    let after = compute_metrics(&boosted, &records, sep(5));

    assert!(!profile.preferences.exam_mode);
    assert_eq!(before, compute_metrics(&profile, &records, sep(5)));
    assert!(after.daily_safe_limit > before.daily_safe_limit);
}

// =============================================================================
// Storage and Document Round Trips
// =============================================================================

fn busy_period() -> PeriodState {
    let profile = september().with_preferences(Preferences {
        risk_tolerance: RiskTolerance::Low,
        max_spend_per_day: Some(180.0),
        ..Preferences::default()
    });
    let mut state = PeriodState::new(profile);
    state.expenses = vec![
        ExpenseRecord::new(sep(1), MealType::Breakfast, ItemType::Coffee, 42.5),
        lunch(sep(1), 150.0).with_notes("team lunch"),
        ExpenseRecord::new(sep(2), MealType::Snacks, ItemType::from_raw("samosa"), 20.0)
            .with_quantity(3),
        ExpenseRecord::new(sep(3), MealType::Other, ItemType::Grocery, 310.0),
    ];
    state
}

#[test]
fn test_store_roundtrip_preserves_state() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("runway.db");
    let state = busy_period();

    {
        let mut store = Store::open(&path).expect("open store");
        store.save_state(&state).expect("save state");
    }

    let store = Store::open(&path).expect("reopen store");
    let loaded = store.load_state().expect("load state").expect("stored state");
    assert_eq!(loaded, state);

    // Metrics from the reloaded state match the original
    assert_eq!(
        compute_metrics(&loaded.profile, &loaded.expenses, sep(3)),
        compute_metrics(&state.profile, &state.expenses, sep(3))
    );
}

#[test]
fn test_document_roundtrip_into_store() {
    let state = busy_period();
    let json = export::to_json(&export::export_document(&state)).expect("serialize");

    let restored = export::from_json(&json).expect("parse").into_state();
    assert_eq!(restored, state);

    let mut store = Store::in_memory().expect("store");
    store.save_state(&restored).expect("save");
    assert_eq!(store.load_state().expect("load"), Some(state));
}

#[test]
fn test_csv_export_lists_every_record() {
    let state = busy_period();
    let csv = export::expenses_to_csv(&state.expenses).expect("csv");
    assert_eq!(csv.lines().count(), state.expenses.len() + 1);
    assert!(csv.contains("samosa"));
}
