//! History Store Integration Tests
//!
//! Exercises the public history API end to end:
//! - Append order and snapshots
//! - CSV save/load round trips through real files
//! - Recovery from missing and malformed files

use calculator::{CalcError, Calculation, HistoryStore, Operation};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::fs;
use tempfile::TempDir;

fn calc(a: Decimal, b: Decimal, op: Operation) -> Calculation {
    Calculation::new(a, b, op).unwrap()
}

fn scenario_store() -> HistoryStore {
    let mut store = HistoryStore::default();
    store.add_calculation(&calc(dec!(10), dec!(5), Operation::Add));
    store.add_calculation(&calc(dec!(20), dec!(10), Operation::Subtract));
    store.add_calculation(&calc(dec!(5), dec!(5), Operation::Multiply));
    store
}

#[test]
fn test_scenario_order_and_frequency() {
    let store = scenario_store();
    let history = store.get_history();
    assert_eq!(history.len(), 3);

    let results: Vec<Decimal> = history.iter().map(|r| r.result).collect();
    assert_eq!(results, vec![dec!(15), dec!(10), dec!(25)]);

    let frequency = store.analytics().get_operation_frequency();
    assert_eq!(frequency.len(), 3);
    assert!(frequency.values().all(|&count| count == 1));
}

#[test]
fn test_divide_by_zero_leaves_store_unchanged() {
    let mut store = scenario_store();
    let attempt = Calculation::new(dec!(10), dec!(0), Operation::Divide);
    assert!(matches!(attempt, Err(CalcError::DivisionByZero)));
    if let Ok(calculation) = attempt {
        store.add_calculation(&calculation);
    }
    assert_eq!(store.len(), 3);
}

#[test]
fn test_timestamps_non_decreasing() {
    let mut store = HistoryStore::default();
    for i in 0..50 {
        store.add_calculation(&calc(Decimal::from(i), dec!(1), Operation::Add));
    }
    let history = store.get_history();
    assert!(history.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
}

#[test]
fn test_round_trip_through_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("history.csv");

    let mut original = scenario_store();
    original.add_calculation(&calc(dec!(1), dec!(3), Operation::Divide));
    let saved = original.save_history(Some(path.as_path())).unwrap();
    assert_eq!(saved, path);

    let mut loaded = HistoryStore::default();
    assert!(loaded.load_history(Some(path.as_path())));
    assert_eq!(loaded.get_history(), original.get_history());
}

#[test]
fn test_clear_is_idempotent() {
    let mut store = scenario_store();
    store.clear_history();
    assert!(store.get_history().is_empty());
    store.clear_history();
    assert!(store.get_history().is_empty());
    assert!(store.get_latest().is_none());
}

#[test]
fn test_find_by_operation_preserves_order() {
    let mut store = scenario_store();
    store.add_calculation(&calc(dec!(1), dec!(1), Operation::Add));
    let adds = store.find_by_operation("add");
    assert_eq!(adds.len(), 2);
    assert_eq!(adds[0].result, dec!(15));
    assert_eq!(adds[1].result, dec!(2));
    assert!(store.find_by_operation("power").is_empty());
}

#[test]
fn test_load_failure_keeps_previous_state() {
    let dir = TempDir::new().unwrap();
    let bad = dir.path().join("bad.csv");
    fs::write(
        &bad,
        "timestamp,a,b,operation,result\n2024-01-01 00:00:00,1,x,add,2\n",
    )
    .unwrap();

    let mut store = scenario_store();
    assert!(!store.load_history(Some(bad.as_path())));
    assert!(!store.load_history(Some(dir.path().join("missing.csv").as_path())));
    assert_eq!(store.len(), 3);
}

#[test]
fn test_load_skips_unknown_operations() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mixed.csv");
    fs::write(
        &path,
        "timestamp,a,b,operation,result\n\
         2024-01-01 10:00:00,2,3,add,5\n\
         2024-01-01 10:01:00,2,3,power,8\n\
         2024-01-01 10:02:00,6,3,divide,2\n",
    )
    .unwrap();

    let mut store = HistoryStore::default();
    assert!(store.load_history(Some(path.as_path())));
    assert_eq!(store.len(), 2);
    assert_eq!(store.get_latest().unwrap().operation, Operation::Divide);
    assert_eq!(store.to_calculation_list().len(), 2);
}

#[test]
fn test_delete_history_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.csv");
    let store = scenario_store();
    store.save_history(Some(path.as_path())).unwrap();

    assert!(store.delete_history_file(Some(path.as_path())));
    assert!(!path.exists());
    assert!(!store.delete_history_file(Some(path.as_path())));
}

#[test]
fn test_default_path_is_used() {
    let dir = TempDir::new().unwrap();
    let default = dir.path().join("data").join("calculation_history.csv");
    let mut store = HistoryStore::new(&default);
    store.add_calculation(&calc(dec!(2), dec!(2), Operation::Multiply));

    assert_eq!(store.save_history(None).unwrap(), default);
    store.clear_history();
    assert!(store.load_history(None));
    assert_eq!(store.len(), 1);
    assert!(store.delete_history_file(None));
}
