#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use chrono::NaiveDate;
use fintrack::FinanceTracker;
use fintrack_config::Config;
use fintrack_core::FixedClock;
use fintrack_domain::{NewTransaction, TransactionKind};
use fintrack_storage_json::JsonFileStore;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Tracker backed by JSON files under `base/data`, pinned to `today`.
pub fn tracker_at(base: &Path, today: NaiveDate) -> FinanceTracker {
    let config = Config::default();
    let store = JsonFileStore::new(config.resolve_data_dir(base)).expect("open json store");
    FinanceTracker::with_backend(config, Box::new(store), Box::new(FixedClock::new(today)))
}

pub fn expense(on: NaiveDate, amount: f64, description: &str, category: &str) -> NewTransaction {
    NewTransaction::new(on, amount, description, category, TransactionKind::Expense)
}

pub fn income(on: NaiveDate, amount: f64, description: &str, category: &str) -> NewTransaction {
    NewTransaction::new(on, amount, description, category, TransactionKind::Income)
}
