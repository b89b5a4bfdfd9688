//! Test utilities for endpoint handler testing.
//!
//! Provides scratch databases wired into an [`AppState`] so service tests
//! run against a real SQLite store without touching the filesystem
//! outside a temp directory.

use tempfile::TempDir;

use crate::AppState;

/// Create an initialized scratch state.
///
/// The returned `TempDir` must be kept alive for the duration of the
/// test; dropping it deletes the database.
pub fn scratch_state() -> (AppState, TempDir) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let state = AppState::new(dir.path().join("tourflow.db"));
    state.init_store().expect("initialize scratch schema");
    (state, dir)
}

/// Insert a minimal tour row and return its id.
///
/// Only the NOT NULL columns are set, so handler tests also exercise the
/// default-filling row mapping.
pub fn seed_tour(state: &AppState, title: &str, price: i64, category: &str) -> i64 {
    let store = state.open_store().expect("open store");
    store
        .raw()
        .execute(
            "INSERT INTO tours (title, destination, country, price, price_formatted, category) \
             VALUES (?1, 'Турция', 'asia', ?2, ?3, ?4)",
            rusqlite::params![
                title,
                price,
                tourflow_lib::feed::format_price(price),
                category
            ],
        )
        .expect("seed tour");
    store.raw().last_insert_rowid()
}
