//! Application state for the endpoint services.
//!
//! The services are stateless by contract: state is only the configured
//! database path, and every handler invocation opens its own scoped
//! [`Store`] connection.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tourflow_lib::{Result, Store};

/// Environment variable naming the database the services connect to.
pub const DATABASE_PATH_VAR: &str = "TOURFLOW_DATABASE_PATH";

const DEFAULT_DATABASE_PATH: &str = "/data/tourflow.db";

/// Shared state for axum handlers: the database path, nothing else.
///
/// Cheaply cloneable; handlers call [`AppState::open_store`] per request
/// and let the connection close on drop.
#[derive(Clone)]
pub struct AppState {
    db_path: Arc<PathBuf>,
}

impl AppState {
    /// Create state pointing at an explicit database path.
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: Arc::new(db_path.into()),
        }
    }

    /// Read the database path from `TOURFLOW_DATABASE_PATH`.
    pub fn from_env() -> Self {
        let path = std::env::var(DATABASE_PATH_VAR)
            .unwrap_or_else(|_| DEFAULT_DATABASE_PATH.to_string());
        Self::new(path)
    }

    /// Open a fresh store connection for one request.
    pub fn open_store(&self) -> Result<Store> {
        Store::open(self.db_path.as_ref())
    }

    /// Open the store and ensure the schema exists.
    ///
    /// Called once from each service `main` at startup so handlers never
    /// run DDL.
    pub fn init_store(&self) -> Result<Store> {
        let store = self.open_store()?;
        store.init_schema()?;
        Ok(store)
    }

    /// The configured database path.
    pub fn db_path(&self) -> &Path {
        self.db_path.as_ref()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("db_path", &self.db_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_clones_share_the_path() {
        let state = AppState::new("/tmp/tours.db");
        let clone = state.clone();
        assert_eq!(state.db_path(), clone.db_path());
    }

    #[test]
    fn init_store_creates_the_schema() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(dir.path().join("tourflow.db"));
        let store = state.init_store().unwrap();
        assert_eq!(store.count_tours().unwrap(), 0);

        // A second handler-style connection sees the same schema.
        let store = state.open_store().unwrap();
        assert_eq!(store.count_bookings().unwrap(), 0);
    }
}
