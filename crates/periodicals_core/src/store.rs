//! Per-operation store handle.
//!
//! # Responsibility
//! - Open one connection per logical operation and hand it to the caller.
//! - Expose the destructive reset and seed as their own named entry points.
//!
//! # Invariants
//! - No connection outlives the closure it was opened for; it is closed on
//!   every exit path, including errors and panics.
//! - `Store` holds configuration only, never a live connection.
//! - Reset and seed open without the schema check, so they recover files
//!   that ordinary operations reject.

use crate::config::StoreConfig;
use crate::db::schema::reset_schema;
use crate::db::{open_db_for_reset, open_db_with_config, DbError, DbResult};
use crate::repo::RepoResult;
use crate::seed::{seed_sample_data, SeedSummary};
use log::debug;
use rusqlite::Connection;

/// Explicitly passed handle to a file-backed store.
#[derive(Debug, Clone)]
pub struct Store {
    config: StoreConfig,
}

impl Store {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Runs `f` against a freshly opened connection, then closes it.
    ///
    /// # Errors
    /// - Open/bootstrap failures are converted into `E` via `From<DbError>`.
    /// - Errors returned by `f` are propagated unchanged.
    pub fn with_connection<T, E>(&self, f: impl FnOnce(&Connection) -> Result<T, E>) -> Result<T, E>
    where
        E: From<DbError>,
    {
        self.run(open_db_with_config, "operation", f)
    }

    /// Drops and recreates every table. All data is lost.
    ///
    /// Works on files with a newer schema version or an unrelated table
    /// layout, which `with_connection` refuses to open.
    pub fn reset(&self) -> Result<(), DbError> {
        self.run(open_db_for_reset, "reset", reset_schema)
    }

    /// Resets the store, then loads the sample catalog.
    pub fn seed(&self) -> RepoResult<SeedSummary> {
        self.run(open_db_for_reset, "seed", seed_sample_data)
    }

    fn run<T, E>(
        &self,
        open: fn(&StoreConfig) -> DbResult<Connection>,
        op: &str,
        f: impl FnOnce(&Connection) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<DbError>,
    {
        let conn = open(&self.config)?;
        debug!(
            "event=store_op module=store status=start op={} path={}",
            op,
            self.config.path.display()
        );
        let result = f(&conn);
        drop(conn);
        debug!(
            "event=store_op module=store status={} op={} path={}",
            if result.is_ok() { "ok" } else { "error" },
            op,
            self.config.path.display()
        );
        result
    }
}
