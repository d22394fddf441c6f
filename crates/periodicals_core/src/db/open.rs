//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure connection pragmas required by the integrity model.
//! - Ensure the schema exists before returning a usable connection.
//! - Offer a configure-only open for the destructive reset path.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - Connections from `open_db*` carry the current schema version.
//! - `open_db_for_reset` never inspects the existing schema, so files with a
//!   newer version or foreign table layouts can still be wiped.

use super::schema::ensure_schema;
use super::DbResult;
use crate::config::StoreConfig;
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone, Copy)]
enum Bootstrap {
    EnsureSchema,
    ConfigureOnly,
}

/// Opens a SQLite database file and ensures the schema is present.
///
/// Uses the default busy timeout. See [`open_db_with_config`] for a
/// configurable variant.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_file(path.as_ref(), DEFAULT_BUSY_TIMEOUT, Bootstrap::EnsureSchema)
}

/// Opens the database described by `config`.
///
/// # Side effects
/// - Creates the database file when missing.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db_with_config(config: &StoreConfig) -> DbResult<Connection> {
    open_file(config.path.as_path(), config.busy_timeout, Bootstrap::EnsureSchema)
}

/// Opens the database described by `config` without touching its schema.
///
/// Only pragmas and the busy timeout are applied. The caller is expected to
/// run `reset_schema` next; the connection is not usable by repositories
/// before that.
pub fn open_db_for_reset(config: &StoreConfig) -> DbResult<Connection> {
    open_file(config.path.as_path(), config.busy_timeout, Bootstrap::ConfigureOnly)
}

/// Opens an in-memory SQLite database with the schema applied.
///
/// Every call returns an independent, empty database.
pub fn open_db_in_memory() -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=memory");

    let conn = match Connection::open_in_memory() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode=memory duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    finish_open(
        conn,
        DEFAULT_BUSY_TIMEOUT,
        Bootstrap::EnsureSchema,
        "memory",
        started_at,
    )
}

fn open_file(path: &Path, busy_timeout: Duration, bootstrap: Bootstrap) -> DbResult<Connection> {
    let started_at = Instant::now();
    let mode = match bootstrap {
        Bootstrap::EnsureSchema => "file",
        Bootstrap::ConfigureOnly => "reset",
    };
    info!(
        "event=db_open module=db status=start mode={} path={}",
        mode,
        path.display()
    );

    let conn = match Connection::open(path) {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_open_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    finish_open(conn, busy_timeout, bootstrap, mode, started_at)
}

fn finish_open(
    conn: Connection,
    busy_timeout: Duration,
    bootstrap: Bootstrap,
    mode: &str,
    started_at: Instant,
) -> DbResult<Connection> {
    match bootstrap_connection(&conn, busy_timeout, bootstrap) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={} duration_ms={}",
                mode,
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_bootstrap_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(
    conn: &Connection,
    busy_timeout: Duration,
    bootstrap: Bootstrap,
) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(busy_timeout)?;
    if let Bootstrap::EnsureSchema = bootstrap {
        ensure_schema(conn)?;
    }
    Ok(())
}
