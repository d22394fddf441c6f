//! Schema definition and lifecycle operations.
//!
//! # Responsibility
//! - Hold the declarative `authors` / `magazines` / `articles` definitions.
//! - Provide `ensure_schema` (create when missing) and `reset_schema`
//!   (drop everything, then create) as two separately named operations.
//!
//! # Invariants
//! - `reset_schema` is a fresh start: all rows are lost and autoincrement
//!   counters restart. It is never a migration.
//! - Both operations leave `PRAGMA user_version` at `SCHEMA_VERSION`.

use crate::db::{DbError, DbResult};
use log::{info, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};

/// Schema version written to `PRAGMA user_version`.
pub const SCHEMA_VERSION: u32 = 1;

const SCHEMA_SQL: &str = include_str!("schema.sql");
const DROP_SQL: &str = include_str!("drop.sql");

/// Tables owned by this schema, in dependency order (parents first).
pub const TABLES: &[&str] = &["authors", "magazines", "articles"];

/// Creates the schema when missing; no-op when already current.
///
/// # Errors
/// - `DbError::UnsupportedSchemaVersion` when the file was written by a
///   newer schema.
pub fn ensure_schema(conn: &Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;

    if current_version > SCHEMA_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: SCHEMA_VERSION,
        });
    }

    if current_version == SCHEMA_VERSION {
        return Ok(());
    }

    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    tx.execute_batch(SCHEMA_SQL)?;
    tx.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
    tx.commit()?;

    info!(
        "event=schema_ensure module=db status=ok from_version={} to_version={}",
        current_version, SCHEMA_VERSION
    );
    Ok(())
}

/// Drops every table owned by this schema and recreates it empty.
///
/// Runs in one transaction: on failure the previous tables survive intact.
pub fn reset_schema(conn: &Connection) -> DbResult<()> {
    warn!("event=schema_reset module=db status=start destructive=true");

    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    tx.execute_batch(DROP_SQL)?;
    tx.execute_batch(SCHEMA_SQL)?;
    tx.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
    tx.commit()?;

    info!("event=schema_reset module=db status=ok version={SCHEMA_VERSION}");
    Ok(())
}

/// Returns the schema version recorded in the database file.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
