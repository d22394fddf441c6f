//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define per-entity data access contracts (authors, magazines, articles).
//! - Keep statement text and bind parameters inside one module per entity.
//!
//! # Invariants
//! - Repositories borrow an explicitly passed connection; none owns or
//!   caches one.
//! - Write paths normalize/validate input before SQL mutations.
//! - Integrity violations come from the store and are surfaced as typed
//!   `RepoError` variants, never retried.
//! - Multi-statement writes are atomic whether or not the caller already
//!   holds a transaction on the borrowed connection.

use crate::db::schema::{current_user_version, SCHEMA_VERSION, TABLES};
use rusqlite::{Connection, Transaction, TransactionBehavior};

pub mod article_repo;
pub mod author_repo;
mod error;
pub mod magazine_repo;

pub use error::{RepoError, RepoResult};

/// Rejects connections that did not go through `open_db*` bootstrap.
pub(crate) fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version = current_user_version(conn)?;
    if actual_version != SCHEMA_VERSION {
        return Err(RepoError::UninitializedConnection {
            expected_version: SCHEMA_VERSION,
            actual_version,
        });
    }

    for &table in TABLES {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    let foreign_keys: i64 = conn.query_row("PRAGMA foreign_keys;", [], |row| row.get(0))?;
    if foreign_keys != 1 {
        return Err(RepoError::ForeignKeysDisabled);
    }

    Ok(())
}

const WRITE_SAVEPOINT: &str = "repo_write";

/// Runs `f` as one atomic write on `conn`.
///
/// Opens an `IMMEDIATE` transaction when the connection is in autocommit
/// mode. Inside a caller's transaction it uses a savepoint instead, so a
/// failure undoes only the work of `f` and the outer transaction stays open.
pub(crate) fn in_write_scope<T>(
    conn: &Connection,
    f: impl FnOnce(&Connection) -> RepoResult<T>,
) -> RepoResult<T> {
    if conn.is_autocommit() {
        let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
        let value = f(&*tx)?;
        tx.commit()?;
        return Ok(value);
    }

    conn.execute_batch(&format!("SAVEPOINT {WRITE_SAVEPOINT};"))?;
    match f(conn) {
        Ok(value) => {
            conn.execute_batch(&format!("RELEASE {WRITE_SAVEPOINT};"))?;
            Ok(value)
        }
        Err(err) => {
            // The original error wins over a failed rollback.
            let _ = conn.execute_batch(&format!(
                "ROLLBACK TO {WRITE_SAVEPOINT}; RELEASE {WRITE_SAVEPOINT};"
            ));
            Err(err)
        }
    }
}

pub(crate) fn row_exists(conn: &Connection, sql: &str, id: i64) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(sql, [id], |row| row.get(0))?;
    Ok(exists == 1)
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
