//! Repository error taxonomy.
//!
//! # Invariants
//! - SQLite constraint failures are classified by extended result code,
//!   not by message text.
//! - `NotFound` is reserved for keyed mutations; lookups return `Ok(None)`.

use crate::db::DbError;
use crate::model::ValidationError;
use rusqlite::{ffi, ErrorCode};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for persistence and query operations on any entity.
#[derive(Debug)]
pub enum RepoError {
    /// Input rejected before reaching the store.
    Validation(ValidationError),
    /// Store-level unique constraint failed (duplicate author name).
    UniquenessViolation { constraint: String },
    /// Store-level foreign key failed; `constraint` names the column when known.
    ForeignKeyViolation { constraint: String },
    /// Keyed update/delete matched no row.
    NotFound { entity: &'static str, id: i64 },
    /// Referenced row is missing although integrity should guarantee it.
    DanglingReference { entity: &'static str, id: i64 },
    /// Connection schema is not at the expected version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Connection was opened without `PRAGMA foreign_keys = ON`.
    ForeignKeysDisabled,
    /// Persisted row violates model rules.
    InvalidData(String),
    /// Any other store failure.
    Db(DbError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::UniquenessViolation { constraint } => {
                write!(f, "uniqueness violation: {constraint}")
            }
            Self::ForeignKeyViolation { constraint } => {
                write!(f, "foreign key violation: {constraint}")
            }
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::DanglingReference { entity, id } => {
                write!(f, "dangling reference to {entity} {id}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::ForeignKeysDisabled => {
                write!(f, "repository requires PRAGMA foreign_keys = ON")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        match value {
            DbError::Sqlite(err) => Self::from(err),
            other => Self::Db(other),
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        let classified = match &value {
            rusqlite::Error::SqliteFailure(err, message)
                if err.code == ErrorCode::ConstraintViolation =>
            {
                let constraint = message.clone().unwrap_or_else(|| err.to_string());
                match err.extended_code {
                    ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                        Some(Self::UniquenessViolation { constraint })
                    }
                    ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                        Some(Self::ForeignKeyViolation { constraint })
                    }
                    _ => None,
                }
            }
            _ => None,
        };

        classified.unwrap_or_else(|| Self::Db(DbError::Sqlite(value)))
    }
}
