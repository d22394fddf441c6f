//! Domain model for authors, magazines and the articles that join them.
//!
//! # Responsibility
//! - Define persisted records (`Author`, `Magazine`, `Article`) and their
//!   write inputs (`NewAuthor`, `NewMagazine`, `NewArticle`).
//! - Own field-level validation shared by every write and read path.
//!
//! # Invariants
//! - Identity is a store-assigned surrogate key; write inputs carry none.
//! - Required text fields contain at least one non-whitespace character and
//!   are persisted trimmed.
//! - Author <-> Magazine is derived through `Article`; no record stores it.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod article;
pub mod author;
pub mod magazine;

/// Field-level rule violation detected before touching the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required text field is empty or whitespace-only.
    EmptyField {
        entity: &'static str,
        field: &'static str,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField { entity, field } => {
                write!(f, "{entity} {field} must be a non-empty string")
            }
        }
    }
}

impl Error for ValidationError {}

/// Trims `value` and rejects it when nothing remains.
pub(crate) fn required_text(
    entity: &'static str,
    field: &'static str,
    value: &str,
) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField { entity, field });
    }
    Ok(trimmed.to_string())
}
