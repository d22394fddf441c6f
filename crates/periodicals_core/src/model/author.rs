//! Author domain model.
//!
//! # Invariants
//! - `name` is unique across all authors (enforced by the store).

use super::{required_text, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Store-assigned author identity.
pub type AuthorId = i64;

/// Persisted author row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: AuthorId,
    pub name: String,
}

impl Author {
    /// Checks the persisted shape against model rules.
    pub fn validate(&self) -> Result<(), ValidationError> {
        required_text("author", "name", &self.name).map(|_| ())
    }
}

impl Display for Author {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Author #{} {}", self.id, self.name)
    }
}

/// Insert input for a new author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuthor {
    pub name: String,
}

impl NewAuthor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns a trimmed copy, or the first rule violation.
    pub fn normalized(&self) -> Result<Self, ValidationError> {
        Ok(Self {
            name: required_text("author", "name", &self.name)?,
        })
    }
}
