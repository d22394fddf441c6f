//! Magazine domain model.
//!
//! Two magazines may share the same `(name, category)` pair; identity is
//! the surrogate `id` alone.

use super::{required_text, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Store-assigned magazine identity.
pub type MagazineId = i64;

/// Persisted magazine row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Magazine {
    pub id: MagazineId,
    pub name: String,
    pub category: String,
}

impl Magazine {
    pub fn validate(&self) -> Result<(), ValidationError> {
        required_text("magazine", "name", &self.name)?;
        required_text("magazine", "category", &self.category)?;
        Ok(())
    }
}

impl Display for Magazine {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Magazine #{} {} ({})", self.id, self.name, self.category)
    }
}

/// Insert/update input for a magazine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMagazine {
    pub name: String,
    pub category: String,
}

impl NewMagazine {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
        }
    }

    /// Returns a trimmed copy, or the first rule violation.
    pub fn normalized(&self) -> Result<Self, ValidationError> {
        Ok(Self {
            name: required_text("magazine", "name", &self.name)?,
            category: required_text("magazine", "category", &self.category)?,
        })
    }
}

/// Aggregate row: one magazine and how many articles it carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MagazineArticleCount {
    pub magazine: Magazine,
    pub article_count: u32,
}
