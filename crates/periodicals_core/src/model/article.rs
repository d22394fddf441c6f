//! Article domain model: the join entity between authors and magazines.
//!
//! # Invariants
//! - Every article references exactly one author and one magazine.
//! - Deleting either referenced row deletes the article (store cascade).
//! - `content` is optional; `None` maps to SQL `NULL`.

use super::author::AuthorId;
use super::magazine::MagazineId;
use super::{required_text, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Store-assigned article identity.
pub type ArticleId = i64;

/// Persisted article row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub content: Option<String>,
    pub author_id: AuthorId,
    pub magazine_id: MagazineId,
}

impl Article {
    pub fn validate(&self) -> Result<(), ValidationError> {
        required_text("article", "title", &self.title).map(|_| ())
    }
}

impl Display for Article {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Article #{} \"{}\" author_id={} magazine_id={}",
            self.id, self.title, self.author_id, self.magazine_id
        )
    }
}

/// Insert input for a new article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArticle {
    pub title: String,
    pub content: Option<String>,
    pub author_id: AuthorId,
    pub magazine_id: MagazineId,
}

impl NewArticle {
    pub fn new(
        title: impl Into<String>,
        content: Option<String>,
        author_id: AuthorId,
        magazine_id: MagazineId,
    ) -> Self {
        Self {
            title: title.into(),
            content,
            author_id,
            magazine_id,
        }
    }

    /// Returns a copy with the title trimmed, or the first rule violation.
    ///
    /// Content is kept verbatim.
    pub fn normalized(&self) -> Result<Self, ValidationError> {
        Ok(Self {
            title: required_text("article", "title", &self.title)?,
            content: self.content.clone(),
            author_id: self.author_id,
            magazine_id: self.magazine_id,
        })
    }
}

/// Article input for a batch whose author does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleDraft {
    pub title: String,
    pub content: Option<String>,
    pub magazine_id: MagazineId,
}

impl ArticleDraft {
    pub fn new(title: impl Into<String>, content: Option<String>, magazine_id: MagazineId) -> Self {
        Self {
            title: title.into(),
            content,
            magazine_id,
        }
    }

    /// Binds the draft to its (now known) author.
    pub fn for_author(&self, author_id: AuthorId) -> NewArticle {
        NewArticle {
            title: self.title.clone(),
            content: self.content.clone(),
            author_id,
            magazine_id: self.magazine_id,
        }
    }
}
