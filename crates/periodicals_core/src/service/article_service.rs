//! Article use-case service.
//!
//! # Responsibility
//! - Publish articles for a persisted author into a persisted magazine.
//! - Resolve an article together with both sides of its join.
//!
//! # Invariants
//! - `add_article` reads the created row back; a missing row is reported as
//!   `ArticleServiceError::InconsistentState`, never silently ignored.
//! - Article content is never logged.

use crate::model::article::{Article, ArticleId, NewArticle};
use crate::model::author::{Author, AuthorId};
use crate::model::magazine::{Magazine, MagazineId};
use crate::repo::article_repo::ArticleRepository;
use crate::repo::{RepoError, RepoResult};
use log::info;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for article use-cases.
#[derive(Debug)]
pub enum ArticleServiceError {
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for ArticleServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => {
                write!(f, "inconsistent article state: {details}")
            }
        }
    }
}

impl Error for ArticleServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::InconsistentState(_) => None,
        }
    }
}

impl From<RepoError> for ArticleServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Article with its resolved author and magazine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleDetails {
    pub article: Article,
    pub author: Author,
    pub magazine: Magazine,
}

/// Use-case service wrapper for article operations.
pub struct ArticleService<R: ArticleRepository> {
    repo: R,
}

impl<R: ArticleRepository> ArticleService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates an article for `author` in `magazine`.
    ///
    /// # Errors
    /// - `RepoError::ForeignKeyViolation` when either record was deleted
    ///   after it was loaded.
    pub fn add_article(
        &self,
        author: &Author,
        magazine: &Magazine,
        title: impl Into<String>,
        content: Option<String>,
    ) -> Result<Article, ArticleServiceError> {
        self.create_article(NewArticle::new(title, content, author.id, magazine.id))
    }

    /// Creates an article from raw ids and reads it back.
    pub fn create_article(&self, article: NewArticle) -> Result<Article, ArticleServiceError> {
        let created = self.repo.create_article(&article)?;
        info!(
            "event=article_create module=service status=ok article_id={} author_id={} magazine_id={}",
            created.id, created.author_id, created.magazine_id
        );

        self.repo
            .get_article(created.id)?
            .ok_or(ArticleServiceError::InconsistentState(
                "created article not found in read-back",
            ))
    }

    pub fn get_article(&self, id: ArticleId) -> RepoResult<Option<Article>> {
        self.repo.get_article(id)
    }

    pub fn list_articles(&self) -> RepoResult<Vec<Article>> {
        self.repo.list_articles()
    }

    pub fn find_articles_by_title(&self, fragment: &str) -> RepoResult<Vec<Article>> {
        self.repo.find_articles_by_title(fragment)
    }

    pub fn list_articles_by_author(&self, author_id: AuthorId) -> RepoResult<Vec<Article>> {
        self.repo.list_articles_by_author(author_id)
    }

    pub fn list_articles_by_magazine(&self, magazine_id: MagazineId) -> RepoResult<Vec<Article>> {
        self.repo.list_articles_by_magazine(magazine_id)
    }

    /// Replaces title and content, keeping both references.
    pub fn update_article(
        &self,
        id: ArticleId,
        title: impl Into<String>,
        content: Option<String>,
    ) -> RepoResult<Article> {
        let title = title.into();
        let updated = self
            .repo
            .update_article_text(id, &title, content.as_deref())?;
        info!("event=article_update module=service status=ok article_id={id}");
        Ok(updated)
    }

    pub fn delete_article(&self, id: ArticleId) -> RepoResult<()> {
        self.repo.delete_article(id)?;
        info!("event=article_delete module=service status=ok article_id={id}");
        Ok(())
    }

    pub fn author_of(&self, article: &Article) -> RepoResult<Author> {
        self.repo.author_of(article)
    }

    pub fn magazine_of(&self, article: &Article) -> RepoResult<Magazine> {
        self.repo.magazine_of(article)
    }

    /// Loads an article and resolves both references; `None` if no such id.
    pub fn article_details(&self, id: ArticleId) -> RepoResult<Option<ArticleDetails>> {
        let Some(article) = self.repo.get_article(id)? else {
            return Ok(None);
        };
        let author = self.repo.author_of(&article)?;
        let magazine = self.repo.magazine_of(&article)?;
        Ok(Some(ArticleDetails {
            article,
            author,
            magazine,
        }))
    }
}
