//! Author use-case service.
//!
//! # Responsibility
//! - Provide author entry points for core callers.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Writes are logged by id only; names never reach the log.

use crate::model::article::{Article, ArticleDraft};
use crate::model::author::{Author, AuthorId, NewAuthor};
use crate::model::magazine::Magazine;
use crate::repo::author_repo::AuthorRepository;
use crate::repo::RepoResult;
use log::{info, warn};

/// Use-case service wrapper for author operations.
pub struct AuthorService<R: AuthorRepository> {
    repo: R,
}

impl<R: AuthorRepository> AuthorService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one author from a display name.
    ///
    /// # Errors
    /// - `RepoError::UniquenessViolation` when the name is already taken.
    pub fn create_author(&self, name: impl Into<String>) -> RepoResult<Author> {
        let author = self.repo.create_author(&NewAuthor::new(name))?;
        info!(
            "event=author_create module=service status=ok author_id={}",
            author.id
        );
        Ok(author)
    }

    /// Creates an author together with its first articles, all or nothing.
    pub fn create_author_with_articles(
        &self,
        name: impl Into<String>,
        drafts: &[ArticleDraft],
    ) -> RepoResult<(Author, Vec<Article>)> {
        match self
            .repo
            .create_author_with_articles(&NewAuthor::new(name), drafts)
        {
            Ok((author, articles)) => {
                info!(
                    "event=author_create_batch module=service status=ok author_id={} articles={}",
                    author.id,
                    articles.len()
                );
                Ok((author, articles))
            }
            Err(err) => {
                warn!(
                    "event=author_create_batch module=service status=rolled_back drafts={} error={err}",
                    drafts.len()
                );
                Err(err)
            }
        }
    }

    pub fn get_author(&self, id: AuthorId) -> RepoResult<Option<Author>> {
        self.repo.get_author(id)
    }

    pub fn find_author_by_name(&self, name: &str) -> RepoResult<Option<Author>> {
        self.repo.find_author_by_name(name)
    }

    pub fn list_authors(&self) -> RepoResult<Vec<Author>> {
        self.repo.list_authors()
    }

    pub fn rename_author(&self, id: AuthorId, name: &str) -> RepoResult<Author> {
        let author = self.repo.rename_author(id, name)?;
        info!("event=author_rename module=service status=ok author_id={id}");
        Ok(author)
    }

    /// Deletes the author; its articles go with it.
    ///
    /// Returns the number of cascaded articles.
    pub fn delete_author(&self, id: AuthorId) -> RepoResult<usize> {
        let cascaded = self.repo.delete_author(id)?;
        info!(
            "event=author_delete module=service status=ok author_id={id} cascaded_articles={cascaded}"
        );
        Ok(cascaded)
    }

    pub fn articles(&self, author: &Author) -> RepoResult<Vec<Article>> {
        self.repo.articles_for_author(author.id)
    }

    pub fn magazines(&self, author: &Author) -> RepoResult<Vec<Magazine>> {
        self.repo.magazines_for_author(author.id)
    }

    pub fn topic_areas(&self, author: &Author) -> RepoResult<Vec<String>> {
        self.repo.topic_areas(author.id)
    }

    pub fn most_prolific_author(&self) -> RepoResult<Option<Author>> {
        self.repo.most_prolific_author()
    }
}
