//! Magazine use-case service.
//!
//! # Responsibility
//! - Provide magazine entry points, including the aggregate reports.
//! - Delegate persistence to repository implementations.

use crate::model::article::Article;
use crate::model::author::Author;
use crate::model::magazine::{Magazine, MagazineArticleCount, MagazineId, NewMagazine};
use crate::repo::magazine_repo::{MagazineRepository, DEFAULT_CONTRIBUTOR_MIN_ARTICLES};
use crate::repo::RepoResult;
use log::info;

/// Use-case service wrapper for magazine operations.
pub struct MagazineService<R: MagazineRepository> {
    repo: R,
}

impl<R: MagazineRepository> MagazineService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one magazine. Duplicate `(name, category)` pairs are allowed.
    pub fn create_magazine(
        &self,
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> RepoResult<Magazine> {
        let magazine = self
            .repo
            .create_magazine(&NewMagazine::new(name, category))?;
        info!(
            "event=magazine_create module=service status=ok magazine_id={}",
            magazine.id
        );
        Ok(magazine)
    }

    pub fn get_magazine(&self, id: MagazineId) -> RepoResult<Option<Magazine>> {
        self.repo.get_magazine(id)
    }

    pub fn find_magazines_by_name(&self, name: &str) -> RepoResult<Vec<Magazine>> {
        self.repo.find_magazines_by_name(name)
    }

    pub fn find_magazines_by_category(&self, category: &str) -> RepoResult<Vec<Magazine>> {
        self.repo.find_magazines_by_category(category)
    }

    pub fn list_magazines(&self) -> RepoResult<Vec<Magazine>> {
        self.repo.list_magazines()
    }

    pub fn update_magazine(
        &self,
        id: MagazineId,
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> RepoResult<Magazine> {
        let magazine = self
            .repo
            .update_magazine(id, &NewMagazine::new(name, category))?;
        info!("event=magazine_update module=service status=ok magazine_id={id}");
        Ok(magazine)
    }

    /// Deletes the magazine; its articles go with it.
    ///
    /// Returns the number of cascaded articles.
    pub fn delete_magazine(&self, id: MagazineId) -> RepoResult<usize> {
        let cascaded = self.repo.delete_magazine(id)?;
        info!(
            "event=magazine_delete module=service status=ok magazine_id={id} cascaded_articles={cascaded}"
        );
        Ok(cascaded)
    }

    pub fn articles(&self, magazine: &Magazine) -> RepoResult<Vec<Article>> {
        self.repo.articles_for_magazine(magazine.id)
    }

    pub fn contributors(&self, magazine: &Magazine) -> RepoResult<Vec<Author>> {
        self.repo.contributors(magazine.id)
    }

    pub fn article_titles(&self, magazine: &Magazine) -> RepoResult<Vec<String>> {
        self.repo.article_titles(magazine.id)
    }

    /// Authors with at least `DEFAULT_CONTRIBUTOR_MIN_ARTICLES` articles here.
    pub fn contributing_authors(&self, magazine: &Magazine) -> RepoResult<Vec<Author>> {
        self.repo
            .contributing_authors(magazine.id, DEFAULT_CONTRIBUTOR_MIN_ARTICLES)
    }

    pub fn contributing_authors_with_min(
        &self,
        magazine: &Magazine,
        min_articles: u32,
    ) -> RepoResult<Vec<Author>> {
        self.repo.contributing_authors(magazine.id, min_articles)
    }

    pub fn magazines_with_min_authors(&self, min_authors: u32) -> RepoResult<Vec<Magazine>> {
        self.repo.magazines_with_min_authors(min_authors)
    }

    pub fn article_counts(&self) -> RepoResult<Vec<MagazineArticleCount>> {
        self.repo.article_counts()
    }

    pub fn top_publisher(&self) -> RepoResult<Option<Magazine>> {
        self.repo.top_publisher()
    }
}
