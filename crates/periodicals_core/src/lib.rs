//! Core domain logic for the periodicals catalog: authors, magazines and
//! the articles that join them, persisted in SQLite.
//! This crate is the single source of truth for relational invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod seed;
pub mod service;
pub mod store;

pub use config::{ConfigError, StoreConfig};
pub use db::{
    open_db, open_db_for_reset, open_db_in_memory, open_db_with_config, DbError, DbResult,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig};
pub use model::article::{Article, ArticleDraft, ArticleId, NewArticle};
pub use model::author::{Author, AuthorId, NewAuthor};
pub use model::magazine::{Magazine, MagazineArticleCount, MagazineId, NewMagazine};
pub use model::ValidationError;
pub use repo::article_repo::{ArticleRepository, SqliteArticleRepository};
pub use repo::author_repo::{AuthorRepository, SqliteAuthorRepository};
pub use repo::magazine_repo::{
    MagazineRepository, SqliteMagazineRepository, DEFAULT_CONTRIBUTOR_MIN_ARTICLES,
};
pub use repo::{RepoError, RepoResult};
pub use seed::{seed_sample_data, SeedSummary};
pub use service::article_service::{ArticleDetails, ArticleService, ArticleServiceError};
pub use service::author_service::AuthorService;
pub use service::magazine_service::MagazineService;
pub use service::report_service::{build_catalog_report, CatalogReport};
pub use store::Store;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
