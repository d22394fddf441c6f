//! Catalog report assembly.
//!
//! # Responsibility
//! - Run the standard relationship queries against the current catalog and
//!   gather their results into one serializable value.
//!
//! # Invariants
//! - Sections anchored on "the first" author/magazine/article use the lowest
//!   id and are `None` when that table is empty.
//! - The report is read-only; building it never writes.

use crate::model::article::Article;
use crate::model::author::Author;
use crate::model::magazine::{Magazine, MagazineArticleCount};
use crate::repo::article_repo::ArticleRepository;
use crate::repo::author_repo::AuthorRepository;
use crate::repo::magazine_repo::{MagazineRepository, DEFAULT_CONTRIBUTOR_MIN_ARTICLES};
use crate::repo::RepoResult;
use crate::service::article_service::ArticleDetails;
use log::debug;
use serde::Serialize;

/// Distinct-author threshold used for the shared-magazine section.
pub const SHARED_MAGAZINE_MIN_AUTHORS: u32 = 2;

/// Queries anchored on one author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorSection {
    pub author: Author,
    pub articles: Vec<Article>,
    pub magazines: Vec<Magazine>,
    pub topic_areas: Vec<String>,
}

/// Queries anchored on one magazine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MagazineSection {
    pub magazine: Magazine,
    pub articles: Vec<Article>,
    pub contributors: Vec<Author>,
    pub article_titles: Vec<String>,
    pub contributing_authors: Vec<Author>,
}

/// Full catalog report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogReport {
    pub first_author: Option<AuthorSection>,
    pub most_prolific_author: Option<Author>,
    pub first_magazine: Option<MagazineSection>,
    pub shared_magazines: Vec<Magazine>,
    pub article_counts: Vec<MagazineArticleCount>,
    pub top_publisher: Option<Magazine>,
    pub first_article: Option<ArticleDetails>,
}

/// Builds the catalog report from the three repositories.
pub fn build_catalog_report<A, M, R>(
    authors: &A,
    magazines: &M,
    articles: &R,
) -> RepoResult<CatalogReport>
where
    A: AuthorRepository,
    M: MagazineRepository,
    R: ArticleRepository,
{
    let first_author = match authors.list_authors()?.into_iter().next() {
        Some(author) => Some(author_section(authors, author)?),
        None => None,
    };

    let first_magazine = match magazines.list_magazines()?.into_iter().next() {
        Some(magazine) => Some(magazine_section(magazines, magazine)?),
        None => None,
    };

    let first_article = match articles.list_articles()?.into_iter().next() {
        Some(article) => Some(ArticleDetails {
            author: articles.author_of(&article)?,
            magazine: articles.magazine_of(&article)?,
            article,
        }),
        None => None,
    };

    let report = CatalogReport {
        first_author,
        most_prolific_author: authors.most_prolific_author()?,
        first_magazine,
        shared_magazines: magazines.magazines_with_min_authors(SHARED_MAGAZINE_MIN_AUTHORS)?,
        article_counts: magazines.article_counts()?,
        top_publisher: magazines.top_publisher()?,
        first_article,
    };

    debug!(
        "event=report_build module=service status=ok magazines={} shared={}",
        report.article_counts.len(),
        report.shared_magazines.len()
    );
    Ok(report)
}

fn author_section<A: AuthorRepository>(repo: &A, author: Author) -> RepoResult<AuthorSection> {
    Ok(AuthorSection {
        articles: repo.articles_for_author(author.id)?,
        magazines: repo.magazines_for_author(author.id)?,
        topic_areas: repo.topic_areas(author.id)?,
        author,
    })
}

fn magazine_section<M: MagazineRepository>(
    repo: &M,
    magazine: Magazine,
) -> RepoResult<MagazineSection> {
    Ok(MagazineSection {
        articles: repo.articles_for_magazine(magazine.id)?,
        contributors: repo.contributors(magazine.id)?,
        article_titles: repo.article_titles(magazine.id)?,
        contributing_authors: repo
            .contributing_authors(magazine.id, DEFAULT_CONTRIBUTOR_MIN_ARTICLES)?,
        magazine,
    })
}
