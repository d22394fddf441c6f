//! Fixed sample data set.
//!
//! # Responsibility
//! - Reset the schema and load a known catalog of authors, magazines and
//!   articles for demos and report checks.
//!
//! # Invariants
//! - Seeding starts from a reset, so ids are deterministic (1..=N in the
//!   order of the tables below).
//! - All inserts run in one transaction; a failure leaves the freshly reset
//!   (empty) schema behind.

use crate::db::schema::reset_schema;
use crate::model::article::NewArticle;
use crate::model::author::{AuthorId, NewAuthor};
use crate::model::magazine::{MagazineId, NewMagazine};
use crate::repo::article_repo::{ArticleRepository, SqliteArticleRepository};
use crate::repo::author_repo::{AuthorRepository, SqliteAuthorRepository};
use crate::repo::magazine_repo::{MagazineRepository, SqliteMagazineRepository};
use crate::repo::{RepoError, RepoResult};
use log::info;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use serde::Serialize;
use std::collections::HashMap;

const SEED_AUTHORS: &[&str] = &[
    "J.K. Rowling",
    "George R.R. Martin",
    "Stephen King",
    "Jane Austen",
    "Ernest Hemingway",
];

const SEED_MAGAZINES: &[(&str, &str)] = &[
    ("Tech Today", "Technology"),
    ("Literary Review", "Literature"),
    ("Science Monthly", "Science"),
    ("Gourmet World", "Food"),
    ("Adventure Times", "Travel"),
];

/// (title, content, author name, magazine name)
const SEED_ARTICLES: &[(&str, &str, &str, &str)] = &[
    (
        "The Magic of Storytelling",
        "An in-depth look at narrative structures.",
        "J.K. Rowling",
        "Literary Review",
    ),
    (
        "World Building 101",
        "Tips for creating believable fictional worlds.",
        "J.K. Rowling",
        "Literary Review",
    ),
    (
        "Exploring Scottish Highlands",
        "A travelogue inspired by magical landscapes.",
        "J.K. Rowling",
        "Adventure Times",
    ),
    (
        "Complex Characters in Epic Fantasy",
        "Essay on character development.",
        "George R.R. Martin",
        "Literary Review",
    ),
    (
        "The Future of Interactive Narratives",
        "Exploring tech in storytelling.",
        "George R.R. Martin",
        "Tech Today",
    ),
    (
        "The Winds of Winter: A Preview",
        "A fictional preview for a fictional magazine.",
        "George R.R. Martin",
        "Literary Review",
    ),
    (
        "The Art of Suspense",
        "How to keep readers on the edge of their seats.",
        "Stephen King",
        "Literary Review",
    ),
    (
        "Horror and Human Psychology",
        "The science behind fear in fiction.",
        "Stephen King",
        "Science Monthly",
    ),
    (
        "My Favorite Diner Food",
        "A surprising take on comfort food from the master of horror.",
        "Stephen King",
        "Gourmet World",
    ),
    (
        "Social Commentary in 19th Century Novels",
        "Analyzing societal norms through literature.",
        "Jane Austen",
        "Literary Review",
    ),
    (
        "A Lady's Journey Through Bath",
        "Travel and society in historical England.",
        "Jane Austen",
        "Adventure Times",
    ),
    (
        "The Iceberg Theory in Writing",
        "Less is more in prose.",
        "Ernest Hemingway",
        "Literary Review",
    ),
    (
        "Fishing in the Gulf Stream",
        "A tale of man and nature.",
        "Ernest Hemingway",
        "Adventure Times",
    ),
    (
        "A Moveable Feast: Parisian Cafes",
        "Recollections of food and drink in Paris.",
        "Ernest Hemingway",
        "Gourmet World",
    ),
    (
        "The Natural World of Cuba",
        "Observations on Cuban flora and fauna.",
        "Ernest Hemingway",
        "Science Monthly",
    ),
];

/// Row counts written by [`seed_sample_data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub authors: usize,
    pub magazines: usize,
    pub articles: usize,
}

/// Resets the schema, then loads the sample catalog.
///
/// # Errors
/// - Any store error from the reset or the inserts. The insert transaction
///   is rolled back on failure.
pub fn seed_sample_data(conn: &Connection) -> RepoResult<SeedSummary> {
    reset_schema(conn)?;

    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    let summary = {
        let authors = SqliteAuthorRepository::try_new(&tx)?;
        let magazines = SqliteMagazineRepository::try_new(&tx)?;
        let articles = SqliteArticleRepository::try_new(&tx)?;

        let mut author_ids: HashMap<&str, AuthorId> = HashMap::new();
        for &name in SEED_AUTHORS {
            let author = authors.create_author(&NewAuthor::new(name))?;
            author_ids.insert(name, author.id);
        }

        let mut magazine_ids: HashMap<&str, MagazineId> = HashMap::new();
        for &(name, category) in SEED_MAGAZINES {
            let magazine = magazines.create_magazine(&NewMagazine::new(name, category))?;
            magazine_ids.insert(name, magazine.id);
        }

        for &(title, content, author, magazine) in SEED_ARTICLES {
            let author_id = *author_ids
                .get(author)
                .ok_or_else(|| RepoError::InvalidData(format!("unknown seed author `{author}`")))?;
            let magazine_id = *magazine_ids.get(magazine).ok_or_else(|| {
                RepoError::InvalidData(format!("unknown seed magazine `{magazine}`"))
            })?;
            articles.create_article(&NewArticle::new(
                title,
                Some(content.to_string()),
                author_id,
                magazine_id,
            ))?;
        }

        SeedSummary {
            authors: author_ids.len(),
            magazines: magazine_ids.len(),
            articles: SEED_ARTICLES.len(),
        }
    };
    tx.commit()?;

    info!(
        "event=seed module=seed status=ok authors={} magazines={} articles={}",
        summary.authors, summary.magazines, summary.articles
    );
    Ok(summary)
}
