//! Author repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over `authors`.
//! - Traverse author -> articles (one-to-many) and author -> magazines
//!   (many-to-many through `articles`).
//!
//! # Invariants
//! - Name uniqueness is enforced by the store (`UNIQUE`), surfaced as
//!   `RepoError::UniquenessViolation`.
//! - Deleting an author cascades to its articles inside the store.
//! - `create_author_with_articles` is all-or-nothing.

use crate::model::article::{Article, ArticleDraft};
use crate::model::author::{Author, AuthorId, NewAuthor};
use crate::model::magazine::Magazine;
use crate::repo::article_repo::{
    articles_by_author, count_articles_for, insert_article, ArticleParent,
};
use crate::repo::magazine_repo::collect_magazines;
use crate::repo::{ensure_connection_ready, in_write_scope, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const AUTHOR_SELECT_SQL: &str = "SELECT id, name FROM authors";

/// Repository interface for author operations.
pub trait AuthorRepository {
    /// Inserts one author; duplicate names fail with `UniquenessViolation`.
    fn create_author(&self, author: &NewAuthor) -> RepoResult<Author>;
    /// Inserts an author and all article drafts in one transaction.
    fn create_author_with_articles(
        &self,
        author: &NewAuthor,
        drafts: &[ArticleDraft],
    ) -> RepoResult<(Author, Vec<Article>)>;
    fn get_author(&self, id: AuthorId) -> RepoResult<Option<Author>>;
    fn find_author_by_name(&self, name: &str) -> RepoResult<Option<Author>>;
    fn list_authors(&self) -> RepoResult<Vec<Author>>;
    fn rename_author(&self, id: AuthorId, name: &str) -> RepoResult<Author>;
    /// Deletes the author and returns how many articles the cascade removed.
    fn delete_author(&self, id: AuthorId) -> RepoResult<usize>;
    fn articles_for_author(&self, id: AuthorId) -> RepoResult<Vec<Article>>;
    /// Distinct magazines the author has written for, `id ASC`.
    fn magazines_for_author(&self, id: AuthorId) -> RepoResult<Vec<Magazine>>;
    /// Distinct categories of those magazines, sorted.
    fn topic_areas(&self, id: AuthorId) -> RepoResult<Vec<String>>;
    /// Author with the most articles; ties resolve to the lowest id.
    fn most_prolific_author(&self) -> RepoResult<Option<Author>>;
}

/// SQLite-backed author repository.
pub struct SqliteAuthorRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAuthorRepository<'conn> {
    /// Constructs a repository from a bootstrapped connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl AuthorRepository for SqliteAuthorRepository<'_> {
    fn create_author(&self, author: &NewAuthor) -> RepoResult<Author> {
        insert_author(self.conn, author)
    }

    fn create_author_with_articles(
        &self,
        author: &NewAuthor,
        drafts: &[ArticleDraft],
    ) -> RepoResult<(Author, Vec<Article>)> {
        in_write_scope(self.conn, |conn| {
            let created = insert_author(conn, author)?;
            let mut articles = Vec::with_capacity(drafts.len());
            for draft in drafts {
                articles.push(insert_article(conn, &draft.for_author(created.id))?);
            }
            Ok((created, articles))
        })
    }

    fn get_author(&self, id: AuthorId) -> RepoResult<Option<Author>> {
        get_author_by_id(self.conn, id)
    }

    fn find_author_by_name(&self, name: &str) -> RepoResult<Option<Author>> {
        self.conn
            .query_row(
                &format!("{AUTHOR_SELECT_SQL} WHERE name = ?1;"),
                [name.trim()],
                |row| Ok(parse_author_row(row)),
            )
            .optional()?
            .transpose()
    }

    fn list_authors(&self) -> RepoResult<Vec<Author>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{AUTHOR_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        collect_authors(&mut rows)
    }

    fn rename_author(&self, id: AuthorId, name: &str) -> RepoResult<Author> {
        let normalized = NewAuthor::new(name).normalized()?;

        let changed = self.conn.execute(
            "UPDATE authors SET name = ?1 WHERE id = ?2;",
            params![normalized.name.as_str(), id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "author",
                id,
            });
        }

        Ok(Author {
            id,
            name: normalized.name,
        })
    }

    fn delete_author(&self, id: AuthorId) -> RepoResult<usize> {
        in_write_scope(self.conn, |conn| {
            let cascaded = count_articles_for(conn, ArticleParent::Author, id)?;

            let changed = conn.execute("DELETE FROM authors WHERE id = ?1;", [id])?;
            if changed == 0 {
                return Err(RepoError::NotFound {
                    entity: "author",
                    id,
                });
            }
            Ok(cascaded)
        })
    }

    fn articles_for_author(&self, id: AuthorId) -> RepoResult<Vec<Article>> {
        articles_by_author(self.conn, id)
    }

    fn magazines_for_author(&self, id: AuthorId) -> RepoResult<Vec<Magazine>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT m.id, m.name, m.category
             FROM magazines m
             INNER JOIN articles a ON a.magazine_id = m.id
             WHERE a.author_id = ?1
             ORDER BY m.id ASC;",
        )?;
        let mut rows = stmt.query([id])?;
        collect_magazines(&mut rows)
    }

    fn topic_areas(&self, id: AuthorId) -> RepoResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT m.category
             FROM magazines m
             INNER JOIN articles a ON a.magazine_id = m.id
             WHERE a.author_id = ?1
             ORDER BY m.category ASC;",
        )?;
        let categories = stmt
            .query_map([id], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(categories)
    }

    fn most_prolific_author(&self) -> RepoResult<Option<Author>> {
        self.conn
            .query_row(
                "SELECT au.id, au.name
                 FROM authors au
                 INNER JOIN articles ar ON ar.author_id = au.id
                 GROUP BY au.id, au.name
                 ORDER BY COUNT(ar.id) DESC, au.id ASC
                 LIMIT 1;",
                [],
                |row| Ok(parse_author_row(row)),
            )
            .optional()?
            .transpose()
    }
}

fn insert_author(conn: &Connection, author: &NewAuthor) -> RepoResult<Author> {
    let author = author.normalized()?;
    conn.execute(
        "INSERT INTO authors (name) VALUES (?1);",
        [author.name.as_str()],
    )?;

    Ok(Author {
        id: conn.last_insert_rowid(),
        name: author.name,
    })
}

pub(crate) fn get_author_by_id(conn: &Connection, id: AuthorId) -> RepoResult<Option<Author>> {
    conn.query_row(
        &format!("{AUTHOR_SELECT_SQL} WHERE id = ?1;"),
        [id],
        |row| Ok(parse_author_row(row)),
    )
    .optional()?
    .transpose()
}

pub(crate) fn collect_authors(rows: &mut rusqlite::Rows<'_>) -> RepoResult<Vec<Author>> {
    let mut authors = Vec::new();
    while let Some(row) = rows.next()? {
        authors.push(parse_author_row(row)?);
    }
    Ok(authors)
}

pub(crate) fn parse_author_row(row: &Row<'_>) -> RepoResult<Author> {
    let author = Author {
        id: row.get("id")?,
        name: row.get("name")?,
    };
    author
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("authors.id={}: {err}", author.id)))?;
    Ok(author)
}
