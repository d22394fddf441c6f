//! Magazine repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over `magazines`.
//! - Traverse magazine -> articles and magazine -> authors (through
//!   `articles`), plus the aggregate reports built on those joins.
//!
//! # Invariants
//! - `(name, category)` is not unique; lookups by name or category return lists.
//! - Deleting a magazine cascades to its articles inside the store.
//! - Ordering is deterministic: `id ASC` unless an operation states otherwise.

use crate::model::article::Article;
use crate::model::author::Author;
use crate::model::magazine::{Magazine, MagazineArticleCount, MagazineId, NewMagazine};
use crate::repo::article_repo::{articles_by_magazine, count_articles_for, ArticleParent};
use crate::repo::author_repo::collect_authors;
use crate::repo::{ensure_connection_ready, in_write_scope, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Params, Row};

const MAGAZINE_SELECT_SQL: &str = "SELECT id, name, category FROM magazines";

/// Minimum article count for an author to be a "contributing author" by default.
pub const DEFAULT_CONTRIBUTOR_MIN_ARTICLES: u32 = 3;

/// Repository interface for magazine operations.
pub trait MagazineRepository {
    fn create_magazine(&self, magazine: &NewMagazine) -> RepoResult<Magazine>;
    fn get_magazine(&self, id: MagazineId) -> RepoResult<Option<Magazine>>;
    fn find_magazines_by_name(&self, name: &str) -> RepoResult<Vec<Magazine>>;
    fn find_magazines_by_category(&self, category: &str) -> RepoResult<Vec<Magazine>>;
    fn list_magazines(&self) -> RepoResult<Vec<Magazine>>;
    fn update_magazine(&self, id: MagazineId, magazine: &NewMagazine) -> RepoResult<Magazine>;
    /// Deletes the magazine and returns how many articles the cascade removed.
    fn delete_magazine(&self, id: MagazineId) -> RepoResult<usize>;
    fn articles_for_magazine(&self, id: MagazineId) -> RepoResult<Vec<Article>>;
    /// Distinct authors who wrote for the magazine, `id ASC`.
    fn contributors(&self, id: MagazineId) -> RepoResult<Vec<Author>>;
    fn article_titles(&self, id: MagazineId) -> RepoResult<Vec<String>>;
    /// Authors with at least `min_articles` articles in the magazine.
    fn contributing_authors(&self, id: MagazineId, min_articles: u32) -> RepoResult<Vec<Author>>;
    /// Magazines carrying articles by at least `min_authors` distinct authors.
    /// With `min_authors = 0` every magazine qualifies, including empty ones.
    fn magazines_with_min_authors(&self, min_authors: u32) -> RepoResult<Vec<Magazine>>;
    /// Every magazine with its article count, zero included; `name ASC, id ASC`.
    fn article_counts(&self) -> RepoResult<Vec<MagazineArticleCount>>;
    /// Magazine with the most articles; ties resolve to the lowest id.
    fn top_publisher(&self) -> RepoResult<Option<Magazine>>;
}

/// SQLite-backed magazine repository.
pub struct SqliteMagazineRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMagazineRepository<'conn> {
    /// Constructs a repository from a bootstrapped connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn query_magazines<P: Params>(&self, sql: &str, params: P) -> RepoResult<Vec<Magazine>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        collect_magazines(&mut rows)
    }
}

impl MagazineRepository for SqliteMagazineRepository<'_> {
    fn create_magazine(&self, magazine: &NewMagazine) -> RepoResult<Magazine> {
        let magazine = magazine.normalized()?;
        self.conn.execute(
            "INSERT INTO magazines (name, category) VALUES (?1, ?2);",
            params![magazine.name.as_str(), magazine.category.as_str()],
        )?;

        Ok(Magazine {
            id: self.conn.last_insert_rowid(),
            name: magazine.name,
            category: magazine.category,
        })
    }

    fn get_magazine(&self, id: MagazineId) -> RepoResult<Option<Magazine>> {
        get_magazine_by_id(self.conn, id)
    }

    fn find_magazines_by_name(&self, name: &str) -> RepoResult<Vec<Magazine>> {
        self.query_magazines(
            &format!("{MAGAZINE_SELECT_SQL} WHERE name = ?1 ORDER BY id ASC;"),
            [name.trim()],
        )
    }

    fn find_magazines_by_category(&self, category: &str) -> RepoResult<Vec<Magazine>> {
        self.query_magazines(
            &format!("{MAGAZINE_SELECT_SQL} WHERE category = ?1 ORDER BY id ASC;"),
            [category.trim()],
        )
    }

    fn list_magazines(&self) -> RepoResult<Vec<Magazine>> {
        self.query_magazines(&format!("{MAGAZINE_SELECT_SQL} ORDER BY id ASC;"), [])
    }

    fn update_magazine(&self, id: MagazineId, magazine: &NewMagazine) -> RepoResult<Magazine> {
        let magazine = magazine.normalized()?;
        let changed = self.conn.execute(
            "UPDATE magazines SET name = ?1, category = ?2 WHERE id = ?3;",
            params![magazine.name.as_str(), magazine.category.as_str(), id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "magazine",
                id,
            });
        }

        Ok(Magazine {
            id,
            name: magazine.name,
            category: magazine.category,
        })
    }

    fn delete_magazine(&self, id: MagazineId) -> RepoResult<usize> {
        in_write_scope(self.conn, |conn| {
            let cascaded = count_articles_for(conn, ArticleParent::Magazine, id)?;

            let changed = conn.execute("DELETE FROM magazines WHERE id = ?1;", [id])?;
            if changed == 0 {
                return Err(RepoError::NotFound {
                    entity: "magazine",
                    id,
                });
            }
            Ok(cascaded)
        })
    }

    fn articles_for_magazine(&self, id: MagazineId) -> RepoResult<Vec<Article>> {
        articles_by_magazine(self.conn, id)
    }

    fn contributors(&self, id: MagazineId) -> RepoResult<Vec<Author>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT au.id, au.name
             FROM authors au
             INNER JOIN articles ar ON ar.author_id = au.id
             WHERE ar.magazine_id = ?1
             ORDER BY au.id ASC;",
        )?;
        let mut rows = stmt.query([id])?;
        collect_authors(&mut rows)
    }

    fn article_titles(&self, id: MagazineId) -> RepoResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT title FROM articles WHERE magazine_id = ?1 ORDER BY id ASC;")?;
        let titles = stmt
            .query_map([id], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(titles)
    }

    fn contributing_authors(
        &self,
        id: MagazineId,
        min_articles: u32,
    ) -> RepoResult<Vec<Author>> {
        let mut stmt = self.conn.prepare(
            "SELECT au.id, au.name
             FROM authors au
             INNER JOIN articles ar ON ar.author_id = au.id
             WHERE ar.magazine_id = ?1
             GROUP BY au.id, au.name
             HAVING COUNT(ar.id) >= ?2
             ORDER BY au.id ASC;",
        )?;
        let mut rows = stmt.query(params![id, min_articles])?;
        collect_authors(&mut rows)
    }

    fn magazines_with_min_authors(&self, min_authors: u32) -> RepoResult<Vec<Magazine>> {
        self.query_magazines(
            "SELECT m.id, m.name, m.category
             FROM magazines m
             LEFT JOIN articles a ON a.magazine_id = m.id
             GROUP BY m.id, m.name, m.category
             HAVING COUNT(DISTINCT a.author_id) >= ?1
             ORDER BY m.id ASC;",
            [min_authors],
        )
    }

    fn article_counts(&self) -> RepoResult<Vec<MagazineArticleCount>> {
        let mut stmt = self.conn.prepare(
            "SELECT m.id, m.name, m.category, COUNT(a.id) AS article_count
             FROM magazines m
             LEFT JOIN articles a ON a.magazine_id = m.id
             GROUP BY m.id, m.name, m.category
             ORDER BY m.name ASC, m.id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut counts = Vec::new();
        while let Some(row) = rows.next()? {
            counts.push(MagazineArticleCount {
                magazine: parse_magazine_row(row)?,
                article_count: row.get("article_count")?,
            });
        }
        Ok(counts)
    }

    fn top_publisher(&self) -> RepoResult<Option<Magazine>> {
        self.conn
            .query_row(
                "SELECT m.id, m.name, m.category
                 FROM magazines m
                 INNER JOIN articles a ON a.magazine_id = m.id
                 GROUP BY m.id, m.name, m.category
                 ORDER BY COUNT(a.id) DESC, m.id ASC
                 LIMIT 1;",
                [],
                |row| Ok(parse_magazine_row(row)),
            )
            .optional()?
            .transpose()
    }
}

pub(crate) fn get_magazine_by_id(
    conn: &Connection,
    id: MagazineId,
) -> RepoResult<Option<Magazine>> {
    conn.query_row(
        &format!("{MAGAZINE_SELECT_SQL} WHERE id = ?1;"),
        [id],
        |row| Ok(parse_magazine_row(row)),
    )
    .optional()?
    .transpose()
}

pub(crate) fn collect_magazines(rows: &mut rusqlite::Rows<'_>) -> RepoResult<Vec<Magazine>> {
    let mut magazines = Vec::new();
    while let Some(row) = rows.next()? {
        magazines.push(parse_magazine_row(row)?);
    }
    Ok(magazines)
}

pub(crate) fn parse_magazine_row(row: &Row<'_>) -> RepoResult<Magazine> {
    let magazine = Magazine {
        id: row.get("id")?,
        name: row.get("name")?,
        category: row.get("category")?,
    };
    magazine
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("magazines.id={}: {err}", magazine.id)))?;
    Ok(magazine)
}
