//! Article repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `articles` join table.
//! - Resolve an article's owning author and magazine by foreign key.
//! - Own every `articles` statement; author/magazine repositories reuse the
//!   crate-visible helpers below instead of duplicating SQL.
//!
//! # Invariants
//! - Lists are ordered by `id ASC` (insertion order).
//! - A failed insert/update leaves no partial row behind.
//! - Foreign key failures name the offending column when it can be determined.

use crate::model::article::{Article, ArticleId, NewArticle};
use crate::model::author::{Author, AuthorId};
use crate::model::magazine::{Magazine, MagazineId};
use crate::model::required_text;
use crate::repo::author_repo::get_author_by_id;
use crate::repo::magazine_repo::get_magazine_by_id;
use crate::repo::{ensure_connection_ready, row_exists, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const ARTICLE_SELECT_SQL: &str = "SELECT
    id,
    title,
    content,
    author_id,
    magazine_id
FROM articles";

const AUTHOR_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM authors WHERE id = ?1);";
const MAGAZINE_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM magazines WHERE id = ?1);";

/// Repository interface for article operations.
pub trait ArticleRepository {
    /// Inserts one article and returns it with its assigned id.
    fn create_article(&self, article: &NewArticle) -> RepoResult<Article>;
    fn get_article(&self, id: ArticleId) -> RepoResult<Option<Article>>;
    fn list_articles(&self) -> RepoResult<Vec<Article>>;
    /// Substring match on title; `%` and `_` in `fragment` are literal.
    fn find_articles_by_title(&self, fragment: &str) -> RepoResult<Vec<Article>>;
    fn list_articles_by_author(&self, author_id: AuthorId) -> RepoResult<Vec<Article>>;
    fn list_articles_by_magazine(&self, magazine_id: MagazineId) -> RepoResult<Vec<Article>>;
    /// Replaces every mutable column of an existing article.
    fn update_article(&self, id: ArticleId, article: &NewArticle) -> RepoResult<Article>;
    /// Replaces title and content in one statement, leaving both references
    /// as they are in the store.
    fn update_article_text(
        &self,
        id: ArticleId,
        title: &str,
        content: Option<&str>,
    ) -> RepoResult<Article>;
    fn delete_article(&self, id: ArticleId) -> RepoResult<()>;
    /// Resolves the article's author; `DanglingReference` if it is gone.
    fn author_of(&self, article: &Article) -> RepoResult<Author>;
    /// Resolves the article's magazine; `DanglingReference` if it is gone.
    fn magazine_of(&self, article: &Article) -> RepoResult<Magazine>;
}

/// SQLite-backed article repository.
pub struct SqliteArticleRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteArticleRepository<'conn> {
    /// Constructs a repository from a bootstrapped connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ArticleRepository for SqliteArticleRepository<'_> {
    fn create_article(&self, article: &NewArticle) -> RepoResult<Article> {
        insert_article(self.conn, article)
    }

    fn get_article(&self, id: ArticleId) -> RepoResult<Option<Article>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ARTICLE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_article_row(row)?));
        }

        Ok(None)
    }

    fn list_articles(&self) -> RepoResult<Vec<Article>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ARTICLE_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        collect_articles(&mut rows)
    }

    fn find_articles_by_title(&self, fragment: &str) -> RepoResult<Vec<Article>> {
        let pattern = format!("%{}%", escape_like(fragment.trim()));
        let mut stmt = self.conn.prepare(&format!(
            "{ARTICLE_SELECT_SQL}
             WHERE title LIKE ?1 ESCAPE '\\'
             ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query([pattern])?;
        collect_articles(&mut rows)
    }

    fn list_articles_by_author(&self, author_id: AuthorId) -> RepoResult<Vec<Article>> {
        articles_by_author(self.conn, author_id)
    }

    fn list_articles_by_magazine(&self, magazine_id: MagazineId) -> RepoResult<Vec<Article>> {
        articles_by_magazine(self.conn, magazine_id)
    }

    fn update_article(&self, id: ArticleId, article: &NewArticle) -> RepoResult<Article> {
        let article = article.normalized()?;

        let changed = self
            .conn
            .execute(
                "UPDATE articles
                 SET
                    title = ?1,
                    content = ?2,
                    author_id = ?3,
                    magazine_id = ?4
                 WHERE id = ?5;",
                params![
                    article.title.as_str(),
                    article.content.as_deref(),
                    article.author_id,
                    article.magazine_id,
                    id,
                ],
            )
            .map_err(|err| explain_reference_failure(self.conn, &article, err.into()))?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "article",
                id,
            });
        }

        Ok(Article {
            id,
            title: article.title,
            content: article.content,
            author_id: article.author_id,
            magazine_id: article.magazine_id,
        })
    }

    fn update_article_text(
        &self,
        id: ArticleId,
        title: &str,
        content: Option<&str>,
    ) -> RepoResult<Article> {
        let title = required_text("article", "title", title)?;

        self.conn
            .query_row(
                "UPDATE articles
                 SET title = ?1, content = ?2
                 WHERE id = ?3
                 RETURNING id, title, content, author_id, magazine_id;",
                params![title.as_str(), content, id],
                |row| Ok(parse_article_row(row)),
            )
            .optional()?
            .transpose()?
            .ok_or(RepoError::NotFound {
                entity: "article",
                id,
            })
    }

    fn delete_article(&self, id: ArticleId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM articles WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "article",
                id,
            });
        }

        Ok(())
    }

    fn author_of(&self, article: &Article) -> RepoResult<Author> {
        get_author_by_id(self.conn, article.author_id)?.ok_or(RepoError::DanglingReference {
            entity: "author",
            id: article.author_id,
        })
    }

    fn magazine_of(&self, article: &Article) -> RepoResult<Magazine> {
        get_magazine_by_id(self.conn, article.magazine_id)?.ok_or(
            RepoError::DanglingReference {
                entity: "magazine",
                id: article.magazine_id,
            },
        )
    }
}

/// Inserts one article on `conn`, which may be an open transaction.
pub(crate) fn insert_article(conn: &Connection, article: &NewArticle) -> RepoResult<Article> {
    let article = article.normalized()?;

    conn.execute(
        "INSERT INTO articles (
            title,
            content,
            author_id,
            magazine_id
        ) VALUES (?1, ?2, ?3, ?4);",
        params![
            article.title.as_str(),
            article.content.as_deref(),
            article.author_id,
            article.magazine_id,
        ],
    )
    .map_err(|err| explain_reference_failure(conn, &article, err.into()))?;

    Ok(Article {
        id: conn.last_insert_rowid(),
        title: article.title,
        content: article.content,
        author_id: article.author_id,
        magazine_id: article.magazine_id,
    })
}

pub(crate) fn articles_by_author(
    conn: &Connection,
    author_id: AuthorId,
) -> RepoResult<Vec<Article>> {
    let mut stmt = conn.prepare(&format!(
        "{ARTICLE_SELECT_SQL}
         WHERE author_id = ?1
         ORDER BY id ASC;"
    ))?;
    let mut rows = stmt.query([author_id])?;
    collect_articles(&mut rows)
}

pub(crate) fn articles_by_magazine(
    conn: &Connection,
    magazine_id: MagazineId,
) -> RepoResult<Vec<Article>> {
    let mut stmt = conn.prepare(&format!(
        "{ARTICLE_SELECT_SQL}
         WHERE magazine_id = ?1
         ORDER BY id ASC;"
    ))?;
    let mut rows = stmt.query([magazine_id])?;
    collect_articles(&mut rows)
}

/// Number of articles a cascade from the given parent row would remove.
pub(crate) fn count_articles_for(
    conn: &Connection,
    parent: ArticleParent,
    id: i64,
) -> RepoResult<usize> {
    let sql = match parent {
        ArticleParent::Author => "SELECT COUNT(*) FROM articles WHERE author_id = ?1;",
        ArticleParent::Magazine => "SELECT COUNT(*) FROM articles WHERE magazine_id = ?1;",
    };
    let count: i64 = conn.query_row(sql, [id], |row| row.get(0))?;
    usize::try_from(count)
        .map_err(|_| RepoError::InvalidData(format!("negative article count `{count}`")))
}

/// Parent side of the article foreign keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ArticleParent {
    Author,
    Magazine,
}

fn collect_articles(rows: &mut rusqlite::Rows<'_>) -> RepoResult<Vec<Article>> {
    let mut articles = Vec::new();
    while let Some(row) = rows.next()? {
        articles.push(parse_article_row(row)?);
    }
    Ok(articles)
}

pub(crate) fn parse_article_row(row: &Row<'_>) -> RepoResult<Article> {
    let article = Article {
        id: row.get("id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        author_id: row.get("author_id")?,
        magazine_id: row.get("magazine_id")?,
    };
    article.validate().map_err(|err| {
        RepoError::InvalidData(format!("articles.id={}: {err}", article.id))
    })?;
    Ok(article)
}

/// Narrows a store-level foreign key failure down to the missing reference.
///
/// Any other error, or a failed lookup, returns `err` unchanged.
fn explain_reference_failure(
    conn: &Connection,
    article: &NewArticle,
    err: RepoError,
) -> RepoError {
    if !matches!(err, RepoError::ForeignKeyViolation { .. }) {
        return err;
    }

    match missing_reference(conn, article) {
        Ok(Some(constraint)) => RepoError::ForeignKeyViolation {
            constraint: constraint.to_string(),
        },
        _ => err,
    }
}

fn missing_reference(
    conn: &Connection,
    article: &NewArticle,
) -> RepoResult<Option<&'static str>> {
    if !row_exists(conn, AUTHOR_EXISTS_SQL, article.author_id)? {
        return Ok(Some("articles.author_id"));
    }
    if !row_exists(conn, MAGAZINE_EXISTS_SQL, article.magazine_id)? {
        return Ok(Some("articles.magazine_id"));
    }
    Ok(None)
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn escape_like_escapes_wildcards_and_escape_char() {
        assert_eq!(escape_like("100%_sure\\"), "100\\%\\_sure\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }
}
