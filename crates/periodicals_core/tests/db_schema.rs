use periodicals_core::db::schema::{reset_schema, SCHEMA_VERSION};
use periodicals_core::db::{open_db, open_db_in_memory, open_db_with_config, DbError};
use periodicals_core::{
    ArticleRepository, AuthorRepository, MagazineRepository, NewArticle, NewAuthor, NewMagazine,
    RepoError, SqliteArticleRepository, SqliteAuthorRepository, SqliteMagazineRepository, Store,
    StoreConfig,
};
use rusqlite::Connection;
use std::time::Duration;

#[test]
fn open_db_in_memory_creates_schema() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), SCHEMA_VERSION);
    assert_table_exists(&conn, "authors");
    assert_table_exists(&conn, "magazines");
    assert_table_exists(&conn, "articles");
    assert_index_exists(&conn, "idx_articles_author_id");
    assert_index_exists(&conn, "idx_articles_magazine_id");
}

#[test]
fn connections_have_foreign_keys_enabled() {
    let conn = open_db_in_memory().unwrap();
    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);
}

#[test]
fn opening_same_database_twice_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("articles.db");

    let conn_first = open_db(&path).unwrap();
    SqliteAuthorRepository::try_new(&conn_first)
        .unwrap()
        .create_author(&NewAuthor::new("Jane Doe"))
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    let repo = SqliteAuthorRepository::try_new(&conn_second).unwrap();
    assert_eq!(repo.list_authors().unwrap().len(), 1);
    assert_eq!(schema_version(&conn_second), SCHEMA_VERSION);
}

#[test]
fn open_db_with_config_applies_busy_timeout() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig {
        path: dir.path().join("articles.db"),
        busy_timeout: Duration::from_millis(1_234),
    };

    let conn = open_db_with_config(&config).unwrap();
    let timeout: i64 = conn
        .query_row("PRAGMA busy_timeout;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(timeout, 1_234);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, SCHEMA_VERSION);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn reset_schema_empties_tables_and_restarts_ids() {
    let conn = open_db_in_memory().unwrap();
    {
        let repo = SqliteAuthorRepository::try_new(&conn).unwrap();
        repo.create_author(&NewAuthor::new("First")).unwrap();
        repo.create_author(&NewAuthor::new("Second")).unwrap();
    }

    reset_schema(&conn).unwrap();

    let repo = SqliteAuthorRepository::try_new(&conn).unwrap();
    assert!(repo.list_authors().unwrap().is_empty());
    let author = repo.create_author(&NewAuthor::new("Fresh")).unwrap();
    assert_eq!(author.id, 1);
    assert_eq!(schema_version(&conn), SCHEMA_VERSION);
}

#[test]
fn store_reset_recovers_file_with_newer_schema_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 2;").unwrap();
    drop(conn);
    assert!(matches!(
        open_db(&path).unwrap_err(),
        DbError::UnsupportedSchemaVersion { db_version: 2, .. }
    ));

    Store::new(StoreConfig::at(&path)).reset().unwrap();

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), SCHEMA_VERSION);
    assert!(SqliteAuthorRepository::try_new(&conn)
        .unwrap()
        .list_authors()
        .unwrap()
        .is_empty());
}

#[test]
fn store_reset_replaces_tables_with_a_foreign_layout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stale.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE articles (id INTEGER PRIMARY KEY, title TEXT);
         INSERT INTO articles (title) VALUES ('left over');",
    )
    .unwrap();
    drop(conn);
    assert!(open_db(&path).is_err());

    Store::new(StoreConfig::at(&path)).reset().unwrap();

    let conn = open_db(&path).unwrap();
    assert_index_exists(&conn, "idx_articles_author_id");
    let author = SqliteAuthorRepository::try_new(&conn)
        .unwrap()
        .create_author(&NewAuthor::new("Jane Doe"))
        .unwrap();
    let magazine = SqliteMagazineRepository::try_new(&conn)
        .unwrap()
        .create_magazine(&NewMagazine::new("Tech Weekly", "Technology"))
        .unwrap();
    let articles = SqliteArticleRepository::try_new(&conn).unwrap();
    let article = articles
        .create_article(&NewArticle::new("Future of AI", None, author.id, magazine.id))
        .unwrap();
    assert_eq!(article.id, 1);
    assert_eq!(articles.list_articles().unwrap(), vec![article]);
}

#[test]
fn store_seed_recovers_file_with_newer_schema_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 2;").unwrap();
    drop(conn);

    let summary = Store::new(StoreConfig::at(&path)).seed().unwrap();
    assert_eq!(summary.articles, 15);

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), SCHEMA_VERSION);
}

#[test]
fn repository_rejects_unbootstrapped_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let err = SqliteAuthorRepository::try_new(&conn).err().unwrap();
    assert!(matches!(
        err,
        RepoError::UninitializedConnection {
            expected_version: SCHEMA_VERSION,
            actual_version: 0,
        }
    ));
}

#[test]
fn repository_rejects_connection_without_foreign_keys() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch("PRAGMA foreign_keys = OFF;").unwrap();

    let err = SqliteAuthorRepository::try_new(&conn).err().unwrap();
    assert!(matches!(err, RepoError::ForeignKeysDisabled));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    assert_schema_object(conn, "table", table_name);
}

fn assert_index_exists(conn: &Connection, index_name: &str) {
    assert_schema_object(conn, "index", index_name);
}

fn assert_schema_object(conn: &Connection, kind: &str, name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = ?1 AND name = ?2
            );",
            [kind, name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "{kind} `{name}` should exist");
}
