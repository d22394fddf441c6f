use periodicals_core::db::open_db_in_memory;
use periodicals_core::{
    ArticleDraft, ArticleService, ArticleServiceError, AuthorService, MagazineService, RepoError,
    SqliteArticleRepository, SqliteAuthorRepository, SqliteMagazineRepository,
};

#[test]
fn add_article_links_author_and_magazine() {
    let conn = open_db_in_memory().unwrap();
    let authors = AuthorService::new(SqliteAuthorRepository::try_new(&conn).unwrap());
    let magazines = MagazineService::new(SqliteMagazineRepository::try_new(&conn).unwrap());
    let articles = ArticleService::new(SqliteArticleRepository::try_new(&conn).unwrap());

    let jane = authors.create_author("Jane Doe").unwrap();
    let tech = magazines.create_magazine("Tech Weekly", "Technology").unwrap();

    let article = articles
        .add_article(&jane, &tech, "Future of AI", Some("Exploring AI trends...".to_string()))
        .unwrap();

    assert_eq!(authors.articles(&jane).unwrap(), vec![article.clone()]);
    assert_eq!(magazines.articles(&tech).unwrap(), vec![article.clone()]);

    let details = articles.article_details(article.id).unwrap().unwrap();
    assert_eq!(details.author, jane);
    assert_eq!(details.magazine, tech);
    assert_eq!(articles.article_details(article.id + 1).unwrap(), None);
}

#[test]
fn add_article_for_deleted_magazine_is_foreign_key_violation() {
    let conn = open_db_in_memory().unwrap();
    let authors = AuthorService::new(SqliteAuthorRepository::try_new(&conn).unwrap());
    let magazines = MagazineService::new(SqliteMagazineRepository::try_new(&conn).unwrap());
    let articles = ArticleService::new(SqliteArticleRepository::try_new(&conn).unwrap());

    let jane = authors.create_author("Jane Doe").unwrap();
    let tech = magazines.create_magazine("Tech Weekly", "Technology").unwrap();
    magazines.delete_magazine(tech.id).unwrap();

    let err = articles
        .add_article(&jane, &tech, "Future of AI", None)
        .unwrap_err();
    assert!(matches!(
        err,
        ArticleServiceError::Repo(RepoError::ForeignKeyViolation { .. })
    ));
    assert!(articles.list_articles().unwrap().is_empty());
}

#[test]
fn update_article_keeps_references() {
    let conn = open_db_in_memory().unwrap();
    let authors = AuthorService::new(SqliteAuthorRepository::try_new(&conn).unwrap());
    let magazines = MagazineService::new(SqliteMagazineRepository::try_new(&conn).unwrap());
    let articles = ArticleService::new(SqliteArticleRepository::try_new(&conn).unwrap());

    let jane = authors.create_author("Jane Doe").unwrap();
    let tech = magazines.create_magazine("Tech Weekly", "Technology").unwrap();
    let article = articles.add_article(&jane, &tech, "Draft", None).unwrap();

    let updated = articles
        .update_article(article.id, "Final", Some("done".to_string()))
        .unwrap();
    assert_eq!(updated.title, "Final");
    assert_eq!(updated.author_id, jane.id);
    assert_eq!(updated.magazine_id, tech.id);

    let err = articles.update_article(999, "Ghost", None).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { id: 999, .. }));
}

#[test]
fn author_service_batch_create_and_delete() {
    let conn = open_db_in_memory().unwrap();
    let authors = AuthorService::new(SqliteAuthorRepository::try_new(&conn).unwrap());
    let magazines = MagazineService::new(SqliteMagazineRepository::try_new(&conn).unwrap());

    let tech = magazines.create_magazine("Tech Weekly", "Technology").unwrap();
    let (jane, created) = authors
        .create_author_with_articles(
            "Jane Doe",
            &[
                ArticleDraft::new("One", None, tech.id),
                ArticleDraft::new("Two", None, tech.id),
            ],
        )
        .unwrap();
    assert_eq!(created.len(), 2);
    assert_eq!(authors.topic_areas(&jane).unwrap(), vec!["Technology"]);
    assert_eq!(authors.most_prolific_author().unwrap(), Some(jane.clone()));

    assert_eq!(authors.delete_author(jane.id).unwrap(), 2);
    assert!(magazines.articles(&tech).unwrap().is_empty());
}

#[test]
fn magazine_service_contributing_authors_uses_default_threshold() {
    let conn = open_db_in_memory().unwrap();
    let authors = AuthorService::new(SqliteAuthorRepository::try_new(&conn).unwrap());
    let magazines = MagazineService::new(SqliteMagazineRepository::try_new(&conn).unwrap());
    let articles = ArticleService::new(SqliteArticleRepository::try_new(&conn).unwrap());

    let jane = authors.create_author("Jane Doe").unwrap();
    let tech = magazines.create_magazine("Tech Weekly", "Technology").unwrap();
    for title in ["One", "Two"] {
        articles.add_article(&jane, &tech, title, None).unwrap();
    }
    assert!(magazines.contributing_authors(&tech).unwrap().is_empty());
    assert_eq!(
        magazines.contributing_authors_with_min(&tech, 2).unwrap(),
        vec![jane.clone()]
    );

    articles.add_article(&jane, &tech, "Three", None).unwrap();
    assert_eq!(magazines.contributing_authors(&tech).unwrap(), vec![jane]);
}
