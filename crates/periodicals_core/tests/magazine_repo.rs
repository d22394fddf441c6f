use periodicals_core::db::open_db_in_memory;
use periodicals_core::{
    ArticleRepository, AuthorId, AuthorRepository, MagazineId, MagazineRepository, NewArticle,
    NewAuthor, NewMagazine, RepoError, SqliteArticleRepository, SqliteAuthorRepository,
    SqliteMagazineRepository, DEFAULT_CONTRIBUTOR_MIN_ARTICLES,
};
use rusqlite::Connection;

#[test]
fn duplicate_name_and_category_are_allowed() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMagazineRepository::try_new(&conn).unwrap();

    let first = repo
        .create_magazine(&NewMagazine::new("Tech Weekly", "Technology"))
        .unwrap();
    let second = repo
        .create_magazine(&NewMagazine::new("Tech Weekly", "Technology"))
        .unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(
        repo.find_magazines_by_name("Tech Weekly").unwrap(),
        vec![first.clone(), second.clone()]
    );
    assert_eq!(
        repo.find_magazines_by_category("Technology").unwrap(),
        vec![first, second]
    );
}

#[test]
fn blank_category_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMagazineRepository::try_new(&conn).unwrap();

    let err = repo
        .create_magazine(&NewMagazine::new("Tech Weekly", ""))
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert!(repo.list_magazines().unwrap().is_empty());
}

#[test]
fn update_magazine_replaces_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMagazineRepository::try_new(&conn).unwrap();

    let magazine = repo
        .create_magazine(&NewMagazine::new("Tech Weekly", "Technology"))
        .unwrap();
    let updated = repo
        .update_magazine(magazine.id, &NewMagazine::new("Tech Daily", " Tech "))
        .unwrap();

    assert_eq!(updated.name, "Tech Daily");
    assert_eq!(updated.category, "Tech");
    assert_eq!(repo.get_magazine(magazine.id).unwrap(), Some(updated));

    let err = repo
        .update_magazine(99, &NewMagazine::new("Ghost", "None"))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            entity: "magazine",
            id: 99
        }
    ));
}

#[test]
fn contributors_are_distinct_and_ordered() {
    let conn = open_db_in_memory().unwrap();
    let fixture = Fixture::new(&conn);

    let zed = fixture.author("Zed");
    let amy = fixture.author("Amy");
    let magazine = fixture.magazine("Tech Weekly", "Technology");
    fixture.articles(amy, magazine, 2);
    fixture.articles(zed, magazine, 1);

    let contributors = fixture.magazines.contributors(magazine).unwrap();
    let ids = contributors
        .iter()
        .map(|author| author.id)
        .collect::<Vec<_>>();
    assert_eq!(ids, vec![zed, amy]);
}

#[test]
fn article_titles_follow_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let fixture = Fixture::new(&conn);

    let author = fixture.author("Jane Doe");
    let magazine = fixture.magazine("Tech Weekly", "Technology");
    for title in ["Beta", "Alpha"] {
        fixture
            .articles_repo
            .create_article(&NewArticle::new(title, None, author, magazine))
            .unwrap();
    }

    assert_eq!(
        fixture.magazines.article_titles(magazine).unwrap(),
        vec!["Beta".to_string(), "Alpha".to_string()]
    );
    assert_eq!(
        fixture.magazines.articles_for_magazine(magazine).unwrap().len(),
        2
    );
}

#[test]
fn contributing_authors_respects_threshold() {
    let conn = open_db_in_memory().unwrap();
    let fixture = Fixture::new(&conn);

    let busy = fixture.author("Busy");
    let casual = fixture.author("Casual");
    let magazine = fixture.magazine("Tech Weekly", "Technology");
    fixture.articles(busy, magazine, 3);
    fixture.articles(casual, magazine, 2);

    let ids = |min| {
        fixture
            .magazines
            .contributing_authors(magazine, min)
            .unwrap()
            .into_iter()
            .map(|author| author.id)
            .collect::<Vec<_>>()
    };
    assert_eq!(ids(DEFAULT_CONTRIBUTOR_MIN_ARTICLES), vec![busy]);
    assert_eq!(ids(2), vec![busy, casual]);
    assert!(ids(4).is_empty());
}

#[test]
fn magazines_with_min_authors_counts_distinct_authors() {
    let conn = open_db_in_memory().unwrap();
    let fixture = Fixture::new(&conn);

    let jane = fixture.author("Jane");
    let john = fixture.author("John");
    let shared = fixture.magazine("Shared", "News");
    let solo = fixture.magazine("Solo", "News");
    fixture.articles(jane, shared, 1);
    fixture.articles(john, shared, 1);
    fixture.articles(jane, solo, 5);

    let result = fixture.magazines.magazines_with_min_authors(2).unwrap();
    assert_eq!(
        result.iter().map(|m| m.id).collect::<Vec<_>>(),
        vec![shared]
    );
}

#[test]
fn magazines_with_zero_min_authors_include_empty_magazines() {
    let conn = open_db_in_memory().unwrap();
    let fixture = Fixture::new(&conn);

    let author = fixture.author("Jane");
    let busy = fixture.magazine("Busy", "News");
    let empty = fixture.magazine("Empty", "News");
    fixture.articles(author, busy, 2);

    let all = fixture.magazines.magazines_with_min_authors(0).unwrap();
    assert_eq!(all.iter().map(|m| m.id).collect::<Vec<_>>(), vec![busy, empty]);

    let with_authors = fixture.magazines.magazines_with_min_authors(1).unwrap();
    assert_eq!(
        with_authors.iter().map(|m| m.id).collect::<Vec<_>>(),
        vec![busy]
    );
}

#[test]
fn article_counts_include_empty_magazines() {
    let conn = open_db_in_memory().unwrap();
    let fixture = Fixture::new(&conn);

    let author = fixture.author("Jane");
    let zine = fixture.magazine("Zine", "Art");
    let empty = fixture.magazine("Almanac", "Reference");
    fixture.articles(author, zine, 2);

    let counts = fixture.magazines.article_counts().unwrap();
    let summary = counts
        .iter()
        .map(|entry| (entry.magazine.id, entry.article_count))
        .collect::<Vec<_>>();
    assert_eq!(summary, vec![(empty, 0), (zine, 2)]);
}

#[test]
fn top_publisher_breaks_ties_by_lowest_id() {
    let conn = open_db_in_memory().unwrap();
    let fixture = Fixture::new(&conn);
    assert_eq!(fixture.magazines.top_publisher().unwrap(), None);

    let author = fixture.author("Jane");
    let first = fixture.magazine("First", "News");
    let second = fixture.magazine("Second", "News");
    fixture.articles(author, second, 2);
    fixture.articles(author, first, 2);

    let top = fixture.magazines.top_publisher().unwrap().unwrap();
    assert_eq!(top.id, first);
}

#[test]
fn delete_magazine_cascades_to_articles() {
    let conn = open_db_in_memory().unwrap();
    let fixture = Fixture::new(&conn);

    let author = fixture.author("Jane");
    let doomed = fixture.magazine("Doomed", "News");
    let kept = fixture.magazine("Kept", "News");
    fixture.articles(author, doomed, 3);
    fixture.articles(author, kept, 1);

    assert_eq!(fixture.magazines.delete_magazine(doomed).unwrap(), 3);
    let remaining = fixture.articles_repo.list_articles().unwrap();
    assert_eq!(remaining.len(), 1);
    assert!(remaining.iter().all(|article| article.magazine_id == kept));
    assert!(fixture.authors.get_author(author).unwrap().is_some());

    let err = fixture.magazines.delete_magazine(doomed).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { .. }));
}

#[test]
fn delete_magazine_inside_caller_transaction() {
    let mut conn = open_db_in_memory().unwrap();
    let tx = conn.transaction().unwrap();
    let fixture = Fixture::new(&tx);

    let author = fixture.author("Jane");
    let doomed = fixture.magazine("Doomed", "News");
    fixture.articles(author, doomed, 2);

    assert_eq!(fixture.magazines.delete_magazine(doomed).unwrap(), 2);
    let err = fixture.magazines.delete_magazine(doomed).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { .. }));
    assert!(!tx.is_autocommit());
    drop(fixture);
    tx.commit().unwrap();

    let fixture = Fixture::new(&conn);
    assert!(fixture.magazines.get_magazine(doomed).unwrap().is_none());
    assert!(fixture.articles_repo.list_articles().unwrap().is_empty());
}

struct Fixture<'conn> {
    authors: SqliteAuthorRepository<'conn>,
    magazines: SqliteMagazineRepository<'conn>,
    articles_repo: SqliteArticleRepository<'conn>,
}

impl<'conn> Fixture<'conn> {
    fn new(conn: &'conn Connection) -> Self {
        Self {
            authors: SqliteAuthorRepository::try_new(conn).unwrap(),
            magazines: SqliteMagazineRepository::try_new(conn).unwrap(),
            articles_repo: SqliteArticleRepository::try_new(conn).unwrap(),
        }
    }

    fn author(&self, name: &str) -> AuthorId {
        self.authors.create_author(&NewAuthor::new(name)).unwrap().id
    }

    fn magazine(&self, name: &str, category: &str) -> MagazineId {
        self.magazines
            .create_magazine(&NewMagazine::new(name, category))
            .unwrap()
            .id
    }

    fn articles(&self, author: AuthorId, magazine: MagazineId, count: usize) {
        for index in 0..count {
            self.articles_repo
                .create_article(&NewArticle::new(
                    format!("Article {author}-{magazine}-{index}"),
                    None,
                    author,
                    magazine,
                ))
                .unwrap();
        }
    }
}
