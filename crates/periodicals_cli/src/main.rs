//! `periodicals` command line entry point.
//!
//! # Responsibility
//! - Parse arguments, initialize logging and resolve the store location.
//! - Map each subcommand onto one core operation and print its result.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use periodicals_core::{
    build_catalog_report, default_log_level, init_logging, Article, AuthorService,
    CatalogReport, LoggingConfig, MagazineService, RepoError, SqliteArticleRepository,
    SqliteAuthorRepository, SqliteMagazineRepository, Store, StoreConfig,
};
use rusqlite::Connection;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// SQLite database file (default: $PERIODICALS_DB_PATH, then ./articles.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, global = true, env = "PERIODICALS_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rotated log files (default: stderr)
    #[arg(long, global = true, env = "PERIODICALS_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Drop and recreate every table. All data is lost
    Reset,
    /// Reset, then load the sample catalog
    Seed,
    /// Run the standard relationship queries
    Report {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one author with their articles, magazines and topics
    Author {
        /// Exact author name
        name: String,
    },
    /// Show one magazine with its articles and contributors
    Magazine {
        /// Magazine id
        id: i64,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&LoggingConfig {
        level: args
            .log_level
            .clone()
            .unwrap_or_else(|| default_log_level().to_string()),
        log_dir: args.log_dir.clone(),
    })
    .map_err(anyhow::Error::msg)
    .context("failed to initialize logging")?;

    let mut config = StoreConfig::from_env().context("invalid store configuration")?;
    if let Some(path) = args.db {
        config.path = path;
    }
    info!(
        "event=cli_start module=cli status=ok db={}",
        config.path.display()
    );
    let store = Store::new(config);

    match args.command {
        Commands::Reset => {
            store.reset().context("schema reset failed")?;
            println!("Schema reset: {}", store.config().path.display());
        }
        Commands::Seed => {
            let summary = store.seed().context("seeding failed")?;
            println!(
                "Seeded {} authors, {} magazines, {} articles",
                summary.authors, summary.magazines, summary.articles
            );
        }
        Commands::Report { json } => {
            let report = store
                .with_connection(|conn| {
                    build_catalog_report(
                        &SqliteAuthorRepository::try_new(conn)?,
                        &SqliteMagazineRepository::try_new(conn)?,
                        &SqliteArticleRepository::try_new(conn)?,
                    )
                })
                .context("report failed")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render_report(&report));
            }
        }
        Commands::Author { name } => {
            let output = store
                .with_connection(|conn| describe_author(conn, &name))
                .context("author lookup failed")?;
            match output {
                Some(text) => print!("{text}"),
                None => bail!("no author named `{}`", name.trim()),
            }
        }
        Commands::Magazine { id } => {
            let output = store
                .with_connection(|conn| describe_magazine(conn, id))
                .context("magazine lookup failed")?;
            match output {
                Some(text) => print!("{text}"),
                None => bail!("no magazine with id {id}"),
            }
        }
    }

    Ok(())
}

fn describe_author(conn: &Connection, name: &str) -> Result<Option<String>, RepoError> {
    let service = AuthorService::new(SqliteAuthorRepository::try_new(conn)?);
    let Some(author) = service.find_author_by_name(name)? else {
        return Ok(None);
    };

    let mut out = String::new();
    push_section(&mut out, "Author", [author.to_string()]);
    push_section(
        &mut out,
        "Articles",
        service.articles(&author)?.iter().map(Article::to_string),
    );
    push_section(
        &mut out,
        "Magazines",
        service.magazines(&author)?.iter().map(ToString::to_string),
    );
    push_section(&mut out, "Topic areas", service.topic_areas(&author)?);
    Ok(Some(out))
}

fn describe_magazine(conn: &Connection, id: i64) -> Result<Option<String>, RepoError> {
    let service = MagazineService::new(SqliteMagazineRepository::try_new(conn)?);
    let Some(magazine) = service.get_magazine(id)? else {
        return Ok(None);
    };

    let mut out = String::new();
    push_section(&mut out, "Magazine", [magazine.to_string()]);
    push_section(
        &mut out,
        "Articles",
        service.articles(&magazine)?.iter().map(Article::to_string),
    );
    push_section(
        &mut out,
        "Contributors",
        service.contributors(&magazine)?.iter().map(ToString::to_string),
    );
    push_section(
        &mut out,
        "Contributing authors",
        service
            .contributing_authors(&magazine)?
            .iter()
            .map(ToString::to_string),
    );
    Ok(Some(out))
}

fn render_report(report: &CatalogReport) -> String {
    let mut out = String::new();

    match &report.first_author {
        Some(section) => {
            let author = &section.author;
            push_section(
                &mut out,
                &format!("Articles by {} (id {})", author.name, author.id),
                section.articles.iter().map(ToString::to_string),
            );
            push_section(
                &mut out,
                &format!("Magazines {} contributed to", author.name),
                section.magazines.iter().map(ToString::to_string),
            );
            push_section(
                &mut out,
                &format!("Topic areas for {}", author.name),
                section.topic_areas.iter().cloned(),
            );
        }
        None => push_section(&mut out, "First author", std::iter::empty::<String>()),
    }

    push_section(
        &mut out,
        "Author with the most articles",
        report.most_prolific_author.iter().map(ToString::to_string),
    );

    match &report.first_magazine {
        Some(section) => {
            let name = &section.magazine.name;
            push_section(
                &mut out,
                &format!("Articles in {name}"),
                section.articles.iter().map(ToString::to_string),
            );
            push_section(
                &mut out,
                &format!("Contributors to {name}"),
                section.contributors.iter().map(ToString::to_string),
            );
            push_section(
                &mut out,
                &format!("Article titles in {name}"),
                section.article_titles.iter().cloned(),
            );
            push_section(
                &mut out,
                &format!("Contributing authors in {name}"),
                section.contributing_authors.iter().map(ToString::to_string),
            );
        }
        None => push_section(&mut out, "First magazine", std::iter::empty::<String>()),
    }

    push_section(
        &mut out,
        "Magazines with articles by at least 2 authors",
        report.shared_magazines.iter().map(ToString::to_string),
    );
    push_section(
        &mut out,
        "Articles per magazine",
        report
            .article_counts
            .iter()
            .map(|entry| format!("{}: {}", entry.magazine, entry.article_count)),
    );
    push_section(
        &mut out,
        "Top publisher",
        report.top_publisher.iter().map(ToString::to_string),
    );

    match &report.first_article {
        Some(details) => push_section(
            &mut out,
            &format!("Article {}", details.article.id),
            [
                details.article.to_string(),
                format!("by {}", details.author),
                format!("in {}", details.magazine),
            ],
        ),
        None => push_section(&mut out, "First article", std::iter::empty::<String>()),
    }

    out
}

fn push_section<I, S>(out: &mut String, title: &str, lines: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let _ = writeln!(out, "--- {title} ---");
    let mut empty = true;
    for line in lines {
        empty = false;
        let _ = writeln!(out, "- {}", line.as_ref());
    }
    if empty {
        let _ = writeln!(out, "(none)");
    }
    out.push('\n');
}
