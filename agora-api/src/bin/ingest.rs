//! One-off scraper: pull forum posts, embed them, load the database.
//!
//! Controlled entirely by configuration; see `config/base.yaml` for the
//! scraper section. With `initialize_database` and `create_tables` off it
//! only appends semesters that are not in the database yet.

use anyhow::Context;
use piazza::{Credentials, PiazzaClient};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use agora_api::config::read_config;
use agora_api::domain::ingest::{
    create_tables, recreate_database, PiazzaPostSource, PostScraper, ScrapeConfig,
};
use agora_api::domain::search::{embedder::GeminiEmbedder, repository::PgPostRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .init();

    let settings = read_config().context("failed to read configuration")?;

    if settings.scraper.initialize_database {
        recreate_database(&settings.database).await?;
    }

    let db_pool = PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect_with(settings.database.with_db())
        .await
        .context("failed to connect to the database")?;

    if settings.scraper.initialize_database || settings.scraper.create_tables {
        create_tables(&db_pool).await?;
    }

    let credentials = Credentials::from_env().context("missing Piazza credentials")?;
    let client = PiazzaClient::new().context("failed to build the Piazza client")?;
    client
        .login(&credentials)
        .await
        .context("Piazza login failed")?;

    let source = PiazzaPostSource::new(client, credentials);
    let embedder = GeminiEmbedder::for_documents().context("failed to create the embedder")?;
    let repository = PgPostRepository::new(db_pool);

    let scraper = PostScraper::new(
        embedder,
        repository,
        source,
        ScrapeConfig::from(&settings.scraper),
    );

    let stats = scraper.run().await?;

    tracing::info!(
        semesters = stats.semesters_added,
        posts = stats.posts_ingested,
        skipped = stats.posts_skipped,
        embeddings = stats.embeddings_written,
        errors = stats.errors,
        "ingest finished"
    );

    Ok(())
}
