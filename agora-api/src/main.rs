use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use agora_api::{
    config::read_config,
    domain::{
        classify::TractClassifier,
        search::{embedder::GeminiEmbedder, repository::PgPostRepository, SearchConfig, SearchService},
    },
    router, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .init();

    let settings = read_config().context("failed to read configuration")?;

    let db_pool = PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect_lazy_with(settings.database.with_db());

    let classifier = TractClassifier::load(&settings.classifier.model_dir)
        .context("failed to load the classification model")?;

    let embedder = GeminiEmbedder::for_queries().context("failed to create the embedder")?;
    let repository = PgPostRepository::new(db_pool.clone());
    let search = SearchService::new(
        embedder,
        repository,
        SearchConfig {
            result_limit: settings.search.result_limit,
        },
    );

    let app_state = AppState::new(db_pool, Arc::new(classifier), search);
    let app = router::create(app_state);

    let address = format!(
        "{}:{}",
        settings.application.host, settings.application.port
    );
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

    tracing::info!(%address, "serving");
    axum::serve(listener, app).await?;

    Ok(())
}
