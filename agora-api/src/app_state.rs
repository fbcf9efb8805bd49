use std::sync::Arc;

use sqlx::PgPool;

use crate::domain::{
    classify::TextClassifier,
    search::{embedder::GeminiEmbedder, repository::PgPostRepository, SearchService},
};

/// Shared handles for request handlers.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: Arc<PgPool>,
    classifier: Arc<dyn TextClassifier>,
    search: Arc<SearchService<GeminiEmbedder, PgPostRepository>>,
}

impl AppState {
    pub fn new(
        db_pool: PgPool,
        classifier: Arc<dyn TextClassifier>,
        search: SearchService<GeminiEmbedder, PgPostRepository>,
    ) -> Self {
        Self {
            db_pool: Arc::new(db_pool),
            classifier,
            search: Arc::new(search),
        }
    }

    pub fn classifier(&self) -> &dyn TextClassifier {
        self.classifier.as_ref()
    }

    pub fn search_service(&self) -> &SearchService<GeminiEmbedder, PgPostRepository> {
        &self.search
    }
}
