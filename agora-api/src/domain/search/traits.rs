//! Trait definitions for the search domain.

use async_trait::async_trait;

use super::types::{NewPost, PostMatch};

/// Error type for search and ingestion operations.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Forum fetch error: {0}")]
    Source(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for SearchError {
    fn from(e: sqlx::Error) -> Self {
        SearchError::Database(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;

/// Text embedding generation.
///
/// Abstracts the embedding provider so the service and the scraper can be
/// tested with canned vectors.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts.
    ///
    /// The default implementation calls `embed` sequentially; providers
    /// with a batch endpoint should override it.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// Embedding dimensions produced by this embedder.
    fn dimensions(&self) -> usize;
}

/// Persistence for semesters, posts and their embeddings.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Posts nearest to the given embedding, best match first.
    ///
    /// One row is produced per matching stored embedding, so a post with
    /// several close sentences can appear more than once with different
    /// similarity scores.
    async fn similar_posts(&self, embedding: &[f32], limit: i64) -> Result<Vec<PostMatch>>;

    /// Semester id for a forum class code, if already recorded.
    async fn semester_id_by_code(&self, code: &str) -> Result<Option<i32>>;

    /// Record a semester and return its id.
    async fn insert_semester(&self, name: &str, code: &str) -> Result<i32>;

    async fn insert_post(&self, post: &NewPost) -> Result<()>;

    /// Store all embeddings of one post in a single transaction.
    async fn insert_embeddings(
        &self,
        semester_id: i32,
        post_id: i32,
        embeddings: &[Vec<f32>],
    ) -> Result<()>;
}
