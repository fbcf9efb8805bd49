//! Search service combining query embedding and nearest-neighbor lookup.

use super::traits::{Embedder, PostRepository, Result};
use super::types::PostMatch;

/// Configuration for the search service.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Number of rows returned per query.
    pub result_limit: i64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { result_limit: 10 }
    }
}

/// Embeds the query text and returns the nearest stored posts.
///
/// # Type Parameters
///
/// * `E` - Embedder implementation for query embeddings
/// * `R` - PostRepository implementation for the lookup
pub struct SearchService<E, R>
where
    E: Embedder,
    R: PostRepository,
{
    embedder: E,
    repository: R,
    config: SearchConfig,
}

impl<E, R> SearchService<E, R>
where
    E: Embedder,
    R: PostRepository,
{
    pub fn new(embedder: E, repository: R, config: SearchConfig) -> Self {
        Self {
            embedder,
            repository,
            config,
        }
    }

    pub fn with_defaults(embedder: E, repository: R) -> Self {
        Self::new(embedder, repository, SearchConfig::default())
    }

    /// Look up the posts nearest to a natural-language query.
    pub async fn search(&self, query: &str) -> Result<Vec<PostMatch>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(vec![]);
        }

        let embedding = self.embedder.embed(query).await?;

        self.repository
            .similar_posts(&embedding, self.config.result_limit)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::search::embedder::MockEmbedder;
    use crate::domain::search::repository::MockPostRepository;
    use crate::domain::search::types::NewPost;

    async fn seed_post(repo: &MockPostRepository, post_id: i32, title: &str, vector: Vec<f32>) {
        repo.insert_post(&NewPost {
            semester_id: 1,
            post_id,
            title: title.to_string(),
            content: "content".to_string(),
            instructor_answer: String::new(),
            student_answer: String::new(),
        })
        .await
        .unwrap();
        repo.insert_embeddings(1, post_id, &[vector]).await.unwrap();
    }

    #[tokio::test]
    async fn empty_query_returns_empty() {
        let service = SearchService::with_defaults(
            MockEmbedder::default(),
            MockPostRepository::new(),
        );

        assert!(service.search("").await.unwrap().is_empty());
        assert!(service.search("   ").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_query_skips_embedding() {
        let embedder = MockEmbedder::default();
        let service =
            SearchService::with_defaults(embedder.clone(), MockPostRepository::new());

        service.search("  ").await.unwrap();
        assert_eq!(embedder.call_count(), 0);
    }

    #[tokio::test]
    async fn returns_nearest_posts_first() {
        let repo = MockPostRepository::new();
        seed_post(&repo, 1, "gradient descent", vec![1.0, 0.0]).await;
        seed_post(&repo, 2, "group theory", vec![0.0, 1.0]).await;

        let embedder = MockEmbedder::returning(vec![0.9, 0.1]);
        let service = SearchService::with_defaults(embedder, repo);

        let matches = service.search("how does gradient descent work").await.unwrap();
        assert_eq!(matches[0].post_id, 1);
    }

    #[tokio::test]
    async fn applies_result_limit() {
        let repo = MockPostRepository::new();
        for post_id in 1..=5 {
            seed_post(&repo, post_id, "post", vec![1.0, 0.0]).await;
        }

        let service = SearchService::new(
            MockEmbedder::returning(vec![1.0, 0.0]),
            repo,
            SearchConfig { result_limit: 2 },
        );

        let matches = service.search("anything").await.unwrap();
        assert_eq!(matches.len(), 2);
    }

    #[tokio::test]
    async fn embeds_query_once() {
        let embedder = MockEmbedder::default();
        let service =
            SearchService::with_defaults(embedder.clone(), MockPostRepository::new());

        service.search("neural networks").await.unwrap();
        assert_eq!(embedder.call_count(), 1);
    }
}
