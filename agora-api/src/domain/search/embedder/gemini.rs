//! Gemini embedder implementation using the genai crate.

use async_trait::async_trait;
use genai::embed::EmbedOptions;

use crate::domain::search::traits::{Embedder, Result, SearchError};

pub const GEMINI_MODEL: &str = "gemini-embedding-001";
pub const GEMINI_DIMENSIONS: usize = 1536;

/// Embedder backed by Google's Gemini API via the `genai` crate.
///
/// The genai client reads `GEMINI_API_KEY` from the environment. Queries
/// and stored documents use different task types, so the server and the
/// scraper each construct their own instance.
#[derive(Clone)]
pub struct GeminiEmbedder {
    client: genai::Client,
    model: String,
    options: EmbedOptions,
}

impl GeminiEmbedder {
    /// Embedder tuned for short search queries.
    pub fn for_queries() -> Result<Self> {
        Self::with_task_type("RETRIEVAL_QUERY")
    }

    /// Embedder tuned for post content being indexed.
    pub fn for_documents() -> Result<Self> {
        Self::with_task_type("RETRIEVAL_DOCUMENT")
    }

    fn with_task_type(task_type: &str) -> Result<Self> {
        if std::env::var("GEMINI_API_KEY").is_err() {
            return Err(SearchError::Config("GEMINI_API_KEY is not set".into()));
        }

        let client = genai::Client::default();
        let options = EmbedOptions::new().with_embedding_type(task_type);

        Ok(Self {
            client,
            model: GEMINI_MODEL.to_string(),
            options,
        })
    }
}

#[async_trait]
impl Embedder for GeminiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if text.is_empty() {
            return Ok(vec![0.0; GEMINI_DIMENSIONS]);
        }

        let response = self
            .client
            .embed(&self.model, text, Some(&self.options))
            .await
            .map_err(|e| SearchError::Embedding(e.to_string()))?;

        let embedding = response
            .first_embedding()
            .ok_or_else(|| SearchError::Embedding("No embedding in response".into()))?;

        Ok(embedding.vector().to_vec())
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        // Empty strings are not sent to the API; they keep a zero vector.
        let mut results = vec![vec![0.0f32; GEMINI_DIMENSIONS]; texts.len()];
        let non_empty: Vec<(usize, String)> = texts
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.is_empty())
            .map(|(i, t)| (i, t.to_string()))
            .collect();

        if non_empty.is_empty() {
            return Ok(results);
        }

        let batch_texts: Vec<String> = non_empty.iter().map(|(_, t)| t.clone()).collect();

        let response = self
            .client
            .embed_batch(&self.model, batch_texts, Some(&self.options))
            .await
            .map_err(|e| SearchError::Embedding(e.to_string()))?;

        for (batch_idx, (original_idx, _)) in non_empty.iter().enumerate() {
            if let Some(embedding) = response.embeddings.get(batch_idx) {
                results[*original_idx] = embedding.vector().to_vec();
            }
        }

        Ok(results)
    }

    fn dimensions(&self) -> usize {
        GEMINI_DIMENSIONS
    }
}
