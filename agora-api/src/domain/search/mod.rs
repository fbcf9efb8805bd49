//! Semantic lookup over scraped forum posts.
//!
//! Query text is embedded and compared against per-sentence post embeddings
//! stored in PostgreSQL; pgvector's `<=>` cosine-distance operator does the
//! ranking. The module is built around trait seams so the service and the
//! scraper can be exercised without a network or a database:
//!
//! - [`Embedder`](traits::Embedder) - embedding generation (Gemini, mocks)
//! - [`PostRepository`](traits::PostRepository) - storage (PostgreSQL, mocks)

mod service;
mod traits;
mod types;

pub mod embedder;
pub mod repository;

pub use service::{SearchConfig, SearchService};
pub use traits::{Embedder, PostRepository, Result, SearchError};
pub use types::{NewPost, PostMatch};
