//! arXiv subject classification of free text.
//!
//! A fine-tuned sequence-classification model (exported to ONNX) maps a
//! piece of text to one of eleven arXiv categories. Inference runs locally
//! through tract, so the server needs no model-serving sidecar.

mod labels;
#[cfg(test)]
mod mock;
mod tract;

use async_trait::async_trait;

pub use labels::{category, Category, CATEGORIES, CATEGORY_COUNT};
#[cfg(test)]
pub use mock::MockClassifier;
pub use self::tract::TractClassifier;

#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    #[error("Failed to load model: {0}")]
    ModelLoad(String),

    #[error("Tokenization failed: {0}")]
    Tokenize(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Model produced label index {0}, which has no category")]
    UnknownLabel(usize),
}

pub type Result<T> = std::result::Result<T, ClassifyError>;

/// Text classification seam, so handlers can be exercised without a model
/// on disk.
#[async_trait]
pub trait TextClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<&'static Category>;
}
