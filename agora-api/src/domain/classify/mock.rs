//! Mock classifier for testing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use super::labels::{category, Category};
use super::{ClassifyError, Result, TextClassifier};

/// Mock classifier returning a fixed label index.
#[derive(Clone)]
pub struct MockClassifier {
    label_index: usize,
    call_count: Arc<AtomicUsize>,
}

impl MockClassifier {
    pub fn returning(label_index: usize) -> Self {
        Self {
            label_index,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextClassifier for MockClassifier {
    async fn classify(&self, _text: &str) -> Result<&'static Category> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        category(self.label_index).ok_or(ClassifyError::UnknownLabel(self.label_index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_configured_category() {
        let classifier = MockClassifier::returning(2);
        let result = classifier.classify("anything").await.unwrap();
        assert_eq!(result.code, "cs.AI");
        assert_eq!(classifier.call_count(), 1);
    }

    #[tokio::test]
    async fn out_of_range_index_errors() {
        let classifier = MockClassifier::returning(99);
        assert!(classifier.classify("anything").await.is_err());
    }
}
