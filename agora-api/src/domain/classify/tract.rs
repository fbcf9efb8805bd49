//! Tract-based local classifier.
//!
//! Pure-Rust path: loads the ONNX graph with tract-onnx, tokenizes with the
//! tokenizers crate, runs inference in spawn_blocking. No ONNX Runtime or
//! system deps.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tract_onnx::prelude::*;

use super::labels::{category, Category, CATEGORY_COUNT};
use super::{ClassifyError, Result, TextClassifier};

const MAX_TOKENS: usize = 512;

/// Sequence classifier over a local ONNX export.
///
/// Expects a directory containing `model.onnx` and `tokenizer.json`. The
/// model graph and tokenizer are loaded once; `classify` is cheap to call
/// concurrently.
#[derive(Clone)]
pub struct TractClassifier {
    inner: Arc<Inner>,
}

struct Inner {
    tokenizer: tokenizers::Tokenizer,
    model: TypedSimplePlan<TypedModel>,
}

impl std::fmt::Debug for TractClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TractClassifier").finish_non_exhaustive()
    }
}

impl TractClassifier {
    pub fn load(model_dir: impl AsRef<Path>) -> Result<Self> {
        let model_dir = model_dir.as_ref();
        let onnx_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");

        let tokenizer = tokenizers::Tokenizer::from_file(&tokenizer_path).map_err(|e| {
            ClassifyError::ModelLoad(format!("{}: {}", tokenizer_path.display(), e))
        })?;

        let model = tract_onnx::onnx()
            .model_for_path(&onnx_path)
            .map_err(|e| ClassifyError::ModelLoad(format!("{}: {}", onnx_path.display(), e)))?
            .into_optimized()
            .map_err(|e| ClassifyError::ModelLoad(format!("optimize: {}", e)))?
            .into_runnable()
            .map_err(|e| ClassifyError::ModelLoad(format!("plan: {}", e)))?;

        Ok(Self {
            inner: Arc::new(Inner { tokenizer, model }),
        })
    }
}

#[async_trait]
impl TextClassifier for TractClassifier {
    async fn classify(&self, text: &str) -> Result<&'static Category> {
        let inner = self.inner.clone();
        let text = text.to_owned();

        tokio::task::spawn_blocking(move || inner.classify_blocking(&text))
            .await
            .map_err(|e| ClassifyError::Inference(e.to_string()))?
    }
}

impl Inner {
    fn classify_blocking(&self, text: &str) -> Result<&'static Category> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| ClassifyError::Tokenize(e.to_string()))?;

        let ids = encoding.get_ids();
        let len = ids.len().min(MAX_TOKENS).max(1);

        let mut input_ids = vec![0i64; len];
        for (j, &id) in ids.iter().take(len).enumerate() {
            input_ids[j] = id as i64;
        }
        let attention_mask = vec![1i64; len];
        let token_type_ids = vec![0i64; len];

        let to_tensor = |data: Vec<i64>| -> Result<Tensor> {
            ndarray::Array2::from_shape_vec((1, len), data)
                .map(Tensor::from)
                .map_err(|e| ClassifyError::Inference(format!("input shape: {}", e)))
        };

        // BERT exports take token_type_ids as a third input; some graphs
        // fold it away, so feed only as many inputs as the plan declares.
        let mut inputs: TVec<TValue> = tvec!(
            to_tensor(input_ids)?.into(),
            to_tensor(attention_mask)?.into(),
        );
        if self.model.model().inputs.len() > 2 {
            inputs.push(to_tensor(token_type_ids)?.into());
        }

        let outputs = self
            .model
            .run(inputs)
            .map_err(|e| ClassifyError::Inference(e.to_string()))?;

        let logits = outputs
            .first()
            .ok_or_else(|| ClassifyError::Inference("no output tensor".into()))?
            .to_array_view::<f32>()
            .map_err(|e| ClassifyError::Inference(e.to_string()))?;

        let scores: Vec<f32> = logits.iter().copied().collect();
        if scores.len() != CATEGORY_COUNT {
            return Err(ClassifyError::Inference(format!(
                "expected {} logits, got {}",
                CATEGORY_COUNT,
                scores.len()
            )));
        }

        let best = scores
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(i, _)| i)
            .ok_or_else(|| ClassifyError::Inference("empty logits".into()))?;

        category(best).ok_or(ClassifyError::UnknownLabel(best))
    }
}
