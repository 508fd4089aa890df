//! Real sentence-embedding `EmbeddingModel`, built on `fastembed` (ONNX
//! runtime, local inference, no API key). Gated behind the
//! `semantic-fastembed` feature since it pulls in a model download on
//! first use.

use std::sync::Mutex;

use fastembed::{InitOptions, TextEmbedding};

use super::{Embedding, EmbeddingModel};
use crate::error::{EngineError, EngineResult};

pub struct FastEmbedModel {
    inner: Mutex<TextEmbedding>,
}

impl FastEmbedModel {
    pub fn new() -> EngineResult<Self> {
        let inner = TextEmbedding::try_new(InitOptions::default())
            .map_err(|e| EngineError::Config(format!("failed to initialize embedding model: {e}")))?;
        Ok(Self {
            inner: Mutex::new(inner),
        })
    }
}

impl EmbeddingModel for FastEmbedModel {
    fn embed(&self, text: &str) -> Embedding {
        let mut model = self.inner.lock().unwrap();
        match model.embed(vec![text], None) {
            Ok(mut vectors) if !vectors.is_empty() => Embedding(vectors.remove(0)),
            _ => Embedding(Vec::new()),
        }
    }
}
