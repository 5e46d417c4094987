//! In-memory embedding index over a fixed document set.

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Instant;

use lexbrief_core::Document;
use tracing::info;

use crate::encoder::{Encoder, normalize};

const ENCODE_BATCH_SIZE: usize = 64;

/// A search hit: position in the corpus plus cosine similarity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub index: usize,
    pub similarity: f32,
}

/// Document vectors computed once at construction.
///
/// Read-only afterwards, so one index can serve concurrent requests.
pub struct EmbeddingIndex {
    documents: Vec<Document>,
    vectors: Vec<Vec<f32>>,
    encoder: Arc<dyn Encoder>,
}

impl EmbeddingIndex {
    /// Encode every document's text and build the index.
    pub fn build(documents: Vec<Document>, encoder: Arc<dyn Encoder>) -> anyhow::Result<Self> {
        let start = Instant::now();
        let mut vectors = Vec::with_capacity(documents.len());
        let texts: Vec<&str> = documents.iter().map(|d| d.text.as_str()).collect();
        for chunk in texts.chunks(ENCODE_BATCH_SIZE) {
            vectors.extend(encoder.encode(chunk)?);
        }
        anyhow::ensure!(
            vectors.len() == documents.len(),
            "encoder returned {} vectors for {} documents",
            vectors.len(),
            documents.len()
        );
        for v in &mut vectors {
            anyhow::ensure!(
                v.len() == encoder.dim(),
                "encoder returned a {}-dim vector, expected {}",
                v.len(),
                encoder.dim()
            );
            normalize(v);
        }

        info!(
            documents = documents.len(),
            dim = encoder.dim(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "built embedding index"
        );
        Ok(Self {
            documents,
            vectors,
            encoder,
        })
    }

    /// Encode query texts with the index's encoder.
    pub fn encode(&self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
        let mut vectors = self.encoder.encode(texts)?;
        for v in &mut vectors {
            normalize(v);
        }
        Ok(vectors)
    }

    /// The `k` most similar documents to a unit-length query vector.
    ///
    /// Similarity is the dot product against normalised document vectors.
    /// Ordered by similarity descending, ties by corpus order. `k` is
    /// clamped to the corpus size.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<Hit> {
        let mut hits: Vec<Hit> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(index, v)| Hit {
                index,
                similarity: dot(query, v),
            })
            .collect();
        // Stable sort keeps corpus order among equal similarities.
        hits.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
        });
        hits.truncate(k.min(self.documents.len()));
        hits
    }

    pub fn document(&self, index: usize) -> Option<&Document> {
        self.documents.get(index)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
