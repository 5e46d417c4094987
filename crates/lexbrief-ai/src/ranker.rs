//! Feedback-adaptive precedent ranking.
//!
//! Each document's score blends semantic similarity, recency, court
//! authority and issue-tag overlap, then adds the document's feedback
//! boost:
//!
//! ```text
//! recency = max(0, 1 - max(0, current_year - year) / 20)
//! overlap = |tags ∩ issues| / |issues|        (0 when no issues)
//! score   = 0.55·sim + 0.15·recency + 0.20·level_weight + 0.10·overlap + boost
//! ```
//!
//! The boost is added as stored; its bound is enforced by the store.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Datelike;
use lexbrief_core::{Document, Issue, RankedResult};
use lexbrief_store::FeedbackStore;
use tracing::debug;

use crate::index::EmbeddingIndex;

/// Years over which recency decays linearly to zero.
pub const RECENCY_HORIZON_YEARS: f64 = 20.0;

/// Blend weights for the base score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub similarity: f64,
    pub recency: f64,
    pub authority: f64,
    pub overlap: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            similarity: 0.55,
            recency: 0.15,
            authority: 0.20,
            overlap: 0.10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RankerConfig {
    /// Reference year for recency decay.
    pub current_year: i32,
    pub weights: ScoreWeights,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            current_year: chrono::Utc::now().year(),
            weights: ScoreWeights::default(),
        }
    }
}

/// Linear recency decay: 1 for this year (or later), 0 after 20 years.
pub fn recency(year: i32, current_year: i32) -> f64 {
    let age = (i64::from(current_year) - i64::from(year)).max(0) as f64;
    (1.0 - age / RECENCY_HORIZON_YEARS).max(0.0)
}

/// Share of query issues that the document is tagged with.
pub fn overlap(tags: &[String], issues: &[Issue]) -> f64 {
    if issues.is_empty() {
        return 0.0;
    }
    let matched = issues
        .iter()
        .filter(|issue| tags.iter().any(|t| t == issue.as_str()))
        .count();
    matched as f64 / issues.len() as f64
}

/// Ranks the corpus for a query using the embedding index, the issue
/// tagger and the feedback boosts.
pub struct PrecedentRanker {
    index: EmbeddingIndex,
    feedback: Arc<dyn FeedbackStore>,
    config: RankerConfig,
}

impl PrecedentRanker {
    pub fn new(
        index: EmbeddingIndex,
        feedback: Arc<dyn FeedbackStore>,
        config: RankerConfig,
    ) -> Self {
        Self {
            index,
            feedback,
            config,
        }
    }

    /// The store boosts are read from.
    pub fn feedback(&self) -> &Arc<dyn FeedbackStore> {
        &self.feedback
    }

    /// Base score without the feedback boost.
    pub fn base_score(&self, similarity: f64, doc: &Document, issues: &[Issue]) -> f64 {
        let w = &self.config.weights;
        w.similarity * similarity
            + w.recency * recency(doc.year, self.config.current_year)
            + w.authority * doc.level_weight
            + w.overlap * overlap(&doc.tags, issues)
    }

    /// Top `k` documents for `query`, highest score first.
    ///
    /// Every document is scored; the result holds `min(k, corpus size)`
    /// entries. Equal scores fall back to higher similarity, then corpus
    /// order, so repeated calls with unchanged feedback are identical.
    pub fn rank(&self, query: &str, k: usize) -> anyhow::Result<Vec<RankedResult>> {
        let issues = lexbrief_core::tag(query);
        let query_vec = self
            .index
            .encode(&[query])?
            .pop()
            .ok_or_else(|| anyhow::anyhow!("encoder returned no query vector"))?;
        let boosts: BTreeMap<String, f64> = self.feedback.doc_boosts();

        let mut scored: Vec<(f64, f32, usize)> = self
            .index
            .search(&query_vec, self.index.len())
            .into_iter()
            .filter_map(|hit| {
                let doc = self.index.document(hit.index)?;
                let boost = boosts.get(&doc.id).copied().unwrap_or(0.0);
                let score = self.base_score(hit.similarity as f64, doc, &issues) + boost;
                Some((score, hit.similarity, hit.index))
            })
            .collect();

        scored.sort_by(|a, b| {
            b.0.total_cmp(&a.0)
                .then_with(|| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal))
                .then_with(|| a.2.cmp(&b.2))
        });
        scored.truncate(k);

        debug!(
            issues = ?issues.iter().map(Issue::as_str).collect::<Vec<_>>(),
            returned = scored.len(),
            "ranked precedents"
        );

        Ok(scored
            .into_iter()
            .filter_map(|(score, _, index)| {
                self.index.document(index).map(|doc| RankedResult {
                    score,
                    document: doc.clone(),
                })
            })
            .collect())
    }
}
