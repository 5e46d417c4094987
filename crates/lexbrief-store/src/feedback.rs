//! Feedback state and the store abstraction the ranker reads boosts from.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::StoreError;

/// Upper bound for style counters.
pub const MAX_STYLE: u8 = 2;
/// Symmetric bound for per-document boosts.
pub const MAX_BOOST: f64 = 0.2;
/// Boost change per document per feedback event.
pub const BOOST_STEP: f64 = 0.02;

/// Persisted adaptive state.
///
/// Style counters saturate in `[0, 2]`; boosts stay in `[-0.2, 0.2]`.
/// Both bounds are re-applied on every load and every update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackState {
    #[serde(default)]
    pub style_bullets: u8,
    #[serde(default = "one")]
    pub style_citations: u8,
    #[serde(default = "one")]
    pub emphasis_proportionality: u8,
    #[serde(default)]
    pub doc_boosts: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub last_notes: String,
}

fn one() -> u8 {
    1
}

impl Default for FeedbackState {
    fn default() -> Self {
        Self {
            style_bullets: 0,
            style_citations: 1,
            emphasis_proportionality: 1,
            doc_boosts: BTreeMap::new(),
            last_notes: String::new(),
        }
    }
}

/// Read-only projection of the style counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StyleFlags {
    pub style_bullets: u8,
    pub style_citations: u8,
    pub emphasis_proportionality: u8,
}

impl Default for StyleFlags {
    fn default() -> Self {
        FeedbackState::default().style_flags()
    }
}

impl FeedbackState {
    pub fn style_flags(&self) -> StyleFlags {
        StyleFlags {
            style_bullets: self.style_bullets,
            style_citations: self.style_citations,
            emphasis_proportionality: self.emphasis_proportionality,
        }
    }

    /// Boost for a document; zero when it has never received feedback.
    pub fn boost(&self, doc_id: &str) -> f64 {
        self.doc_boosts.get(doc_id).copied().unwrap_or(0.0)
    }

    /// Apply one feedback event in place.
    ///
    /// Thumbs up strengthens citation and proportionality emphasis; thumbs
    /// down strengthens bullets. Every listed document moves by
    /// [`BOOST_STEP`] in the event's direction, clipped and rounded to four
    /// decimals. Non-empty notes replace the previous ones.
    pub fn apply(&mut self, thumbs_up: bool, used_doc_ids: &[String], notes: &str) {
        if thumbs_up {
            self.style_citations = self.style_citations.saturating_add(1).min(MAX_STYLE);
            self.emphasis_proportionality = self
                .emphasis_proportionality
                .saturating_add(1)
                .min(MAX_STYLE);
        } else {
            self.style_bullets = self.style_bullets.saturating_add(1).min(MAX_STYLE);
        }

        let delta = if thumbs_up { BOOST_STEP } else { -BOOST_STEP };
        for id in used_doc_ids {
            let next = clip_boost(self.boost(id) + delta);
            self.doc_boosts.insert(id.clone(), round4(next));
        }

        if !notes.is_empty() {
            self.last_notes = notes.to_string();
        }
        self.sanitize();
    }

    /// Re-establish the bounds on state read from outside.
    pub fn sanitize(&mut self) {
        self.style_bullets = self.style_bullets.min(MAX_STYLE);
        self.style_citations = self.style_citations.min(MAX_STYLE);
        self.emphasis_proportionality = self.emphasis_proportionality.min(MAX_STYLE);
        self.doc_boosts.retain(|id, boost| {
            if boost.is_finite() {
                *boost = clip_boost(*boost);
                true
            } else {
                warn!(doc_id = %id, "dropping non-finite boost");
                false
            }
        });
    }
}

fn clip_boost(value: f64) -> f64 {
    value.clamp(-MAX_BOOST, MAX_BOOST)
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Durable home of the [`FeedbackState`].
///
/// `load` never fails: implementations substitute the default state on any
/// error. `record` is a full read-modify-write with no locking, so
/// concurrent writers can lose updates (last writer wins).
pub trait FeedbackStore: Send + Sync {
    /// Current state, or defaults if it cannot be read.
    fn load(&self) -> FeedbackState;

    /// Persist the full state.
    fn save(&self, state: &FeedbackState) -> Result<(), StoreError>;

    /// Apply one feedback event and persist it.
    ///
    /// Persistence failures are logged and swallowed; the updated state is
    /// returned either way.
    fn record(&self, thumbs_up: bool, used_doc_ids: &[String], notes: &str) -> FeedbackState {
        let mut state = self.load();
        state.apply(thumbs_up, used_doc_ids, notes);
        match self.save(&state) {
            Ok(()) => debug!(thumbs_up, docs = used_doc_ids.len(), "feedback recorded"),
            Err(e) => warn!(error = %e, "feedback not persisted"),
        }
        state
    }

    fn style_flags(&self) -> StyleFlags {
        self.load().style_flags()
    }

    fn doc_boosts(&self) -> BTreeMap<String, f64> {
        self.load().doc_boosts
    }
}
