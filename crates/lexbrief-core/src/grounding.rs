//! Evidence grounding: which ranked precedents support which claims.
//!
//! Support is a shared-vocabulary heuristic, not entailment. A document
//! supports a claim when both mention at least one [`KEY_TERMS`] entry,
//! even if they mention different ones.

use crate::{Evidence, GroundingRecord, RankedResult};

/// Shared vocabulary for claim/document support.
pub const KEY_TERMS: &[&str] = &[
    "privacy",
    "proportionality",
    "necessity",
    "safeguards",
    "biometric",
    "article 21",
];

/// Fixed claims checked on every request.
pub const PROBE_CLAIMS: &[&str] = &[
    "Privacy is a fundamental right under Article 21.",
    "Any limitation must satisfy proportionality including necessity.",
    "Blanket biometric mandates are intrusive and require robust safeguards.",
    "Legality requires clear statutory backing and oversight.",
];

/// Width of a snippet window in bytes, centred on the matched term.
pub const SNIPPET_WINDOW: usize = 140;

pub const MAX_EVIDENCE: usize = 3;

const ELLIPSIS: &str = "…";

/// Ground each claim against the ranked documents.
///
/// One record per claim, in input order. Citations are de-duplicated and
/// sorted; evidence keeps ranked-document order and is capped at
/// [`MAX_EVIDENCE`].
pub fn ground<S: AsRef<str>>(claims: &[S], documents: &[RankedResult]) -> Vec<GroundingRecord> {
    claims
        .iter()
        .map(|claim| ground_claim(claim.as_ref(), documents))
        .collect()
}

fn ground_claim(claim: &str, documents: &[RankedResult]) -> GroundingRecord {
    let mut citations = Vec::new();
    let mut evidence = Vec::new();

    if mentions_key_term(claim) {
        for ranked in documents {
            let doc = &ranked.document;
            if !mentions_key_term(&doc.text) {
                continue;
            }
            let source = doc.citation();
            if evidence.len() < MAX_EVIDENCE
                && let Some(snippet) = extract_snippet(&doc.text, KEY_TERMS, SNIPPET_WINDOW)
            {
                evidence.push(Evidence {
                    source: source.clone(),
                    snippet,
                });
            }
            citations.push(source);
        }
    }

    citations.sort();
    citations.dedup();

    GroundingRecord {
        claim: claim.to_string(),
        citations,
        evidence,
    }
}

fn mentions_key_term(text: &str) -> bool {
    let lowered = text.to_lowercase();
    KEY_TERMS.iter().any(|k| lowered.contains(k))
}

/// Extract a window of `window` bytes around the first key term found.
///
/// Terms are tried in list order; the first one present anchors the
/// window. The window is clipped to the text, snapped outward to UTF-8
/// boundaries, trimmed, and marked with an ellipsis on each side that was
/// cut. Returns `None` when no term occurs.
pub fn extract_snippet(text: &str, key_terms: &[&str], window: usize) -> Option<String> {
    // ASCII lowering keeps byte offsets aligned with `text`.
    let lowered = text.to_ascii_lowercase();
    let at = key_terms.iter().find_map(|k| lowered.find(k))?;

    let half = window / 2;
    let mut start = at.saturating_sub(half);
    let mut end = (at + half).min(text.len());
    while !text.is_char_boundary(start) {
        start -= 1;
    }
    while !text.is_char_boundary(end) {
        end += 1;
    }

    let mut snippet = String::with_capacity(end - start + 2 * ELLIPSIS.len());
    if start > 0 {
        snippet.push_str(ELLIPSIS);
    }
    snippet.push_str(text[start..end].trim());
    if end < text.len() {
        snippet.push_str(ELLIPSIS);
    }
    Some(snippet)
}
