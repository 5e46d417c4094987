//! Outcome confidence from retrieval strength and lexical risk signals.

use crate::RankedResult;

pub const RISK_TERMS: &[&str] = &[
    "blanket",
    "mandatory",
    "indefinite",
    "mass",
    "facial recognition",
    "biometric",
    "shutdown",
    "localization",
];

pub const SAFEGUARD_TERMS: &[&str] = &[
    "safeguard",
    "oversight",
    "exemption",
    "opt-out",
    "purpose limitation",
    "data minimization",
    "sunset",
];

pub const MIN_CONFIDENCE: f64 = 0.5;
pub const MAX_CONFIDENCE: f64 = 0.9;

const SIGNAL_SHIFT: f64 = 0.05;

/// Confidence in the suggested outcome, always in `[0.5, 0.9]`.
///
/// Centred on the mean score of the top two documents; an empty list
/// counts as a mean of zero. Risk and safeguard terms each shift the
/// estimate by 0.05 and are tested independently.
pub fn confidence(query: &str, top_documents: &[RankedResult]) -> f64 {
    let top = &top_documents[..top_documents.len().min(2)];
    let mean = if top.is_empty() {
        0.0
    } else {
        top.iter().map(|r| r.score).sum::<f64>() / top.len() as f64
    };

    let mut conf = 0.4 + 0.5 * (mean - 0.5);
    let lowered = query.to_lowercase();
    if RISK_TERMS.iter().any(|t| lowered.contains(t)) {
        conf += SIGNAL_SHIFT;
    }
    if SAFEGUARD_TERMS.iter().any(|t| lowered.contains(t)) {
        conf -= SIGNAL_SHIFT;
    }
    // NaN scores fall through to the floor.
    if conf.is_nan() {
        return MIN_CONFIDENCE;
    }
    conf.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}

/// Round to two decimals for presentation.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Document;

    fn scored(score: f64) -> RankedResult {
        RankedResult {
            score,
            document: Document {
                id: format!("doc-{score}"),
                title: "T".into(),
                year: 2020,
                court: "SC".into(),
                level_weight: 1.0,
                tags: vec![],
                text: String::new(),
            },
        }
    }

    #[test]
    fn empty_list_floors() {
        assert_eq!(confidence("anything", &[]), MIN_CONFIDENCE);
    }

    #[test]
    fn uses_mean_of_top_two_only() {
        // mean(1.3, 1.1) = 1.2 -> 0.4 + 0.35 = 0.75; third score ignored.
        let docs = vec![scored(1.3), scored(1.1), scored(0.0)];
        assert!((confidence("neutral query", &docs) - 0.75).abs() < 1e-9);
    }

    #[test]
    fn single_document_uses_its_score() {
        let docs = vec![scored(1.2)];
        assert!((confidence("neutral", &docs) - 0.75).abs() < 1e-9);
    }

    #[test]
    fn risk_and_safeguard_terms_shift() {
        let docs = vec![scored(1.2), scored(1.2)];
        assert!((confidence("blanket rule", &docs) - 0.80).abs() < 1e-9);
        assert!((confidence("with oversight", &docs) - 0.70).abs() < 1e-9);
        assert!((confidence("mandatory but with oversight", &docs) - 0.75).abs() < 1e-9);
    }

    #[test]
    fn always_within_bounds() {
        for score in [-5.0, 0.0, 0.4, 0.9, 1.5, 3.0, 100.0, f64::NAN] {
            for q in ["", "mass surveillance", "sunset clause", "biometric oversight"] {
                let c = confidence(q, &[scored(score), scored(score)]);
                assert!((MIN_CONFIDENCE..=MAX_CONFIDENCE).contains(&c), "{c} for {score}");
            }
        }
    }

    #[test]
    fn rounds_to_two_places() {
        assert_eq!(round2(0.756), 0.76);
        assert_eq!(round2(0.5), 0.5);
    }
}
