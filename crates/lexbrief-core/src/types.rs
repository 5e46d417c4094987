//! Shared domain types for the precedent pipeline.

use serde::{Deserialize, Serialize};

/// A precedent loaded from the corpus.
///
/// Immutable after load; the ranker and embedding index own the full set
/// for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub year: i32,
    pub court: String,
    /// Authority of the issuing body; higher courts carry more weight.
    pub level_weight: f64,
    /// Issue tags drawn from the tagger vocabulary (see [`crate::Issue`]).
    pub tags: Vec<String>,
    /// Full passage, used for embedding and lexical grounding.
    pub text: String,
}

impl Document {
    /// Citation form used in grounding output and prompts: `"title (year)"`.
    pub fn citation(&self) -> String {
        format!("{} ({})", self.title, self.year)
    }
}

/// A case submitted for drafting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseFile {
    pub title: String,
    pub facts: String,
    /// Informational prompts shown to the user; not consumed by scoring.
    #[serde(default)]
    pub issues_hint: Vec<String>,
}

impl CaseFile {
    /// Retrieval query text: `"{title}. {facts}"`.
    pub fn query(&self) -> String {
        format!("{}. {}", self.title, self.facts)
    }
}

/// A document with its combined relevance score for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    pub score: f64,
    #[serde(flatten)]
    pub document: Document,
}

/// A supporting snippet taken from one precedent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    /// Citation of the source document, `"title (year)"`.
    pub source: String,
    pub snippet: String,
}

/// Grounding outcome for a single claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingRecord {
    pub claim: String,
    pub citations: Vec<String>,
    /// At most three snippets, in ranked-document order.
    #[serde(default)]
    pub evidence: Vec<Evidence>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranked_result_flattens_document_fields() {
        let ranked = RankedResult {
            score: 0.75,
            document: Document {
                id: "ks-puttaswamy-2017".into(),
                title: "K.S. Puttaswamy v. Union of India".into(),
                year: 2017,
                court: "Supreme Court of India".into(),
                level_weight: 1.0,
                tags: vec!["privacy".into()],
                text: "Privacy is a fundamental right.".into(),
            },
        };
        let value = serde_json::to_value(&ranked).unwrap();
        assert_eq!(value["score"], 0.75);
        assert_eq!(value["id"], "ks-puttaswamy-2017");
        assert_eq!(value["year"], 2017);
        assert!(value.get("document").is_none());
    }

    #[test]
    fn citation_format() {
        let doc = Document {
            id: "a".into(),
            title: "Anuradha Bhasin v. Union of India".into(),
            year: 2020,
            court: "Supreme Court of India".into(),
            level_weight: 1.0,
            tags: vec![],
            text: String::new(),
        };
        assert_eq!(doc.citation(), "Anuradha Bhasin v. Union of India (2020)");
    }

    #[test]
    fn case_query_joins_title_and_facts() {
        let case = CaseFile {
            title: "Biometric Mandate".into(),
            facts: "State requires fingerprints.".into(),
            issues_hint: vec![],
        };
        assert_eq!(case.query(), "Biometric Mandate. State requires fingerprints.");
    }
}
