//! Corpus loading.
//!
//! The corpus is a JSON array of [`Document`] records. Loading is
//! all-or-nothing: one malformed record rejects the whole file.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::{Document, Issue};

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read corpus {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed corpus JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate document id: {0}")]
    DuplicateId(String),

    #[error("invalid record at index {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },
}

/// Read and validate a corpus file.
pub fn load_corpus(path: &Path) -> Result<Vec<Document>, CorpusError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CorpusError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let docs = parse_corpus(&raw)?;
    info!(count = docs.len(), path = %path.display(), "loaded corpus");
    Ok(docs)
}

/// Parse and validate corpus JSON already in memory.
pub fn parse_corpus(raw: &str) -> Result<Vec<Document>, CorpusError> {
    let docs: Vec<Document> = serde_json::from_str(raw)?;
    validate(&docs)?;
    Ok(docs)
}

fn validate(docs: &[Document]) -> Result<(), CorpusError> {
    let mut seen = HashSet::with_capacity(docs.len());
    for (index, doc) in docs.iter().enumerate() {
        if doc.id.trim().is_empty() {
            return Err(CorpusError::InvalidRecord {
                index,
                reason: "empty id".into(),
            });
        }
        if doc.title.trim().is_empty() {
            return Err(CorpusError::InvalidRecord {
                index,
                reason: format!("empty title for '{}'", doc.id),
            });
        }
        if !doc.level_weight.is_finite() {
            return Err(CorpusError::InvalidRecord {
                index,
                reason: format!("non-finite level_weight for '{}'", doc.id),
            });
        }
        if !seen.insert(doc.id.as_str()) {
            return Err(CorpusError::DuplicateId(doc.id.clone()));
        }
        for tag in &doc.tags {
            if tag.parse::<Issue>().is_err() {
                warn!(id = %doc.id, tag = %tag, "tag outside issue vocabulary");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TWO_DOCS: &str = r#"[
        {"id": "a", "title": "Alpha", "year": 2017, "court": "SC", "level_weight": 1.0,
         "tags": ["privacy"], "text": "privacy is protected"},
        {"id": "b", "title": "Beta", "year": 2010, "court": "HC", "level_weight": 0.6,
         "tags": [], "text": "trade restrictions"}
    ]"#;

    #[test]
    fn parses_valid_corpus() {
        let docs = parse_corpus(TWO_DOCS).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].tags, vec!["privacy".to_string()]);
        assert_eq!(docs[1].year, 2010);
    }

    #[test]
    fn missing_field_rejects_whole_file() {
        let raw = r#"[
            {"id": "a", "title": "Alpha", "year": 2017, "court": "SC", "level_weight": 1.0,
             "tags": [], "text": "ok"},
            {"id": "b", "title": "Beta", "court": "HC", "level_weight": 0.6,
             "tags": [], "text": "no year"}
        ]"#;
        assert!(matches!(parse_corpus(raw), Err(CorpusError::Json(_))));
    }

    #[test]
    fn wrong_type_rejected() {
        let raw = r#"[{"id": "a", "title": "Alpha", "year": "2017", "court": "SC",
                       "level_weight": 1.0, "tags": [], "text": "x"}]"#;
        assert!(matches!(parse_corpus(raw), Err(CorpusError::Json(_))));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let raw = r#"[
            {"id": "a", "title": "Alpha", "year": 2017, "court": "SC", "level_weight": 1.0,
             "tags": [], "text": "x"},
            {"id": "a", "title": "Alpha again", "year": 2018, "court": "SC", "level_weight": 1.0,
             "tags": [], "text": "y"}
        ]"#;
        match parse_corpus(raw) {
            Err(CorpusError::DuplicateId(id)) => assert_eq!(id, "a"),
            other => panic!("expected duplicate id error, got {other:?}"),
        }
    }

    #[test]
    fn empty_id_rejected() {
        let raw = r#"[{"id": " ", "title": "Alpha", "year": 2017, "court": "SC",
                       "level_weight": 1.0, "tags": [], "text": "x"}]"#;
        assert!(matches!(
            parse_corpus(raw),
            Err(CorpusError::InvalidRecord { index: 0, .. })
        ));
    }

    #[test]
    fn unknown_tags_still_load() {
        let raw = r#"[{"id": "a", "title": "Alpha", "year": 2017, "court": "SC",
                       "level_weight": 1.0, "tags": ["privacy", "torts"], "text": "x"}]"#;
        let docs = parse_corpus(raw).unwrap();
        assert_eq!(docs[0].tags, vec!["privacy".to_string(), "torts".to_string()]);
    }

    #[test]
    fn extreme_years_load() {
        let raw = r#"[
            {"id": "a", "title": "Alpha", "year": -2147483648, "court": "SC",
             "level_weight": 1.0, "tags": [], "text": "x"},
            {"id": "b", "title": "Beta", "year": 2147483647, "court": "SC",
             "level_weight": 1.0, "tags": [], "text": "y"}
        ]"#;
        let docs = parse_corpus(raw).unwrap();
        assert_eq!(docs[0].year, i32::MIN);
        assert_eq!(docs[1].year, i32::MAX);
    }

    #[test]
    fn load_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("corpus.json");
        std::fs::write(&path, TWO_DOCS).unwrap();
        let docs = load_corpus(&path).unwrap();
        assert_eq!(docs.len(), 2);
    }

    #[test]
    fn missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_corpus(&tmp.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, CorpusError::Io { .. }));
    }
}
