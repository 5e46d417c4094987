//! Core of the precedent pipeline: shared types, corpus loading, and the
//! deterministic steps (issue tagging, planning, grounding, confidence).

pub mod confidence;
pub mod corpus;
pub mod grounding;
pub mod issues;
pub mod plan;
pub mod types;

pub use confidence::confidence;
pub use corpus::{CorpusError, load_corpus, parse_corpus};
pub use grounding::{extract_snippet, ground};
pub use issues::{Issue, issue_labels, tag};
pub use plan::plan_steps;
pub use types::{CaseFile, Document, Evidence, GroundingRecord, RankedResult};
