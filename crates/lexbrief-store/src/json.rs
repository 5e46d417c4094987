//! File-backed feedback store.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{FeedbackState, FeedbackStore, StoreError};

/// Default location of the feedback file, relative to the working directory.
pub const DEFAULT_FEEDBACK_PATH: &str = "legal_feedback.json";

/// Feedback state persisted as indented JSON at a single path.
///
/// Writes go to a temporary file in the same directory and are renamed into
/// place, so readers never observe a half-written file. There is no lock:
/// two processes recording at once can still lose one update.
#[derive(Debug, Clone)]
pub struct JsonFeedbackStore {
    path: PathBuf,
}

impl JsonFeedbackStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<FeedbackState, StoreError> {
        let raw = std::fs::read_to_string(&self.path)?;
        let mut state: FeedbackState = serde_json::from_str(&raw)?;
        state.sanitize();
        Ok(state)
    }
}

impl Default for JsonFeedbackStore {
    fn default() -> Self {
        Self::new(DEFAULT_FEEDBACK_PATH)
    }
}

impl FeedbackStore for JsonFeedbackStore {
    fn load(&self) -> FeedbackState {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no feedback file, using defaults");
            return FeedbackState::default();
        }
        self.read().unwrap_or_else(|e| {
            warn!(
                path = %self.path.display(),
                error = %e,
                "unreadable feedback file, using defaults"
            );
            FeedbackState::default()
        })
    }

    fn save(&self, state: &FeedbackState) -> Result<(), StoreError> {
        let mut state = state.clone();
        state.sanitize();

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, &state)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)?;
        Ok(())
    }
}
