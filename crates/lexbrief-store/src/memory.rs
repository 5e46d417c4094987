//! In-process feedback store for tests and ephemeral sessions.

use std::sync::Mutex;

use crate::{FeedbackState, FeedbackStore, StoreError};

#[derive(Debug, Default)]
pub struct MemoryFeedbackStore {
    state: Mutex<FeedbackState>,
}

impl MemoryFeedbackStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a given state (bounds are applied).
    pub fn with_state(mut state: FeedbackState) -> Self {
        state.sanitize();
        Self {
            state: Mutex::new(state),
        }
    }
}

impl FeedbackStore for MemoryFeedbackStore {
    fn load(&self) -> FeedbackState {
        match self.state.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => FeedbackState::default(),
        }
    }

    fn save(&self, state: &FeedbackState) -> Result<(), StoreError> {
        let mut guard = self
            .state
            .lock()
            .map_err(|e| StoreError::Other(format!("mutex poisoned: {e}")))?;
        *guard = state.clone();
        guard.sanitize();
        Ok(())
    }
}
