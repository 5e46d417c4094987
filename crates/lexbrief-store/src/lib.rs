//! Feedback store: durable, bounded adaptive state for ranking and drafting style.

mod error;
pub use error::StoreError;

mod feedback;
pub use feedback::{BOOST_STEP, FeedbackState, FeedbackStore, MAX_BOOST, MAX_STYLE, StyleFlags};

mod json;
pub use json::{DEFAULT_FEEDBACK_PATH, JsonFeedbackStore};

mod memory;
pub use memory::MemoryFeedbackStore;
