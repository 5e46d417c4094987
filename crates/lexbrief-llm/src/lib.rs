//! Drafting collaborator: the [`Drafter`] seam the orchestrator calls, plus an
//! HTTP client for OpenAI-compatible chat-completion services.

mod draft;
pub use draft::{DraftError, DraftRequest, Drafter, sanitize_output};

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::{ChatClient, ChatConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
