//! The drafting seam and its error type.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DraftError {
    #[error("API key not set; export NVIDIA_API_KEY or pass --api-key")]
    MissingApiKey,
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[cfg(feature = "http")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("response contained no completion")]
    EmptyResponse,
}

/// One drafting call: fixed system instruction plus a generated prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftRequest {
    pub system: String,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// External text generator used to write the brief.
///
/// A failed call is terminal for the request; implementations decide their
/// own retry policy.
#[async_trait]
pub trait Drafter: Send + Sync {
    /// Generate plain text for the request. The caller runs the result
    /// through [`sanitize_output`].
    async fn draft(&self, request: &DraftRequest) -> Result<String, DraftError>;
}

static THINK_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<think>.*?</think>").expect("static pattern"));

/// Strip leaked `<think>…</think>` reasoning blocks and surrounding whitespace.
pub fn sanitize_output(text: &str) -> String {
    THINK_BLOCK.replace_all(text, "").trim().to_string()
}
