//! Async client for OpenAI-compatible `/chat/completions` endpoints.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::draft::{DraftError, DraftRequest, Drafter};

pub const DEFAULT_BASE_URL: &str = "https://integrate.api.nvidia.com/v1";
pub const DEFAULT_MODEL: &str = "nvidia/llama-3.3-nemotron-super-49b-v1.5";

/// Connection and sampling settings that do not vary per request.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.into(),
            model: DEFAULT_MODEL.into(),
            top_p: 0.95,
            frequency_penalty: 0.2,
            presence_penalty: 0.2,
        }
    }
}

/// Drafter backed by a hosted chat-completion model.
pub struct ChatClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    config: ChatConfig,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
    frequency_penalty: f32,
    presence_penalty: f32,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatClient {
    /// Create a client. Fails with [`DraftError::MissingApiKey`] when no
    /// non-empty key is configured.
    ///
    /// A trailing slash on `base_url` is ignored.
    pub fn new(config: ChatConfig) -> Result<Self, DraftError> {
        let api_key = match config.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => key.to_string(),
            _ => return Err(DraftError::MissingApiKey),
        };
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            config,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn body<'a>(&'a self, request: &'a DraftRequest) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            temperature: request.temperature,
            top_p: self.config.top_p,
            max_tokens: request.max_tokens,
            frequency_penalty: self.config.frequency_penalty,
            presence_penalty: self.config.presence_penalty,
            stream: false,
        }
    }
}

fn completion_text(body: &str) -> Result<String, DraftError> {
    let parsed: ChatCompletionResponse = serde_json::from_str(body)?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or(DraftError::EmptyResponse)
}

#[async_trait]
impl Drafter for ChatClient {
    async fn draft(&self, request: &DraftRequest) -> Result<String, DraftError> {
        let url = format!("{}/chat/completions", self.base_url);

        info!(
            url = %url,
            model = %self.config.model,
            temperature = request.temperature,
            max_tokens = request.max_tokens,
            "requesting draft"
        );
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.body(request))
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(DraftError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let text = completion_text(&body)?;
        debug!(chars = text.len(), "draft received");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(key: Option<&str>) -> ChatConfig {
        ChatConfig {
            api_key: key.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn trims_trailing_slash() {
        let client = ChatClient::new(ChatConfig {
            base_url: "http://localhost:8000/v1/".into(),
            ..config(Some("k"))
        })
        .unwrap();
        assert_eq!(client.base_url, "http://localhost:8000/v1");
    }

    #[test]
    fn missing_or_blank_key_rejected() {
        assert!(matches!(
            ChatClient::new(config(None)),
            Err(DraftError::MissingApiKey)
        ));
        assert!(matches!(
            ChatClient::new(config(Some("  "))),
            Err(DraftError::MissingApiKey)
        ));
    }

    #[test]
    fn request_body_shape() {
        let client = ChatClient::new(config(Some("k"))).unwrap();
        let request = DraftRequest {
            system: "be precise".into(),
            prompt: "CASE: X".into(),
            temperature: 0.35,
            max_tokens: 1700,
        };
        let json = serde_json::to_value(client.body(&request)).unwrap();
        assert_eq!(json["model"], DEFAULT_MODEL);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "be precise");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "CASE: X");
        assert_eq!(json["max_tokens"], 1700);
        assert_eq!(json["stream"], false);
        assert!((json["top_p"].as_f64().unwrap() - 0.95).abs() < 1e-6);
        assert!((json["temperature"].as_f64().unwrap() - 0.35).abs() < 1e-6);
    }

    #[test]
    fn parses_first_choice() {
        let body = r#"{"id":"x","choices":[
            {"index":0,"message":{"role":"assistant","content":"1) Core Issues"}},
            {"index":1,"message":{"role":"assistant","content":"other"}}
        ]}"#;
        assert_eq!(completion_text(body).unwrap(), "1) Core Issues");
    }

    #[test]
    fn no_choices_is_empty_response() {
        assert!(matches!(
            completion_text(r#"{"choices":[]}"#),
            Err(DraftError::EmptyResponse)
        ));
        assert!(matches!(
            completion_text(r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#),
            Err(DraftError::EmptyResponse)
        ));
    }

    #[test]
    fn malformed_body_is_json_error() {
        assert!(matches!(completion_text("<html>"), Err(DraftError::Json(_))));
    }
}
