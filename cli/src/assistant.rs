//! Writing assistant client (chat completions API).

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Chat completions endpoint.
pub const API_URL: &str = "https://api.cerebras.ai/v1/chat/completions";

/// Model used for every request.
pub const MODEL: &str = "llama3.1-8b";

/// System prompt sent ahead of the conversation.
pub const SYSTEM_PROMPT: &str = "You are a helpful writing assistant for a markdown editor called Studio. Help users with editing, formatting, writing suggestions, and general writing tasks. Be concise and helpful.";

/// Conversation prompt asking for insertable content between article tags.
pub const ARTICLE_PROMPT: &str = "You are a helpful writing assistant. When users ask you to write content (articles, stories, etc.), please format your response exactly like this:

<article-start>
[The actual content they requested]
<article-end>

Always wrap ALL content between <article-start> and <article-end> tags. Do not include any other text outside these tags.";

/// Reply used when the response carries no message content.
pub const FALLBACK_REPLY: &str = "Sorry, I could not generate a response.";

const MAX_TOKENS: u32 = 1000;
const TEMPERATURE: f32 = 0.2;
const TOP_P: f32 = 1.0;

const VALIDATION_PROMPT: &str =
    "You are a helpful writing assistant for a markdown editor called Studio.";
const VALIDATION_MESSAGE: &str = "Test message to validate API key";
const VALIDATION_MAX_TOKENS: u32 = 10;

/// Errors from the assistant client.
#[derive(Error, Debug)]
pub enum AssistantError {
    /// No API key configured.
    #[error("No API key configured. Run `mdstudio settings set-key <KEY>` first")]
    MissingApiKey,

    /// The API answered with a non-success status.
    #[error("API request failed: {0}")]
    Status(u16),

    /// The API rejected the key during validation.
    #[error("Invalid API key: {0}")]
    InvalidKey(String),

    /// Transport or decoding failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions ahead of the conversation
    System,
    /// The person using the editor
    User,
    /// The model
    Assistant,
}

/// One chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Author
    pub role: Role,
    /// Message text
    pub content: String,
}

impl Message {
    /// System message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// User message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Build the request body: system prompt first, then the conversation.
pub fn build_request_body(messages: &[Message]) -> Value {
    let mut all = Vec::with_capacity(messages.len() + 1);
    all.push(serde_json::json!({ "role": Role::System, "content": SYSTEM_PROMPT }));
    all.extend(
        messages
            .iter()
            .map(|m| serde_json::json!({ "role": m.role, "content": m.content })),
    );

    serde_json::json!({
        "model": MODEL,
        "messages": all,
        "max_tokens": MAX_TOKENS,
        "temperature": TEMPERATURE,
        "top_p": TOP_P,
    })
}

/// Build the small request used to test an API key.
pub fn build_validation_body() -> Value {
    serde_json::json!({
        "model": MODEL,
        "messages": [
            { "role": Role::System, "content": VALIDATION_PROMPT },
            { "role": Role::User, "content": VALIDATION_MESSAGE },
        ],
        "max_tokens": VALIDATION_MAX_TOKENS,
        "temperature": TEMPERATURE,
        "top_p": TOP_P,
    })
}

/// Messages for one `ask` turn: the article prompt, prior turns, then `prompt`.
pub fn conversation(history: &[Message], prompt: impl Into<String>) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(Message::system(ARTICLE_PROMPT));
    messages.extend(history.iter().filter(|m| m.role != Role::System).cloned());
    messages.push(Message::user(prompt));
    messages
}

/// Content between `<article-start>` and `<article-end>`, trimmed.
///
/// Tags match case-insensitively; the first pair wins.
pub fn extract_article(reply: &str) -> Option<String> {
    let re = Regex::new(r"(?is)<article-start>(.*?)<article-end>").unwrap();
    re.captures(reply)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Extract the first choice's message content, or the fallback reply.
pub fn extract_reply(response: &Value) -> String {
    response
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|arr| arr.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|msg| msg.get("content"))
        .and_then(|t| t.as_str())
        .filter(|text| !text.is_empty())
        .unwrap_or(FALLBACK_REPLY)
        .to_string()
}

/// Client for the chat completions API.
pub struct AssistantClient {
    http: reqwest::Client,
    api_key: String,
    url: String,
}

impl AssistantClient {
    /// Create a client for `api_key`.
    pub fn new(api_key: impl Into<String>) -> Result<Self, AssistantError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(AssistantError::MissingApiKey);
        }
        Ok(Self {
            http: reqwest::Client::new(),
            api_key,
            url: API_URL.to_string(),
        })
    }

    /// Override the endpoint URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Send the conversation and return the assistant's reply.
    pub async fn send(&self, messages: &[Message]) -> Result<String, AssistantError> {
        let body = build_request_body(messages);
        log::debug!("Sending {} message(s) to {}", messages.len(), self.url);

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            log::error!("Assistant API error: {}", status);
            return Err(AssistantError::Status(status.as_u16()));
        }

        let json: Value = response.json().await?;
        Ok(extract_reply(&json))
    }

    /// Check the key with a minimal request.
    ///
    /// Any non-success status means the key is rejected; the API's error
    /// message is kept when the body carries one.
    pub async fn validate_key(&self) -> Result<(), AssistantError> {
        log::debug!("Validating API key against {}", self.url);

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&build_validation_body())
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let detail = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| {
                body.pointer("/error/message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "Authentication failed".to_string());
        log::warn!("API key rejected ({}): {}", status, detail);
        Err(AssistantError::InvalidKey(detail))
    }
}
