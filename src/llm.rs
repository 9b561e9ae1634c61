// ABOUTME: Language model backends for the finance-deck application
// ABOUTME: A text-generation trait plus blocking OpenAI, Anthropic and Gemini clients

use crate::config::{Config, LlmProvider};
use crate::errors::{DeckError, Result};
use log::debug;
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const TEMPERATURE: f32 = 0.7;

/// Text returned by a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
    /// The backend stopped because it reached the output limit.
    pub truncated: bool,
}

impl Completion {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            truncated: false,
        }
    }
}

/// A backend that turns one prompt into one completion.
pub trait TextGenerator: Send + Sync {
    fn name(&self) -> &str;

    fn complete(&self, prompt: &str, max_tokens: u32) -> Result<Completion>;
}

pub(crate) fn build_http_client(timeout_ms: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .build()
        .map_err(|e| DeckError::ConfigError(format!("Failed to build HTTP client: {}", e)))
}

/// Send a JSON request and decode the JSON answer.
fn send_json<R: DeserializeOwned>(request: RequestBuilder) -> Result<R> {
    let response = request.send().map_err(DeckError::from_llm_transport)?;

    let status = response.status();
    let body = response.text().map_err(DeckError::from_llm_transport)?;
    if !status.is_success() {
        return Err(DeckError::BackendError(format!("HTTP {}: {}", status, body)));
    }

    serde_json::from_str(&body)
        .map_err(|e| DeckError::FormatError(format!("unexpected response body: {}", e)))
}

fn non_empty(text: String, backend: &str) -> Result<String> {
    if text.trim().is_empty() {
        Err(DeckError::FormatError(format!(
            "{} returned an empty completion",
            backend
        )))
    } else {
        Ok(text)
    }
}

// ============================================================================
// OpenAI-compatible chat completions (OpenAI, OpenRouter)
// ============================================================================

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Client for the OpenAI chat completions API and compatible services.
pub struct OpenAiClient {
    name: &'static str,
    api_key: String,
    model: String,
    base_url: String,
    extra_headers: Vec<(&'static str, &'static str)>,
    client: Client,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, timeout_ms: u64) -> Result<Self> {
        Ok(Self {
            name: "openai",
            api_key: api_key.into(),
            model: model.into(),
            base_url: OPENAI_BASE_URL.to_string(),
            extra_headers: Vec::new(),
            client: build_http_client(timeout_ms)?,
        })
    }

    /// OpenRouter speaks the same protocol and wants attribution headers.
    pub fn openrouter(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout_ms: u64,
    ) -> Result<Self> {
        let mut client = Self::new(api_key, model, timeout_ms)?;
        client.name = "openrouter";
        client.base_url = OPENROUTER_BASE_URL.to_string();
        client.extra_headers = vec![
            ("HTTP-Referer", "https://finance-deck.local"),
            ("X-Title", "Finance Deck"),
        ];
        Ok(client)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

impl TextGenerator for OpenAiClient {
    fn name(&self) -> &str {
        self.name
    }

    fn complete(&self, prompt: &str, max_tokens: u32) -> Result<Completion> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens,
            temperature: TEMPERATURE,
        };

        let url = format!("{}/chat/completions", self.base_url);
        debug!("POST {} (model {}, max_tokens {})", url, self.model, max_tokens);

        let mut request = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body);
        for (name, value) in &self.extra_headers {
            request = request.header(*name, *value);
        }

        let response: ChatResponse = send_json(request)?;
        let choice = response.choices.into_iter().next().ok_or_else(|| {
            DeckError::FormatError(format!("{} returned no choices", self.name))
        })?;

        Ok(Completion {
            text: non_empty(choice.message.content.unwrap_or_default(), self.name)?,
            truncated: choice.finish_reason.as_deref() == Some("length"),
        })
    }
}

// ============================================================================
// Anthropic messages
// ============================================================================

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<AnthropicContent>,
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Deserialize)]
struct AnthropicContent {
    #[serde(default)]
    text: Option<String>,
}

/// Client for the Anthropic messages API.
pub struct AnthropicClient {
    api_key: String,
    model: String,
    base_url: String,
    client: Client,
}

impl AnthropicClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, timeout_ms: u64) -> Result<Self> {
        Ok(Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: ANTHROPIC_BASE_URL.to_string(),
            client: build_http_client(timeout_ms)?,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

impl TextGenerator for AnthropicClient {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn complete(&self, prompt: &str, max_tokens: u32) -> Result<Completion> {
        let body = AnthropicRequest {
            model: &self.model,
            max_tokens,
            temperature: TEMPERATURE,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let url = format!("{}/v1/messages", self.base_url);
        debug!("POST {} (model {}, max_tokens {})", url, self.model, max_tokens);

        let request = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body);

        let response: AnthropicResponse = send_json(request)?;
        let text: String = response
            .content
            .into_iter()
            .filter_map(|block| block.text)
            .collect();

        Ok(Completion {
            text: non_empty(text, "anthropic")?,
            truncated: response.stop_reason.as_deref() == Some("max_tokens"),
        })
    }
}

// ============================================================================
// Google Gemini generateContent
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    role: &'a str,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiReply>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct GeminiReply {
    #[serde(default)]
    parts: Vec<GeminiReplyPart>,
}

#[derive(Deserialize)]
struct GeminiReplyPart {
    #[serde(default)]
    text: Option<String>,
}

/// Client for the Gemini generateContent API.
pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    client: Client,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, timeout_ms: u64) -> Result<Self> {
        Ok(Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: GEMINI_BASE_URL.to_string(),
            client: build_http_client(timeout_ms)?,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

impl TextGenerator for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    fn complete(&self, prompt: &str, max_tokens: u32) -> Result<Completion> {
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiPart { text: prompt }],
            }],
            generation_config: GeminiGenerationConfig {
                max_output_tokens: max_tokens,
                temperature: TEMPERATURE,
            },
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        debug!("POST {} (max_tokens {})", url, max_tokens);

        let request = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body);

        let response: GeminiResponse = send_json(request)?;
        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| DeckError::FormatError("gemini returned no candidates".to_string()))?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        Ok(Completion {
            text: non_empty(text, "gemini")?,
            truncated: candidate.finish_reason.as_deref() == Some("MAX_TOKENS"),
        })
    }
}

/// Build the credentialed client selected by the configuration.
pub fn generator_from_config(config: &Config) -> Result<Box<dyn TextGenerator>> {
    let (provider, key) = config.select_provider()?;
    let model = config.model_for(provider);
    let timeout = config.timeout_ms;

    Ok(match provider {
        LlmProvider::OpenAi => Box::new(OpenAiClient::new(key, model, timeout)?),
        LlmProvider::OpenRouter => Box::new(OpenAiClient::openrouter(key, model, timeout)?),
        LlmProvider::Anthropic => Box::new(AnthropicClient::new(key, model, timeout)?),
        LlmProvider::Gemini => Box::new(GeminiClient::new(key, model, timeout)?),
    })
}
