// ABOUTME: Configuration module for the finance-deck application
// ABOUTME: Holds backend credentials and tuning knobs, loaded once at the boundary

use crate::errors::{DeckError, Result};
use crate::pptx::RenderConfig;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Output token budget. Twice the 2000-token baseline so 4-6 bullet slides fit.
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 4000;
pub const DEFAULT_TIMEOUT_MS: u64 = 30000;
pub const DEFAULT_MEDIA_WORKERS: usize = 4;
pub const DEFAULT_MAX_CANDIDATES: usize = 3;

/// Language model vendors the generator can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LlmProvider {
    #[value(name = "openai")]
    OpenAi,
    #[value(name = "openrouter")]
    OpenRouter,
    Anthropic,
    Gemini,
}

impl LlmProvider {
    /// Auto-selection order when no provider is configured explicitly.
    pub const PREFERENCE: [LlmProvider; 4] = [
        LlmProvider::OpenRouter,
        LlmProvider::OpenAi,
        LlmProvider::Anthropic,
        LlmProvider::Gemini,
    ];

    pub fn default_model(&self) -> &'static str {
        match self {
            LlmProvider::OpenAi => "gpt-4o",
            LlmProvider::OpenRouter => "openai/gpt-5",
            LlmProvider::Anthropic => "claude-3-5-sonnet-20241022",
            LlmProvider::Gemini => "gemini-1.5-pro",
        }
    }

    pub fn key_variable(&self) -> &'static str {
        match self {
            LlmProvider::OpenAi => "OPENAI_API_KEY",
            LlmProvider::OpenRouter => "OPENROUTER_API_KEY",
            LlmProvider::Anthropic => "ANTHROPIC_API_KEY",
            LlmProvider::Gemini => "GEMINI_API_KEY",
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LlmProvider::OpenAi => "openai",
            LlmProvider::OpenRouter => "openrouter",
            LlmProvider::Anthropic => "anthropic",
            LlmProvider::Gemini => "gemini",
        };
        f.write_str(name)
    }
}

impl FromStr for LlmProvider {
    type Err = DeckError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" | "open-ai" => Ok(LlmProvider::OpenAi),
            "openrouter" | "open-router" => Ok(LlmProvider::OpenRouter),
            "anthropic" | "claude" => Ok(LlmProvider::Anthropic),
            "gemini" | "google" => Ok(LlmProvider::Gemini),
            other => Err(DeckError::ConfigError(format!(
                "Unknown language model provider: {}",
                other
            ))),
        }
    }
}

/// Application configuration, passed into the pipeline at construction time.
#[derive(Clone)]
pub struct Config {
    pub provider: Option<LlmProvider>,
    pub model: Option<String>,
    pub openai_api_key: Option<String>,
    pub openrouter_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub serpapi_api_key: Option<String>,
    pub output_dir: PathBuf,
    pub timeout_ms: u64,
    pub max_output_tokens: u32,
    pub media_workers: usize,
    pub max_candidates: usize,
    pub aspect_ratio: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: None,
            model: None,
            openai_api_key: None,
            openrouter_api_key: None,
            anthropic_api_key: None,
            gemini_api_key: None,
            serpapi_api_key: None,
            output_dir: PathBuf::from("output"),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            media_workers: DEFAULT_MEDIA_WORKERS,
            max_candidates: DEFAULT_MAX_CANDIDATES,
            aspect_ratio: "16:9".to_string(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("openai_api_key", &mask_api_key(self.openai_api_key.as_deref()))
            .field("openrouter_api_key", &mask_api_key(self.openrouter_api_key.as_deref()))
            .field("anthropic_api_key", &mask_api_key(self.anthropic_api_key.as_deref()))
            .field("gemini_api_key", &mask_api_key(self.gemini_api_key.as_deref()))
            .field("serpapi_api_key", &mask_api_key(self.serpapi_api_key.as_deref()))
            .field("output_dir", &self.output_dir)
            .field("timeout_ms", &self.timeout_ms)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("media_workers", &self.media_workers)
            .field("max_candidates", &self.max_candidates)
            .field("aspect_ratio", &self.aspect_ratio)
            .finish()
    }
}

/// Show only the first and last four characters of a key.
pub fn mask_api_key(key: Option<&str>) -> String {
    let Some(key) = key else {
        return "Not configured".to_string();
    };
    let chars: Vec<char> = key.chars().collect();
    if chars.len() < 8 {
        return "Invalid key".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a numeric setting, rejecting values that are present but malformed.
pub(crate) fn parse_setting<T: FromStr>(name: &str, raw: Option<String>) -> Result<Option<T>> {
    raw.map(|value| {
        value.parse::<T>().map_err(|_| {
            DeckError::ConfigError(format!("{} must be a whole number, got {:?}", name, value))
        })
    })
    .transpose()
}

impl Config {
    /// Create a new configuration instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let provider = non_empty_var("DECK_PROVIDER")
            .map(|p| p.parse::<LlmProvider>())
            .transpose()?;

        let timeout_ms = parse_setting("DECK_TIMEOUT_MS", non_empty_var("DECK_TIMEOUT_MS"))?
            .unwrap_or(defaults.timeout_ms);
        let max_output_tokens =
            parse_setting("DECK_MAX_OUTPUT_TOKENS", non_empty_var("DECK_MAX_OUTPUT_TOKENS"))?
                .unwrap_or(defaults.max_output_tokens);
        let media_workers =
            parse_setting("DECK_MEDIA_WORKERS", non_empty_var("DECK_MEDIA_WORKERS"))?
                .unwrap_or(defaults.media_workers);

        Ok(Self {
            provider,
            model: non_empty_var("DECK_MODEL"),
            openai_api_key: non_empty_var("OPENAI_API_KEY"),
            openrouter_api_key: non_empty_var("OPENROUTER_API_KEY"),
            anthropic_api_key: non_empty_var("ANTHROPIC_API_KEY"),
            gemini_api_key: non_empty_var("GEMINI_API_KEY"),
            serpapi_api_key: non_empty_var("SERPAPI_API_KEY"),
            output_dir: non_empty_var("DECK_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            timeout_ms,
            max_output_tokens,
            media_workers,
            ..defaults
        })
    }

    pub fn api_key(&self, provider: LlmProvider) -> Option<&str> {
        let key = match provider {
            LlmProvider::OpenAi => &self.openai_api_key,
            LlmProvider::OpenRouter => &self.openrouter_api_key,
            LlmProvider::Anthropic => &self.anthropic_api_key,
            LlmProvider::Gemini => &self.gemini_api_key,
        };
        key.as_deref().filter(|k| !k.trim().is_empty())
    }

    /// Resolve the provider to use along with its key.
    pub fn select_provider(&self) -> Result<(LlmProvider, &str)> {
        if let Some(provider) = self.provider {
            return self.api_key(provider).map(|key| (provider, key)).ok_or_else(|| {
                DeckError::ConfigError(format!(
                    "{} is not set for provider {}",
                    provider.key_variable(),
                    provider
                ))
            });
        }

        LlmProvider::PREFERENCE
            .iter()
            .find_map(|p| self.api_key(*p).map(|key| (*p, key)))
            .ok_or_else(|| {
                DeckError::ConfigError(
                    "No language model API key configured. Set one of OPENROUTER_API_KEY, \
                     OPENAI_API_KEY, ANTHROPIC_API_KEY or GEMINI_API_KEY"
                        .to_string(),
                )
            })
    }

    /// Model for the selected provider, honouring an explicit override.
    pub fn model_for(&self, provider: LlmProvider) -> String {
        self.model
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| provider.default_model().to_string())
    }

    pub fn serpapi_key(&self) -> Result<&str> {
        self.serpapi_api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| DeckError::ConfigError("SERPAPI_API_KEY is not set".to_string()))
    }

    /// Check that every backend has credentials and the knobs are sane.
    pub fn validate(&self) -> Result<()> {
        self.select_provider()?;
        self.serpapi_key()?;

        if self.timeout_ms == 0 {
            return Err(DeckError::ConfigError(
                "timeout must be greater than zero".to_string(),
            ));
        }
        if self.max_output_tokens == 0 {
            return Err(DeckError::ConfigError(
                "max output tokens must be greater than zero".to_string(),
            ));
        }
        if self.media_workers == 0 {
            return Err(DeckError::ConfigError(
                "media workers must be at least 1".to_string(),
            ));
        }
        if self.max_candidates == 0 {
            return Err(DeckError::ConfigError(
                "max image candidates must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Get a render configuration with defaults from this config
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            aspect_ratio: self.aspect_ratio.clone(),
            ..RenderConfig::default()
        }
    }
}
