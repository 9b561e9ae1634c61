// ABOUTME: Error types for the finance-deck application
// ABOUTME: Provides structured error handling for each stage of the pipeline

use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("Input validation error: {0}")]
    ValidationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Language model request failed: {0}")]
    BackendError(String),

    #[error("Timeout error: {0}")]
    TimeoutError(String),

    #[error("Malformed language model output: {0}")]
    FormatError(String),

    #[error("Language model output exceeded the budget of {max_tokens} tokens")]
    TokenBudgetExceeded { max_tokens: u32 },

    #[error("Media lookup error: {0}")]
    MediaLookupError(String),

    #[error("Failed to fetch remote resource: {0}")]
    FetchError(#[from] reqwest::Error),

    #[error("Failed to write file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("PPTX generation error: {0}")]
    PptxError(String),

    #[error("Unsupported media reference: {0}")]
    UnsupportedMedia(String),
}

/// Coarse classification of a [`DeckError`], reported to callers alongside
/// the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidRequest,
    Configuration,
    Generation,
    MediaLookup,
    Render,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidRequest => "invalid_request",
            ErrorKind::Configuration => "configuration",
            ErrorKind::Generation => "generation",
            ErrorKind::MediaLookup => "media_lookup",
            ErrorKind::Render => "render",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DeckError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DeckError::ValidationError(_) => ErrorKind::InvalidRequest,
            DeckError::ConfigError(_) => ErrorKind::Configuration,
            DeckError::BackendError(_)
            | DeckError::TimeoutError(_)
            | DeckError::FormatError(_)
            | DeckError::TokenBudgetExceeded { .. } => ErrorKind::Generation,
            DeckError::MediaLookupError(_) | DeckError::FetchError(_) => ErrorKind::MediaLookup,
            DeckError::IoError(_) | DeckError::PptxError(_) | DeckError::UnsupportedMedia(_) => {
                ErrorKind::Render
            }
        }
    }

    /// Whether this error ends the request. Media lookup failures are always
    /// absorbed by the resolver.
    pub fn is_fatal(&self) -> bool {
        self.kind() != ErrorKind::MediaLookup
    }

    /// Map a transport error from a language model call into the generation
    /// family.
    pub(crate) fn from_llm_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DeckError::TimeoutError(err.to_string())
        } else {
            DeckError::BackendError(err.to_string())
        }
    }
}

// Implement conversion from zip errors
impl From<zip::result::ZipError> for DeckError {
    fn from(err: zip::result::ZipError) -> Self {
        DeckError::PptxError(format!("ZIP operation failed: {}", err))
    }
}

impl From<image::ImageError> for DeckError {
    fn from(err: image::ImageError) -> Self {
        DeckError::UnsupportedMedia(format!("image could not be decoded: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, DeckError>;
