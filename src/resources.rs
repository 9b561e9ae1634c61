// ABOUTME: Media fetching for the finance-deck application
// ABOUTME: Loads image bytes from remote URLs or local paths

use crate::errors::{DeckError, Result};
use crate::llm::build_http_client;
use log::info;
use reqwest::blocking::Client;
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Largest image we are willing to embed.
pub const MAX_MEDIA_BYTES: usize = 15 * 1024 * 1024;

const FETCH_ATTEMPTS: u32 = 3;

/// A reference to an image: either a remote URL or a local file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaReference {
    Remote(Url),
    Local(String),
}

impl MediaReference {
    /// Parse a reference string. Only http(s) URLs and filesystem paths are
    /// accepted.
    pub fn parse(reference: &str) -> Result<Self> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(DeckError::UnsupportedMedia("empty reference".to_string()));
        }

        match Url::parse(reference) {
            Ok(url) => match url.scheme() {
                "http" | "https" => Ok(MediaReference::Remote(url)),
                "file" => url
                    .to_file_path()
                    .map(|p| MediaReference::Local(p.to_string_lossy().to_string()))
                    .map_err(|_| DeckError::UnsupportedMedia(reference.to_string())),
                // Windows drive letters parse as a one-letter scheme.
                scheme if scheme.len() == 1 => Ok(MediaReference::Local(reference.to_string())),
                _ => Err(DeckError::UnsupportedMedia(reference.to_string())),
            },
            Err(_) => Ok(MediaReference::Local(reference.to_string())),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, MediaReference::Remote(_))
    }
}

/// A backend that loads the bytes behind a media reference.
pub trait MediaFetcher: Send + Sync {
    fn fetch(&self, reference: &str) -> Result<Vec<u8>>;
}

/// Fetches http(s) references with retries and reads local paths directly.
pub struct HttpMediaFetcher {
    client: Client,
    retry_delay_ms: u64,
}

impl HttpMediaFetcher {
    pub fn new(timeout_ms: u64) -> Result<Self> {
        Ok(Self {
            client: build_http_client(timeout_ms)?,
            retry_delay_ms: 250,
        })
    }

    pub fn with_retry_delay(mut self, retry_delay_ms: u64) -> Self {
        self.retry_delay_ms = retry_delay_ms;
        self
    }

    /// Fetch content from a remote URL with retry capability
    fn fetch_remote(&self, url: &Url) -> Result<Vec<u8>> {
        info!("Fetching remote image: {}", url);

        let mut retry_delay = self.retry_delay_ms;
        let mut last_error = None;

        for attempt in 1..=FETCH_ATTEMPTS {
            match self.client.get(url.as_str()).send() {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let bytes = response.bytes()?;
                        return check_size(bytes.to_vec());
                    }
                    last_error = Some(DeckError::MediaLookupError(format!("HTTP error: {}", status)));
                    // A 4xx will not fix itself.
                    if status.is_client_error() {
                        break;
                    }
                }
                Err(e) => {
                    last_error = Some(DeckError::FetchError(e));
                }
            }

            if attempt < FETCH_ATTEMPTS {
                info!(
                    "Fetch attempt {} failed, retrying in {} ms",
                    attempt, retry_delay
                );
                std::thread::sleep(Duration::from_millis(retry_delay));
                retry_delay *= 2; // Exponential backoff
            }
        }

        Err(last_error.unwrap_or_else(|| {
            DeckError::MediaLookupError("Unknown error fetching image".to_string())
        }))
    }

    /// Read content from a local file
    fn read_local(&self, path: &str) -> Result<Vec<u8>> {
        info!("Reading local image: {}", path);
        if !Path::new(path).is_file() {
            return Err(DeckError::MediaLookupError(format!(
                "local image not found: {}",
                path
            )));
        }
        check_size(fs::read(path)?)
    }
}

fn check_size(bytes: Vec<u8>) -> Result<Vec<u8>> {
    if bytes.is_empty() {
        return Err(DeckError::MediaLookupError("image is empty".to_string()));
    }
    if bytes.len() > MAX_MEDIA_BYTES {
        return Err(DeckError::MediaLookupError(format!(
            "image is too large ({} bytes)",
            bytes.len()
        )));
    }
    Ok(bytes)
}

impl MediaFetcher for HttpMediaFetcher {
    fn fetch(&self, reference: &str) -> Result<Vec<u8>> {
        match MediaReference::parse(reference)? {
            MediaReference::Remote(url) => self.fetch_remote(&url),
            MediaReference::Local(path) => self.read_local(&path),
        }
    }
}
