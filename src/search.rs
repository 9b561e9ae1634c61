// ABOUTME: Image search backend for the finance-deck application
// ABOUTME: An image-search trait and a SerpAPI Google Images client

use crate::errors::{DeckError, Result};
use crate::llm::build_http_client;
use log::debug;
use reqwest::blocking::Client;
use serde::Deserialize;

const SERPAPI_BASE_URL: &str = "https://serpapi.com/search.json";

/// A backend that maps a free-text query to candidate image references.
pub trait ImageSearch: Send + Sync {
    /// Candidates in the backend's ranking order.
    fn search(&self, query: &str, limit: usize) -> Result<Vec<String>>;
}

#[derive(Deserialize)]
struct SerpApiResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    images_results: Vec<SerpApiImage>,
}

#[derive(Deserialize)]
struct SerpApiImage {
    #[serde(default)]
    original: Option<String>,
    #[serde(default)]
    thumbnail: Option<String>,
}

/// SerpAPI `google_images` engine.
pub struct SerpApiImageSearch {
    api_key: String,
    base_url: String,
    client: Client,
}

impl SerpApiImageSearch {
    pub fn new(api_key: impl Into<String>, timeout_ms: u64) -> Result<Self> {
        Ok(Self {
            api_key: api_key.into(),
            base_url: SERPAPI_BASE_URL.to_string(),
            client: build_http_client(timeout_ms)?,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl ImageSearch for SerpApiImageSearch {
    fn search(&self, query: &str, limit: usize) -> Result<Vec<String>> {
        debug!("Image search: {:?} (limit {})", query, limit);

        let limit_param = limit.to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("engine", "google_images"),
                ("q", query),
                ("api_key", self.api_key.as_str()),
                ("num", limit_param.as_str()),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeckError::MediaLookupError(format!(
                "image search returned HTTP {}",
                status
            )));
        }

        let body: SerpApiResponse = response.json()?;
        if let Some(error) = body.error {
            // SerpAPI reports "no results" through the error field.
            if error.to_lowercase().contains("hasn't returned any results") {
                return Ok(Vec::new());
            }
            return Err(DeckError::MediaLookupError(error));
        }

        Ok(body
            .images_results
            .into_iter()
            .filter_map(|image| image.original.or(image.thumbnail))
            .filter(|url| !url.trim().is_empty())
            .take(limit)
            .collect())
    }
}
