// ABOUTME: Library module for the finance-deck program.
// ABOUTME: Turns a topic into a finance PowerPoint deck via a language model and image search.

// Reexport modules
pub mod config;
pub mod content;
pub mod errors;
pub mod llm;
pub mod media;
pub mod model;
pub mod pipeline;
pub mod pptx;
pub mod resources;
pub mod search;
pub mod server;
pub mod utils;

// Reexport common types and functions
pub use config::{Config, LlmProvider};
pub use content::ContentGenerator;
pub use errors::{DeckError, ErrorKind, Result};
pub use llm::{Completion, TextGenerator};
pub use media::MediaResolver;
pub use model::{
    Deck, EmbeddedImage, GeneratedContent, PresentationType, ResolvedMedia, ResolvedSlide,
    SlideOutline, TopicRequest,
};
pub use pipeline::{DeckPipeline, Progress};
pub use pptx::{DeckRenderer, RenderConfig};
pub use resources::{HttpMediaFetcher, MediaFetcher};
pub use search::{ImageSearch, SerpApiImageSearch};

#[cfg(test)]
mod tests;
