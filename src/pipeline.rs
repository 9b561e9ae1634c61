// ABOUTME: Orchestration for the finance-deck application
// ABOUTME: Runs content generation, media resolution and rendering for one request

use crate::config::Config;
use crate::content::ContentGenerator;
use crate::errors::Result;
use crate::llm;
use crate::media::MediaResolver;
use crate::model::{Deck, TopicRequest};
use crate::pptx::DeckRenderer;
use crate::resources::HttpMediaFetcher;
use crate::search::SerpApiImageSearch;
use crate::utils;
use log::{error, info};
use std::path::{Path, PathBuf};

/// Stage notifications emitted while a deck is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    GeneratingContent,
    ContentReady { slides: usize },
    ResolvingMedia { slide: usize, total: usize },
    Rendering,
    Finished { path: PathBuf },
}

pub type ProgressObserver = Box<dyn Fn(&Progress) + Send + Sync>;

/// Content generator, media resolver and renderer wired together.
pub struct DeckPipeline {
    generator: ContentGenerator,
    resolver: MediaResolver,
    renderer: DeckRenderer,
    output_dir: PathBuf,
    observer: Option<ProgressObserver>,
}

impl DeckPipeline {
    pub fn new(
        generator: ContentGenerator,
        resolver: MediaResolver,
        renderer: DeckRenderer,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            generator,
            resolver,
            renderer,
            output_dir: output_dir.into(),
            observer: None,
        }
    }

    /// Build the pipeline with the credentialed HTTP backends named by
    /// `config`. Fails with a configuration error before any stage runs.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let generator = ContentGenerator::new(
            llm::generator_from_config(config)?,
            config.max_output_tokens,
        );
        let resolver = MediaResolver::new(
            Box::new(SerpApiImageSearch::new(config.serpapi_key()?, config.timeout_ms)?),
            Box::new(HttpMediaFetcher::new(config.timeout_ms)?),
        )
        .with_max_candidates(config.max_candidates)
        .with_workers(config.media_workers);

        info!(
            "Pipeline ready: {} backend, {} media workers",
            generator.backend_name(),
            config.media_workers
        );

        Ok(Self::new(
            generator,
            resolver,
            DeckRenderer::new(config.render_config()),
            config.output_dir.clone(),
        ))
    }

    pub fn with_observer(mut self, observer: impl Fn(&Progress) + Send + Sync + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn notify(&self, progress: Progress) {
        if let Some(observer) = &self.observer {
            observer(&progress);
        }
    }

    /// Produce a deck at the default location inside the output directory.
    pub fn produce(&self, request: &TopicRequest) -> Result<PathBuf> {
        self.produce_to(request, None)
    }

    /// Produce a deck, writing it to `path` when given.
    pub fn produce_to(&self, request: &TopicRequest, path: Option<PathBuf>) -> Result<PathBuf> {
        let result = self.assemble(request, path).and_then(|deck| {
            self.notify(Progress::Rendering);
            self.renderer.render(deck)
        });

        match &result {
            Ok(path) => {
                info!("Deck for {:?} written to {:?}", request.subject, path);
                self.notify(Progress::Finished { path: path.clone() });
            }
            Err(e) => error!("Deck for {:?} failed ({}): {}", request.subject, e.kind(), e),
        }
        result
    }

    /// Run generation and media resolution, returning the deck that would be
    /// rendered.
    pub fn assemble(&self, request: &TopicRequest, path: Option<PathBuf>) -> Result<Deck> {
        request.validate()?;

        self.notify(Progress::GeneratingContent);
        let content = self.generator.generate(request)?;
        self.notify(Progress::ContentReady {
            slides: content.slides.len(),
        });

        let slides = self.resolver.resolve_all(
            content.slides,
            Some(&request.subject),
            &|slide, total| self.notify(Progress::ResolvingMedia { slide, total }),
        );

        let fallbacks = slides.iter().filter(|s| s.media.is_fallback()).count();
        info!(
            "Resolved media for {} slides ({} placeholders)",
            slides.len(),
            fallbacks
        );

        let path = path.unwrap_or_else(|| {
            utils::default_output_path(&self.output_dir, &request.subject, chrono::Utc::now())
        });

        Ok(Deck {
            title: content.title,
            summary: content.summary,
            slides,
            path,
        })
    }
}
