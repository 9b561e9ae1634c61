// ABOUTME: Media resolution for the finance-deck application
// ABOUTME: Turns each slide's visual intent into an embedded image or the placeholder

use crate::errors::{DeckError, Result};
use crate::model::{EmbeddedImage, ImageFormat, ResolvedMedia, ResolvedSlide, SlideOutline};
use crate::resources::{MediaFetcher, MediaReference};
use crate::search::ImageSearch;
use image::io::Reader as ImageReader;
use log::{debug, info, warn};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

/// Resolves visual intents to images. Never fails: any lookup problem turns
/// into a placeholder for that slide only.
pub struct MediaResolver {
    search: Box<dyn ImageSearch>,
    fetcher: Box<dyn MediaFetcher>,
    max_candidates: usize,
    workers: usize,
}

impl MediaResolver {
    pub fn new(search: Box<dyn ImageSearch>, fetcher: Box<dyn MediaFetcher>) -> Self {
        Self {
            search,
            fetcher,
            max_candidates: crate::config::DEFAULT_MAX_CANDIDATES,
            workers: 1,
        }
    }

    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.max_candidates = max_candidates.max(1);
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Resolve one outline using only its own visual intent.
    pub fn resolve(&self, outline: SlideOutline) -> ResolvedSlide {
        self.resolve_in_context(outline, None)
    }

    /// Resolve one outline, adding the deck subject to the search query.
    pub fn resolve_in_context(&self, outline: SlideOutline, subject: Option<&str>) -> ResolvedSlide {
        let query = image_query(&outline.visual_intent, subject);
        let media = match self.lookup(&query) {
            Ok(media) => media,
            Err(e) => {
                warn!(
                    "No image for slide {:?} ({}); using placeholder",
                    outline.title, e
                );
                ResolvedMedia::placeholder(query)
            }
        };
        ResolvedSlide { outline, media }
    }

    /// Resolve every outline. Output order equals input order.
    pub fn resolve_all(
        &self,
        outlines: Vec<SlideOutline>,
        subject: Option<&str>,
        progress: &(dyn Fn(usize, usize) + Sync),
    ) -> Vec<ResolvedSlide> {
        let total = outlines.len();
        if self.workers <= 1 || total <= 1 {
            return outlines
                .into_iter()
                .enumerate()
                .map(|(i, outline)| {
                    let resolved = self.resolve_in_context(outline, subject);
                    progress(i + 1, total);
                    resolved
                })
                .collect();
        }

        let queue = Mutex::new(outlines.into_iter().enumerate().collect::<VecDeque<_>>());
        let results: Mutex<Vec<Option<ResolvedSlide>>> = Mutex::new((0..total).map(|_| None).collect());
        let done = AtomicUsize::new(0);

        thread::scope(|scope| {
            for _ in 0..self.workers.min(total) {
                scope.spawn(|| loop {
                    let next = queue.lock().pop_front();
                    let Some((index, outline)) = next else {
                        break;
                    };
                    let resolved = self.resolve_in_context(outline, subject);
                    results.lock()[index] = Some(resolved);
                    progress(done.fetch_add(1, Ordering::SeqCst) + 1, total);
                });
            }
        });

        results.into_inner().into_iter().flatten().collect()
    }

    fn lookup(&self, query: &str) -> Result<ResolvedMedia> {
        let candidates = self.search.search(query, self.max_candidates)?;
        if candidates.is_empty() {
            return Err(DeckError::MediaLookupError(format!(
                "no results for {:?}",
                query
            )));
        }

        for candidate in candidates.iter().take(self.max_candidates) {
            match self.load_candidate(candidate) {
                Ok(image) => {
                    info!("Resolved {:?} to {}", query, candidate);
                    return Ok(ResolvedMedia::found(query, candidate.as_str(), image));
                }
                Err(e) => debug!("Skipping candidate {}: {}", candidate, e),
            }
        }

        Err(DeckError::MediaLookupError(format!(
            "none of {} candidates for {:?} was usable",
            candidates.len().min(self.max_candidates),
            query
        )))
    }

    fn load_candidate(&self, candidate: &str) -> Result<EmbeddedImage> {
        MediaReference::parse(candidate)?;
        let bytes = self.fetcher.fetch(candidate)?;
        load_image(bytes)
    }
}

/// Search query for a visual intent.
pub fn image_query(visual_intent: &str, subject: Option<&str>) -> String {
    let intent = visual_intent.trim();
    match subject.map(str::trim).filter(|s| !s.is_empty()) {
        Some(subject) => format!("{} finance {}", intent, subject),
        None => format!("{} finance", intent),
    }
}

/// Validate image bytes. PNG, JPEG and GIF pass through; anything else the
/// `image` crate can decode is re-encoded as PNG.
pub fn load_image(bytes: Vec<u8>) -> Result<EmbeddedImage> {
    let guessed = image::guess_format(&bytes)?;
    let native = match guessed {
        image::ImageFormat::Png => Some(ImageFormat::Png),
        image::ImageFormat::Jpeg => Some(ImageFormat::Jpeg),
        image::ImageFormat::Gif => Some(ImageFormat::Gif),
        _ => None,
    };

    if let Some(format) = native {
        let (width, height) =
            ImageReader::with_format(Cursor::new(&bytes), guessed).into_dimensions()?;
        return Ok(EmbeddedImage {
            bytes,
            format,
            width,
            height,
        });
    }

    let rgba = image::load_from_memory_with_format(&bytes, guessed)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut png = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(rgba).write_to(&mut png, image::ImageOutputFormat::Png)?;

    Ok(EmbeddedImage {
        bytes: png.into_inner(),
        format: ImageFormat::Png,
        width,
        height,
    })
}
