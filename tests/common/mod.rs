// ABOUTME: Shared fixtures for the finance-deck integration tests
// ABOUTME: Stub backends and helpers for inspecting generated PPTX packages

#![allow(dead_code)]

use finance_deck::{
    Completion, ContentGenerator, DeckError, DeckPipeline, DeckRenderer, ImageSearch,
    MediaFetcher, MediaResolver, Result, TextGenerator,
};
use image::{ImageBuffer, Rgb};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use zip::ZipArchive;

/// Language model that always answers with the same completion.
pub struct StubLlm {
    pub reply: String,
    pub truncated: bool,
    pub calls: Arc<AtomicUsize>,
}

impl StubLlm {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            truncated: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl TextGenerator for StubLlm {
    fn name(&self) -> &str {
        "stub"
    }

    fn complete(&self, _prompt: &str, _max_tokens: u32) -> Result<Completion> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Completion {
            text: self.reply.clone(),
            truncated: self.truncated,
        })
    }
}

/// Language model that is unreachable.
pub struct FailingLlm;

impl TextGenerator for FailingLlm {
    fn name(&self) -> &str {
        "failing"
    }

    fn complete(&self, _prompt: &str, _max_tokens: u32) -> Result<Completion> {
        Err(DeckError::BackendError("HTTP 503: upstream unavailable".to_string()))
    }
}

/// Image search returning one URL per query, derived from the slide number in
/// the query. Queries containing any `empty_for` marker get no results.
#[derive(Default)]
pub struct StubSearch {
    pub empty_for: Vec<String>,
}

impl ImageSearch for StubSearch {
    fn search(&self, query: &str, _limit: usize) -> Result<Vec<String>> {
        if self.empty_for.iter().any(|marker| query.contains(marker.as_str())) {
            return Ok(Vec::new());
        }
        let number = slide_number(query).unwrap_or(0);
        Ok(vec![format!("https://images.example.com/slide-{}.png", number)])
    }
}

/// Fetcher producing a PNG whose width encodes the slide number of the URL.
pub struct StubFetcher;

impl MediaFetcher for StubFetcher {
    fn fetch(&self, reference: &str) -> Result<Vec<u8>> {
        let number = slide_number(reference).unwrap_or(0);
        Ok(png_bytes(10 + number, 10))
    }
}

/// The number following "slide " or "slide-" in `text`.
pub fn slide_number(text: &str) -> Option<u32> {
    let lower = text.to_lowercase();
    let start = lower
        .find("slide ")
        .or_else(|| lower.find("slide-"))
        .map(|i| i + "slide ".len())?;
    let digits: String = lower[start..].chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = ImageBuffer::from_fn(width, height, |x, _| Rgb([(x * 7) as u8, 90u8, 160u8]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageOutputFormat::Png)
        .expect("Failed to encode PNG");
    out.into_inner()
}

/// Slide titles used by the fixture decks.
pub const SECTION_TITLES: [&str; 5] = [
    "Revenue Analysis",
    "Cost Structure",
    "Cash Flow & Liquidity",
    "Risk Assessment",
    "Strategic Outlook",
];

pub fn slide_title(number: usize) -> String {
    format!(
        "{} {}",
        SECTION_TITLES[(number - 1) % SECTION_TITLES.len()],
        number
    )
}

/// A well-formed model reply with `count` slides. Slide `n` has `4 + n % 3`
/// bullets and the visual intent "photo for slide n".
pub fn outline_reply(count: usize) -> String {
    let slides: Vec<serde_json::Value> = (1..=count)
        .map(|n| {
            let bullets: Vec<String> = (1..=(4 + n % 3))
                .map(|b| format!("• Insight {} for slide {}", b, n))
                .collect();
            serde_json::json!({
                "title": slide_title(n),
                "bullets": bullets,
                "visual_intent": format!("photo for slide {}", n),
            })
        })
        .collect();

    let reply = serde_json::json!({
        "presentation_title": "Q3 Revenue Outlook",
        "slides": slides,
    });
    format!("```json\n{}\n```", reply)
}

pub fn pipeline_with(
    llm: Box<dyn TextGenerator>,
    search: StubSearch,
    output_dir: &Path,
    workers: usize,
) -> DeckPipeline {
    let resolver = MediaResolver::new(Box::new(search), Box::new(StubFetcher)).with_workers(workers);
    DeckPipeline::new(
        ContentGenerator::new(llm, 4000),
        resolver,
        DeckRenderer::default(),
        output_dir,
    )
}

/// What a slide part contains, as seen by a reader of the package.
#[derive(Debug, Default)]
pub struct SlideSummary {
    pub title: String,
    pub bullets: Vec<String>,
    pub caption: Option<String>,
    pub picture_descriptions: Vec<String>,
    pub elements: Vec<String>,
}

pub fn open_package(path: &Path) -> ZipArchive<File> {
    let file = File::open(path).expect("Failed to open PPTX file");
    ZipArchive::new(file).expect("Failed to read PPTX as ZIP")
}

pub fn read_part(archive: &mut ZipArchive<File>, name: &str) -> Vec<u8> {
    let mut part = archive
        .by_name(name)
        .unwrap_or_else(|_| panic!("Missing part {}", name));
    let mut bytes = Vec::new();
    part.read_to_end(&mut bytes).expect("Failed to read part");
    bytes
}

pub fn read_text_part(archive: &mut ZipArchive<File>, name: &str) -> String {
    String::from_utf8(read_part(archive, name)).expect("Part is not UTF-8")
}

pub fn slide_count(archive: &ZipArchive<File>) -> usize {
    archive
        .file_names()
        .filter(|n| n.starts_with("ppt/slides/slide") && n.ends_with(".xml"))
        .count()
}

/// Walk a slide part with quick-xml and collect its text by shape.
pub fn summarize_slide(xml: &str) -> SlideSummary {
    let mut reader = Reader::from_str(xml);
    let mut summary = SlideSummary::default();
    let mut shape = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if name == "p:cNvPr" {
                    if let Ok(Some(attr)) = e.try_get_attribute("name") {
                        shape = attr.unescape_value().expect("bad attribute").to_string();
                    }
                    if let Ok(Some(attr)) = e.try_get_attribute("descr") {
                        summary
                            .picture_descriptions
                            .push(attr.unescape_value().expect("bad attribute").to_string());
                    }
                }
                in_text = name == "a:t";
                summary.elements.push(name);
            }
            Ok(Event::Text(t)) if in_text => {
                let text = t.unescape().expect("bad text").to_string();
                match shape.as_str() {
                    "Title" => summary.title.push_str(&text),
                    "Content" => summary.bullets.push(text),
                    "Caption" => summary.caption = Some(text),
                    _ => {}
                }
            }
            Ok(Event::End(_)) => in_text = false,
            Ok(Event::Eof) => break,
            Err(e) => panic!("Invalid slide XML at {}: {}", reader.buffer_position(), e),
            _ => {}
        }
    }
    summary
}

pub fn slide_summary(archive: &mut ZipArchive<File>, number: usize) -> SlideSummary {
    let xml = read_text_part(archive, &format!("ppt/slides/slide{}.xml", number));
    summarize_slide(&xml)
}

/// The media target referenced by a slide's relationships.
pub fn slide_media_target(archive: &mut ZipArchive<File>, number: usize) -> String {
    let rels = read_text_part(archive, &format!("ppt/slides/_rels/slide{}.xml.rels", number));
    let start = rels.find("../media/").expect("slide has no media relationship");
    let rest = &rels[start + "../media/".len()..];
    rest[..rest.find('"').expect("unterminated target")].to_string()
}

pub fn files_in(dir: &Path) -> Vec<String> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .map(|e| e.expect("bad entry").file_name().to_string_lossy().to_string())
            .collect(),
        Err(_) => Vec::new(),
    }
}
