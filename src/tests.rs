use super::*;
use crate::content::{
    build_prompt, clean_bullet, extract_json, intent_for_title, parse_outlines,
    sanitize_visual_intent,
};
use crate::media::{image_query, load_image};
use crate::model::PLACEHOLDER_SOURCE;
use crate::resources::MediaReference;
use crate::utils::{default_output_path, sanitize_file_stem, write_atomically};
use chrono::TimeZone;
use image::{ImageBuffer, Rgb};
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = ImageBuffer::from_fn(width, height, |_, _| Rgb([10u8, 120u8, 200u8]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageOutputFormat::Png)
        .expect("Failed to encode PNG");
    out.into_inner()
}

fn slide_json(title: &str, bullets: usize, intent: &str) -> String {
    let bullets: Vec<String> = (1..=bullets)
        .map(|i| format!("\"Point {} about {}\"", i, title))
        .collect();
    format!(
        r#"{{"title": "{}", "bullets": [{}], "visual_intent": "{}"}}"#,
        title,
        bullets.join(", "),
        intent
    )
}

fn deck_json(slides: &[String]) -> String {
    format!(
        r#"{{"presentation_title": "Quarterly Review", "slides": [{}]}}"#,
        slides.join(", ")
    )
}

struct ScriptedLlm {
    reply: Result<Completion>,
    calls: Arc<AtomicUsize>,
}

impl TextGenerator for ScriptedLlm {
    fn name(&self) -> &str {
        "scripted"
    }

    fn complete(&self, _prompt: &str, _max_tokens: u32) -> Result<Completion> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Ok(c) => Ok(c.clone()),
            Err(e) => Err(DeckError::BackendError(e.to_string())),
        }
    }
}

struct MapSearch {
    results: HashMap<String, Vec<String>>,
    fail: bool,
}

impl ImageSearch for MapSearch {
    fn search(&self, query: &str, limit: usize) -> Result<Vec<String>> {
        if self.fail {
            return Err(DeckError::MediaLookupError("search is down".to_string()));
        }
        Ok(self
            .results
            .get(query)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .take(limit)
            .collect())
    }
}

/// Serves PNG bytes for references containing "good", garbage otherwise.
struct PickyFetcher;

impl MediaFetcher for PickyFetcher {
    fn fetch(&self, reference: &str) -> Result<Vec<u8>> {
        if reference.contains("good") {
            Ok(png_bytes(8, 6))
        } else if reference.contains("garbage") {
            Ok(b"not an image at all".to_vec())
        } else {
            Err(DeckError::MediaLookupError("404".to_string()))
        }
    }
}

fn outline(title: &str, intent: &str) -> SlideOutline {
    SlideOutline {
        title: title.to_string(),
        bullets: (1..=4).map(|i| format!("Bullet {}", i)).collect(),
        visual_intent: intent.to_string(),
    }
}

fn resolver_with(results: &[(&str, &[&str])], fail: bool) -> MediaResolver {
    let results = results
        .iter()
        .map(|(q, urls)| (q.to_string(), urls.iter().map(|u| u.to_string()).collect()))
        .collect();
    MediaResolver::new(Box::new(MapSearch { results, fail }), Box::new(PickyFetcher))
}

// ---------------------------------------------------------------------------
// Topic requests
// ---------------------------------------------------------------------------

#[test]
fn test_topic_request_validation() {
    assert!(TopicRequest::new("Q3 Revenue Outlook", 5).validate().is_ok());
    assert!(TopicRequest::new("Q3 Revenue Outlook", 1).validate().is_ok());
    assert!(TopicRequest::new("Q3 Revenue Outlook", 20).validate().is_ok());

    for bad in [
        TopicRequest::new("   ", 5),
        TopicRequest::new("Topic", 0),
        TopicRequest::new("Topic", 21),
    ] {
        let err = bad.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    }
}

#[test]
fn test_topic_request_default_audience() {
    let request = TopicRequest::new("Budget", 3);
    assert_eq!(request.audience(), "Executive Leadership");

    let request = request.with_audience("Board of Directors");
    assert_eq!(request.audience(), "Board of Directors");
}

// ---------------------------------------------------------------------------
// Content generation
// ---------------------------------------------------------------------------

#[test]
fn test_prompt_encodes_request() {
    let request = TopicRequest::new("Q3 Revenue Outlook", 7).with_audience("Investors");
    let prompt = build_prompt(&request);

    assert!(prompt.contains("Topic: Q3 Revenue Outlook"));
    assert!(prompt.contains("Audience: Investors"));
    assert!(prompt.contains("Write exactly 7 content slides"));
    assert!(prompt.contains("between 4 and 6"));
    assert!(prompt.contains("visual_intent"));
    assert!(prompt.contains("Do not describe charts, graphs or tables"));
}

#[test]
fn test_prompt_follows_presentation_type() {
    let request = TopicRequest::new("FY25 Budget", 4).with_type(PresentationType::BudgetPlanning);
    let prompt = build_prompt(&request);

    assert!(prompt.contains("Presentation type: budget plan"));
    for section in PresentationType::BudgetPlanning.sections() {
        assert!(prompt.contains(&format!("- {}", section)), "missing {}", section);
    }
    assert!(prompt.contains("Write exactly 4 content slides"));
    assert!(prompt.contains("executive_summary"));

    let plain = build_prompt(&TopicRequest::new("FY25 Budget", 4));
    assert!(!plain.contains("Presentation type"));
    assert!(!plain.contains("Variance Analysis"));
}

#[test]
fn test_topic_request_reads_presentation_type() {
    let request: TopicRequest = serde_json::from_str(
        r#"{"subject": "Series B", "slide_count": 3, "presentation_type": "investment_proposal"}"#,
    )
    .unwrap();
    assert_eq!(request.presentation_type, Some(PresentationType::InvestmentProposal));
    assert!(request.validate().is_ok());

    let bad = serde_json::from_str::<TopicRequest>(
        r#"{"subject": "Series B", "slide_count": 3, "presentation_type": "pitch"}"#,
    );
    assert!(bad.is_err());
}

#[test]
fn test_parse_outlines_reads_executive_summary() {
    let request = TopicRequest::new("Q3 Revenue Outlook", 1).with_audience("Board");
    let text = r#"{"presentation_title": "Q3", "executive_summary": "  Revenue rose 12%.  ",
        "slides": [{"title": "Revenue", "bullets": ["a", "b", "c", "d"], "visual_intent": "x"}]}"#;
    let content = parse_outlines(text, &request).unwrap();
    assert_eq!(content.summary, "Revenue rose 12%.");

    let text = deck_json(&[slide_json("Revenue", 4, "x")]);
    let content = parse_outlines(&text, &request).unwrap();
    assert_eq!(content.summary, "This presentation covers Q3 Revenue Outlook for Board.");

    let request = request.with_type(PresentationType::QuarterlyAnalysis);
    let content = parse_outlines(&text, &request).unwrap();
    assert_eq!(
        content.summary,
        "This quarterly analysis covers Q3 Revenue Outlook for Board."
    );
}

#[test]
fn test_parse_outlines_well_formed_with_fences() {
    let request = TopicRequest::new("Q3 Revenue Outlook", 2);
    let body = deck_json(&[
        slide_json("Revenue Analysis", 5, "bankers shaking hands"),
        slide_json("Risk Assessment", 4, "storm clouds over a city skyline"),
    ]);
    let text = format!("Here you go:\n```json\n{}\n```\n", body);

    let content = parse_outlines(&text, &request).expect("should parse");
    assert_eq!(content.title, "Quarterly Review");
    assert_eq!(content.slides.len(), 2);
    assert_eq!(content.slides[0].title, "Revenue Analysis");
    assert_eq!(content.slides[0].bullets.len(), 5);
    assert_eq!(content.slides[1].visual_intent, "storm clouds over a city skyline");
}

#[test]
fn test_parse_outlines_accepts_aliases_and_bare_arrays() {
    let request = TopicRequest::new("Budget Planning", 1);
    let text = r#"[{"title": "Revenue Forecasting",
        "content": ["• First", "- Second", "* Third", "Fourth", "   "],
        "image_description": "calculator on a desk"}]"#;

    let content = parse_outlines(text, &request).expect("should parse");
    assert_eq!(content.title, "Financial Presentation: Budget Planning");
    let slide = &content.slides[0];
    assert_eq!(slide.bullets, vec!["First", "Second", "Third", "Fourth"]);
    assert_eq!(slide.visual_intent, "calculator on a desk");
}

#[test]
fn test_parse_outlines_truncates_long_bullet_lists() {
    let request = TopicRequest::new("Topic", 1);
    let text = deck_json(&[slide_json("Outlook", 9, "sunrise over office towers")]);

    let content = parse_outlines(&text, &request).unwrap();
    assert_eq!(content.slides[0].bullets.len(), 6);
    assert_eq!(content.slides[0].bullets[5], "Point 6 about Outlook");
}

#[test]
fn test_parse_outlines_rejects_short_bullet_lists() {
    let request = TopicRequest::new("Topic", 1);
    let text = deck_json(&[slide_json("Outlook", 3, "sunrise")]);

    let err = parse_outlines(&text, &request).unwrap_err();
    assert!(matches!(err, DeckError::FormatError(_)), "got {:?}", err);
}

#[test]
fn test_parse_outlines_slide_count_mismatch() {
    let request = TopicRequest::new("Topic", 3);
    let two = deck_json(&[
        slide_json("One", 4, "a"),
        slide_json("Two", 4, "b"),
    ]);
    assert!(matches!(
        parse_outlines(&two, &request),
        Err(DeckError::FormatError(_))
    ));

    let request = TopicRequest::new("Topic", 1);
    let content = parse_outlines(&two, &request).expect("extra slides are dropped");
    assert_eq!(content.slides.len(), 1);
    assert_eq!(content.slides[0].title, "One");
}

#[test]
fn test_parse_outlines_malformed_input() {
    let request = TopicRequest::new("Topic", 1);

    for text in [
        "I cannot help with that.",
        "{\"slides\": [",
        r#"{"slides": [{"bullets": ["a", "b", "c", "d"]}]}"#,
        r#"{"slides": "none"}"#,
    ] {
        let err = parse_outlines(text, &request).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Generation, "input {:?}", text);
        assert!(matches!(err, DeckError::FormatError(_)), "input {:?}", text);
    }
}

#[test]
fn test_extract_json() {
    assert_eq!(extract_json("xx {\"a\": 1} yy"), Some("{\"a\": 1}"));
    assert_eq!(extract_json("```json\n[1, 2]\n```"), Some("[1, 2]"));
    assert_eq!(extract_json("no json here"), None);
    assert_eq!(
        extract_json("Here are the slides [2 total]:\n{\"slides\": []}"),
        Some("{\"slides\": []}")
    );
}

#[test]
fn test_parse_outlines_skips_bracketed_preamble() {
    let request = TopicRequest::new("Q3 Revenue Outlook", 2);
    let text = format!(
        "Here are the slides [2 total]:\n{}",
        deck_json(&[
            slide_json("Revenue Analysis", 4, "bankers shaking hands"),
            slide_json("Risk Assessment", 4, "storm clouds"),
        ])
    );

    let content = parse_outlines(&text, &request).expect("should skip the bracketed note");
    assert_eq!(content.slides.len(), 2);
    assert_eq!(content.slides[1].title, "Risk Assessment");
}

#[test]
fn test_clean_bullet() {
    assert_eq!(clean_bullet("• Revenue grew"), "Revenue grew");
    assert_eq!(clean_bullet("•Revenue grew"), "Revenue grew");
    assert_eq!(clean_bullet("- • Costs fell"), "Costs fell");
    assert_eq!(clean_bullet("-5% margin compression"), "-5% margin compression");
    assert_eq!(clean_bullet("   "), "");
}

#[test]
fn test_chart_intents_are_replaced() {
    let intent = sanitize_visual_intent("bar chart of quarterly revenue", "Revenue Analysis");
    assert_eq!(
        intent,
        "professional stock image of business revenue growth and financial success"
    );

    let intent = sanitize_visual_intent("Table comparing margins", "Profitability & Margin");
    assert_eq!(
        intent,
        "professional stock image of business profitability and financial margins"
    );

    // "photograph" is not a graph.
    let intent = sanitize_visual_intent("photograph of a trading floor", "Markets");
    assert_eq!(intent, "photograph of a trading floor");

    let intent = sanitize_visual_intent("", "Team Overview");
    assert_eq!(
        intent,
        "professional stock image of team overview in finance and business"
    );
}

#[test]
fn test_intent_for_title_keywords() {
    assert!(intent_for_title("Cash Flow & Liquidity").contains("cash flow management"));
    assert!(intent_for_title("Balance Sheet Strength").contains("financial balance"));
    assert!(intent_for_title("Strategic Initiatives").contains("future outlook"));
    assert!(intent_for_title("Risk Assessment").contains("risk management"));
}

#[test]
fn test_generator_calls_backend_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let reply = deck_json(&[
        slide_json("One", 4, "a skyline"),
        slide_json("Two", 6, "a handshake"),
    ]);
    let generator = ContentGenerator::new(
        Box::new(ScriptedLlm {
            reply: Ok(Completion::new(reply)),
            calls: calls.clone(),
        }),
        4000,
    );

    let content = generator
        .generate(&TopicRequest::new("Topic", 2))
        .expect("should generate");
    assert_eq!(content.slides.len(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_generator_reports_token_budget() {
    let calls = Arc::new(AtomicUsize::new(0));
    let generator = ContentGenerator::new(
        Box::new(ScriptedLlm {
            reply: Ok(Completion {
                text: "{\"slides\": [{\"title\": \"One\"".to_string(),
                truncated: true,
            }),
            calls: calls.clone(),
        }),
        1234,
    );

    let err = generator.generate(&TopicRequest::new("Topic", 1)).unwrap_err();
    assert!(matches!(
        err,
        DeckError::TokenBudgetExceeded { max_tokens: 1234 }
    ));
    assert_eq!(err.kind(), ErrorKind::Generation);
}

#[test]
fn test_generator_skips_backend_for_invalid_request() {
    let calls = Arc::new(AtomicUsize::new(0));
    let generator = ContentGenerator::new(
        Box::new(ScriptedLlm {
            reply: Ok(Completion::new("{}")),
            calls: calls.clone(),
        }),
        4000,
    );

    assert!(generator.generate(&TopicRequest::new("Topic", 0)).is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

// ---------------------------------------------------------------------------
// Errors and configuration
// ---------------------------------------------------------------------------

#[test]
fn test_error_kinds() {
    assert_eq!(
        DeckError::ConfigError("x".into()).kind(),
        ErrorKind::Configuration
    );
    assert_eq!(
        DeckError::TimeoutError("x".into()).kind(),
        ErrorKind::Generation
    );
    assert_eq!(
        DeckError::MediaLookupError("x".into()).kind(),
        ErrorKind::MediaLookup
    );
    assert_eq!(
        DeckError::UnsupportedMedia("x".into()).kind(),
        ErrorKind::Render
    );
    assert!(!DeckError::MediaLookupError("x".into()).is_fatal());
    assert!(DeckError::FormatError("x".into()).is_fatal());
    assert_eq!(ErrorKind::Generation.to_string(), "generation");
}

#[test]
fn test_provider_selection_order() {
    let mut config = Config {
        anthropic_api_key: Some("anthropic-key".into()),
        gemini_api_key: Some("gemini-key".into()),
        ..Config::default()
    };
    let (provider, key) = config.select_provider().unwrap();
    assert_eq!(provider, LlmProvider::Anthropic);
    assert_eq!(key, "anthropic-key");

    config.openrouter_api_key = Some("router-key".into());
    assert_eq!(config.select_provider().unwrap().0, LlmProvider::OpenRouter);

    config.provider = Some(LlmProvider::Gemini);
    assert_eq!(config.select_provider().unwrap().0, LlmProvider::Gemini);
    assert_eq!(config.model_for(LlmProvider::Gemini), "gemini-1.5-pro");

    config.provider = Some(LlmProvider::OpenAi);
    let err = config.select_provider().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(err.to_string().contains("OPENAI_API_KEY"));
}

#[test]
fn test_config_validation() {
    let config = Config::default();
    assert_eq!(config.validate().unwrap_err().kind(), ErrorKind::Configuration);

    let config = Config {
        openai_api_key: Some("key".into()),
        ..Config::default()
    };
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("SERPAPI_API_KEY"));

    let config = Config {
        openai_api_key: Some("key".into()),
        serpapi_api_key: Some("serp".into()),
        ..Config::default()
    };
    assert!(config.validate().is_ok());
    assert_eq!(config.max_output_tokens, 4000);

    let config = Config {
        media_workers: 0,
        ..config
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_config_debug_masks_keys() {
    let config = Config {
        openai_api_key: Some("sk-live-1234567890abcd".into()),
        serpapi_api_key: Some("short".into()),
        ..Config::default()
    };
    let printed = format!("{:?}", config);

    assert!(!printed.contains("sk-live-1234567890abcd"), "{}", printed);
    assert!(printed.contains("sk-l...abcd"));
    assert!(printed.contains("Invalid key"));
    assert!(printed.contains("Not configured"));
    assert!(printed.contains("timeout_ms: 30000"));
}

#[test]
fn test_mask_api_key() {
    use crate::config::mask_api_key;
    assert_eq!(mask_api_key(None), "Not configured");
    assert_eq!(mask_api_key(Some("abc")), "Invalid key");
    assert_eq!(mask_api_key(Some("abcdwxyz")), "abcd...wxyz");
}

#[test]
fn test_numeric_settings_reject_garbage() {
    use crate::config::parse_setting;
    assert_eq!(parse_setting::<u64>("DECK_TIMEOUT_MS", None).unwrap(), None);
    assert_eq!(
        parse_setting::<u64>("DECK_TIMEOUT_MS", Some("5000".into())).unwrap(),
        Some(5000)
    );

    let err = parse_setting::<u64>("DECK_TIMEOUT_MS", Some("soon".into())).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(err.to_string().contains("DECK_TIMEOUT_MS"));
    assert!(err.to_string().contains("soon"));

    assert!(parse_setting::<usize>("DECK_MEDIA_WORKERS", Some("-2".into())).is_err());
    assert!(parse_setting::<u32>("DECK_MAX_OUTPUT_TOKENS", Some("4k".into())).is_err());
}

#[test]
fn test_provider_from_str() {
    assert_eq!("OpenAI".parse::<LlmProvider>().unwrap(), LlmProvider::OpenAi);
    assert_eq!("claude".parse::<LlmProvider>().unwrap(), LlmProvider::Anthropic);
    assert_eq!("google".parse::<LlmProvider>().unwrap(), LlmProvider::Gemini);
    assert!("mistral".parse::<LlmProvider>().is_err());
}

// ---------------------------------------------------------------------------
// Media
// ---------------------------------------------------------------------------

#[test]
fn test_media_reference_parse() {
    assert!(MediaReference::parse("https://example.com/a.png").unwrap().is_remote());
    assert!(!MediaReference::parse("/tmp/a.png").unwrap().is_remote());
    assert!(!MediaReference::parse("assets/a.png").unwrap().is_remote());
    assert!(MediaReference::parse("ftp://example.com/a.png").is_err());
    assert!(MediaReference::parse("data:image/png;base64,AAAA").is_err());
    assert!(MediaReference::parse("  ").is_err());
}

#[test]
fn test_image_query() {
    assert_eq!(
        image_query("city skyline", Some("Q3 Revenue Outlook")),
        "city skyline finance Q3 Revenue Outlook"
    );
    assert_eq!(image_query(" city skyline ", None), "city skyline finance");
}

#[test]
fn test_load_image_passthrough_and_reencode() {
    let png = png_bytes(30, 20);
    let image = load_image(png.clone()).expect("png should load");
    assert_eq!(image.format, model::ImageFormat::Png);
    assert_eq!((image.width, image.height), (30, 20));
    assert_eq!(image.bytes, png);

    let bmp = {
        let img = ImageBuffer::from_fn(5, 4, |_, _| Rgb([1u8, 2u8, 3u8]));
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut out, image::ImageOutputFormat::Bmp)
            .unwrap();
        out.into_inner()
    };
    let image = load_image(bmp).expect("bmp should be re-encoded");
    assert_eq!(image.format, model::ImageFormat::Png);
    assert_eq!((image.width, image.height), (5, 4));
    assert_eq!(&image.bytes[1..4], b"PNG");

    assert!(load_image(b"plain text".to_vec()).is_err());
}

#[test]
fn test_resolver_takes_first_usable_candidate() {
    let query = "bankers finance";
    let resolver = resolver_with(
        &[(
            query,
            &[
                "https://img.example.com/missing.png",
                "https://img.example.com/garbage.png",
                "https://img.example.com/good-1.png",
                "https://img.example.com/good-2.png",
            ],
        )],
        false,
    )
    .with_max_candidates(4);

    let slide = resolver.resolve(outline("Revenue", "bankers"));
    assert!(!slide.media.is_fallback());
    assert_eq!(slide.media.source(), "https://img.example.com/good-1.png");
    assert_eq!(slide.media.query(), query);
    assert!(slide.media.image().is_some());
}

#[test]
fn test_resolver_respects_candidate_limit() {
    let resolver = resolver_with(
        &[(
            "bankers finance",
            &[
                "https://img.example.com/missing.png",
                "https://img.example.com/good.png",
            ],
        )],
        false,
    )
    .with_max_candidates(1);

    let slide = resolver.resolve(outline("Revenue", "bankers"));
    assert!(slide.media.is_fallback());
}

#[test]
fn test_resolver_falls_back_on_empty_and_errors() {
    let resolver = resolver_with(&[], false);
    let slide = resolver.resolve(outline("Revenue", "bankers"));
    assert!(slide.media.is_fallback());
    assert_eq!(slide.media.source(), PLACEHOLDER_SOURCE);
    assert!(slide.media.image().is_none());

    let resolver = resolver_with(&[("bankers finance", &["https://img.example.com/good.png"])], true);
    let slide = resolver.resolve(outline("Revenue", "bankers"));
    assert!(slide.media.is_fallback());

    let resolver = resolver_with(
        &[("bankers finance", &["ftp://img.example.com/good.png"])],
        false,
    );
    let slide = resolver.resolve(outline("Revenue", "bankers"));
    assert!(slide.media.is_fallback());
}

#[test]
fn test_resolve_all_preserves_order_with_workers() {
    let intents: Vec<String> = (1..=9).map(|i| format!("intent {}", i)).collect();
    let results: Vec<(String, Vec<String>)> = intents
        .iter()
        .enumerate()
        .filter(|(i, _)| i % 3 != 1)
        .map(|(i, intent)| {
            (
                format!("{} finance Topic", intent),
                vec![format!("https://img.example.com/good-{}.png", i + 1)],
            )
        })
        .collect();
    let resolver = MediaResolver::new(
        Box::new(MapSearch {
            results: results.into_iter().collect(),
            fail: false,
        }),
        Box::new(PickyFetcher),
    )
    .with_workers(4);

    let outlines: Vec<SlideOutline> = intents
        .iter()
        .enumerate()
        .map(|(i, intent)| outline(&format!("Slide {}", i + 1), intent))
        .collect();

    let seen = AtomicUsize::new(0);
    let slides = resolver.resolve_all(outlines, Some("Topic"), &|_: usize, total: usize| {
        assert_eq!(total, 9);
        seen.fetch_add(1, Ordering::SeqCst);
    });

    assert_eq!(slides.len(), 9);
    assert_eq!(seen.load(Ordering::SeqCst), 9);
    for (i, slide) in slides.iter().enumerate() {
        assert_eq!(slide.outline.title, format!("Slide {}", i + 1));
        if i % 3 == 1 {
            assert!(slide.media.is_fallback(), "slide {} should fall back", i + 1);
        } else {
            assert_eq!(
                slide.media.source(),
                format!("https://img.example.com/good-{}.png", i + 1)
            );
        }
    }
}

#[test]
fn test_resolved_media_never_empty_without_fallback() {
    let image = load_image(png_bytes(2, 2)).unwrap();
    let media = ResolvedMedia::found("q", "   ", image);
    assert!(media.is_fallback());
    assert_eq!(media.source(), PLACEHOLDER_SOURCE);
}

// ---------------------------------------------------------------------------
// Utilities
// ---------------------------------------------------------------------------

#[test]
fn test_sanitize_file_stem() {
    assert_eq!(sanitize_file_stem("Q3 Revenue Outlook"), "Q3_Revenue_Outlook");
    assert_eq!(sanitize_file_stem("a/b\\c:d*e?f\"g<h>i|j"), "a_b_c_d_e_f_g_h_i_j");
    assert_eq!(sanitize_file_stem("line\nbreak"), "linebreak");
    assert_eq!(sanitize_file_stem("   "), "presentation");
    assert_eq!(sanitize_file_stem("50% margin plan"), "50__margin_plan");
    assert_eq!(sanitize_file_stem("M&A #1 review"), "M&A__1_review");
}

#[test]
fn test_default_output_path() {
    let now = chrono::Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
    let first = default_output_path(Path::new("output"), "Q3 Revenue Outlook", now);
    let second = default_output_path(Path::new("output"), "Q3 Revenue Outlook", now);

    assert_eq!(first.parent(), Some(Path::new("output")));
    let name = first.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("Q3_Revenue_Outlook_20240309_140507_"), "{}", name);
    assert!(name.ends_with(".pptx"));
    let id = &name["Q3_Revenue_Outlook_20240309_140507_".len()..name.len() - ".pptx".len()];
    assert_eq!(id.len(), 8);
    assert!(id.chars().all(|c| c.is_ascii_hexdigit()));

    assert_ne!(first, second, "same subject and second must not collide");
}

#[test]
fn test_write_atomically() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let target = dir.path().join("deck.pptx");

    write_atomically(&target, b"first").unwrap();
    write_atomically(&target, b"second").unwrap();
    assert_eq!(std::fs::read(&target).unwrap(), b"second");

    // Only the target remains, no temporary siblings.
    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);

    let missing_dir = dir.path().join("missing").join("deck.pptx");
    assert!(write_atomically(&missing_dir, b"data").is_err());
    assert!(!missing_dir.exists());
}
