// ABOUTME: Content generation for the finance-deck application
// ABOUTME: Builds the slide prompt, calls the language model and parses slide outlines

use crate::errors::{DeckError, Result};
use crate::llm::TextGenerator;
use crate::model::{
    GeneratedContent, SlideOutline, TopicRequest, MAX_BULLETS, MIN_BULLETS,
};
use log::{debug, info, warn};
use serde::Deserialize;

/// Words that mark a visual intent as a chart or table request.
const DATA_VISUAL_WORDS: [&str; 10] = [
    "chart", "charts", "graph", "graphs", "table", "tables", "plot", "plots", "histogram",
    "infographic",
];

/// Produces slide outlines by asking a language model.
pub struct ContentGenerator {
    backend: Box<dyn TextGenerator>,
    max_output_tokens: u32,
}

impl ContentGenerator {
    pub fn new(backend: Box<dyn TextGenerator>, max_output_tokens: u32) -> Self {
        Self {
            backend,
            max_output_tokens,
        }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Generate outlines for `request` with exactly one backend call.
    pub fn generate(&self, request: &TopicRequest) -> Result<GeneratedContent> {
        request.validate()?;

        let prompt = build_prompt(request);
        info!(
            "Requesting {} slides about {:?} from {} (max {} tokens)",
            request.slide_count,
            request.subject,
            self.backend.name(),
            self.max_output_tokens
        );
        debug!("Prompt:\n{}", prompt);

        let completion = self.backend.complete(&prompt, self.max_output_tokens)?;
        if completion.truncated {
            return Err(DeckError::TokenBudgetExceeded {
                max_tokens: self.max_output_tokens,
            });
        }

        let content = parse_outlines(&completion.text, request)?;
        info!("Parsed {} slide outlines", content.slides.len());
        Ok(content)
    }
}

/// Render the single prompt sent to the backend.
pub fn build_prompt(request: &TopicRequest) -> String {
    let storyline = match request.presentation_type {
        Some(kind) => {
            let sections: Vec<String> = kind
                .sections()
                .iter()
                .map(|section| format!("- {}", section))
                .collect();
            format!(
                "\nPresentation type: {label}\nUse these sections as the storyline, in order, adapting them to {count} slides:\n{sections}\n",
                label = kind.label(),
                count = request.slide_count,
                sections = sections.join("\n"),
            )
        }
        None => String::new(),
    };

    format!(
        r#"You are a financial analyst preparing a professional presentation.

Topic: {subject}
Audience: {audience}
Number of slides: {count}
{storyline}
Write exactly {count} content slides. For every slide provide:
- "title": a concise slide title
- "bullets": between {min} and {max} informative bullet points, each a complete sentence without a leading bullet symbol
- "visual_intent": a short description of a professional stock photograph that fits the slide

Also provide "executive_summary": one or two sentences summarising the whole presentation.

Do not describe charts, graphs or tables anywhere. Every slide is illustrated by a photograph only.

Respond with JSON only, using this shape:
{{"presentation_title": "...", "executive_summary": "...", "slides": [{{"title": "...", "bullets": ["..."], "visual_intent": "..."}}]}}"#,
        subject = request.subject.trim(),
        audience = request.audience(),
        count = request.slide_count,
        storyline = storyline,
        min = MIN_BULLETS,
        max = MAX_BULLETS,
    )
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPayload {
    Deck(RawDeck),
    Slides(Vec<RawSlide>),
}

#[derive(Deserialize)]
struct RawDeck {
    #[serde(default, alias = "title")]
    presentation_title: Option<String>,
    #[serde(default, alias = "summary")]
    executive_summary: Option<String>,
    slides: Vec<RawSlide>,
}

#[derive(Deserialize)]
struct RawSlide {
    #[serde(default)]
    title: Option<String>,
    #[serde(default, alias = "content", alias = "bullet_points")]
    bullets: Vec<String>,
    #[serde(default, alias = "image_description", alias = "image_query")]
    visual_intent: Option<String>,
}

/// Parse a completion into exactly `request.slide_count` outlines.
pub fn parse_outlines(text: &str, request: &TopicRequest) -> Result<GeneratedContent> {
    let json = extract_json(text).ok_or_else(|| {
        DeckError::FormatError("response does not contain valid JSON".to_string())
    })?;

    let payload: RawPayload = serde_json::from_str(json)
        .map_err(|e| DeckError::FormatError(format!("invalid slide JSON: {}", e)))?;

    let (title, summary, raw_slides) = match payload {
        RawPayload::Deck(deck) => (deck.presentation_title, deck.executive_summary, deck.slides),
        RawPayload::Slides(slides) => (None, None, slides),
    };

    if raw_slides.len() < request.slide_count {
        return Err(DeckError::FormatError(format!(
            "expected {} slides, got {}",
            request.slide_count,
            raw_slides.len()
        )));
    }
    if raw_slides.len() > request.slide_count {
        warn!(
            "Model returned {} slides, keeping the first {}",
            raw_slides.len(),
            request.slide_count
        );
    }

    let slides = raw_slides
        .into_iter()
        .take(request.slide_count)
        .enumerate()
        .map(|(i, raw)| outline_from_raw(i + 1, raw))
        .collect::<Result<Vec<_>>>()?;

    let title = title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| format!("Financial Presentation: {}", request.subject.trim()));

    let summary = summary
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default_summary(request));

    Ok(GeneratedContent {
        title,
        summary,
        slides,
    })
}

fn outline_from_raw(number: usize, raw: RawSlide) -> Result<SlideOutline> {
    let title = raw
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| DeckError::FormatError(format!("slide {} has no title", number)))?;

    let mut bullets: Vec<String> = raw
        .bullets
        .iter()
        .map(|b| clean_bullet(b))
        .filter(|b| !b.is_empty())
        .collect();

    if bullets.len() < MIN_BULLETS {
        return Err(DeckError::FormatError(format!(
            "slide {} has {} bullets, need at least {}",
            number,
            bullets.len(),
            MIN_BULLETS
        )));
    }
    bullets.truncate(MAX_BULLETS);

    let visual_intent = sanitize_visual_intent(raw.visual_intent.as_deref().unwrap_or(""), &title);

    Ok(SlideOutline {
        title,
        bullets,
        visual_intent,
    })
}

fn default_summary(request: &TopicRequest) -> String {
    let kind = request
        .presentation_type
        .map(|kind| kind.label())
        .unwrap_or("presentation");
    format!(
        "This {} covers {} for {}.",
        kind,
        request.subject.trim(),
        request.audience()
    )
}

/// Slice the JSON value out of a completion that may carry code fences or
/// prose. Each `{` or `[` is tried as a start, paired with the last matching
/// closer, until one span is valid JSON.
pub(crate) fn extract_json(text: &str) -> Option<&str> {
    text.char_indices()
        .filter(|(_, c)| *c == '{' || *c == '[')
        .filter_map(|(start, opener)| {
            let closer = if opener == '{' { '}' } else { ']' };
            let end = text.rfind(closer)?;
            (end > start).then(|| &text[start..=end])
        })
        .find(|span| serde_json::from_str::<serde::de::IgnoredAny>(span).is_ok())
}

/// Strip leading bullet glyphs the model adds despite being asked not to.
pub fn clean_bullet(raw: &str) -> String {
    let mut text = raw.trim();
    loop {
        let rest = if let Some(rest) = text.strip_prefix('•') {
            rest
        } else if let Some(rest) = text.strip_prefix("- ").or_else(|| text.strip_prefix("* ")) {
            rest
        } else {
            break;
        };
        text = rest.trim_start();
    }
    text.trim().to_string()
}

fn asks_for_data_visual(intent: &str) -> bool {
    intent
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| DATA_VISUAL_WORDS.contains(&word.to_lowercase().as_str()))
}

/// Keep an intent that describes imagery; replace empty or chart/table
/// intents with a stock-photo description derived from the title.
pub fn sanitize_visual_intent(intent: &str, title: &str) -> String {
    let intent = intent.trim();
    if intent.is_empty() {
        return intent_for_title(title);
    }
    if asks_for_data_visual(intent) {
        debug!("Replacing data visual intent {:?} for slide {:?}", intent, title);
        return intent_for_title(title);
    }
    intent.to_string()
}

/// Stock-photo description for a slide title.
pub fn intent_for_title(title: &str) -> String {
    let t = title.to_lowercase();
    let topic = if t.contains("revenue") || t.contains("market share") {
        "business revenue growth and financial success"
    } else if t.contains("performance") || t.contains("growth") {
        "business performance and growth trends"
    } else if t.contains("financial") || t.contains("projections") {
        "financial planning and business projections"
    } else if t.contains("risk") || t.contains("volatility") {
        "business risk management and strategy"
    } else if t.contains("cash flow") {
        "cash flow management in business"
    } else if t.contains("profitability") || t.contains("margin") {
        "business profitability and financial margins"
    } else if t.contains("balance sheet") {
        "financial balance and business stability"
    } else if t.contains("market position") {
        "market positioning and competitive business landscape"
    } else if t.contains("strategic") || t.contains("outlook") {
        "business strategy and future outlook"
    } else {
        return format!("professional stock image of {} in finance and business", t.trim());
    };
    format!("professional stock image of {}", topic)
}
