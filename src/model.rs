// ABOUTME: Data model shared by the pipeline stages
// ABOUTME: Topic requests, slide outlines, resolved media and the final deck

use crate::errors::{DeckError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Upper bound on slides per deck.
pub const MAX_SLIDES: usize = 20;

/// Bullet count bounds per slide.
pub const MIN_BULLETS: usize = 4;
pub const MAX_BULLETS: usize = 6;

/// Source recorded on media that fell back to the built-in placeholder.
pub const PLACEHOLDER_SOURCE: &str = "builtin:placeholder.png";

pub const DEFAULT_AUDIENCE: &str = "Executive Leadership";

/// What the caller asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicRequest {
    pub subject: String,
    pub slide_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presentation_type: Option<PresentationType>,
}

impl TopicRequest {
    pub fn new(subject: impl Into<String>, slide_count: usize) -> Self {
        Self {
            subject: subject.into(),
            slide_count,
            audience: None,
            presentation_type: None,
        }
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    pub fn with_type(mut self, presentation_type: PresentationType) -> Self {
        self.presentation_type = Some(presentation_type);
        self
    }

    pub fn audience(&self) -> &str {
        self.audience
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .unwrap_or(DEFAULT_AUDIENCE)
    }

    pub fn validate(&self) -> Result<()> {
        if self.subject.trim().is_empty() {
            return Err(DeckError::ValidationError(
                "subject must not be empty".to_string(),
            ));
        }
        if self.slide_count == 0 || self.slide_count > MAX_SLIDES {
            return Err(DeckError::ValidationError(format!(
                "slide_count must be between 1 and {}, got {}",
                MAX_SLIDES, self.slide_count
            )));
        }
        Ok(())
    }
}

/// Storyline a deck follows. Each type suggests section themes for the
/// slides; it never changes the slide count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PresentationType {
    #[value(name = "quarterly_analysis")]
    QuarterlyAnalysis,
    #[value(name = "investment_proposal")]
    InvestmentProposal,
    #[value(name = "budget_planning")]
    BudgetPlanning,
}

impl PresentationType {
    pub fn label(&self) -> &'static str {
        match self {
            PresentationType::QuarterlyAnalysis => "quarterly analysis",
            PresentationType::InvestmentProposal => "investment proposal",
            PresentationType::BudgetPlanning => "budget plan",
        }
    }

    pub fn sections(&self) -> &'static [&'static str] {
        match self {
            PresentationType::QuarterlyAnalysis => &[
                "Executive Summary & Key Highlights",
                "Financial Performance Overview",
                "Revenue Analysis & Growth Trends",
                "Profitability & Margin Analysis",
                "Cash Flow & Liquidity Position",
                "Balance Sheet Strength",
                "Market Position & Competitive Analysis",
                "Risk Assessment & Mitigation",
                "Strategic Initiatives & Outlook",
            ],
            PresentationType::InvestmentProposal => &[
                "Investment Opportunity Overview",
                "Market Analysis & Size",
                "Financial Projections",
                "Revenue Model & Assumptions",
                "Competitive Landscape",
                "Risk Analysis & Mitigation",
                "Management Team & Execution",
                "Financial Requirements",
                "Expected Returns & Exit Strategy",
            ],
            PresentationType::BudgetPlanning => &[
                "Budget Overview & Objectives",
                "Revenue Forecasting",
                "Operating Expense Planning",
                "Capital Expenditure Analysis",
                "Cash Flow Projections",
                "Variance Analysis",
                "Scenario Planning",
                "Resource Allocation",
                "Performance Metrics",
            ],
        }
    }
}

/// Text content for one slide, before media resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideOutline {
    pub title: String,
    pub bullets: Vec<String>,
    pub visual_intent: String,
}

/// Output of the content generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedContent {
    pub title: String,
    /// One or two sentences summarising the deck.
    pub summary: String,
    pub slides: Vec<SlideOutline>,
}

/// Image formats the renderer embeds as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Gif => "gif",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
        }
    }
}

/// Validated image bytes ready to be embedded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedImage {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

/// The image attached to a slide.
///
/// Either a real hit (`fallback == false`, non-empty `source`, image bytes
/// present) or the placeholder (`fallback == true`, no bytes). The two
/// constructors are the only way to build one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMedia {
    query: String,
    source: String,
    fallback: bool,
    image: Option<EmbeddedImage>,
}

impl ResolvedMedia {
    pub fn found(query: impl Into<String>, source: impl Into<String>, image: EmbeddedImage) -> Self {
        let source = source.into();
        if source.trim().is_empty() {
            return Self::placeholder(query);
        }
        Self {
            query: query.into(),
            source,
            fallback: false,
            image: Some(image),
        }
    }

    pub fn placeholder(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            source: PLACEHOLDER_SOURCE.to_string(),
            fallback: true,
            image: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    pub fn image(&self) -> Option<&EmbeddedImage> {
        self.image.as_ref()
    }

    /// Drop the image bytes while keeping the reference. Only useful for
    /// exercising the renderer's handling of incomplete media.
    #[doc(hidden)]
    pub fn without_image(mut self) -> Self {
        self.image = None;
        self
    }
}

/// A slide outline together with its media.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSlide {
    pub outline: SlideOutline,
    pub media: ResolvedMedia,
}

/// Everything the renderer needs to write one presentation.
#[derive(Debug, Clone)]
pub struct Deck {
    pub title: String,
    pub summary: String,
    pub slides: Vec<ResolvedSlide>,
    pub path: PathBuf,
}
