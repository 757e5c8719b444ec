//! Canned-payload scoring provider.
//!
//! Routes on keywords in the document text to one of three fixed payloads.
//! Used as the default provider for local development and as a
//! deterministic backend for consumer tests.

use async_trait::async_trait;
use url::Url;

use super::guidance;
use crate::contract::{Assessment, CategoryScore, CredibilityLevel, Document, SourceRef, Verdict};
use crate::error::AnalysisError;
use crate::traits::ScoringProvider;

/// Keywords that select the low-credibility payload. Checked first.
pub const LOW_CREDIBILITY_KEYWORDS: [&str; 3] = ["fake", "miracle", "shocking"];

/// Keywords that select the high-credibility payload.
pub const HIGH_CREDIBILITY_KEYWORDS: [&str; 3] = ["study", "research", "science"];

#[derive(Debug, Clone)]
enum Mode {
    Keyword,
    Fixed(Box<Assessment>),
}

/// Provider returning canned assessments.
#[derive(Debug, Clone)]
pub struct FixtureProvider {
    mode: Mode,
}

impl FixtureProvider {
    /// Keyword-routed provider.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mode: Mode::Keyword,
        }
    }

    /// Provider that returns `assessment` for every document.
    #[must_use]
    pub fn fixed(assessment: Assessment) -> Self {
        Self {
            mode: Mode::Fixed(Box::new(assessment)),
        }
    }

    /// The payload selected for `text`.
    #[must_use]
    pub fn route(text: &str) -> Assessment {
        let lower = text.to_lowercase();
        if LOW_CREDIBILITY_KEYWORDS.iter().any(|k| lower.contains(k)) {
            low_credibility()
        } else if HIGH_CREDIBILITY_KEYWORDS.iter().any(|k| lower.contains(k)) {
            high_credibility()
        } else {
            medium_credibility()
        }
    }
}

impl Default for FixtureProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScoringProvider for FixtureProvider {
    fn name(&self) -> &'static str {
        "fixture"
    }

    async fn assess(&self, document: &Document) -> Result<Assessment, AnalysisError> {
        Ok(match &self.mode {
            Mode::Keyword => Self::route(&document.text),
            Mode::Fixed(assessment) => assessment.as_ref().clone(),
        })
    }
}

fn categories(scores: [f64; 5]) -> Vec<CategoryScore> {
    let [clickbait, source, factual, emotional, bias] = scores;
    vec![
        CategoryScore::new("Clickbait Language", clickbait),
        CategoryScore::new("Source Credibility", source),
        CategoryScore::new("Factual Content", factual),
        CategoryScore::new("Emotional Manipulation", emotional),
        CategoryScore::new("Bias", bias),
    ]
}

fn sources(refs: &[(&str, CredibilityLevel, f64)]) -> Vec<SourceRef> {
    refs.iter()
        .filter_map(|&(url, credibility, match_score)| {
            Url::parse(url)
                .ok()
                .map(|url| SourceRef::new(url, credibility, match_score))
        })
        .collect()
}

fn assessment(
    score: f64,
    confidence: f64,
    scores: [f64; 5],
    refs: &[(&str, CredibilityLevel, f64)],
) -> Assessment {
    let (explanation, suggestions) = guidance(Verdict::from_score(score));
    Assessment {
        score,
        confidence,
        categories: categories(scores),
        explanation: explanation.to_string(),
        sources: sources(refs),
        suggestions: suggestions.iter().map(ToString::to_string).collect(),
    }
}

/// Low-credibility payload (score 0.32).
#[must_use]
pub fn low_credibility() -> Assessment {
    assessment(
        0.32,
        0.87,
        [0.78, 0.21, 0.35, 0.64, 0.72],
        &[
            ("https://example.com/article1", CredibilityLevel::Low, 0.85),
            ("https://example.com/article2", CredibilityLevel::Medium, 0.65),
        ],
    )
}

/// Medium-credibility payload (score 0.58).
#[must_use]
pub fn medium_credibility() -> Assessment {
    assessment(
        0.58,
        0.76,
        [0.45, 0.62, 0.57, 0.41, 0.65],
        &[
            ("https://example.com/mixed1", CredibilityLevel::Medium, 0.75),
            ("https://example.com/mixed2", CredibilityLevel::High, 0.45),
        ],
    )
}

/// High-credibility payload (score 0.89).
#[must_use]
pub fn high_credibility() -> Assessment {
    assessment(
        0.89,
        0.92,
        [0.15, 0.91, 0.87, 0.12, 0.32],
        &[
            ("https://example.com/credible1", CredibilityLevel::High, 0.92),
            ("https://example.com/credible2", CredibilityLevel::High, 0.88),
        ],
    )
}
