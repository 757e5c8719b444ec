//! Keyword-count scoring provider.
//!
//! Scores a document by the share of sensational and credibility
//! indicators it contains.

use async_trait::async_trait;

use super::guidance;
use crate::contract::{Assessment, CategoryScore, Document, Verdict};
use crate::error::AnalysisError;
use crate::traits::ScoringProvider;

/// Phrases typical of sensational or manipulative writing.
pub const FAKE_INDICATORS: [&str; 5] = [
    "shocking",
    "miracle",
    "secret",
    "conspiracy",
    "they don't want you to know",
];

/// Phrases typical of sourced, evidence-based writing.
pub const CREDIBLE_INDICATORS: [&str; 5] =
    ["study", "research", "according to", "expert", "evidence"];

/// Confidence reported for every heuristic assessment.
pub const HEURISTIC_CONFIDENCE: f64 = 0.85;

/// Neutral bias score; the heuristic has no bias signal.
const NEUTRAL_BIAS: f64 = 0.5;

/// Indicator counts for one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorHits {
    /// Number of fake indicators present.
    pub fake: usize,
    /// Number of credible indicators present.
    pub credible: usize,
}

impl IndicatorHits {
    /// Count indicators in `text`, case-insensitively.
    #[must_use]
    pub fn count(text: &str) -> Self {
        let lower = text.to_lowercase();
        let hits = |indicators: &[&str]| indicators.iter().filter(|i| lower.contains(*i)).count();
        Self {
            fake: hits(&FAKE_INDICATORS),
            credible: hits(&CREDIBLE_INDICATORS),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn ratios(self) -> (f64, f64) {
        (
            self.fake as f64 / FAKE_INDICATORS.len() as f64,
            self.credible as f64 / CREDIBLE_INDICATORS.len() as f64,
        )
    }
}

/// Heuristic provider. Stateless and cheap.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicProvider;

impl HeuristicProvider {
    /// Create a new heuristic provider.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Score `text`.
    #[must_use]
    pub fn score_text(text: &str) -> Assessment {
        let hits = IndicatorHits::count(text);
        let (fake, credible) = hits.ratios();
        let score = ((1.0 - fake + credible) / 2.0).clamp(0.0, 1.0);

        let categories = vec![
            CategoryScore::new("Clickbait Language", (fake * 1.5).min(1.0)),
            CategoryScore::new("Source Credibility", credible.max(0.1)),
            CategoryScore::new("Factual Content", (credible * 1.2).max(0.2).min(1.0)),
            CategoryScore::new("Emotional Manipulation", (fake * 1.3).min(1.0)),
            CategoryScore::new("Bias", NEUTRAL_BIAS),
        ];

        let (band, suggestions) = guidance(Verdict::from_score(score));
        let explanation = format!(
            "{band} Found {} of {} sensational indicators and {} of {} credibility indicators.",
            hits.fake,
            FAKE_INDICATORS.len(),
            hits.credible,
            CREDIBLE_INDICATORS.len()
        );

        Assessment {
            score,
            confidence: HEURISTIC_CONFIDENCE,
            categories,
            explanation,
            sources: Vec::new(),
            suggestions: suggestions.iter().map(ToString::to_string).collect(),
        }
    }
}

#[async_trait]
impl ScoringProvider for HeuristicProvider {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    async fn assess(&self, document: &Document) -> Result<Assessment, AnalysisError> {
        let mut text = document.text.clone();
        if let Some(title) = &document.title {
            text = format!("{title}\n{text}");
        }
        let assessment = Self::score_text(&text);
        tracing::debug!(
            score = assessment.score,
            chars = text.len(),
            "Heuristic assessment complete"
        );
        Ok(assessment)
    }
}
