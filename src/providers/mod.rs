//! Scoring providers.
//!
//! This module provides the [`ScoringProvider`](crate::traits::ScoringProvider)
//! implementations:
//! - [`FixtureProvider`]: Canned payloads, keyword-routed or fixed
//! - [`HeuristicProvider`]: Indicator-count model
//! - [`LlmProvider`]: Anthropic-backed model assessment

mod fixture;
mod heuristic;
mod llm;
mod prompts;

pub use fixture::{
    high_credibility, low_credibility, medium_credibility, FixtureProvider,
    HIGH_CREDIBILITY_KEYWORDS, LOW_CREDIBILITY_KEYWORDS,
};
pub use heuristic::{
    HeuristicProvider, IndicatorHits, CREDIBLE_INDICATORS, FAKE_INDICATORS, HEURISTIC_CONFIDENCE,
};
pub use llm::{LlmProvider, ASSESSMENT_MAX_TOKENS};
pub use prompts::{
    credibility_system_prompt, document_message, MAX_PROMPT_BYTES, MAX_TITLE_BYTES,
};

use crate::contract::Verdict;

const LOW_EXPLANATION: &str = "This article contains several characteristics of potential misinformation, including exaggerated claims, emotional language, and limited credible sources. The content makes assertions without proper evidence and uses sensationalist headlines.";

const MEDIUM_EXPLANATION: &str = "This article contains a mix of credible and questionable elements. While some information appears accurate, there are instances of misleading presentation, selective facts, or exaggeration. Exercise caution when sharing or acting on this information.";

const HIGH_EXPLANATION: &str = "This article appears to be credible based on our analysis. It cites reputable sources, presents balanced information, and avoids sensationalist language. The claims made are supported by evidence and expert opinions.";

const LOW_SUGGESTIONS: [&str; 4] = [
    "Verify this information with more established news sources",
    "Look for articles that cite specific studies or experts",
    "Check if other reputable outlets are reporting the same information",
    "Be cautious of claims that seem too dramatic or emotional",
];

const MEDIUM_SUGGESTIONS: [&str; 4] = [
    "Look for more comprehensive coverage of this topic",
    "Pay attention to potential biases in presentation",
    "Consider whether important context might be missing",
    "Check if the article distinguishes clearly between facts and opinions",
];

const HIGH_SUGGESTIONS: [&str; 4] = [
    "Always cross-reference information with multiple sources",
    "Continue to evaluate the credibility of sources",
    "Consider the context and timing of the information",
    "Be aware that even credible sources can contain biases",
];

/// Explanation and suggestions for a verdict band.
pub(crate) const fn guidance(verdict: Verdict) -> (&'static str, &'static [&'static str]) {
    match verdict {
        Verdict::LikelyFake => (LOW_EXPLANATION, &LOW_SUGGESTIONS),
        Verdict::PotentiallyMisleading => (MEDIUM_EXPLANATION, &MEDIUM_SUGGESTIONS),
        Verdict::LikelyCredible => (HIGH_EXPLANATION, &HIGH_SUGGESTIONS),
    }
}
