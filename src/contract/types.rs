//! Contract data model.
//!
//! These types are the wire format of the analyzer service: field names
//! serialize in camelCase, scores are plain JSON numbers and timestamps are
//! ISO-8601 strings.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use super::verdict::Verdict;

/// Kind of content submitted for analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    /// An absolute URL pointing at an article.
    Url,
    /// Raw article text.
    Text,
}

impl InputType {
    /// Wire name of the input type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::Text => "text",
        }
    }
}

impl FromStr for InputType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "url" => Ok(Self::Url),
            "text" => Ok(Self::Text),
            other => Err(format!("unknown input type '{other}', expected url or text")),
        }
    }
}

impl std::fmt::Display for InputType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body of the analyze operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// URL or text to analyze. `content` is accepted as an alias.
    #[serde(alias = "content")]
    pub input: String,
    /// How `input` should be interpreted.
    #[serde(rename = "type")]
    pub input_type: InputType,
}

impl AnalysisRequest {
    /// Create a new request.
    #[must_use]
    pub fn new(input: impl Into<String>, input_type: InputType) -> Self {
        Self {
            input: input.into(),
            input_type,
        }
    }
}

/// Three-level credibility rating.
///
/// Used for corroborating sources and as the class of a [`Verdict`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum CredibilityLevel {
    /// Low credibility.
    Low,
    /// Medium credibility.
    Medium,
    /// High credibility.
    High,
}

impl FromStr for CredibilityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!(
                "unknown credibility '{other}', expected low, medium or high"
            )),
        }
    }
}

/// Score for one assessment dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    /// Dimension name, e.g. "Clickbait Language".
    pub name: String,
    /// Score in `[0, 1]`.
    pub score: f64,
}

impl CategoryScore {
    /// Create a new category score.
    #[must_use]
    pub fn new(name: impl Into<String>, score: f64) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// External reference the backend cross-checked against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    /// Absolute URI of the source.
    pub url: Url,
    /// Credibility rating of the source.
    pub credibility: CredibilityLevel,
    /// Match strength in `[0, 1]`.
    #[serde(rename = "match")]
    pub match_score: f64,
}

impl SourceRef {
    /// Create a new source reference.
    #[must_use]
    pub const fn new(url: Url, credibility: CredibilityLevel, match_score: f64) -> Self {
        Self {
            url,
            credibility,
            match_score,
        }
    }
}

/// What a scoring provider produces.
///
/// Every [`AnalysisResult`] field except the verdict, which the service
/// derives from `score`.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    /// Credibility score in `[0, 1]`.
    pub score: f64,
    /// Provider certainty in `[0, 1]`.
    pub confidence: f64,
    /// Per-dimension scores in display order.
    pub categories: Vec<CategoryScore>,
    /// Non-empty reasoning summary.
    pub explanation: String,
    /// Corroborating sources.
    pub sources: Vec<SourceRef>,
    /// Actionable guidance.
    pub suggestions: Vec<String>,
}

/// Output of a successful analyze call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Credibility score in `[0, 1]`; higher is more credible.
    pub score: f64,
    /// Label derived from `score`.
    pub verdict: Verdict,
    /// Provider certainty in `[0, 1]`, independent of `score`.
    pub confidence: f64,
    /// Per-dimension scores in display order.
    pub categories: Vec<CategoryScore>,
    /// Non-empty reasoning summary.
    pub explanation: String,
    /// Corroborating sources; may be empty.
    pub sources: Vec<SourceRef>,
    /// Actionable guidance; may be empty.
    pub suggestions: Vec<String>,
}

impl AnalysisResult {
    /// Build a result from a provider assessment, deriving the verdict.
    #[must_use]
    pub fn from_assessment(assessment: Assessment) -> Self {
        Self {
            verdict: Verdict::from_score(assessment.score),
            score: assessment.score,
            confidence: assessment.confidence,
            categories: assessment.categories,
            explanation: assessment.explanation,
            sources: assessment.sources,
            suggestions: assessment.suggestions,
        }
    }
}

/// Element of the history and recent lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    /// Opaque unique identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Completion time of the analysis.
    pub date: DateTime<Utc>,
    /// Credibility score in `[0, 1]`.
    pub score: f64,
    /// Submitted URL, for URL submissions only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<Url>,
    /// Short excerpt, for text submissions only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_snippet: Option<String>,
}

/// A history entry: the summary plus the full result it was derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRecord {
    /// Summary shown in lists.
    pub summary: AnalysisSummary,
    /// Full result as returned to the submitting caller.
    pub result: AnalysisResult,
}

/// Content handed to a scoring provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// How the content was submitted.
    pub input_type: InputType,
    /// Source URL for URL submissions.
    pub url: Option<Url>,
    /// Article title, when one was found.
    pub title: Option<String>,
    /// Article text.
    pub text: String,
}

impl Document {
    /// Document for a text submission.
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            input_type: InputType::Text,
            url: None,
            title: None,
            text: text.into(),
        }
    }

    /// Document fetched from a URL.
    #[must_use]
    pub fn from_url(url: Url, title: Option<String>, text: impl Into<String>) -> Self {
        Self {
            input_type: InputType::Url,
            url: Some(url),
            title,
            text: text.into(),
        }
    }
}
