//! Model-backed scoring provider.
//!
//! Sends the document to the Anthropic Messages API and parses a JSON
//! assessment from the reply.
//!
//! # Output Schema
//!
//! The model replies with either a full assessment:
//! - `score`, `confidence`: numbers in `[0, 1]`
//! - `categories`: `[{name, score}]`
//! - `explanation`: string
//! - `sources`: `[{url, credibility, match}]`, optional
//! - `suggestions`: `[string]`, optional
//!
//! or `{"unsupported": "<reason>"}` when the content cannot be assessed.

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use super::prompts::{credibility_system_prompt, document_message};
use crate::anthropic::extract_json;
use crate::contract::{Assessment, CategoryScore, CredibilityLevel, Document, SourceRef};
use crate::error::AnalysisError;
use crate::traits::{AnthropicClientTrait, CompletionConfig, Message, ScoringProvider};

/// Token budget for one assessment reply.
pub const ASSESSMENT_MAX_TOKENS: u32 = 2048;

/// Sampling temperature for assessments.
const ASSESSMENT_TEMPERATURE: f32 = 0.0;

#[derive(Debug, Deserialize)]
struct RawCategory {
    name: String,
    score: f64,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    url: String,
    credibility: String,
    #[serde(rename = "match")]
    match_score: f64,
}

#[derive(Debug, Deserialize)]
struct RawAssessment {
    score: f64,
    confidence: f64,
    categories: Vec<RawCategory>,
    explanation: String,
    #[serde(default)]
    sources: Vec<RawSource>,
    #[serde(default)]
    suggestions: Vec<String>,
}

/// Provider backed by a language model.
pub struct LlmProvider<C>
where
    C: AnthropicClientTrait,
{
    client: C,
}

impl<C> LlmProvider<C>
where
    C: AnthropicClientTrait,
{
    /// Create a provider over `client`.
    #[must_use]
    pub const fn new(client: C) -> Self {
        Self { client }
    }

    /// Turn a model reply into an assessment.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::UnsupportedContent`] when the model declined
    /// the content and [`AnalysisError::Unavailable`] when the reply is not
    /// a valid assessment.
    pub fn parse_reply(reply: &str) -> Result<Assessment, AnalysisError> {
        let json = extract_json(reply).ok_or_else(|| {
            tracing::warn!(reply_chars = reply.len(), "Model reply contained no JSON");
            AnalysisError::unavailable("model reply contained no JSON")
        })?;

        if let Some(reason) = json.get("unsupported") {
            let reason = reason
                .as_str()
                .filter(|r| !r.trim().is_empty())
                .unwrap_or("the content is not a news article");
            return Err(AnalysisError::unsupported(reason));
        }

        let raw: RawAssessment = serde_json::from_value(json).map_err(|e| {
            tracing::warn!(error = %e, "Model reply did not match the assessment schema");
            AnalysisError::unavailable(format!("malformed model reply: {e}"))
        })?;

        let sources = raw
            .sources
            .into_iter()
            .filter_map(|source| {
                let url = Url::parse(&source.url).ok();
                let credibility = source.credibility.parse::<CredibilityLevel>().ok();
                match (url, credibility) {
                    (Some(url), Some(credibility)) => {
                        Some(SourceRef::new(url, credibility, source.match_score))
                    }
                    _ => {
                        tracing::debug!(url = %source.url, "Dropping unusable source from model reply");
                        None
                    }
                }
            })
            .collect();

        Ok(Assessment {
            score: raw.score,
            confidence: raw.confidence,
            categories: raw
                .categories
                .into_iter()
                .map(|c| CategoryScore::new(c.name, c.score))
                .collect(),
            explanation: raw.explanation,
            sources,
            suggestions: raw.suggestions,
        })
    }
}

#[async_trait]
impl<C> ScoringProvider for LlmProvider<C>
where
    C: AnthropicClientTrait,
{
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn assess(&self, document: &Document) -> Result<Assessment, AnalysisError> {
        let messages = vec![Message::user(document_message(document))];
        let config = CompletionConfig::new()
            .with_max_tokens(ASSESSMENT_MAX_TOKENS)
            .with_temperature(ASSESSMENT_TEMPERATURE)
            .with_system_prompt(credibility_system_prompt());

        let response = self.client.complete(messages, config).await.map_err(|e| {
            if e.is_configuration_fault() {
                tracing::error!(
                    error = %e,
                    "Anthropic rejected the credentials; check ANTHROPIC_API_KEY"
                );
            } else {
                tracing::error!(error = %e, "Model call failed");
            }
            AnalysisError::from(e)
        })?;

        tracing::debug!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "Model reply received"
        );

        if response.is_truncated() {
            return Err(AnalysisError::unavailable(
                "model reply was cut off by the token limit",
            ));
        }

        Self::parse_reply(&response.content)
    }
}

impl<C> std::fmt::Debug for LlmProvider<C>
where
    C: AnthropicClientTrait,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmProvider")
            .field("client", &"<AnthropicClientTrait>")
            .finish()
    }
}
