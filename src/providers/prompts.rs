//! Prompt templates for the model-backed provider.

#![allow(clippy::missing_const_for_fn)]

use crate::anthropic::MAX_CONTENT_LENGTH;
use crate::contract::Document;

/// Largest user message sent to the model, in bytes.
pub const MAX_PROMPT_BYTES: usize = MAX_CONTENT_LENGTH - 1024;
/// Longest title kept in the message header, in bytes.
pub const MAX_TITLE_BYTES: usize = 512;

const TRUNCATED_MARKER: &str = "\n[content truncated]";

/// System prompt for credibility assessment.
#[must_use]
pub fn credibility_system_prompt() -> &'static str {
    r#"You are a careful news credibility analyst.

Assess the article for signs of misinformation. Consider:
1. Clickbait Language: sensational or exaggerated headlines and wording
2. Source Credibility: whether claims are attributed to identifiable, reputable sources
3. Factual Content: verifiable facts versus unsupported assertions
4. Emotional Manipulation: language designed to provoke fear, outrage or awe
5. Bias: one-sided framing or selective presentation

Respond with a JSON object in this exact format:
{
  "score": 0.0,
  "confidence": 0.0,
  "categories": [
    {"name": "Clickbait Language", "score": 0.0},
    {"name": "Source Credibility", "score": 0.0},
    {"name": "Factual Content", "score": 0.0},
    {"name": "Emotional Manipulation", "score": 0.0},
    {"name": "Bias", "score": 0.0}
  ],
  "explanation": "Two to four sentences explaining the assessment",
  "sources": [
    {"url": "https://...", "credibility": "low|medium|high", "match": 0.0}
  ],
  "suggestions": ["Actionable advice for the reader"]
}

Rules:
- All numbers are between 0.0 and 1.0
- "score" is overall credibility: higher means more credible
- "confidence" is how certain you are, independent of the score
- Only list sources you are confident exist; an empty list is fine
- If the content is not a news article or cannot be assessed (for example a
  login page, an error page or unrelated text), respond with
  {"unsupported": "short reason"} instead"#
}

/// User message describing the document to assess.
#[must_use]
pub fn document_message(document: &Document) -> String {
    let mut message = String::from("Assess the credibility of this article.\n\n");
    if let Some(url) = &document.url {
        message.push_str(&format!("URL: {url}\n"));
    }
    if let Some(title) = &document.title {
        message.push_str(&format!("Title: {}\n", truncate_bytes(title, MAX_TITLE_BYTES)));
    }
    message.push_str("\nContent:\n");

    let room = MAX_PROMPT_BYTES.saturating_sub(message.len());
    if document.text.len() <= room {
        message.push_str(&document.text);
    } else {
        let budget = room.saturating_sub(TRUNCATED_MARKER.len());
        message.push_str(truncate_bytes(&document.text, budget));
        message.push_str(TRUNCATED_MARKER);
    }
    message
}

/// Longest prefix of `text` that fits in `max` bytes without splitting a character.
fn truncate_bytes(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut cut = max;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    &text[..cut]
}
