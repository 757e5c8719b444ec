//! Derivation of history summary fields.

use chrono::{DateTime, Utc};

use super::types::{AnalysisResult, AnalysisSummary, Document, InputType};

/// Number of words kept in a title derived from text.
pub const TITLE_WORDS: usize = 7;

/// Number of characters kept in a text snippet.
pub const SNIPPET_CHARS: usize = 150;

const ELLIPSIS: &str = "...";

/// Title for a text submission: the first [`TITLE_WORDS`] words.
///
/// ```
/// use credibility_analyzer::contract::title_from_text;
///
/// assert_eq!(title_from_text("Short headline"), "Short headline");
/// assert_eq!(
///     title_from_text("one two three four five six seven eight"),
///     "one two three four five six seven..."
/// );
/// ```
#[must_use]
pub fn title_from_text(text: &str) -> String {
    let mut words = text.split_whitespace();
    let title = words.by_ref().take(TITLE_WORDS).collect::<Vec<_>>().join(" ");
    if words.next().is_some() {
        format!("{title}{ELLIPSIS}")
    } else {
        title
    }
}

/// Snippet for a text submission: the first [`SNIPPET_CHARS`] characters.
#[must_use]
pub fn snippet_from_text(text: &str) -> String {
    match text.char_indices().nth(SNIPPET_CHARS) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}

/// Build the summary for a completed analysis.
#[must_use]
pub fn summarize(
    id: String,
    date: DateTime<Utc>,
    document: &Document,
    result: &AnalysisResult,
) -> AnalysisSummary {
    let (title, url, text_snippet) = match document.input_type {
        InputType::Url => {
            let title = document
                .title
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map_or_else(
                    || {
                        document
                            .url
                            .as_ref()
                            .map_or_else(|| title_from_text(&document.text), ToString::to_string)
                    },
                    ToString::to_string,
                );
            (title, document.url.clone(), None)
        }
        InputType::Text => (
            title_from_text(&document.text),
            None,
            Some(snippet_from_text(&document.text)),
        ),
    };

    AnalysisSummary {
        id,
        title,
        date,
        score: result.score,
        url,
        text_snippet,
    }
}
