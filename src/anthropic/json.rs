//! JSON extraction from model replies.

/// Extract a JSON value from model text.
///
/// Accepts a bare JSON document, a ```` ```json ```` fenced block or a plain
/// fenced block, in that order.
///
/// ```
/// use credibility_analyzer::anthropic::extract_json;
///
/// let text = "Here you go:\n```json\n{\"score\": 0.4}\n```";
/// assert_eq!(extract_json(text).unwrap()["score"], 0.4);
/// assert!(extract_json("no json here").is_none());
/// ```
#[must_use]
pub fn extract_json(text: &str) -> Option<serde_json::Value> {
    let text = text.trim();
    if let Ok(value) = serde_json::from_str(text) {
        return Some(value);
    }

    if let Some(start) = text.find("```json") {
        let start = start + "```json".len();
        if let Some(end) = text[start..].find("```") {
            if let Ok(value) = serde_json::from_str(text[start..start + end].trim()) {
                return Some(value);
            }
        }
    }

    if let Some(start) = text.find("```") {
        let start = start + 3;
        // skip the info string
        let start = text[start..].find('\n').map_or(start, |n| start + n + 1);
        if let Some(end) = text[start..].find("```") {
            if let Ok(value) = serde_json::from_str(text[start..start + end].trim()) {
                return Some(value);
            }
        }
    }

    // last resort: outermost braces
    let open = text.find('{')?;
    let close = text.rfind('}')?;
    if close <= open {
        return None;
    }
    serde_json::from_str(&text[open..=close]).ok()
}
