//! Request validation and result schema enforcement.
//!
//! Request validation runs before any backend work so that malformed input
//! is rejected without a round trip. Schema enforcement checks every
//! provider output against the data-model invariants before it is recorded.

use thiserror::Error;
use url::Url;

use super::types::{AnalysisResult, AnalysisSummary, Assessment, CategoryScore, InputType, SourceRef};
use super::verdict::Verdict;
use crate::error::AnalysisError;

/// Maximum accepted input length in bytes, after trimming.
pub const MAX_INPUT_LENGTH: usize = 100_000;

/// Input that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatedInput {
    /// A syntactically valid absolute URL with a host.
    Url(Url),
    /// Non-empty trimmed text.
    Text(String),
}

impl ValidatedInput {
    /// The input type this value was validated as.
    #[must_use]
    pub const fn input_type(&self) -> InputType {
        match self {
            Self::Url(_) => InputType::Url,
            Self::Text(_) => InputType::Text,
        }
    }
}

/// Validate raw caller input.
///
/// # Errors
///
/// Returns [`AnalysisError::Validation`] if the input is empty after
/// trimming, longer than [`MAX_INPUT_LENGTH`], or (for URLs) not an absolute
/// URL with a scheme and host.
///
/// # Example
///
/// ```
/// use credibility_analyzer::contract::{validate_input, InputType, ValidatedInput};
///
/// assert!(validate_input("   ", InputType::Url).is_err());
/// assert!(validate_input("not a url", InputType::Url).is_err());
/// assert!(matches!(
///     validate_input("https://example.com/a", InputType::Url),
///     Ok(ValidatedInput::Url(_))
/// ));
/// ```
pub fn validate_input(input: &str, input_type: InputType) -> Result<ValidatedInput, AnalysisError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(AnalysisError::validation("Input must not be empty"));
    }

    if trimmed.len() > MAX_INPUT_LENGTH {
        return Err(AnalysisError::validation(format!(
            "Input is too long: {} bytes exceeds the limit of {MAX_INPUT_LENGTH}",
            trimmed.len()
        )));
    }

    match input_type {
        InputType::Text => Ok(ValidatedInput::Text(trimmed.to_string())),
        InputType::Url => {
            let url = Url::parse(trimmed).map_err(|e| {
                AnalysisError::validation(format!("Input is not a valid absolute URL: {e}"))
            })?;
            if !url.host_str().is_some_and(|host| !host.is_empty()) {
                return Err(AnalysisError::validation("URL must include a host"));
            }
            Ok(ValidatedInput::Url(url))
        }
    }
}

/// A provider output that breaks a data-model invariant.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Schema violation at {field}: {reason}")]
pub struct SchemaViolation {
    /// Path of the offending field, e.g. `categories[2].score`.
    pub field: String,
    /// What is wrong with it.
    pub reason: String,
}

impl SchemaViolation {
    fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<SchemaViolation> for AnalysisError {
    fn from(violation: SchemaViolation) -> Self {
        Self::Unavailable {
            message: format!("scoring backend returned an invalid result: {violation}"),
        }
    }
}

fn check_unit_interval(field: &str, value: f64) -> Result<(), SchemaViolation> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SchemaViolation::new(
            field,
            format!("must be a number in [0, 1], got {value}"),
        ))
    }
}

fn check_non_empty(field: &str, value: &str) -> Result<(), SchemaViolation> {
    if value.trim().is_empty() {
        Err(SchemaViolation::new(field, "must not be empty"))
    } else {
        Ok(())
    }
}

fn check_categories(categories: &[CategoryScore]) -> Result<(), SchemaViolation> {
    for (i, category) in categories.iter().enumerate() {
        check_non_empty(&format!("categories[{i}].name"), &category.name)?;
        check_unit_interval(&format!("categories[{i}].score"), category.score)?;
    }
    Ok(())
}

fn check_sources(sources: &[SourceRef]) -> Result<(), SchemaViolation> {
    for (i, source) in sources.iter().enumerate() {
        if source.url.cannot_be_a_base() || source.url.host_str().is_none() {
            return Err(SchemaViolation::new(
                format!("sources[{i}].url"),
                "must be an absolute URI with a host",
            ));
        }
        check_unit_interval(&format!("sources[{i}].match"), source.match_score)?;
    }
    Ok(())
}

fn check_suggestions(suggestions: &[String]) -> Result<(), SchemaViolation> {
    for (i, suggestion) in suggestions.iter().enumerate() {
        check_non_empty(&format!("suggestions[{i}]"), suggestion)?;
    }
    Ok(())
}

/// Check a provider assessment against the data-model invariants.
///
/// # Errors
///
/// Returns the first [`SchemaViolation`] found.
pub fn validate_assessment(assessment: &Assessment) -> Result<(), SchemaViolation> {
    check_unit_interval("score", assessment.score)?;
    check_unit_interval("confidence", assessment.confidence)?;
    check_categories(&assessment.categories)?;
    check_non_empty("explanation", &assessment.explanation)?;
    check_sources(&assessment.sources)?;
    check_suggestions(&assessment.suggestions)
}

/// Check a complete result, including verdict consistency.
///
/// # Errors
///
/// Returns the first [`SchemaViolation`] found.
pub fn validate_result(result: &AnalysisResult) -> Result<(), SchemaViolation> {
    check_unit_interval("score", result.score)?;
    let expected = Verdict::from_score(result.score);
    if result.verdict != expected {
        return Err(SchemaViolation::new(
            "verdict",
            format!(
                "'{}' does not match score {} (expected '{}')",
                result.verdict, result.score, expected
            ),
        ));
    }
    check_unit_interval("confidence", result.confidence)?;
    check_categories(&result.categories)?;
    check_non_empty("explanation", &result.explanation)?;
    check_sources(&result.sources)?;
    check_suggestions(&result.suggestions)
}

/// Check a history summary.
///
/// # Errors
///
/// Returns the first [`SchemaViolation`] found.
pub fn validate_summary(summary: &AnalysisSummary) -> Result<(), SchemaViolation> {
    check_non_empty("id", &summary.id)?;
    check_non_empty("title", &summary.title)?;
    check_unit_interval("score", summary.score)?;
    if summary.url.is_some() && summary.text_snippet.is_some() {
        return Err(SchemaViolation::new(
            "url",
            "url and textSnippet are mutually exclusive",
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::contract::types::CredibilityLevel;
    use crate::error::ErrorKind;
    use proptest::prelude::*;
    use test_case::test_case;

    fn valid_assessment() -> Assessment {
        Assessment {
            score: 0.58,
            confidence: 0.76,
            categories: vec![
                CategoryScore::new("Clickbait Language", 0.45),
                CategoryScore::new("Bias", 0.65),
            ],
            explanation: "Mixed signals.".to_string(),
            sources: vec![SourceRef::new(
                Url::parse("https://example.com/mixed1").unwrap(),
                CredibilityLevel::Medium,
                0.75,
            )],
            suggestions: vec!["Look for more coverage".to_string()],
        }
    }

    #[test_case("", InputType::Text ; "empty text")]
    #[test_case("   ", InputType::Url ; "blank url")]
    #[test_case("\n\t", InputType::Text ; "whitespace text")]
    #[test_case("not a url", InputType::Url ; "plain words as url")]
    #[test_case("example.com/story", InputType::Url ; "missing scheme")]
    #[test_case("mailto:editor@example.com", InputType::Url ; "no host")]
    #[test_case("javascript:alert(1)", InputType::Url ; "script scheme")]
    fn test_validate_input_rejects(input: &str, input_type: InputType) {
        let err = validate_input(input, input_type).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationError);
    }

    #[test]
    fn test_validate_input_trims_text() {
        let validated = validate_input("  Breaking news  ", InputType::Text).unwrap();
        assert_eq!(validated, ValidatedInput::Text("Breaking news".to_string()));
        assert_eq!(validated.input_type(), InputType::Text);
    }

    #[test]
    fn test_validate_input_accepts_url() {
        let validated =
            validate_input(" https://example.com/miracle-cure-study ", InputType::Url).unwrap();
        let expected = Url::parse("https://example.com/miracle-cure-study").unwrap();
        assert_eq!(validated, ValidatedInput::Url(expected));
    }

    #[test]
    fn test_validate_input_too_long() {
        let input = "a".repeat(MAX_INPUT_LENGTH + 1);
        let err = validate_input(&input, InputType::Text).unwrap_err();
        assert!(err.to_string().contains("too long"));
    }

    #[test]
    fn test_validate_input_at_limit() {
        let input = "a".repeat(MAX_INPUT_LENGTH);
        assert!(validate_input(&input, InputType::Text).is_ok());
    }

    #[test]
    fn test_validate_assessment_ok() {
        assert!(validate_assessment(&valid_assessment()).is_ok());
    }

    #[test]
    fn test_validate_assessment_empty_collections_ok() {
        let mut assessment = valid_assessment();
        assessment.categories.clear();
        assessment.sources.clear();
        assessment.suggestions.clear();
        assert!(validate_assessment(&assessment).is_ok());
    }

    #[test_case(|a: &mut Assessment| a.score = 1.2, "score" ; "score above one")]
    #[test_case(|a: &mut Assessment| a.score = f64::NAN, "score" ; "score nan")]
    #[test_case(|a: &mut Assessment| a.confidence = -0.1, "confidence" ; "negative confidence")]
    #[test_case(|a: &mut Assessment| a.categories[1].score = 2.0, "categories[1].score" ; "category score")]
    #[test_case(|a: &mut Assessment| a.categories[0].name = " ".into(), "categories[0].name" ; "blank category")]
    #[test_case(|a: &mut Assessment| a.explanation = String::new(), "explanation" ; "empty explanation")]
    #[test_case(|a: &mut Assessment| a.sources[0].match_score = f64::INFINITY, "sources[0].match" ; "infinite match")]
    #[test_case(|a: &mut Assessment| a.suggestions.push(String::new()), "suggestions[1]" ; "empty suggestion")]
    fn test_validate_assessment_violations(mutate: fn(&mut Assessment), field: &str) {
        let mut assessment = valid_assessment();
        mutate(&mut assessment);
        let violation = validate_assessment(&assessment).unwrap_err();
        assert_eq!(violation.field, field);
    }

    #[test]
    fn test_source_without_host_rejected() {
        let mut assessment = valid_assessment();
        assessment.sources[0].url = Url::parse("data:text/plain,hello").unwrap();
        let violation = validate_assessment(&assessment).unwrap_err();
        assert_eq!(violation.field, "sources[0].url");
    }

    #[test]
    fn test_validate_result_checks_verdict() {
        let mut result = AnalysisResult::from_assessment(valid_assessment());
        assert!(validate_result(&result).is_ok());

        result.verdict = Verdict::LikelyCredible;
        let violation = validate_result(&result).unwrap_err();
        assert_eq!(violation.field, "verdict");
    }

    #[test]
    fn test_schema_violation_is_unavailable() {
        let err: AnalysisError = SchemaViolation::new("score", "bad").into();
        assert_eq!(err.kind(), ErrorKind::AnalysisUnavailable);
    }

    #[test]
    fn test_validate_summary_exclusive_fields() {
        let summary = AnalysisSummary {
            id: "id".to_string(),
            title: "Title".to_string(),
            date: chrono::Utc::now(),
            score: 0.5,
            url: Some(Url::parse("https://example.com").unwrap()),
            text_snippet: Some("snippet".to_string()),
        };
        assert_eq!(validate_summary(&summary).unwrap_err().field, "url");
    }

    proptest! {
        #[test]
        fn prop_any_http_url_with_host_validates(
            host in "[a-z]{1,12}\\.(com|org|net)",
            path in "[a-z0-9-]{0,20}",
        ) {
            let input = format!("https://{host}/{path}");
            prop_assert!(validate_input(&input, InputType::Url).is_ok());
        }

        #[test]
        fn prop_whitespace_never_validates(ws in "[ \t\n\r]{0,16}") {
            prop_assert!(validate_input(&ws, InputType::Text).is_err());
            prop_assert!(validate_input(&ws, InputType::Url).is_err());
        }
    }
}
