//! Test utilities and fixtures.
//!
//! Only compiled for tests (`#[cfg(test)]`).

#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::{DateTime, Utc};
use url::Url;

use crate::contract::{
    AnalysisRecord, AnalysisResult, AnalysisSummary, Assessment, CategoryScore, CredibilityLevel,
    SourceRef,
};
use crate::traits::MockTimeProvider;

/// A well-formed assessment with the given score.
#[must_use]
pub fn assessment_with_score(score: f64) -> Assessment {
    Assessment {
        score,
        confidence: 0.8,
        categories: vec![
            CategoryScore::new("Clickbait Language", 0.3),
            CategoryScore::new("Source Credibility", 0.6),
        ],
        explanation: "Test explanation.".to_string(),
        sources: vec![SourceRef::new(
            Url::parse("https://example.com/source").unwrap(),
            CredibilityLevel::Medium,
            0.5,
        )],
        suggestions: vec!["Check other outlets".to_string()],
    }
}

/// A URL-submission record with the given id and date.
#[must_use]
pub fn record_at(id: &str, date: DateTime<Utc>) -> AnalysisRecord {
    let url = Url::parse(&format!("https://example.com/{id}")).unwrap();
    AnalysisRecord {
        summary: AnalysisSummary {
            id: id.to_string(),
            title: format!("Article {id}"),
            date,
            score: 0.58,
            url: Some(url),
            text_snippet: None,
        },
        result: AnalysisResult::from_assessment(assessment_with_score(0.58)),
    }
}

/// A text-submission record with the given id and date.
#[must_use]
pub fn text_record_at(id: &str, date: DateTime<Utc>) -> AnalysisRecord {
    AnalysisRecord {
        summary: AnalysisSummary {
            id: id.to_string(),
            title: "Scientists have made a groundbreaking discovery...".to_string(),
            date,
            score: 0.89,
            url: None,
            text_snippet: Some("Scientists have made a groundbreaking discovery".to_string()),
        },
        result: AnalysisResult::from_assessment(assessment_with_score(0.89)),
    }
}

/// A clock frozen at `at`.
#[must_use]
pub fn frozen_clock(at: DateTime<Utc>) -> MockTimeProvider {
    let mut mock = MockTimeProvider::new();
    mock.expect_now().return_const(at);
    mock
}
