//! Analyzer service contract.
//!
//! This module provides:
//! - The data model exchanged with consumers ([`AnalysisResult`], [`AnalysisSummary`])
//! - Verdict derivation from credibility scores ([`Verdict`])
//! - Input validation and output schema enforcement
//! - Summary derivation for history entries

mod summary;
mod types;
mod validation;
mod verdict;

pub use summary::{snippet_from_text, summarize, title_from_text, SNIPPET_CHARS, TITLE_WORDS};
pub use types::{
    AnalysisRecord, AnalysisRequest, AnalysisResult, AnalysisSummary, Assessment, CategoryScore,
    CredibilityLevel, Document, InputType, SourceRef,
};
pub use validation::{
    validate_assessment, validate_input, validate_result, validate_summary, SchemaViolation,
    ValidatedInput, MAX_INPUT_LENGTH,
};
pub use verdict::{Verdict, HIGH_CREDIBILITY_THRESHOLD, LOW_CREDIBILITY_THRESHOLD};
