//! Verdict derivation.
//!
//! The verdict is a pure function of the credibility score using fixed,
//! non-overlapping bands: `[0, 0.33)` low, `[0.33, 0.66)` medium and
//! `[0.66, 1]` high.

use serde::{Deserialize, Serialize};

use super::types::CredibilityLevel;

/// Scores strictly below this value are low credibility.
pub const LOW_CREDIBILITY_THRESHOLD: f64 = 0.33;

/// Scores at or above this value are high credibility.
pub const HIGH_CREDIBILITY_THRESHOLD: f64 = 0.66;

/// Discrete label derived from a credibility score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// Low credibility band.
    #[serde(rename = "Likely Fake News")]
    LikelyFake,
    /// Medium credibility band.
    #[serde(rename = "Potentially Misleading")]
    PotentiallyMisleading,
    /// High credibility band.
    #[serde(rename = "Likely Credible")]
    LikelyCredible,
}

impl Verdict {
    /// Derive the verdict for a score in `[0, 1]`.
    ///
    /// # Example
    ///
    /// ```
    /// use credibility_analyzer::contract::Verdict;
    ///
    /// assert_eq!(Verdict::from_score(0.21), Verdict::LikelyFake);
    /// assert_eq!(Verdict::from_score(0.33), Verdict::PotentiallyMisleading);
    /// assert_eq!(Verdict::from_score(0.66), Verdict::LikelyCredible);
    /// ```
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score < LOW_CREDIBILITY_THRESHOLD {
            Self::LikelyFake
        } else if score < HIGH_CREDIBILITY_THRESHOLD {
            Self::PotentiallyMisleading
        } else {
            Self::LikelyCredible
        }
    }

    /// Human-readable label, identical to the wire representation.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::LikelyFake => "Likely Fake News",
            Self::PotentiallyMisleading => "Potentially Misleading",
            Self::LikelyCredible => "Likely Credible",
        }
    }

    /// Credibility class of the band.
    #[must_use]
    pub const fn level(self) -> CredibilityLevel {
        match self {
            Self::LikelyFake => CredibilityLevel::Low,
            Self::PotentiallyMisleading => CredibilityLevel::Medium,
            Self::LikelyCredible => CredibilityLevel::High,
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
