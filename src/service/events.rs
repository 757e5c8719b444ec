//! History change notifications.

use serde::{Deserialize, Serialize};

use crate::contract::AnalysisSummary;

/// Capacity of the event channel. Slow subscribers skip missed events.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// A change to the analysis history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HistoryEvent {
    /// A new analysis was recorded.
    Recorded {
        /// Summary of the new entry.
        summary: AnalysisSummary,
    },
    /// The history was cleared.
    Cleared {
        /// Number of entries removed.
        removed: u64,
    },
}

impl HistoryEvent {
    /// Event name used on the wire, e.g. the SSE `event:` field.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Recorded { .. } => "recorded",
            Self::Cleared { .. } => "cleared",
        }
    }
}
