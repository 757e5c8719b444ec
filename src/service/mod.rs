//! Analyzer service.
//!
//! - [`AnalyzerService`]: analyze, list, get and clear operations
//! - [`HistoryEvent`]: notifications published on history changes

mod analyzer;
mod events;

pub use analyzer::{AnalyzerService, DEFAULT_RECENT_LIMIT, DEFAULT_REQUEST_TIMEOUT_MS};
pub use events::{HistoryEvent, EVENT_CHANNEL_CAPACITY};
