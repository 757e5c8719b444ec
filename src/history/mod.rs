//! Analysis history stores.
//!
//! This module provides the [`HistoryStore`](crate::traits::HistoryStore)
//! implementations:
//! - [`InMemoryHistory`]: process-local, the default
//! - [`SqliteHistory`]: persistent, enabled with `HISTORY_DATABASE_PATH`
//!
//! Both order entries by date descending with later appends first on ties,
//! and serialize appends.

mod memory;
mod sqlite;

pub use memory::InMemoryHistory;
pub use sqlite::SqliteHistory;
