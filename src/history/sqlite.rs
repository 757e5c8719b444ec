//! `SQLite` history store.

#![allow(clippy::missing_errors_doc)]

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow,
};
use sqlx::Row;
use tokio::sync::Mutex;
use url::Url;

use crate::contract::{AnalysisRecord, AnalysisResult, AnalysisSummary};
use crate::error::StorageError;
use crate::traits::HistoryStore;

const LIST_SQL: &str = "SELECT id, title, date, score, url, text_snippet
     FROM analysis_history ORDER BY date DESC, seq DESC";

const RECENT_SQL: &str = "SELECT id, title, date, score, url, text_snippet
     FROM analysis_history ORDER BY date DESC, seq DESC LIMIT ?";

const GET_SQL: &str = "SELECT id, title, date, score, url, text_snippet, result
     FROM analysis_history WHERE id = ?";

/// Persistent history backed by `SQLite`.
#[derive(Debug)]
pub struct SqliteHistory {
    pool: SqlitePool,
    write_gate: Mutex<()>,
}

impl SqliteHistory {
    /// Open (creating if needed) the database at `database_path`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ConnectionFailed`] if the connection fails and
    /// [`StorageError::MigrationFailed`] if the schema cannot be applied.
    pub async fn new(database_path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = database_path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::ConnectionFailed {
                message: format!("Failed to create database directory: {e}"),
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| StorageError::ConnectionFailed {
                message: format!("Failed to connect to database: {e}"),
            })?;

        let history = Self {
            pool,
            write_gate: Mutex::new(()),
        };
        history.run_migrations().await?;
        tracing::info!(path = %path.display(), "History database ready");
        Ok(history)
    }

    /// Create an in-memory database, mostly for tests.
    pub async fn new_in_memory() -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").map_err(|e| {
            StorageError::ConnectionFailed {
                message: format!("Invalid memory database options: {e}"),
            }
        })?;

        // a second connection would open a different in-memory database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| StorageError::ConnectionFailed {
                message: format!("Failed to create in-memory database: {e}"),
            })?;

        let history = Self {
            pool,
            write_gate: Mutex::new(()),
        };
        history.run_migrations().await?;
        Ok(history)
    }

    async fn run_migrations(&self) -> Result<(), StorageError> {
        let schema_001 = include_str!("../../migrations/001_analysis_history.sql");
        sqlx::query(schema_001)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::MigrationFailed {
                version: "001".to_string(),
                message: format!("Failed to run migration 001: {e}"),
            })?;
        Ok(())
    }

    /// Fixed-width encoding so that text order equals time order.
    pub(crate) fn format_datetime(date: DateTime<Utc>) -> String {
        date.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    pub(crate) fn parse_datetime(id: &str, s: &str) -> Result<DateTime<Utc>, StorageError> {
        s.parse::<DateTime<Utc>>()
            .map_err(|e| Self::corrupt(id, format!("bad date '{s}': {e}")))
    }

    fn query_error(query: &str, err: &sqlx::Error) -> StorageError {
        StorageError::QueryFailed {
            query: query.to_string(),
            message: err.to_string(),
        }
    }

    fn corrupt(id: &str, message: String) -> StorageError {
        StorageError::CorruptRecord {
            id: id.to_string(),
            message,
        }
    }

    fn row_to_summary(row: &SqliteRow) -> Result<AnalysisSummary, StorageError> {
        let id: String = row.get("id");
        let title: String = row.get("title");
        let date_str: String = row.get("date");
        let score: f64 = row.get("score");
        let url: Option<String> = row.get("url");
        let text_snippet: Option<String> = row.get("text_snippet");

        let date = Self::parse_datetime(&id, &date_str)?;
        let url = url
            .map(|u| Url::parse(&u).map_err(|e| Self::corrupt(&id, format!("bad url '{u}': {e}"))))
            .transpose()?;

        Ok(AnalysisSummary {
            id,
            title,
            date,
            score,
            url,
            text_snippet,
        })
    }

    async fn fetch_summaries(&self, limit: Option<i64>) -> Result<Vec<AnalysisSummary>, StorageError> {
        let rows = match limit {
            Some(limit) => {
                sqlx::query(RECENT_SQL)
                    .bind(limit)
                    .fetch_all(&self.pool)
                    .await
            }
            None => sqlx::query(LIST_SQL).fetch_all(&self.pool).await,
        }
        .map_err(|e| Self::query_error("SELECT analysis_history", &e))?;

        rows.iter().map(Self::row_to_summary).collect()
    }
}

#[async_trait]
impl HistoryStore for SqliteHistory {
    async fn append(&self, record: &AnalysisRecord) -> Result<(), StorageError> {
        let summary = &record.summary;
        let result = serde_json::to_string(&record.result)
            .map_err(|e| Self::corrupt(&summary.id, format!("cannot encode result: {e}")))?;

        let _gate = self.write_gate.lock().await;
        sqlx::query(
            "INSERT INTO analysis_history (id, title, date, score, url, text_snippet, result)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&summary.id)
        .bind(&summary.title)
        .bind(Self::format_datetime(summary.date))
        .bind(summary.score)
        .bind(summary.url.as_ref().map(Url::as_str))
        .bind(&summary.text_snippet)
        .bind(&result)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::query_error("INSERT analysis_history", &e))?;

        Ok(())
    }

    async fn list(&self) -> Result<Vec<AnalysisSummary>, StorageError> {
        self.fetch_summaries(None).await
    }

    async fn recent(&self, limit: usize) -> Result<Vec<AnalysisSummary>, StorageError> {
        self.fetch_summaries(Some(i64::try_from(limit).unwrap_or(i64::MAX)))
            .await
    }

    async fn get(&self, id: &str) -> Result<Option<AnalysisRecord>, StorageError> {
        let row = sqlx::query(GET_SQL)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Self::query_error("SELECT analysis_history", &e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let summary = Self::row_to_summary(&row)?;
        let result_json: String = row.get("result");
        let result: AnalysisResult = serde_json::from_str(&result_json)
            .map_err(|e| Self::corrupt(id, format!("bad result JSON: {e}")))?;

        Ok(Some(AnalysisRecord { summary, result }))
    }

    async fn clear(&self) -> Result<u64, StorageError> {
        let _gate = self.write_gate.lock().await;
        let done = sqlx::query("DELETE FROM analysis_history")
            .execute(&self.pool)
            .await
            .map_err(|e| Self::query_error("DELETE analysis_history", &e))?;
        Ok(done.rows_affected())
    }

    async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| Self::query_error("SELECT 1", &e))?;
        Ok(())
    }
}
