//! HTTP server.
//!
//! This module provides:
//! - Route handlers for the analysis endpoints
//! - Error mapping to status codes and a uniform error body
//! - Server-sent events for history changes
//! - Liveness and readiness probes
//! - The actix-web transport
//!
//! # Routes
//!
//! | Method | Path | Response |
//! |---|---|---|
//! | POST | `/api/analyze` | analysis result |
//! | GET | `/api/analyses/recent` | newest summaries |
//! | GET | `/api/analyses/history` | all summaries, newest first |
//! | DELETE | `/api/analyses/history` | 204 |
//! | GET | `/api/analyses/{id}` | stored result |
//! | GET | `/api/analyses/events` | `text/event-stream` |
//! | GET | `/health/live`, `/health/ready` | probe status |
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use credibility_analyzer::providers::FixtureProvider;
//! use credibility_analyzer::server::{AppState, HttpTransport};
//! use credibility_analyzer::service::AnalyzerService;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = AnalyzerService::new(Arc::new(FixtureProvider::new()));
//! HttpTransport::new().serve(AppState::new(service)).await?;
//! # Ok(())
//! # }
//! ```

mod app;
mod error;
mod health;
mod routes;
mod sse;
mod transport;
mod types;

pub use app::AnalyzerServer;
pub use error::{ApiError, ErrorResponse};
pub use health::{DependencyHealth, HealthStatus, ReadinessStatus};
pub use routes::{configure, MAX_JSON_BODY_BYTES};
pub use transport::{HttpTransport, TransportConfig};
pub use types::AppState;
