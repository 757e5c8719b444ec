//! HTTP transport.
//!
//! Binds the actix-web server and runs it until shutdown.

use actix_web::{middleware, web, App, HttpServer};

use super::{routes, AppState};
use crate::config::DEFAULT_BIND_ADDR;
use crate::error::AppError;

/// Configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Address to listen on, `host:port`.
    pub bind_addr: String,
    /// Worker threads; `None` uses one per core.
    pub workers: Option<usize>,
    /// Seconds to wait for in-flight requests on shutdown.
    pub shutdown_timeout_secs: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            workers: None,
            shutdown_timeout_secs: 30,
        }
    }
}

/// HTTP transport handler.
#[derive(Debug)]
pub struct HttpTransport {
    config: TransportConfig,
}

impl HttpTransport {
    /// Creates a transport with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: TransportConfig::default(),
        }
    }

    /// Creates a transport with custom configuration.
    #[must_use]
    pub const fn with_config(config: TransportConfig) -> Self {
        Self { config }
    }

    /// Returns the transport configuration.
    #[must_use]
    pub const fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Serve `state` until the server is stopped (e.g. by Ctrl-C).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Server`] if the address cannot be bound or the
    /// server fails while running.
    pub async fn serve(self, state: AppState) -> Result<(), AppError> {
        let data = web::Data::new(state);

        let mut server = HttpServer::new(move || {
            App::new()
                .app_data(data.clone())
                .wrap(middleware::Logger::default())
                .configure(routes::configure)
        })
        .shutdown_timeout(self.config.shutdown_timeout_secs);

        if let Some(workers) = self.config.workers {
            server = server.workers(workers);
        }

        let server = server.bind(&self.config.bind_addr)?;
        tracing::info!(bind_addr = %self.config.bind_addr, "HTTP server listening");
        server.run().await?;
        Ok(())
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}
