//! # HTTP Server
//!
//! Serves the book routes with request tracing until Ctrl-C or SIGTERM.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::config::HttpServerConfig;
use super::routes::{book_routes, health_routes, AppState};
use crate::books::RecordStore;

/// HTTP server for the book shelf
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server over `store`
    pub fn with_config(config: HttpServerConfig, store: Arc<dyn RecordStore>) -> Self {
        let router = Self::build_router(store);
        Self { config, router }
    }

    /// Build the combined router
    pub fn build_router(store: Arc<dyn RecordStore>) -> Router {
        Router::new()
            .merge(health_routes())
            .merge(book_routes(AppState::new(store)))
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Bind and serve until a shutdown signal arrives
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr = self
            .config
            .parse_socket_addr()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

        let listener = TcpListener::bind(addr).await?;
        tracing::info!(addr = %addr, "bookshelf listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("server stopped");
        Ok(())
    }
}

/// Completes on Ctrl-C, or SIGTERM on Unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl-C, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::books::{BookStore, SearchMode};

    fn store() -> Arc<dyn RecordStore> {
        Arc::new(BookStore::in_memory(SearchMode::Literal))
    }

    #[test]
    fn test_server_with_custom_port() {
        let server = HttpServer::with_config(HttpServerConfig::with_port(8080), store());
        assert_eq!(server.socket_addr(), "127.0.0.1:8080");
    }

    #[tokio::test]
    async fn test_start_rejects_hostname() {
        let config = HttpServerConfig {
            host: "not an ip".to_string(),
            port: 8080,
        };
        let err = HttpServer::with_config(config, store()).start().await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    }
}
