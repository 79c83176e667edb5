//! HTTP server startup.

use std::future::IntoFuture;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;

use super::lifecycle::serve_with_shutdown;
use super::{ServerError, ServerResult, shutdown_signal};
use crate::config::ServerConfig;
use crate::{TRACING_TARGET_SERVER_SHUTDOWN, TRACING_TARGET_SERVER_STARTUP};

/// Binds the configured address and serves `app` until a shutdown signal.
///
/// After the signal, in-flight requests get the configured shutdown timeout
/// to finish before the server stops waiting for them.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails
/// while running.
pub async fn serve_http(app: Router, server_config: ServerConfig) -> ServerResult<()> {
    let server_addr = server_config.server_addr();

    let listener = TcpListener::bind(server_addr).await.map_err(|err| {
        let error = ServerError::bind(server_addr, err);
        tracing::error!(
            target: TRACING_TARGET_SERVER_STARTUP,
            addr = %server_addr,
            error = %error.io_error(),
            suggestion = error.suggestion(),
            "Failed to bind to address"
        );
        error
    })?;

    tracing::debug!(
        target: TRACING_TARGET_SERVER_STARTUP,
        addr = %server_addr,
        "Successfully bound to address"
    );

    let shutdown_timeout = server_config.shutdown_timeout();
    let (signalled_tx, mut signalled_rx) = watch::channel(false);
    let signal = async move {
        shutdown_signal(shutdown_timeout).await;
        let _ = signalled_tx.send(true);
    };

    serve_with_shutdown(&server_config, || async move {
        let server = axum::serve(listener, app)
            .with_graceful_shutdown(signal)
            .into_future();

        tokio::select! {
            result = server => result,
            () = async {
                if signalled_rx.wait_for(|signalled| *signalled).await.is_err() {
                    std::future::pending::<()>().await;
                }
                tokio::time::sleep(shutdown_timeout).await;
            } => {
                tracing::warn!(
                    target: TRACING_TARGET_SERVER_SHUTDOWN,
                    timeout_secs = shutdown_timeout.as_secs(),
                    "Shutdown timeout elapsed, dropping open connections"
                );
                Ok(())
            }
        }
    })
    .await
    .map_err(ServerError::Runtime)
}
