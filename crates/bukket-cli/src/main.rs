#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process;

use anyhow::Context;
use axum::Router;
use bukket_server::handler::routes;
use bukket_server::middleware::{RouterBodyLimitExt, RouterObservabilityExt, RouterRecoveryExt};
use bukket_server::service::ServiceState;

use crate::config::{Cli, MiddlewareConfig};

// Tracing target constants
pub const TRACING_TARGET_SERVER_STARTUP: &str = "bukket_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "bukket_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "bukket_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = format!("{error:#}"),
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();
    cli.init_tracing();

    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        version = env!("CARGO_PKG_VERSION"),
        "starting bukket server"
    );

    cli.log();
    cli.validate()?;

    let state = ServiceState::from_config(&cli.service)
        .await
        .context("failed to create service state")?;
    let router = create_router(state, &cli.middleware);

    if let Err(error) = server::serve(router, cli.server).await {
        tracing::debug!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            recoverable = error.is_recoverable(),
            "server error classified"
        );
        return Err(error).context("server stopped with an error");
    }

    Ok(())
}

/// Creates the router with all middleware layers applied.
///
/// Middleware is applied in reverse order (last added = outermost):
/// 1. Recovery (outermost) - catches panics and enforces timeouts
/// 2. Observability - request IDs and tracing spans
/// 3. Body limit - caps upload sizes
/// 4. Routes (innermost) - actual request handlers
fn create_router(state: ServiceState, middleware: &MiddlewareConfig) -> Router {
    routes()
        .with_body_limit(&middleware.body_limit)
        .with_observability()
        .with_recovery(&middleware.recovery)
        .with_state(state)
}
