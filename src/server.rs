// ABOUTME: HTTP server assembly: merges routes and applies tower-http middleware layers
// ABOUTME: Binds the listener and serves until Ctrl+C or SIGTERM
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Server
//!
//! Layer order, outermost first: CORS, request id assignment, request
//! tracing, request id propagation, whole-request timeout, body size limit.
//! Layers are added innermost first. The whole-request timeout is never
//! shorter than the generation window plus a margin.

#[cfg(not(unix))]
use std::future::pending;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{body::Body, http::Request, Router};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, info_span, warn};

use crate::errors::AppError;
use crate::middleware::setup_cors;
use crate::resources::ServerResources;
use crate::routes::chat::REQUEST_ID_HEADER;
use crate::routes::{ChatRoutes, HealthRoutes};

/// Build the full application router
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    let http = resources.config.http.clone();
    let request_timeout = resources.config.request_timeout();

    Router::new()
        .merge(HealthRoutes::routes(Arc::clone(&resources)))
        .merge(ChatRoutes::routes(resources))
        .fallback(handle_not_found)
        .layer(RequestBodyLimitLayer::new(http.request_body_limit_bytes))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");
                info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }),
        )
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(setup_cors(&http))
}

async fn handle_not_found() -> AppError {
    AppError::not_found("Route")
}

/// Bind the configured address and serve until shutdown
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails
pub async fn serve(resources: Arc<ServerResources>) -> Result<()> {
    let address = format!(
        "{}:{}",
        resources.config.http.host, resources.config.http.port
    );
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind to {address}"))?;

    info!("Pierre Coach listening on http://{}", listener.local_addr()?);

    axum::serve(listener, build_router(resources))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Pierre Coach stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => warn!("Failed to listen for SIGTERM: {e}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
