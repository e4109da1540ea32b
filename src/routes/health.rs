// ABOUTME: Status, liveness, health, and readiness route handlers
// ABOUTME: Reports retrieval index state and which generation backend is active
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Health check routes for service monitoring
//!
//! Every route answers 200. `/ready` reports `degraded` rather than failing
//! when the corpus is empty or no generation backend is configured, since the
//! coach still answers in both cases.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::constants::{routes, service};
use crate::rag::Retriever;
use crate::resources::ServerResources;

/// Body of `GET /`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Fixed banner
    pub message: String,
    /// Generation model, or `fallback`
    pub model: String,
    /// Generation backend, or `none`
    pub provider: String,
    /// `ready` when the index holds chunks, else `empty`
    pub rag_status: String,
    /// Ranking strategy
    pub rag_backend: String,
    /// Indexed chunk count
    pub rag_chunks: usize,
}

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all status and health routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(routes::STATUS, get(Self::handle_status))
            .route(routes::HEALTHZ, get(Self::handle_healthz))
            .route(routes::HEALTH, get(Self::handle_health))
            .route(routes::READY, get(Self::handle_ready))
            .with_state(resources)
    }

    async fn handle_status(State(resources): State<Arc<ServerResources>>) -> Json<StatusResponse> {
        let index = resources.index();
        let generator = resources.pipeline.generator();
        Json(StatusResponse {
            message: service::STATUS_MESSAGE.to_owned(),
            model: generator.model_name(),
            provider: generator.provider_name().to_owned(),
            rag_status: if index.is_empty() { "empty" } else { "ready" }.to_owned(),
            rag_backend: index.strategy().as_str().to_owned(),
            rag_chunks: index.chunks().len(),
        })
    }

    async fn handle_healthz() -> Json<Value> {
        Json(json!({ "status": "ok" }))
    }

    async fn handle_health() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": service::SERVICE_NAME,
            "version": service::SERVER_VERSION,
            "timestamp": Utc::now().to_rfc3339(),
        }))
    }

    async fn handle_ready(State(resources): State<Arc<ServerResources>>) -> Json<Value> {
        let index_ready = !resources.index().is_empty();
        let generation_ready = resources.pipeline.generator().is_configured();
        let status = if index_ready && generation_ready {
            "ready"
        } else {
            "degraded"
        };

        Json(json!({
            "status": status,
            "checks": {
                "retrieval_index": if index_ready { "ok" } else { "empty" },
                "generation": if generation_ready { "ok" } else { "fallback" },
            },
            "uptime_seconds": (Utc::now() - resources.started_at).num_seconds(),
        }))
    }
}
