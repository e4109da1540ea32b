// ABOUTME: Integration tests for status, liveness, health, and readiness routes
// ABOUTME: Also checks request-id propagation, CORS preflight, and the 404 fallback
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{create_test_router, create_test_router_with, test_config, ScriptedProvider};
use helpers::axum_test::AxumTestRequest;
use pierre_coach::config::RetrievalStrategy;
use pierre_coach::constants::{routes, service};
use pierre_coach::rag::SearchIndex;
use pierre_coach::resources::ServerResources;
use pierre_coach::routes::{HealthRoutes, StatusResponse};
use pierre_coach::server::build_router;
use serde_json::Value;

#[tokio::test]
async fn test_status_reports_fallback_mode_and_index() {
    let response = AxumTestRequest::get(routes::STATUS)
        .send(create_test_router())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let status: StatusResponse = response.json();
    assert_eq!(status.message, service::STATUS_MESSAGE);
    assert_eq!(status.provider, "none");
    assert_eq!(status.model, "fallback");
    assert_eq!(status.rag_status, "ready");
    assert_eq!(status.rag_backend, "tfidf");
    assert_eq!(status.rag_chunks, 3);
}

#[tokio::test]
async fn test_status_names_configured_provider() {
    let response = AxumTestRequest::get(routes::STATUS)
        .send(create_test_router_with(ScriptedProvider::replying("hi")))
        .await;

    let status: StatusResponse = response.json();
    assert_eq!(status.provider, "scripted");
    assert_eq!(status.model, "scripted-1");
}

#[tokio::test]
async fn test_healthz() {
    let response = AxumTestRequest::get(routes::HEALTHZ)
        .send(create_test_router())
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_health_reports_version() {
    let response = AxumTestRequest::get(routes::HEALTH)
        .send(create_test_router())
        .await;

    let body: Value = response.json();
    assert_eq!(body["service"], service::SERVICE_NAME);
    assert_eq!(body["version"], service::SERVER_VERSION);
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_ready_is_degraded_without_backend() {
    let response = AxumTestRequest::get(routes::READY)
        .send(create_test_router())
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["checks"]["retrieval_index"], "ok");
    assert_eq!(body["checks"]["generation"], "fallback");
}

#[tokio::test]
async fn test_ready_with_backend_and_corpus() {
    let response = AxumTestRequest::get(routes::READY)
        .send(create_test_router_with(ScriptedProvider::replying("hi")))
        .await;

    let body: Value = response.json();
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_empty_corpus_is_reported() {
    let resources = Arc::new(ServerResources::new(
        test_config(),
        Arc::new(SearchIndex::empty(RetrievalStrategy::Bm25)),
        None,
    ));
    let response = AxumTestRequest::get(routes::STATUS)
        .send(HealthRoutes::routes(resources))
        .await;

    let status: StatusResponse = response.json();
    assert_eq!(status.rag_status, "empty");
    assert_eq!(status.rag_backend, "bm25");
    assert_eq!(status.rag_chunks, 0);
}

#[tokio::test]
async fn test_request_id_is_generated_and_propagated() {
    let response = AxumTestRequest::get(routes::HEALTHZ)
        .send(create_test_router())
        .await;

    let request_id = response.header("x-request-id").unwrap();
    assert!(!request_id.is_empty());
}

#[tokio::test]
async fn test_cors_preflight_allows_any_origin_by_default() {
    let response = AxumTestRequest::options(routes::CHAT)
        .header("origin", "http://localhost:3000")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .send(create_test_router())
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.header("access-control-allow-origin").as_deref(),
        Some("*")
    );
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let resources = common::create_test_server_resources(None);
    let response = AxumTestRequest::get("/api/v1/nope")
        .send(build_router(resources))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "RESOURCE_NOT_FOUND");
}
