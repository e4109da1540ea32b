// ABOUTME: Chat route: accepts the caller-held transcript plus a new message
// ABOUTME: Validates the body and returns the pipeline's structured reply as JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Chat routes
//!
//! Request body:
//!
//! ```json
//! {"history": [{"role": "user", "content": "hi"}], "message": "How often should I lift?"}
//! ```
//!
//! Only a malformed body produces an error status. Generation failures are
//! absorbed by the pipeline and still return 200.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::constants::routes;
use crate::errors::AppError;
use crate::models::HistoryTurn;
use crate::resources::ServerResources;

/// Header carrying the request id set by the tracing middleware
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Body of `POST /api/v1/chat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequestBody {
    /// Earlier turns, oldest first
    #[serde(default)]
    pub history: Vec<HistoryTurn>,
    /// The new user message
    pub message: String,
}

/// Chat routes handler
pub struct ChatRoutes;

impl ChatRoutes {
    /// Create the chat routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(routes::CHAT, post(Self::handle_chat))
            .with_state(resources)
    }

    async fn handle_chat(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Result<Json<ChatRequestBody>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let request_id = headers
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(ToOwned::to_owned);
        let reject = |message: String| match &request_id {
            Some(id) => AppError::invalid_input(message).with_request_id(id.clone()),
            None => AppError::invalid_input(message),
        };

        let Json(body) = body.map_err(|rejection| reject(rejection.body_text()))?;
        if body.message.trim().is_empty() {
            return Err(reject("message must not be empty".to_owned()));
        }

        let reply = resources
            .pipeline
            .respond(&body.history, body.message.trim())
            .await;
        Ok((StatusCode::OK, Json(reply)).into_response())
    }
}
