// ABOUTME: Integration tests for the chat route over the full middleware stack
// ABOUTME: Covers progressive intake, estimates, fallbacks, recall, and request validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use axum::http::StatusCode;
use common::{create_test_router, create_test_router_with, ScriptedProvider};
use helpers::axum_test::AxumTestRequest;
use pierre_coach::constants::routes;
use serde_json::{json, Value};

async fn chat(router: axum::Router, body: &Value) -> Value {
    let response = AxumTestRequest::post(routes::CHAT)
        .json(body)
        .send(router)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    response.json()
}

// ============================================================================
// Energy Estimate Flow
// ============================================================================

#[tokio::test]
async fn test_first_estimate_request_asks_for_sex() {
    let body = chat(
        create_test_router(),
        &json!({ "message": "Can you calculate my calories?" }),
    )
    .await;

    assert_eq!(body["intent"], "energy-estimate");
    assert_eq!(body["askedThisIntent"], json!(["sex"]));
    assert_eq!(
        body["missing"],
        json!(["sex", "age", "weightKg", "heightCm", "activityFactor"])
    );
    assert!(body["estimate"].is_null());
    assert_eq!(
        body["response"],
        "Can you tell me your biological sex (male or female)?"
    );
}

#[tokio::test]
async fn test_answers_fill_the_profile_one_field_at_a_time() {
    let mut history: Vec<Value> = Vec::new();
    let mut last = Value::Null;

    for message in ["How many calories do I burn a day?", "female", "I'm 34", "60 kg"] {
        last = chat(
            create_test_router(),
            &json!({ "history": history, "message": message }),
        )
        .await;
        history.push(json!({ "role": "user", "content": message }));
        history.push(json!({ "role": "assistant", "content": last["response"] }));
    }

    assert_eq!(last["profile"]["sex"], "female");
    assert_eq!(last["profile"]["age"], 34);
    assert_eq!(last["profile"]["weightKg"], 60.0);
    assert_eq!(last["askedThisIntent"], json!(["heightCm"]));
    assert_eq!(last["missing"], json!(["heightCm", "activityFactor"]));
}

#[tokio::test]
async fn test_complete_profile_returns_estimate() {
    let body = chat(
        create_test_router(),
        &json!({ "message": "What's my TDEE? I'm 25, male, 70kg, 175cm, moderately active" }),
    )
    .await;

    assert_eq!(body["missing"], json!([]));
    assert_eq!(body["askedThisIntent"], json!([]));
    let basal = body["estimate"]["basal"].as_f64().unwrap();
    assert!((basal - 1673.75).abs() < 1e-6);
    let response = body["response"].as_str().unwrap();
    assert!(response.contains("Daily burn about 2464-2724 calories"));
}

#[tokio::test]
async fn test_profile_survives_in_history_across_requests() {
    let body = chat(
        create_test_router(),
        &json!({
            "history": [
                { "role": "user", "content": "I'm a 30 year old man, 80 kg and 180 cm. What are my maintenance calories?" },
                { "role": "assistant", "content": "What is your activity level? (sedentary, light, moderate, active, very active)" }
            ],
            "message": "lightly active"
        }),
    )
    .await;

    assert_eq!(body["intent"], "energy-estimate");
    assert!(body["estimate"].is_object());
    assert_eq!(body["profile"]["activityFactor"], 1.375);
}

#[tokio::test]
async fn test_general_follow_up_does_not_start_estimate() {
    let body = chat(
        create_test_router(),
        &json!({
            "history": [
                { "role": "user", "content": "how do I start lifting?" },
                { "role": "assistant", "content": "Start with two full-body days. Would you like a simple weight training plan?" }
            ],
            "message": "yes please"
        }),
    )
    .await;

    assert_eq!(body["intent"], "general");
    assert_eq!(body["askedThisIntent"], json!([]));
    assert!(body["estimate"].is_null());
    assert_ne!(
        body["response"],
        "Can you tell me your biological sex (male or female)?"
    );
}

// ============================================================================
// General Questions
// ============================================================================

#[tokio::test]
async fn test_general_question_quotes_corpus_in_simple_mode() {
    let body = chat(
        create_test_router(),
        &json!({ "message": "Is brisk walking good for me?" }),
    )
    .await;

    assert_eq!(body["intent"], "general");
    assert!(body["estimate"].is_null());
    let response = body["response"].as_str().unwrap();
    assert!(response.starts_with("I am in simple mode."));
    assert!(response.contains("Brisk walking most days builds an aerobic base"));
}

#[tokio::test]
async fn test_model_reply_is_returned() {
    let router = create_test_router_with(ScriptedProvider::replying(
        "Two full body sessions a week is a great start.",
    ));
    let body = chat(router, &json!({ "message": "How often should I lift?" })).await;

    assert_eq!(
        body["response"],
        "Two full body sessions a week is a great start."
    );
}

#[tokio::test]
async fn test_model_cliches_are_removed_for_general_questions() {
    let router = create_test_router_with(ScriptedProvider::replying(
        "Walk for ten minutes after dinner. Listen to your body.",
    ));
    let body = chat(router, &json!({ "message": "How do I start walking?" })).await;

    assert_eq!(body["response"], "Walk for ten minutes after dinner.");
}

#[tokio::test]
async fn test_failing_backend_still_answers() {
    let router = create_test_router_with(ScriptedProvider::failing());
    let body = chat(router, &json!({ "message": "What should I eat after a workout?" })).await;

    assert!(body["response"]
        .as_str()
        .unwrap()
        .starts_with("I am in simple mode."));
}

#[tokio::test]
async fn test_stalled_backend_falls_back_after_timeout() {
    let router = create_test_router_with(ScriptedProvider::stalling());
    let body = chat(
        router,
        &json!({ "message": "Can you calculate my calories?" }),
    )
    .await;

    assert_eq!(
        body["response"],
        "Can you tell me your biological sex (male or female)?"
    );
}

#[tokio::test]
async fn test_recall_answers_from_history() {
    let body = chat(
        create_test_router(),
        &json!({
            "history": [{ "role": "user", "content": "I am 182 cm tall" }],
            "message": "What is my height?"
        }),
    )
    .await;

    assert!(body["response"].as_str().unwrap().contains("182 cm"));
    assert_eq!(body["profile"]["heightCm"], 182.0);
}

// ============================================================================
// Validation
// ============================================================================

#[tokio::test]
async fn test_missing_message_is_rejected() {
    let response = AxumTestRequest::post(routes::CHAT)
        .json(&json!({ "history": [] }))
        .send(create_test_router())
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
    assert!(body["error"]["request_id"].is_string());
}

#[tokio::test]
async fn test_blank_message_is_rejected() {
    let response = AxumTestRequest::post(routes::CHAT)
        .json(&json!({ "message": "   " }))
        .send(create_test_router())
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_role_is_rejected() {
    let response = AxumTestRequest::post(routes::CHAT)
        .json(&json!({
            "history": [{ "role": "narrator", "content": "hello" }],
            "message": "hi"
        }))
        .send(create_test_router())
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let response = AxumTestRequest::post(routes::CHAT)
        .raw_json("{\"message\": ")
        .send(create_test_router())
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_caller_request_id_is_echoed() {
    let response = AxumTestRequest::post(routes::CHAT)
        .header("x-request-id", "req-abc")
        .json(&json!({ "message": "" }))
        .send(create_test_router())
        .await;

    assert_eq!(response.header("x-request-id").as_deref(), Some("req-abc"));
    let body: Value = response.json();
    assert_eq!(body["error"]["request_id"], "req-abc");
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let padding = "a".repeat(2 * 1024 * 1024);
    let body = json!({ "message": padding }).to_string();
    let response = AxumTestRequest::post(routes::CHAT)
        .header("content-length", &body.len().to_string())
        .raw_json(&body)
        .send(create_test_router())
        .await;

    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
}
