// ABOUTME: Route module organization for the coach HTTP endpoints
// ABOUTME: Chat plus status and health routes, each a thin layer over ServerResources
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route module for Pierre Coach
//!
//! Handlers only validate and delegate; all behavior lives in the chat
//! pipeline.

/// Chat endpoint
pub mod chat;
/// Status and health endpoints
pub mod health;

pub use chat::{ChatRequestBody, ChatRoutes};
pub use health::{HealthRoutes, StatusResponse};
