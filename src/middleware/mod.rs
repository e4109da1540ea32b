// ABOUTME: HTTP middleware for the coach server
// ABOUTME: Currently the CORS layer; request ids and tracing are wired in server.rs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Cross-origin resource sharing
pub mod cors;

pub use cors::setup_cors;
