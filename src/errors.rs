// ABOUTME: Error types for the coach server, re-exported from the core crate
// ABOUTME: Gives server modules one import path for AppError, ErrorCode, and AppResult
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Errors
//!
//! `AppError` implements `IntoResponse` (through the core crate's
//! `http-response` feature), so route handlers return `Result<_, AppError>`
//! directly.

pub use pierre_coach_core::errors::{
    AppError, AppResult, ErrorCode, ErrorContext, ErrorResponse, ErrorResponseDetails,
};
