// ABOUTME: Core error types for the Pierre Coach fitness chat backend
// ABOUTME: Foundation crate shared by the server library and binary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Coach Core
//!
//! Foundation crate providing the error vocabulary for the Pierre Coach
//! backend. It changes rarely, so keeping it separate lets the workspace
//! rebuild the server crate without touching it.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and HTTP error bodies

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;
