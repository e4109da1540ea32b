// ABOUTME: Main library entry point for the Pierre Coach chat backend
// ABOUTME: Retrieval-grounded beginner fitness Q&A with profile intake and energy estimates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Coach
//!
//! A conversational backend for beginner fitness questions. Each request
//! carries the full transcript plus one new message; the server answers with
//! a reply, the profile it could infer, and, once the profile is complete, a
//! daily energy estimate.
//!
//! ## Architecture
//!
//! - **RAG**: chunked corpus with TF-IDF or BM25 ranking
//! - **Intelligence**: intent classification, profile extraction, and the
//!   Mifflin-St Jeor estimate
//! - **LLM**: optional generation backends behind one trait
//! - **Chat**: compaction, prompt assembly, and deterministic fallbacks
//! - **Routes**: axum handlers over shared [`resources::ServerResources`]
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use pierre_coach::config::ServerConfig;
//! use pierre_coach::resources::ServerResources;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     let resources = Arc::new(ServerResources::from_config(config).await);
//!     pierre_coach::server::serve(resources).await
//! }
//! ```

/// Conversation pipeline
pub mod chat;

/// Environment configuration
pub mod config;

/// Application constants
pub mod constants;

/// Error types shared with the core crate
pub mod errors;

/// Intent, profile, and energy estimation
pub mod intelligence;

/// Generation backends
pub mod llm;

/// Structured logging setup
pub mod logging;

/// HTTP middleware
pub mod middleware;

/// Conversation and profile data types
pub mod models;

/// Corpus indexing and retrieval
pub mod rag;

/// Shared server state
pub mod resources;

/// HTTP route handlers
pub mod routes;

/// Router assembly and serving
pub mod server;
