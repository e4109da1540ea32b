// ABOUTME: Conversation layer: compaction, prompt assembly, generation, and deterministic replies
// ABOUTME: ChatPipeline turns (history, message) into a structured ChatReply
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Chat
//!
//! Nothing in this module keeps state between requests. The caller sends the
//! whole transcript every time and the reply carries the profile back.

/// Deterministic reply templates
pub mod fallback;
/// Transcript compaction into a digest turn
pub mod history;
/// Request wiring
pub mod pipeline;
/// Generation request assembly
pub mod prompt;
/// Single-attempt generation with fallback
pub mod responder;
/// Safety-topic detection and cliché removal
pub mod safety;

use crate::intelligence::EstimateResult;
use crate::models::ProfileField;

pub use history::{Compaction, HistoryManager};
pub use pipeline::{ChatPipeline, ChatReply};
pub use prompt::{PromptBuilder, PromptContext};
pub use responder::{GeneratedReply, ReplySource, ResponseGenerator};

/// What the reply to the current message has to accomplish
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReplyPlan {
    /// Ask for one missing profile field
    AskField(ProfileField),
    /// Every missing field was already asked for; give starter advice
    Guidance,
    /// Profile complete; explain the numbers
    PresentEstimate(EstimateResult),
    /// Repeat a stored profile fact
    Recall(ProfileField),
    /// Answer a general question
    General,
}
