// ABOUTME: Per-request chat pipeline wiring intent, profile, retrieval, compaction, and generation
// ABOUTME: A pure function of (history, message) over a shared read-only retrieval index
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Chat Pipeline
//!
//! Per turn:
//!
//! 1. classify the message against the transcript
//! 2. rebuild the profile from the transcript and merge the message into it
//! 3. choose a [`ReplyPlan`] from intent and profile completeness
//! 4. retrieve grounding for general answers and finished estimates
//! 5. compact the transcript and build the prompt
//! 6. generate once, falling back to the deterministic template

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::fallback;
use super::history::HistoryManager;
use super::prompt::{PromptBuilder, PromptContext};
use super::responder::{GeneratedReply, ReplySource, ResponseGenerator};
use super::safety::sanitize_cliches;
use super::ReplyPlan;
use crate::config::ServerConfig;
use crate::intelligence::{
    asked_in_current_run, classify, detect_recall, estimate_energy, pending_fields,
    rebuild_profile, update_profile, BmrConfig, EstimateResult, Intent,
};
use crate::llm::LlmProvider;
use crate::logging::AppLogger;
use crate::models::{HistoryTurn, Profile, ProfileField};
use crate::rag::{RetrievalParams, RetrievalResult, Retriever, SearchIndex};

/// Structured answer for one chat turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    /// Text shown to the user
    pub response: String,
    /// Profile after this turn
    pub profile: Profile,
    /// Present only when the profile is complete and an estimate was asked for
    pub estimate: Option<EstimateResult>,
    /// Unset profile fields, in asking order
    pub missing: Vec<ProfileField>,
    /// Field requested by this reply, if any
    pub asked_this_intent: Vec<ProfileField>,
    /// Classified intent of the message
    pub intent: Intent,
    /// Origin of `response`; not part of the wire format
    #[serde(skip)]
    pub source: Option<ReplySource>,
}

/// Everything needed to answer a chat turn
#[derive(Debug, Clone)]
pub struct ChatPipeline {
    index: Arc<SearchIndex>,
    retrieval: RetrievalParams,
    history: HistoryManager,
    prompts: PromptBuilder,
    generator: ResponseGenerator,
    bmr: BmrConfig,
}

impl ChatPipeline {
    /// Assemble a pipeline from its parts
    #[must_use]
    pub fn new(
        index: Arc<SearchIndex>,
        retrieval: RetrievalParams,
        history: HistoryManager,
        prompts: PromptBuilder,
        generator: ResponseGenerator,
    ) -> Self {
        Self {
            index,
            retrieval,
            history,
            prompts,
            generator,
            bmr: BmrConfig::default(),
        }
    }

    /// Pipeline using the configured thresholds and the given backend
    #[must_use]
    pub fn from_config(
        config: &ServerConfig,
        index: Arc<SearchIndex>,
        provider: Option<Arc<dyn LlmProvider>>,
    ) -> Self {
        Self::new(
            index,
            RetrievalParams::from(&config.retrieval),
            HistoryManager::from_config(&config.history),
            PromptBuilder::new(config.history.prompt_char_budget),
            ResponseGenerator::new(provider, config.generation),
        )
    }

    /// Shared retrieval index
    #[must_use]
    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    /// Generation front end
    #[must_use]
    pub const fn generator(&self) -> &ResponseGenerator {
        &self.generator
    }

    /// Answer one message given the caller-held transcript
    #[instrument(skip_all, fields(history_len = history.len()))]
    pub async fn respond(&self, history: &[HistoryTurn], message: &str) -> ChatReply {
        let started = Instant::now();

        let intent = classify(message, history);
        let known = rebuild_profile(history);
        let update = update_profile(&known, message, &pending_fields(history));
        let profile = update.profile;

        let plan = self.plan(intent, &profile, &update.missing, history, message);
        let grounding = self.grounding(&plan, message);

        let reply = if let ReplyPlan::Recall(field) = plan {
            GeneratedReply::direct(fallback::recall_reply(field, &profile))
        } else {
            let compaction = self.history.compact(history);
            let messages = self.prompts.build(&PromptContext {
                message,
                history: &compaction.turns,
                profile: &profile,
                plan: &plan,
                grounding: &grounding,
            });
            self.generator
                .generate(messages, || {
                    fallback::render(&plan, message, &profile, &grounding)
                })
                .await
        };

        let response = if intent == Intent::General && reply.source == ReplySource::Model {
            sanitize_cliches(&reply.text, message)
        } else {
            reply.text
        };

        let (estimate, asked_this_intent) = match plan {
            ReplyPlan::PresentEstimate(estimate) => (Some(estimate), Vec::new()),
            ReplyPlan::AskField(field) => (None, vec![field]),
            ReplyPlan::Guidance | ReplyPlan::Recall(_) | ReplyPlan::General => (None, Vec::new()),
        };

        AppLogger::log_chat_turn(
            intent.as_str(),
            reply.source.as_str(),
            update.missing.len(),
            started.elapsed().as_millis() as u64,
        );

        ChatReply {
            response,
            profile,
            estimate,
            missing: update.missing,
            asked_this_intent,
            intent,
            source: Some(reply.source),
        }
    }

    fn plan(
        &self,
        intent: Intent,
        profile: &Profile,
        missing: &[ProfileField],
        history: &[HistoryTurn],
        message: &str,
    ) -> ReplyPlan {
        match intent {
            Intent::General => detect_recall(message).map_or(ReplyPlan::General, ReplyPlan::Recall),
            Intent::EnergyEstimate if missing.is_empty() => estimate_energy(profile, &self.bmr)
                .map_or(ReplyPlan::Guidance, ReplyPlan::PresentEstimate),
            Intent::EnergyEstimate => {
                let asked = asked_in_current_run(history);
                missing
                    .iter()
                    .find(|field| !asked.contains(field))
                    .map_or(ReplyPlan::Guidance, |field| ReplyPlan::AskField(*field))
            }
        }
    }

    fn grounding(&self, plan: &ReplyPlan, message: &str) -> Vec<RetrievalResult> {
        match plan {
            ReplyPlan::General | ReplyPlan::PresentEstimate(_) => {
                self.index.retrieve(message, self.retrieval)
            }
            ReplyPlan::AskField(_) | ReplyPlan::Guidance | ReplyPlan::Recall(_) => Vec::new(),
        }
    }
}
