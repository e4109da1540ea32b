// ABOUTME: Prompt assembly for the generation backend: persona, profile, plan, grounding, history
// ABOUTME: Produces the ordered ChatMessage list sent to the configured LLM provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Prompt Builder
//!
//! One system message carries the persona, the rules, the known profile, an
//! instruction for the chosen [`ReplyPlan`], and any grounding chunks. It is
//! followed by as much recent history as fits in the character budget and
//! finally the user's message.

use std::fmt::Write;

use super::fallback::{needs_professional_note, whole_kcal};
use super::history::is_digest;
use super::safety::is_safety_topic;
use super::ReplyPlan;
use crate::constants::retrieval::PROMPT_CHUNK_CHARS;
use crate::llm::ChatMessage;
use crate::models::{ActivityLevel, HistoryTurn, Profile, ProfileField, TurnRole};
use crate::rag::RetrievalResult;

/// Coach persona
pub const PERSONA: &str = "You are a friendly, encouraging, safety-first fitness coach for true beginners (often mid-40s). Sound natural and human. Warm, calm, optimistic. Use contractions and plain words. Keep messages brief (1-3 short paragraphs). No bullet lists unless the user asks. Avoid medical claims or diagnoses.";

/// Grounding rules
pub const ANTI_HALLUCINATION_RULES: &str = "If something isn't in the context or user message, say what you don't know briefly, ask one short clarifying question, or offer a safe, general guideline with a clear caveat. Never invent numbers or facts. Be supportive without sounding robotic.";

const CONVERSATION_RULES: &str = "Ask for only one missing data item when user wants calories. If already asked and still missing, give general starter advice without repeating. Keep it natural and concise; avoid filler like 'That's a great question'.";

const CLICHE_RULE: &str = "Avoid cliché safety lines like 'listen to your body' or 'if you feel pain, stop' unless the user asks about safety, pain, injury, form, or medical care.";

const CONTEXT_RULE: &str =
    "Only use this info if helpful. If unsure, be transparent and ask a brief follow-up.";

/// Everything one prompt is built from
#[derive(Debug, Clone, Copy)]
pub struct PromptContext<'a> {
    /// Current user message
    pub message: &'a str,
    /// Transcript after compaction
    pub history: &'a [HistoryTurn],
    /// Profile including facts from the current message
    pub profile: &'a Profile,
    /// What the reply must do
    pub plan: &'a ReplyPlan,
    /// Retrieved chunks, possibly empty
    pub grounding: &'a [RetrievalResult],
}

/// Assembles generation requests
#[derive(Debug, Clone, Copy)]
pub struct PromptBuilder {
    history_char_budget: usize,
}

impl PromptBuilder {
    /// Builder forwarding at most `history_char_budget` characters of history
    #[must_use]
    pub const fn new(history_char_budget: usize) -> Self {
        Self {
            history_char_budget,
        }
    }

    /// Build the message list for one turn
    #[must_use]
    pub fn build(&self, context: &PromptContext<'_>) -> Vec<ChatMessage> {
        let mut messages = vec![ChatMessage::system(system_prompt(context))];
        messages.extend(self.recent_history(context.history));
        messages.push(ChatMessage::user(context.message));
        messages
    }

    /// Newest user and assistant turns whose combined length fits the budget
    fn recent_history(&self, history: &[HistoryTurn]) -> Vec<ChatMessage> {
        let mut used = 0;
        let mut recent: Vec<ChatMessage> = history
            .iter()
            .rev()
            .filter(|turn| !turn.is_system())
            .map_while(|turn| {
                used += turn.content.chars().count();
                (used <= self.history_char_budget).then(|| match turn.role {
                    TurnRole::Assistant => ChatMessage::assistant(turn.content.clone()),
                    TurnRole::User | TurnRole::System => ChatMessage::user(turn.content.clone()),
                })
            })
            .collect();
        recent.reverse();
        recent
    }
}

fn system_prompt(context: &PromptContext<'_>) -> String {
    let known = context
        .profile
        .describe()
        .unwrap_or_else(|| "nothing yet".to_owned());
    let safety_asked = if is_safety_topic(context.message) {
        "yes"
    } else {
        "no"
    };

    let mut prompt = format!(
        "{PERSONA}\n\n{ANTI_HALLUCINATION_RULES}\n\n{CONVERSATION_RULES}\n\nKnown profile: {known}.\nSafetyAsked: {safety_asked}\n{CLICHE_RULE}\n\n{}",
        plan_instruction(context.plan, context.profile)
    );

    if !context.grounding.is_empty() {
        prompt.push_str("\n\nContext:\n");
        for result in context.grounding {
            let _ = writeln!(
                prompt,
                "[{}] {}",
                result.chunk.source,
                excerpt(&result.chunk.text)
            );
        }
        prompt.push_str(CONTEXT_RULE);
    }

    for digest in context.history.iter().filter(|turn| is_digest(turn)) {
        let _ = write!(prompt, "\n\n{}", digest.content);
    }

    prompt
}

fn plan_instruction(plan: &ReplyPlan, profile: &Profile) -> String {
    match plan {
        ReplyPlan::AskField(ProfileField::ActivityFactor) => {
            let levels: Vec<&str> = ActivityLevel::ALL.iter().map(|level| level.label()).collect();
            format!(
                "The user wants a calorie estimate. Ask only for their activity level in one short question and list the options: {}.",
                levels.join(", ")
            )
        }
        ReplyPlan::AskField(field) => format!(
            "The user wants a calorie estimate. Ask only for their {} in one short, friendly question.",
            field.human_name()
        ),
        ReplyPlan::Guidance => {
            let missing: Vec<&str> = profile
                .missing_fields()
                .into_iter()
                .map(|field| field.human_name())
                .collect();
            format!(
                "The user wants a calorie estimate but these are still missing: {}. You already asked, so do not ask again. Give short general starter advice instead.",
                missing.join(", ")
            )
        }
        ReplyPlan::PresentEstimate(estimate) => {
            let mut instruction = format!(
                "Explain these numbers in plain language: resting burn (BMR) about {:.0} calories, daily burn (TDEE) about {:.0}-{:.0} calories. Say clearly it is a rough estimate, not medical advice.",
                whole_kcal(estimate.basal),
                whole_kcal(estimate.range.low),
                whole_kcal(estimate.range.high),
            );
            if needs_professional_note(profile) {
                instruction.push_str(" Gently suggest talking to a health professional.");
            }
            instruction
        }
        ReplyPlan::Recall(field) => format!(
            "The user asked what you remember about their {}. Answer only from the known profile.",
            field.human_name()
        ),
        ReplyPlan::General => "Answer the user's question.".to_owned(),
    }
}

fn excerpt(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= PROMPT_CHUNK_CHARS {
        return trimmed.to_owned();
    }
    let mut cut: String = trimmed.chars().take(PROMPT_CHUNK_CHARS).collect();
    cut.push_str("...");
    cut
}
