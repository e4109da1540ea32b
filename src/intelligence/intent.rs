// ABOUTME: Rule-based intent classification for chat turns (energy estimate vs general)
// ABOUTME: Also tracks which profile fields the coach has asked for and detects recall questions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Intent Classifier
//!
//! Stateless and deterministic. Intent is re-evaluated on every turn; the
//! only memory it has is what the caller passes back in the transcript.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::profile_extractor::extract_facts;
use crate::models::{HistoryTurn, ProfileField, TurnRole};

static ENERGY_VOCABULARY: LazyLock<Option<Regex>> = LazyLock::new(|| {
    // Matches: tdee, bmr, maintenance calories, how many calories, calorie deficit,
    // bulk, cutting, maintain weight, daily burn, metabolic rate
    Regex::new(
        r"\b(?:tdee|bmr|maintenance|calories?|kcals?|deficit|surplus|bulk(?:ing)?|cut(?:ting)?|maintain(?:ing)?|burn each day|daily burn|energy expenditure|metabolic rate|metabolism)\b",
    )
    .ok()
});

static ASK_SEX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b(?:sex|gender|male or female)\b").ok());
static ASK_AGE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b(?:age|how old)\b").ok());
static ASK_WEIGHT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b(?:weight|weigh)\b").ok());
static ASK_HEIGHT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b(?:height|how tall)\b").ok());
static ASK_ACTIVITY: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b(?:activity|active)\b").ok());

static RECALL_OPENER: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:what|whats|what's|how|do you|remind|tell me|recall|did i)\b").ok()
});

static RECALL_HEIGHT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b(?:my\s+height|how\s+tall\s+am\s+i)\b").ok());
static RECALL_WEIGHT: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"\b(?:my\s+weight|how\s+much\s+do\s+i\s+weigh|what\s+do\s+i\s+weigh)\b").ok()
});
static RECALL_AGE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b(?:my\s+age|how\s+old\s+am\s+i)\b").ok());
static RECALL_SEX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\bmy\s+(?:sex|gender|biological\s+sex)\b").ok());
static RECALL_ACTIVITY: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b(?:my\s+activity(?:\s+level)?|activity\s+level)\b").ok());

/// Categorical purpose of a user turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Intent {
    /// Wants basal or total energy numbers
    EnergyEstimate,
    /// Anything else
    General,
}

impl Intent {
    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EnergyEstimate => "energy-estimate",
            Self::General => "general",
        }
    }
}

impl Display for Intent {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

fn is_match(pattern: &LazyLock<Option<Regex>>, text: &str) -> bool {
    pattern.as_ref().is_some_and(|regex| regex.is_match(text))
}

/// Whether the text uses energy-estimate vocabulary
#[must_use]
pub fn mentions_energy(text: &str) -> bool {
    is_match(&ENERGY_VOCABULARY, &text.to_lowercase())
}

/// Classify the current message
///
/// A message is an energy-estimate request when it uses estimate vocabulary,
/// or when it answers a profile question the coach asked during an estimate
/// run: the message either states a profile fact or is not itself a question.
#[must_use]
pub fn classify(message: &str, history: &[HistoryTurn]) -> Intent {
    classify_with_pending(message, &pending_fields(history))
}

fn classify_with_pending(message: &str, pending: &[ProfileField]) -> Intent {
    if mentions_energy(message) {
        return Intent::EnergyEstimate;
    }
    if pending.is_empty() {
        return Intent::General;
    }

    let answers_question = !message.contains('?') || !extract_facts(message, pending).is_empty();
    if answers_question {
        Intent::EnergyEstimate
    } else {
        Intent::General
    }
}

/// Profile fields an assistant turn asked for
///
/// Only questions count: the text must contain a question mark. This looks
/// at wording alone; see [`estimate_questions`] for whether the question
/// belonged to an estimate run.
#[must_use]
pub fn fields_requested(text: &str) -> Vec<ProfileField> {
    if !text.contains('?') {
        return Vec::new();
    }
    let lower = text.to_lowercase();
    [
        (ProfileField::Sex, &ASK_SEX),
        (ProfileField::Age, &ASK_AGE),
        (ProfileField::WeightKg, &ASK_WEIGHT),
        (ProfileField::HeightCm, &ASK_HEIGHT),
        (ProfileField::ActivityFactor, &ASK_ACTIVITY),
    ]
    .into_iter()
    .filter_map(|(field, pattern)| is_match(pattern, &lower).then_some(field))
    .collect()
}

/// Profile questions per turn, aligned with `history`
///
/// An assistant turn only counts as asking for fields when the user turn
/// before it was itself an energy-estimate turn. A coach follow-up such as
/// "Would you like a weight training plan?" after a general question asks
/// for nothing. User and system turns always map to an empty list.
#[must_use]
pub fn estimate_questions(history: &[HistoryTurn]) -> Vec<Vec<ProfileField>> {
    let mut questions = Vec::with_capacity(history.len());
    let mut pending: Vec<ProfileField> = Vec::new();
    let mut estimating = false;

    for turn in history {
        let asked = match turn.role {
            TurnRole::User => {
                estimating =
                    classify_with_pending(&turn.content, &pending) == Intent::EnergyEstimate;
                pending.clear();
                Vec::new()
            }
            TurnRole::Assistant if estimating => {
                pending = fields_requested(&turn.content);
                pending.clone()
            }
            TurnRole::Assistant => {
                pending.clear();
                Vec::new()
            }
            TurnRole::System => Vec::new(),
        };
        questions.push(asked);
    }

    questions
}

/// Fields the most recent turn asked for, if that turn was the coach's
#[must_use]
pub fn pending_fields(history: &[HistoryTurn]) -> Vec<ProfileField> {
    history
        .iter()
        .zip(estimate_questions(history))
        .rev()
        .find(|(turn, _)| !turn.is_system())
        .filter(|(turn, _)| turn.role == TurnRole::Assistant)
        .map(|(_, asked)| asked)
        .unwrap_or_default()
}

/// Fields requested during the current unbroken run of profile questions
///
/// Walks back from the end of the transcript and stops at the first coach
/// turn that asked for nothing.
#[must_use]
pub fn asked_in_current_run(history: &[HistoryTurn]) -> Vec<ProfileField> {
    let mut asked = Vec::new();
    for (turn, requested) in history.iter().zip(estimate_questions(history)).rev() {
        if turn.role != TurnRole::Assistant {
            continue;
        }
        if requested.is_empty() {
            break;
        }
        for field in requested {
            if !asked.contains(&field) {
                asked.push(field);
            }
        }
    }
    asked
}

/// Which stored field the user is asking about, e.g. "what is my height?"
#[must_use]
pub fn detect_recall(message: &str) -> Option<ProfileField> {
    let lower = message.to_lowercase();
    if !lower.contains('?') && !is_match(&RECALL_OPENER, &lower) {
        return None;
    }
    [
        (ProfileField::HeightCm, &RECALL_HEIGHT),
        (ProfileField::WeightKg, &RECALL_WEIGHT),
        (ProfileField::Age, &RECALL_AGE),
        (ProfileField::Sex, &RECALL_SEX),
        (ProfileField::ActivityFactor, &RECALL_ACTIVITY),
    ]
    .into_iter()
    .find_map(|(field, pattern)| is_match(pattern, &lower).then_some(field))
}
