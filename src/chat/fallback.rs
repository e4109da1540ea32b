// ABOUTME: Deterministic reply templates used when no generation backend answers
// ABOUTME: Covers field questions, starter guidance, estimates, recall answers, and simple-mode tips
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Fallback Replies
//!
//! Every function here is pure: the same plan, profile, and grounding always
//! render the same text. The pipeline uses them whenever the model is
//! unconfigured, fails, times out, or returns nothing, and for recall
//! answers, which never reach the model.

use std::sync::LazyLock;

use regex::Regex;

use super::ReplyPlan;
use crate::constants::estimate::{CM_PER_INCH, HIGH_BMI_NOTE, KG_PER_LB, LOW_BMI_NOTE};
use crate::constants::retrieval::FALLBACK_SNIPPET_CHARS;
use crate::intelligence::EstimateResult;
use crate::models::{ActivityLevel, Profile, ProfileField};
use crate::rag::RetrievalResult;

/// Reply when the coach already asked and the profile is still incomplete
pub const GUIDANCE_REPLY: &str = "I can still guide you. Start with 2 easy full body days and a short daily walk. Share missing info later for numbers.";

/// Reply to a recall question about a field that is not known yet
pub const UNKNOWN_FIELD_REPLY: &str = "I do not have that yet.";

const SIMPLE_MODE_OPENER: &str = "I am in simple mode.";
const SIMPLE_MODE_CLOSER: &str = " Tell me a bit more and I'll tailor it.";
const HEALTH_PROFESSIONAL_NOTE: &str = " If you can, talk to a health professional.";

const SAMPLE_WEEK_TIP: &str = " Here's a simple week to start: Monday full-body strength, Wednesday a 20-minute brisk walk, Friday full-body strength, and a short walk on the other days.";
const NUTRITION_TIP: &str =
    " Aim for simple, balanced meals: protein, veggies, and carbs you enjoy.";
const FORM_TIP: &str = " Ease in and stop if you feel sharp pain. Good form over speed.";
const DEFAULT_TIP: &str = " Start small, then add a little each week.";

static SCHEDULE_CUE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    // Matches: how often, 3 days a week, workout plan, routine, schedule, frequency
    Regex::new(r"\b(?:frequency|how often|days?|weeks?|weekly|workouts?|routine|schedule|plan)\b").ok()
});
static NUTRITION_CUE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b(?:nutrition|eat|eating|diet|protein|meals?|food)\b").ok());
static FORM_CUE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b(?:form|injury|injured|hurts?|pain|sore)\b").ok());

/// Render the deterministic reply for a plan
#[must_use]
pub fn render(
    plan: &ReplyPlan,
    message: &str,
    profile: &Profile,
    grounding: &[RetrievalResult],
) -> String {
    match plan {
        ReplyPlan::AskField(field) => ask_field(*field),
        ReplyPlan::Guidance => GUIDANCE_REPLY.to_owned(),
        ReplyPlan::PresentEstimate(estimate) => estimate_reply(estimate, profile),
        ReplyPlan::Recall(field) => recall_reply(*field, profile),
        ReplyPlan::General => general_reply(message, grounding),
    }
}

/// One short question for a single missing field
#[must_use]
pub fn ask_field(field: ProfileField) -> String {
    match field {
        ProfileField::ActivityFactor => {
            let levels: Vec<&str> = ActivityLevel::ALL.iter().map(|level| level.label()).collect();
            format!("What is your activity level? ({})", levels.join(", "))
        }
        other => format!("Can you tell me your {}?", other.human_name()),
    }
}

/// Whole calories, truncated toward zero
#[must_use]
pub fn whole_kcal(value: f64) -> f64 {
    value.trunc()
}

/// Whether the profile's BMI is far enough out of range to suggest a professional
#[must_use]
pub fn needs_professional_note(profile: &Profile) -> bool {
    profile
        .bmi()
        .is_some_and(|bmi| !(LOW_BMI_NOTE..=HIGH_BMI_NOTE).contains(&bmi))
}

/// Plain-language estimate with the daily range
#[must_use]
pub fn estimate_reply(estimate: &EstimateResult, profile: &Profile) -> String {
    let mut reply = format!(
        "Your body at rest uses about {:.0} calories (BMR). Daily burn about {:.0}-{:.0} calories (TDEE). This is only a rough guess, not medical advice.",
        whole_kcal(estimate.basal),
        whole_kcal(estimate.range.low),
        whole_kcal(estimate.range.high),
    );
    if needs_professional_note(profile) {
        reply.push_str(HEALTH_PROFESSIONAL_NOTE);
    }
    reply
}

/// Answer "what is my ...?" from the rebuilt profile
#[must_use]
pub fn recall_reply(field: ProfileField, profile: &Profile) -> String {
    let answer = match field {
        ProfileField::HeightCm => profile.height_cm.map(|cm| {
            let (feet, inches) = feet_and_inches(cm);
            format!(
                "You told me your height is about {:.0} cm (~{feet}' {inches}\").",
                cm.round()
            )
        }),
        ProfileField::WeightKg => profile.weight_kg.map(|kg| {
            let pounds = (kg / KG_PER_LB).round();
            format!("Your weight saved is about {kg:.1} kg (~{pounds:.0} lb).")
        }),
        ProfileField::Age => profile
            .age
            .map(|age| format!("You said you are {age} years old.")),
        ProfileField::Sex => profile
            .is_set(ProfileField::Sex)
            .then(|| format!("You told me your biological sex is {}.", profile.sex)),
        ProfileField::ActivityFactor => profile.activity_level().map(|level| {
            format!(
                "Saved activity level is {} (factor {}).",
                level.label(),
                level.factor()
            )
        }),
    };
    answer.unwrap_or_else(|| UNKNOWN_FIELD_REPLY.to_owned())
}

fn feet_and_inches(cm: f64) -> (u32, u32) {
    let total_inches = cm / CM_PER_INCH;
    let mut feet = (total_inches / 12.0).floor() as u32;
    let mut inches = (total_inches - f64::from(feet) * 12.0).round() as u32;
    if inches == 12 {
        feet += 1;
        inches = 0;
    }
    (feet, inches)
}

/// Simple-mode answer: a line from the best grounding chunk, or a keyword tip
#[must_use]
pub fn general_reply(message: &str, grounding: &[RetrievalResult]) -> String {
    let middle = grounding
        .first()
        .and_then(|result| first_sentence(&result.chunk.text))
        .map_or_else(
            || keyword_tip(message).to_owned(),
            |snippet| format!(" Here's a quick note from my files: {snippet}."),
        );
    format!("{SIMPLE_MODE_OPENER}{middle}{SIMPLE_MODE_CLOSER}")
}

fn first_sentence(text: &str) -> Option<String> {
    let sentence = text.split(['.', '!', '?']).next()?;
    let collapsed = sentence
        .split_whitespace()
        .filter(|word| !word.chars().all(|c| c == '#'))
        .collect::<Vec<_>>()
        .join(" ");
    if collapsed.is_empty() {
        return None;
    }
    Some(collapsed.chars().take(FALLBACK_SNIPPET_CHARS).collect())
}

fn keyword_tip(message: &str) -> &'static str {
    let lower = message.to_lowercase();
    let hits = |cue: &LazyLock<Option<Regex>>| cue.as_ref().is_some_and(|r| r.is_match(&lower));
    if hits(&SCHEDULE_CUE) {
        SAMPLE_WEEK_TIP
    } else if hits(&NUTRITION_CUE) {
        NUTRITION_TIP
    } else if hits(&FORM_CUE) {
        FORM_TIP
    } else {
        DEFAULT_TIP
    }
}
