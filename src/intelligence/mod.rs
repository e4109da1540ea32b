// ABOUTME: Rule-based conversation intelligence: intent, profile extraction, and estimates
// ABOUTME: Pure functions with no network or index dependency, testable in isolation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Intelligence Module
//!
//! Everything the coach decides without a language model: what the user
//! wants, which profile facts they stated, and the energy estimate once the
//! profile is complete.

/// Energy-estimate vs general intent, asked-field tracking, recall questions
pub mod intent;
/// Mifflin-St Jeor basal and total expenditure
pub mod nutrition_calculator;
/// Free-text slot extraction with monotonic merge
pub mod profile_extractor;

pub use intent::{
    asked_in_current_run, classify, detect_recall, estimate_questions, fields_requested,
    pending_fields, Intent,
};
pub use nutrition_calculator::{
    calculate_mifflin_st_jeor, calculate_tdee, estimate_energy, BmrConfig, EnergyRange,
    EstimateResult,
};
pub use profile_extractor::{
    extract_facts, merge, rebuild_profile, update_profile, ProfileFacts, ProfileUpdate,
};
