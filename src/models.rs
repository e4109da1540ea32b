// ABOUTME: Core data models for the coach: conversation turns and the user profile
// ABOUTME: Defines HistoryTurn, TurnRole, Profile, Sex, ActivityLevel, and ProfileField
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! The caller owns the conversation: every request carries the full history,
//! and the [`Profile`] is re-derived from it each time. Nothing here is
//! persisted server-side.
//!
//! Weight and height are always metric. Unit conversion happens only in the
//! profile extractor.

use std::fmt::{Display, Formatter, Result as FmtResult};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Conversation
// ============================================================================

/// Author of a conversation turn
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// The person asking questions
    User,
    /// The coach
    Assistant,
    /// Injected context such as compaction digests
    System,
}

impl TurnRole {
    /// Lowercase wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        }
    }
}

/// One turn of the caller-held transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryTurn {
    /// Who wrote the turn
    pub role: TurnRole,
    /// Turn text
    pub content: String,
    /// When the turn was written, if the caller tracks it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl HistoryTurn {
    /// Turn with no timestamp
    pub fn new(role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: None,
        }
    }

    /// User turn
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(TurnRole::User, content)
    }

    /// Assistant turn
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(TurnRole::Assistant, content)
    }

    /// System turn
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(TurnRole::System, content)
    }

    /// Attach a timestamp
    #[must_use]
    pub const fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Whether the turn is a system turn
    #[must_use]
    pub fn is_system(&self) -> bool {
        self.role == TurnRole::System
    }
}

// ============================================================================
// Profile
// ============================================================================

/// Biological sex used by the basal expenditure formula
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    /// Male constant (+5)
    Male,
    /// Female constant (-161)
    Female,
    /// Not stated yet
    #[default]
    Unknown,
}

impl Sex {
    /// Lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Unknown => "unknown",
        }
    }
}

impl Display for Sex {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Named activity level and its fixed multiplier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise (1.2)
    Sedentary,
    /// Light exercise or an on-your-feet job (1.375)
    LightlyActive,
    /// Regular exercise most weeks (1.55)
    ModeratelyActive,
    /// Hard exercise most days (1.725)
    Active,
    /// Physical job plus training (1.9)
    VeryActive,
}

impl ActivityLevel {
    /// Every level in ascending order
    pub const ALL: [Self; 5] = [
        Self::Sedentary,
        Self::LightlyActive,
        Self::ModeratelyActive,
        Self::Active,
        Self::VeryActive,
    ];

    /// Multiplier applied to basal expenditure
    #[must_use]
    pub const fn factor(self) -> f64 {
        match self {
            Self::Sedentary => 1.2,
            Self::LightlyActive => 1.375,
            Self::ModeratelyActive => 1.55,
            Self::Active => 1.725,
            Self::VeryActive => 1.9,
        }
    }

    /// Plain-language name
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sedentary => "sedentary",
            Self::LightlyActive => "lightly active",
            Self::ModeratelyActive => "moderately active",
            Self::Active => "active",
            Self::VeryActive => "very active",
        }
    }

    /// Level whose multiplier equals `factor`
    #[must_use]
    pub fn from_factor(factor: f64) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|level| (level.factor() - factor).abs() < 1e-9)
    }
}

/// Profile slot, named as it appears in the JSON body
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ProfileField {
    /// Biological sex
    Sex,
    /// Age in years
    Age,
    /// Weight in kilograms
    WeightKg,
    /// Height in centimeters
    HeightCm,
    /// Activity multiplier
    ActivityFactor,
}

impl ProfileField {
    /// Order in which missing fields are requested
    pub const ORDER: [Self; 5] = [
        Self::Sex,
        Self::Age,
        Self::WeightKg,
        Self::HeightCm,
        Self::ActivityFactor,
    ];

    /// JSON key
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sex => "sex",
            Self::Age => "age",
            Self::WeightKg => "weightKg",
            Self::HeightCm => "heightCm",
            Self::ActivityFactor => "activityFactor",
        }
    }

    /// Wording used when asking for the field
    #[must_use]
    pub const fn human_name(self) -> &'static str {
        match self {
            Self::Sex => "biological sex (male or female)",
            Self::Age => "age",
            Self::WeightKg => "weight",
            Self::HeightCm => "height",
            Self::ActivityFactor => "activity level",
        }
    }
}

impl Display for ProfileField {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// The facts needed for an energy estimate
///
/// Derived from the transcript on every request; see
/// `intelligence::profile_extractor` for how it is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Biological sex
    pub sex: Sex,
    /// Age in years
    pub age: Option<u32>,
    /// Weight in kilograms
    pub weight_kg: Option<f64>,
    /// Height in centimeters
    pub height_cm: Option<f64>,
    /// One of the [`ActivityLevel`] multipliers
    pub activity_factor: Option<f64>,
}

impl Profile {
    /// Whether a field holds a value
    #[must_use]
    pub const fn is_set(&self, field: ProfileField) -> bool {
        match field {
            ProfileField::Sex => !matches!(self.sex, Sex::Unknown),
            ProfileField::Age => self.age.is_some(),
            ProfileField::WeightKg => self.weight_kg.is_some(),
            ProfileField::HeightCm => self.height_cm.is_some(),
            ProfileField::ActivityFactor => self.activity_factor.is_some(),
        }
    }

    /// Unset fields, in asking order
    #[must_use]
    pub fn missing_fields(&self) -> Vec<ProfileField> {
        ProfileField::ORDER
            .into_iter()
            .filter(|field| !self.is_set(*field))
            .collect()
    }

    /// Whether every field is set
    #[must_use]
    pub fn is_complete(&self) -> bool {
        ProfileField::ORDER.iter().all(|field| self.is_set(*field))
    }

    /// Named activity level, if set
    #[must_use]
    pub fn activity_level(&self) -> Option<ActivityLevel> {
        self.activity_factor.and_then(ActivityLevel::from_factor)
    }

    /// Body-mass index when weight and height are known
    #[must_use]
    pub fn bmi(&self) -> Option<f64> {
        match (self.weight_kg, self.height_cm) {
            (Some(weight), Some(height)) if height > 0.0 => {
                let meters = height / 100.0;
                Some(weight / (meters * meters))
            }
            _ => None,
        }
    }

    /// Known facts as plain text, e.g. `sex male, age 25, weight 70 kg`
    ///
    /// The wording is readable by the profile extractor, so a profile written
    /// this way can be recovered from the text alone.
    #[must_use]
    pub fn describe(&self) -> Option<String> {
        let mut facts = Vec::new();
        if self.sex != Sex::Unknown {
            facts.push(format!("sex {}", self.sex));
        }
        if let Some(age) = self.age {
            facts.push(format!("age {age}"));
        }
        if let Some(weight) = self.weight_kg {
            facts.push(format!("weight {} kg", format_quantity(weight)));
        }
        if let Some(height) = self.height_cm {
            facts.push(format!("height {} cm", format_quantity(height)));
        }
        if let Some(level) = self.activity_level() {
            facts.push(format!("activity level {}", level.label()));
        }
        (!facts.is_empty()).then(|| facts.join(", "))
    }
}

/// Format a metric quantity with at most two decimals and no trailing zeros
#[must_use]
pub fn format_quantity(value: f64) -> String {
    let formatted = format!("{value:.2}");
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_owned()
}
