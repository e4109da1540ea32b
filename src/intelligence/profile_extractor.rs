// ABOUTME: Pure slot extraction of sex, age, weight, height, and activity from free text
// ABOUTME: Monotonic merge into the profile; ambiguous or conflicting signals are ignored
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Profile Extractor
//!
//! Pattern matching over numerals and unit or keyword cues. Each field takes
//! at most one value per utterance: when an utterance yields two different
//! values for the same field the field is left alone. Pounds, feet, inches,
//! and meters are converted to kilograms and centimeters here and nowhere
//! else.
//!
//! The extractor is a pure function of `(profile, utterance, asked fields)`.
//! [`rebuild_profile`] folds it over a whole transcript, which is how the
//! server recovers the profile on every request.

use std::ops::Range;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

use super::intent::estimate_questions;
use crate::constants::estimate::{CM_PER_INCH, KG_PER_LB};
use crate::constants::history::DIGEST_MARKER;
use crate::models::{ActivityLevel, HistoryTurn, Profile, ProfileField, Sex, TurnRole};

// ============================================================================
// Patterns
// ============================================================================

static WEIGHT_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    // Matches: 70kg, 80 kg, 180 lbs, 165.5 pounds, 72 kilos
    Regex::new(r"\b(\d{2,3}(?:\.\d+)?)\s*(kgs?|kilos?|kilograms?|lbs?|pounds?)\b").ok()
});

static FEET_INCHES_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    // Matches: 5'11", 5 ft 11 in, 6 feet, 5 foot 4, 5'7
    Regex::new(
        r#"\b([3-8])\s*(?:'|ft\.?|foot|feet)\s*(?:(1[01]|\d)\b\s*(?:"|''|inches\b|inch\b|in\b)?)?"#,
    )
    .ok()
});

static CENTIMETERS_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    // Matches: 175cm, 162 cm, 180.5 centimeters
    Regex::new(r"\b(\d{2,3}(?:\.\d+)?)\s*(?:cms?|centimet(?:er|re)s?)\b").ok()
});

static METERS_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    // Matches: 1.75m, 1.8 meters, 1.62 metres
    Regex::new(r"\b([12]\.\d{1,2})\s*(?:m|meters?|metres?)\b").ok()
});

static INCHES_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    // Matches: 70 inches, 65", 68 inch
    Regex::new(r#"\b(\d{2})\s*(?:inches\b|inch\b|")"#).ok()
});

static SEX_WORD_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    // Matches: male, female (anywhere; only read in a profile statement or an answer)
    Regex::new(r"\b(male|female)\b").ok()
});

static SEX_CUE_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    // Matches: I'm male, I am a 45 year old female, I identify as female, sex: male, gender is female
    Regex::new(
        r"\b(?:(?:i'm|i am|im)\s+(?:an?\s+)?(?:\d{2}[\s-]*(?:years?|yrs?)?[\s-]*(?:old)?\s+)?|i identify as\s+|(?:biological\s+)?(?:sex|gender)\s*(?:is\s+|:\s*|=\s*|-\s*)?)(male|female)\b",
    )
    .ok()
});

static SEX_SELF_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    // Matches: I'm a man, I am a 45 year old woman, as a guy
    Regex::new(r"\b(?:i'm|i am|im|as)\s+(?:an?\s+)?(?:[\w-]+\s+){0,3}?(man|woman|guy|boy|girl|lady|gentleman)\b")
        .ok()
});

static AGE_CUE_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    // Matches: I'm 25, I am 42, age 30, aged 51, age is 45, age: 38
    Regex::new(r"\b(?:i'm|i am|im|aged?(?:\s*(?:is|of|:|=))?)\s*(\d{2})\b").ok()
});

static AGE_SUFFIX_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    // Matches: 25 years old, 45-year-old, 38 yo, 52 y/o, 60 yrs
    Regex::new(r"\b(\d{2})\s*-?\s*(?:years?\b|yrs?\b|yo\b|y/o\b|y\.o\.?)(?:\s*-?\s*old\b)?").ok()
});

static BARE_NUMBER_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b(\d{2})\b").ok());

static ACTIVITY_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    // Matches: sedentary, not very active, lightly active, light activity,
    // moderate, moderately active, very active, extremely active
    Regex::new(
        r"(?x)\b(?:
            (?P<sedentary>sedentary|inactive|not\s+(?:very\s+|that\s+|really\s+)?active|couch\s+potato)
          | (?P<very>(?:very|extra|extremely|super|highly)\s+active)
          | (?P<moderate>moderately(?:\s+active)?|moderate(?:\s+(?:active|activity))?|fairly\s+active)
          | (?P<light>lightly(?:\s+active)?|light\s+(?:active|activity)|slightly\s+active|somewhat\s+active)
        )\b",
    )
    .ok()
});

static ACTIVE_SELF_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    // Matches: I'm active, I am pretty active, activity level active
    Regex::new(r"\b(?:i'm|i am|im|level(?:\s+is)?|level:)\s+(?:pretty\s+|quite\s+|generally\s+|usually\s+)?active\b")
        .ok()
});

static FIRST_PERSON_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b(?:i|i'm|im|my|i've)\b").ok());

static ACTIVE_JOB_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:produce|warehouse|stock|stocking|retail|server|waiter|waitress|barista|nurse|construction|lifting boxes|on my feet|on feet|mail carrier|delivery|walk(?:ing)? (?:all day|at work|for work))\b",
    )
    .ok()
});

static HEAVY_JOB_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b(?:construction|warehouse)\b").ok());

static TRAINING_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"\b(?:lift|lifting|weights|weight training|gym|resistance)\b").ok()
});

static TRAINING_FREQUENCY_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    // Matches: 3x a week, 4 times per week, 5 per week, 3/week
    Regex::new(r"\b[3-5]\s*(?:x|times)?\s*(?:a|per|/)\s*week\b").ok()
});

/// Words that make a following weight a goal rather than a body weight
const GOAL_WORDS: &[&str] = &[
    "lose", "lost", "losing", "gain", "gained", "gaining", "drop", "dropped", "shed", "goal",
    "target", "minus", "another", "extra", "put",
];

/// Words before a number of years that make it a duration rather than an age
const DURATION_WORDS: &[&str] = &[
    "for", "past", "last", "over", "every", "within", "in", "than", "lose", "lost", "gain",
];

/// Unit words that rule a bare number out as an age
const UNIT_WORDS: &[&str] = &[
    "kg", "kgs", "kilo", "kilos", "kilogram", "kilograms", "lb", "lbs", "pound", "pounds", "cm",
    "cms", "m", "meter", "meters", "metre", "metres", "in", "inch", "inches", "ft", "foot",
    "feet", "min", "mins", "minute", "minutes", "hr", "hrs", "hour", "hours", "sec", "secs",
    "second", "seconds", "day", "days", "week", "weeks", "wk", "wks", "month", "months", "year",
    "years", "yr", "yrs", "yo", "rep", "reps", "set", "sets", "x", "times", "k", "km", "mi",
    "mile", "miles", "step", "steps", "cal", "cals", "kcal", "calorie", "calories", "g", "gram",
    "grams", "percent", "lap", "laps", "am", "pm", "turns", "messages", "bpm",
];

/// Characters directly after a number that rule it out as an age
const UNIT_SYMBOLS: &[char] = &['\'', '"', '%', '/', ':', '-', '+'];

const WEIGHT_RANGE_KG: Range<f64> = 25.0..300.000_1;
const HEIGHT_RANGE_CM: Range<f64> = 90.0..250.000_1;
const AGE_RANGE: Range<u32> = 10..90;

// ============================================================================
// Types
// ============================================================================

/// Unambiguous facts found in a single utterance
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProfileFacts {
    /// Stated sex, never `Unknown`
    pub sex: Option<Sex>,
    /// Age in years
    pub age: Option<u32>,
    /// Weight in kilograms
    pub weight_kg: Option<f64>,
    /// Height in centimeters
    pub height_cm: Option<f64>,
    /// Named activity level
    pub activity: Option<ActivityLevel>,
}

impl ProfileFacts {
    /// Whether nothing was found
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.sex.is_none()
            && self.age.is_none()
            && self.weight_kg.is_none()
            && self.height_cm.is_none()
            && self.activity.is_none()
    }

    /// Fields that carry a value, in asking order
    #[must_use]
    pub fn fields(&self) -> Vec<ProfileField> {
        let present = [
            (ProfileField::Sex, self.sex.is_some()),
            (ProfileField::Age, self.age.is_some()),
            (ProfileField::WeightKg, self.weight_kg.is_some()),
            (ProfileField::HeightCm, self.height_cm.is_some()),
            (ProfileField::ActivityFactor, self.activity.is_some()),
        ];
        present
            .into_iter()
            .filter_map(|(field, set)| set.then_some(field))
            .collect()
    }
}

/// Result of applying one utterance to a profile
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileUpdate {
    /// Merged profile
    pub profile: Profile,
    /// Fields still unset, in asking order
    pub missing: Vec<ProfileField>,
    /// Facts the utterance contributed
    pub facts: ProfileFacts,
}

/// What one field's patterns produced
#[derive(Debug, Clone, Copy, PartialEq)]
enum Signal<T> {
    Absent,
    Conflict,
    Found(T),
}

impl<T: Copy> Signal<T> {
    fn from_candidates(candidates: &[T], same: impl Fn(&T, &T) -> bool) -> Self {
        match candidates.split_first() {
            None => Self::Absent,
            Some((first, rest)) if rest.iter().all(|other| same(first, other)) => {
                Self::Found(*first)
            }
            Some(_) => Self::Conflict,
        }
    }

    const fn value(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::Absent | Self::Conflict => None,
        }
    }

    const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Extract facts from one utterance
///
/// `asked` lists the fields the preceding assistant turn asked for; a bare
/// number is read as an age only when the age was asked for, or when the same
/// utterance states other profile facts ("male 45 80 kg 180 cm"). Sex needs
/// self-identification: a first-person or labelled cue ("I'm female",
/// "sex: male"), a one-word reply, an answer to the sex question, or a
/// statement that also carries other profile facts.
#[must_use]
pub fn extract_facts(utterance: &str, asked: &[ProfileField]) -> ProfileFacts {
    let text = normalize(utterance);
    let mut claimed: Vec<Range<usize>> = Vec::new();

    let weight = extract_weight(&text, &mut claimed);
    let height = extract_height(&text, &mut claimed);
    let activity = extract_activity(&text);
    let mut age = extract_age_with_cue(&text, &mut claimed);

    let profile_statement = weight.value().is_some()
        || height.value().is_some()
        || activity.value().is_some()
        || age.value().is_some();
    let sex = extract_sex(&text, asked.contains(&ProfileField::Sex) || profile_statement);

    let has_other_fact = weight.value().is_some()
        || height.value().is_some()
        || sex.value().is_some()
        || activity.value().is_some();
    if age.is_absent() && (asked.contains(&ProfileField::Age) || has_other_fact) {
        age = extract_bare_age(&text, &claimed);
    }

    for (field, conflicted) in [
        ("weight", weight == Signal::Conflict),
        ("height", height == Signal::Conflict),
        ("sex", sex == Signal::Conflict),
        ("activity", activity == Signal::Conflict),
        ("age", age == Signal::Conflict),
    ] {
        if conflicted {
            debug!(field, "Conflicting profile values in one message; field left unchanged");
        }
    }

    ProfileFacts {
        sex: sex.value(),
        age: age.value(),
        weight_kg: weight.value(),
        height_cm: height.value(),
        activity: activity.value(),
    }
}

/// Monotonic merge: set fields are only replaced by new values, never cleared
#[must_use]
pub fn merge(current: &Profile, facts: &ProfileFacts) -> Profile {
    Profile {
        sex: facts.sex.unwrap_or(current.sex),
        age: facts.age.or(current.age),
        weight_kg: facts.weight_kg.or(current.weight_kg),
        height_cm: facts.height_cm.or(current.height_cm),
        activity_factor: facts
            .activity
            .map(ActivityLevel::factor)
            .or(current.activity_factor),
    }
}

/// Apply one utterance to a profile
#[must_use]
pub fn update_profile(current: &Profile, utterance: &str, asked: &[ProfileField]) -> ProfileUpdate {
    let facts = extract_facts(utterance, asked);
    let profile = merge(current, &facts);
    ProfileUpdate {
        missing: profile.missing_fields(),
        profile,
        facts,
    }
}

/// Recover the profile from a caller-held transcript
///
/// User turns are read with the estimate questions of the assistant turn
/// before them as context. Compaction digests are read as well, so facts
/// collapsed out of the transcript still count.
#[must_use]
pub fn rebuild_profile(history: &[HistoryTurn]) -> Profile {
    let mut profile = Profile::default();
    let mut asked: Vec<ProfileField> = Vec::new();

    for (turn, requested) in history.iter().zip(estimate_questions(history)) {
        match turn.role {
            TurnRole::Assistant => asked = requested,
            TurnRole::User => {
                profile = merge(&profile, &extract_facts(&turn.content, &asked));
                asked.clear();
            }
            TurnRole::System if turn.content.starts_with(DIGEST_MARKER) => {
                profile = merge(&profile, &extract_facts(&turn.content, &[]));
            }
            TurnRole::System => {}
        }
    }

    profile
}

// ============================================================================
// Field extraction
// ============================================================================

fn normalize(utterance: &str) -> String {
    utterance
        .to_lowercase()
        .chars()
        .map(|c| match c {
            '\u{2019}' | '\u{2018}' | '\u{2032}' => '\'',
            '\u{201c}' | '\u{201d}' | '\u{2033}' => '"',
            other => other,
        })
        .collect()
}

fn extract_weight(text: &str, claimed: &mut Vec<Range<usize>>) -> Signal<f64> {
    let Some(pattern) = WEIGHT_PATTERN.as_ref() else {
        return Signal::Absent;
    };

    let mut candidates = Vec::new();
    for caps in pattern.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        claimed.push(whole.range());
        if preceded_by_any(text, whole.start(), GOAL_WORDS, 2) {
            continue;
        }
        let Some(amount) = parse_group::<f64>(&caps, 1) else {
            continue;
        };
        let unit = caps.get(2).map_or("", |m| m.as_str());
        let kg = if unit.starts_with('l') || unit.starts_with('p') {
            amount * KG_PER_LB
        } else {
            amount
        };
        let kg = round2(kg);
        if WEIGHT_RANGE_KG.contains(&kg) {
            candidates.push(kg);
        }
    }
    Signal::from_candidates(&candidates, close_enough)
}

fn extract_height(text: &str, claimed: &mut Vec<Range<usize>>) -> Signal<f64> {
    let mut candidates = Vec::new();

    if let Some(pattern) = FEET_INCHES_PATTERN.as_ref() {
        for caps in pattern.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            let Some(feet) = parse_group::<f64>(&caps, 1) else {
                continue;
            };
            let inches = parse_group::<f64>(&caps, 2).unwrap_or(0.0);
            claimed.push(whole.range());
            candidates.push(round2((feet * 12.0 + inches) * CM_PER_INCH));
        }
    }

    let metric: [(&LazyLock<Option<Regex>>, f64); 3] = [
        (&CENTIMETERS_PATTERN, 1.0),
        (&METERS_PATTERN, 100.0),
        (&INCHES_PATTERN, CM_PER_INCH),
    ];
    for (pattern, scale) in metric {
        let Some(pattern) = pattern.as_ref() else {
            continue;
        };
        for caps in pattern.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            if overlaps(claimed, &whole.range()) {
                continue;
            }
            let Some(amount) = parse_group::<f64>(&caps, 1) else {
                continue;
            };
            claimed.push(whole.range());
            candidates.push(round2(amount * scale));
        }
    }

    candidates.retain(|cm| HEIGHT_RANGE_CM.contains(cm));
    Signal::from_candidates(&candidates, close_enough)
}

fn extract_sex(text: &str, in_context: bool) -> Signal<Sex> {
    let mut candidates = Vec::new();

    let reply = bare_reply(text);
    let word_pattern = if in_context || reply == "male" || reply == "female" {
        &SEX_WORD_PATTERN
    } else {
        &SEX_CUE_PATTERN
    };
    if let Some(pattern) = word_pattern.as_ref() {
        candidates.extend(pattern.captures_iter(text).filter_map(|caps| {
            caps.get(1).map(|m| {
                if m.as_str() == "male" {
                    Sex::Male
                } else {
                    Sex::Female
                }
            })
        }));
    }

    if let Some(pattern) = SEX_SELF_PATTERN.as_ref() {
        candidates.extend(pattern.captures_iter(text).filter_map(|caps| {
            caps.get(1).map(|m| match m.as_str() {
                "woman" | "girl" | "lady" => Sex::Female,
                _ => Sex::Male,
            })
        }));
    }

    match reply.as_str() {
        "m" => candidates.push(Sex::Male),
        "f" => candidates.push(Sex::Female),
        _ => {}
    }

    Signal::from_candidates(&candidates, PartialEq::eq)
}

fn extract_activity(text: &str) -> Signal<ActivityLevel> {
    let mut candidates = Vec::new();

    if let Some(pattern) = ACTIVITY_PATTERN.as_ref() {
        for caps in pattern.captures_iter(text) {
            let level = if caps.name("sedentary").is_some() {
                ActivityLevel::Sedentary
            } else if caps.name("very").is_some() {
                ActivityLevel::VeryActive
            } else if caps.name("moderate").is_some() {
                ActivityLevel::ModeratelyActive
            } else {
                ActivityLevel::LightlyActive
            };
            candidates.push(level);
        }
    }

    if ACTIVE_SELF_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(text))
    {
        candidates.push(ActivityLevel::Active);
    }

    match bare_reply(text).as_str() {
        "light" => candidates.push(ActivityLevel::LightlyActive),
        "active" => candidates.push(ActivityLevel::Active),
        "very" | "extra" => candidates.push(ActivityLevel::VeryActive),
        _ => {}
    }

    let signal = Signal::from_candidates(&candidates, PartialEq::eq);
    if signal.is_absent() {
        return infer_activity(text).map_or(Signal::Absent, Signal::Found);
    }
    signal
}

/// Infer a level from job and training cues in a first-person statement
fn infer_activity(text: &str) -> Option<ActivityLevel> {
    let is_statement = !text.contains('?')
        && FIRST_PERSON_PATTERN
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(text));
    if !is_statement {
        return None;
    }

    let matches = |pattern: &LazyLock<Option<Regex>>| {
        pattern
            .as_ref()
            .is_some_and(|regex| regex.is_match(text))
    };
    let active_job = matches(&ACTIVE_JOB_PATTERN);
    let training = matches(&TRAINING_PATTERN);

    if active_job && (training || matches(&HEAVY_JOB_PATTERN)) {
        Some(ActivityLevel::ModeratelyActive)
    } else if active_job {
        Some(ActivityLevel::LightlyActive)
    } else if training && matches(&TRAINING_FREQUENCY_PATTERN) {
        Some(ActivityLevel::LightlyActive)
    } else if training {
        Some(ActivityLevel::Sedentary)
    } else {
        None
    }
}

fn extract_age_with_cue(text: &str, claimed: &mut Vec<Range<usize>>) -> Signal<u32> {
    let mut candidates = Vec::new();

    if let Some(pattern) = AGE_CUE_PATTERN.as_ref() {
        for caps in pattern.captures_iter(text) {
            let Some(number) = caps.get(1) else { continue };
            if overlaps(claimed, &number.range()) || followed_by_unit(text, number.end()) {
                continue;
            }
            if let Some(age) = parse_group::<u32>(&caps, 1) {
                claimed.push(number.range());
                candidates.push(age);
            }
        }
    }

    if let Some(pattern) = AGE_SUFFIX_PATTERN.as_ref() {
        for caps in pattern.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            if overlaps(claimed, &whole.range()) {
                continue;
            }
            claimed.push(whole.range());
            if preceded_by_any(text, whole.start(), DURATION_WORDS, 1) {
                continue;
            }
            if let Some(age) = parse_group::<u32>(&caps, 1) {
                candidates.push(age);
            }
        }
    }

    candidates.retain(|age| AGE_RANGE.contains(age));
    Signal::from_candidates(&candidates, PartialEq::eq)
}

fn extract_bare_age(text: &str, claimed: &[Range<usize>]) -> Signal<u32> {
    let Some(pattern) = BARE_NUMBER_PATTERN.as_ref() else {
        return Signal::Absent;
    };

    let candidates: Vec<u32> = pattern
        .captures_iter(text)
        .filter_map(|caps| {
            let number = caps.get(1)?;
            let before = text[..number.start()].chars().next_back();
            let unusable = overlaps(claimed, &number.range())
                || matches!(before, Some('.' | ',' | '$' | '#' | '-' | '+'))
                || followed_by_unit(text, number.end())
                || preceded_by_any(text, number.start(), DURATION_WORDS, 1);
            if unusable {
                return None;
            }
            number.as_str().parse().ok()
        })
        .filter(|age| AGE_RANGE.contains(age))
        .collect();

    Signal::from_candidates(&candidates, PartialEq::eq)
}

// ============================================================================
// Helpers
// ============================================================================

/// The whole utterance stripped of punctuation, for one-word replies
fn bare_reply(text: &str) -> String {
    text.trim()
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_owned()
}

fn parse_group<T: FromStr>(caps: &Captures<'_>, index: usize) -> Option<T> {
    caps.get(index).and_then(|m| m.as_str().parse().ok())
}

fn overlaps(claimed: &[Range<usize>], range: &Range<usize>) -> bool {
    claimed
        .iter()
        .any(|taken| taken.start < range.end && range.start < taken.end)
}

fn preceded_by_any(text: &str, position: usize, words: &[&str], lookback: usize) -> bool {
    text[..position]
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .rev()
        .take(lookback)
        .any(|word| words.contains(&word))
}

fn followed_by_unit(text: &str, end: usize) -> bool {
    let rest = &text[end..];
    if rest.starts_with(['.', ',']) {
        return rest[1..].starts_with(|c: char| c.is_ascii_digit());
    }
    let rest = rest.trim_start();
    match rest.chars().next() {
        Some(c) if UNIT_SYMBOLS.contains(&c) => true,
        Some(c) if c.is_alphabetic() => {
            let word: String = rest.chars().take_while(|c| c.is_alphabetic()).collect();
            UNIT_WORDS.contains(&word.as_str())
        }
        _ => false,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn close_enough(a: &f64, b: &f64) -> bool {
    (a - b).abs() < 0.5
}
