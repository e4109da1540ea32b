// ABOUTME: Safety-topic detection and removal of boilerplate safety clichés from replies
// ABOUTME: Sentences made only of stock caution lines are dropped unless the user asked about safety
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::LazyLock;

use regex::Regex;

static SAFETY_TOPIC: LazyLock<Option<Regex>> = LazyLock::new(|| {
    // Matches: is it safe, injury, injuries, my knee hurts, back pain, squat form, doctor, rehab
    Regex::new(r"\b(?:safe|safety|injur(?:y|ies|ed)|hurts?|pain|form|medical|doctor|physician|therap\w*|rehab\w*)\b")
        .ok()
});

static CLICHES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\blisten to your body\b",
        r"\bif (?:you )?feel(?: any)? pain[^.?!]*\bstop\b",
        r"\bstop if (?:you )?feel(?: any)? pain\b",
        r"\btalk to (?:a|your) doctor\b",
    ]
    .into_iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

// Matches: one sentence plus its closing punctuation, or a trailing fragment
static SENTENCE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"[^.!?]+(?:[.!?]+|$)").ok());

/// Whether the user is asking about safety, pain, injury, form, or medical care
#[must_use]
pub fn is_safety_topic(message: &str) -> bool {
    SAFETY_TOPIC
        .as_ref()
        .is_some_and(|regex| regex.is_match(&message.to_lowercase()))
}

fn is_cliche(sentence: &str) -> bool {
    let lower = sentence.to_lowercase();
    CLICHES.iter().any(|regex| regex.is_match(&lower))
}

/// Drop sentences that are stock safety lines
///
/// Returns the reply unchanged when the user raised a safety topic, or when
/// every sentence would be removed.
#[must_use]
pub fn sanitize_cliches(reply: &str, user_message: &str) -> String {
    if is_safety_topic(user_message) {
        return reply.to_owned();
    }
    let Some(sentence) = SENTENCE.as_ref() else {
        return reply.to_owned();
    };

    let mut removed = false;
    let kept: Vec<&str> = sentence
        .find_iter(reply)
        .map(|m| m.as_str().trim())
        .filter(|text| !text.is_empty())
        .filter(|text| {
            let cliche = is_cliche(text);
            removed |= cliche;
            !cliche
        })
        .collect();

    if !removed || kept.is_empty() {
        return reply.to_owned();
    }
    kept.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safety_topics() {
        assert!(is_safety_topic("My knee hurts when I squat"));
        assert!(is_safety_topic("Is running safe at 50?"));
        assert!(is_safety_topic("how do I fix my deadlift form"));
        assert!(!is_safety_topic("How often should I lift?"));
        assert!(!is_safety_topic("what should I eat after a workout"));
    }

    #[test]
    fn test_removes_cliche_sentences() {
        let reply = "Try three short walks this week. Listen to your body! Add a fourth next week.";
        assert_eq!(
            sanitize_cliches(reply, "how do I start walking?"),
            "Try three short walks this week. Add a fourth next week."
        );

        let reply = "Lift twice a week. If you feel any pain at all, stop and rest.";
        assert_eq!(sanitize_cliches(reply, "how often to lift"), "Lift twice a week.");
    }

    #[test]
    fn test_keeps_reply_for_safety_questions() {
        let reply = "Ease off for a few days. Talk to your doctor if it lingers.";
        assert_eq!(sanitize_cliches(reply, "my back has pain"), reply);
    }

    #[test]
    fn test_never_empties_reply() {
        let reply = "Listen to your body.";
        assert_eq!(sanitize_cliches(reply, "any tips?"), reply);
    }

    #[test]
    fn test_untouched_reply_keeps_original_spacing() {
        let reply = "Start small.\n\nWalk daily.";
        assert_eq!(sanitize_cliches(reply, "tips?"), reply);
    }
}
