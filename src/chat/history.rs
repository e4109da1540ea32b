// ABOUTME: Conversation history compaction into a profile digest system turn
// ABOUTME: Collapses the oldest non-system turns once the transcript passes a length threshold
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::config::HistoryConfig;
use crate::constants::history::DIGEST_MARKER;
use crate::intelligence::rebuild_profile;
use crate::models::{HistoryTurn, Profile};

/// Outcome of one compaction pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compaction {
    /// Transcript after compaction, in original order
    pub turns: Vec<HistoryTurn>,
    /// Number of non-system turns folded into the digest (0 when untouched)
    pub collapsed: usize,
}

impl Compaction {
    /// Whether a digest was inserted
    #[must_use]
    pub const fn is_compacted(&self) -> bool {
        self.collapsed > 0
    }
}

/// Bounds the transcript before it reaches the prompt
#[derive(Debug, Clone, Copy)]
pub struct HistoryManager {
    trigger: usize,
    batch: usize,
}

impl HistoryManager {
    /// Compact when the transcript holds more than `trigger` turns, folding
    /// the oldest `batch` non-system turns
    #[must_use]
    pub const fn new(trigger: usize, batch: usize) -> Self {
        Self { trigger, batch }
    }

    /// Manager using configured thresholds
    #[must_use]
    pub const fn from_config(config: &HistoryConfig) -> Self {
        Self::new(config.compaction_trigger, config.compaction_batch)
    }

    /// Collapse the oldest block of non-system turns into one digest turn
    ///
    /// Existing system turns and every turn after the collapsed block keep
    /// their original order. The digest sits where the first collapsed turn
    /// was and carries the profile facts known up to the end of the block.
    #[must_use]
    pub fn compact(&self, turns: &[HistoryTurn]) -> Compaction {
        if turns.len() <= self.trigger || self.batch == 0 {
            return Compaction {
                turns: turns.to_vec(),
                collapsed: 0,
            };
        }

        let collapsed: Vec<usize> = turns
            .iter()
            .enumerate()
            .filter(|(_, turn)| !turn.is_system())
            .map(|(position, _)| position)
            .take(self.batch)
            .collect();

        let (Some(&first), Some(&last)) = (collapsed.first(), collapsed.last()) else {
            return Compaction {
                turns: turns.to_vec(),
                collapsed: 0,
            };
        };

        let known = rebuild_profile(&turns[..=last]);
        let mut digest = HistoryTurn::system(digest_text(&known));
        if let Some(timestamp) = turns[last].timestamp {
            digest = digest.with_timestamp(timestamp);
        }

        let mut compacted = Vec::with_capacity(turns.len() - collapsed.len() + 1);
        for (position, turn) in turns.iter().enumerate() {
            if position == first {
                compacted.push(digest.clone());
            }
            if position <= last && !turn.is_system() {
                continue;
            }
            compacted.push(turn.clone());
        }

        Compaction {
            turns: compacted,
            collapsed: collapsed.len(),
        }
    }
}

/// Text of a compaction digest
///
/// Written so the profile extractor can read the facts back.
#[must_use]
pub fn digest_text(profile: &Profile) -> String {
    let known = profile
        .describe()
        .unwrap_or_else(|| "nothing yet".to_owned());
    format!("{DIGEST_MARKER}. Known profile: {known}. The conversation continues below.")
}

/// Whether a turn is a compaction digest
#[must_use]
pub fn is_digest(turn: &HistoryTurn) -> bool {
    turn.is_system() && turn.content.starts_with(DIGEST_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filler(count: usize) -> Vec<HistoryTurn> {
        (0..count)
            .map(|i| {
                if i % 2 == 0 {
                    HistoryTurn::user(format!("question number {i}"))
                } else {
                    HistoryTurn::assistant(format!("answer number {i}"))
                }
            })
            .collect()
    }

    #[test]
    fn test_under_threshold_is_untouched() {
        let turns = filler(60);
        let result = HistoryManager::new(60, 40).compact(&turns);
        assert!(!result.is_compacted());
        assert_eq!(result.turns, turns);
    }

    #[test]
    fn test_collapses_oldest_block() {
        let turns = filler(61);
        let result = HistoryManager::new(60, 40).compact(&turns);

        assert_eq!(result.collapsed, 40);
        assert_eq!(result.turns.len(), 22);
        assert!(is_digest(&result.turns[0]));
        assert_eq!(result.turns.iter().filter(|t| t.is_system()).count(), 1);
        assert_eq!(result.turns[1], turns[40]);
        assert_eq!(result.turns.last(), turns.last());
    }

    #[test]
    fn test_existing_system_turns_are_preserved_in_order() {
        let mut turns = filler(61);
        turns.insert(5, HistoryTurn::system("pinned note"));
        let result = HistoryManager::new(60, 40).compact(&turns);

        assert!(is_digest(&result.turns[0]));
        assert_eq!(result.turns[1].content, "pinned note");
        assert_eq!(result.turns.iter().filter(|t| t.is_system()).count(), 2);
    }

    #[test]
    fn test_digest_keeps_profile_facts() {
        let mut turns = vec![
            HistoryTurn::user("I'm a 52 year old woman, 68 kg"),
            HistoryTurn::assistant("Thanks!"),
            HistoryTurn::user("I'm 5'6\" and lightly active"),
        ];
        turns.extend(filler(60));
        let before = rebuild_profile(&turns);

        let result = HistoryManager::new(60, 40).compact(&turns);
        assert!(result.turns[0].content.contains("age 52"));
        assert_eq!(rebuild_profile(&result.turns), before);
    }

    #[test]
    fn test_empty_profile_digest() {
        assert_eq!(
            digest_text(&Profile::default()),
            "Earlier conversation summary. Known profile: nothing yet. The conversation continues below."
        );
    }
}
