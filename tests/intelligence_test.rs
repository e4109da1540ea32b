// ABOUTME: Integration tests for the rule-based intelligence and compaction through the public API
// ABOUTME: Extraction, monotonic merging, estimates, retrieval determinism, and digest recovery
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::fixture_index;
use pierre_coach::chat::HistoryManager;
use pierre_coach::config::RetrievalStrategy;
use pierre_coach::intelligence::{
    classify, estimate_energy, rebuild_profile, update_profile, BmrConfig, Intent,
};
use pierre_coach::models::{HistoryTurn, Profile, ProfileField, Sex};
use pierre_coach::rag::{RetrievalParams, Retriever};

#[test]
fn test_one_sentence_fills_every_field() {
    let update = update_profile(
        &Profile::default(),
        "I'm 25, male, 70kg, 175cm, moderately active",
        &[],
    );

    assert_eq!(
        update.profile,
        Profile {
            sex: Sex::Male,
            age: Some(25),
            weight_kg: Some(70.0),
            height_cm: Some(175.0),
            activity_factor: Some(1.55),
        }
    );
    assert!(update.missing.is_empty());
}

#[test]
fn test_reference_estimate() {
    let profile = update_profile(
        &Profile::default(),
        "I'm 25, male, 70kg, 175cm, moderately active",
        &[],
    )
    .profile;
    let estimate = estimate_energy(&profile, &BmrConfig::default()).unwrap();

    assert!((estimate.basal - 1673.75).abs() < 1e-9);
    assert!((estimate.total - 2594.3).abs() < 1.0);
    assert!(estimate.range.low < estimate.total && estimate.total < estimate.range.high);
}

#[test]
fn test_unrelated_messages_never_clear_facts() {
    let mut profile = Profile::default();
    let script = [
        "hey there",
        "I'm 52",
        "what's a good stretch for tight hamstrings?",
        "I weigh 200 lbs",
        "ok",
        "5 ft 9",
        "how about walking?",
        "female",
        "I don't know",
    ];

    let mut set_so_far: Vec<ProfileField> = Vec::new();
    for utterance in script {
        profile = update_profile(&profile, utterance, &[]).profile;
        for field in &set_so_far {
            assert!(profile.is_set(*field), "{field} lost after {utterance:?}");
        }
        set_so_far = ProfileField::ORDER
            .into_iter()
            .filter(|field| profile.is_set(*field))
            .collect();
    }

    assert_eq!(profile.age, Some(52));
    assert_eq!(profile.sex, Sex::Female);
    assert!(profile.weight_kg.is_some());
    assert!(profile.height_cm.is_some());
    assert_eq!(profile.missing_fields(), vec![ProfileField::ActivityFactor]);
    assert!(estimate_energy(&profile, &BmrConfig::default()).is_none());
}

#[test]
fn test_intent_follows_the_question_flow() {
    let history = vec![
        HistoryTurn::user("what's my maintenance?"),
        HistoryTurn::assistant("Can you tell me your age?"),
    ];
    assert_eq!(classify("41", &history), Intent::EnergyEstimate);
    assert_eq!(classify("Should I stretch first?", &history), Intent::General);
    assert_eq!(classify("Should I stretch first?", &[]), Intent::General);
}

#[test]
fn test_retrieval_is_deterministic() {
    for strategy in [RetrievalStrategy::TfIdf, RetrievalStrategy::Bm25] {
        let index = fixture_index(strategy);
        let params = RetrievalParams {
            top_k: 3,
            min_score: 0.0,
        };
        let first: Vec<(usize, f64)> = index
            .retrieve("protein with each meal after strength sessions", params)
            .iter()
            .map(|r| (r.chunk.id, r.score))
            .collect();
        for _ in 0..5 {
            let again: Vec<(usize, f64)> = index
                .retrieve("protein with each meal after strength sessions", params)
                .iter()
                .map(|r| (r.chunk.id, r.score))
                .collect();
            assert_eq!(first, again);
        }
    }
}

#[test]
fn test_compaction_keeps_facts_recoverable() {
    let mut turns = vec![
        HistoryTurn::user("I'm a 38 year old man"),
        HistoryTurn::user("I weigh 95 kg and I'm 188 cm"),
    ];
    for i in 0..59 {
        turns.push(if i % 2 == 0 {
            HistoryTurn::assistant("Sounds good.")
        } else {
            HistoryTurn::user("cool")
        });
    }
    assert_eq!(turns.len(), 61);

    let compaction = HistoryManager::new(60, 40).compact(&turns);
    let system_turns = compaction.turns.iter().filter(|t| t.is_system()).count();
    assert_eq!(system_turns, 1);
    assert_eq!(compaction.collapsed, 40);
    assert_eq!(compaction.turns.len(), 61 - 40 + 1);
    assert_eq!(rebuild_profile(&compaction.turns), rebuild_profile(&turns));
}
