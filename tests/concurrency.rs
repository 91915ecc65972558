//! The one genuine race in the engine: concurrent first-access to "today's
//! assignment" for a single user, plus the conditional reroll and the
//! idempotent completion under the same pressure.

mod common;

use common::{activity, day, enroll, harness, harness_with_catalog};
use ritual_engine::{ActivityCatalog, Archetype, CompletionInput, EngineError, Tier};

const CALLERS: usize = 16;

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_get_or_create_yields_exactly_one_assignment() {
    let h = harness();
    enroll(&h, "ada", Tier::Pro, Archetype::Reflector);

    let mut handles = Vec::with_capacity(CALLERS);
    for _ in 0..CALLERS {
        let engine = h.engine.clone();
        handles.push(tokio::spawn(async move {
            engine.get_or_create_assignment("ada", day(1)).await
        }));
    }

    let mut assignments = Vec::with_capacity(CALLERS);
    for handle in handles {
        assignments.push(handle.await.unwrap().unwrap());
    }

    // Every caller observed the same winning draw.
    let first = &assignments[0];
    for assignment in &assignments {
        assert_eq!(assignment, first);
    }

    // And the stored record agrees.
    let stored = h.engine.get_or_create_assignment("ada", day(1)).await.unwrap();
    assert_eq!(&stored, first);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_rerolls_spend_the_flag_exactly_once() {
    let catalog = ActivityCatalog::from_activities(vec![
        activity("a", Tier::Free, vec![]),
        activity("b", Tier::Free, vec![]),
        activity("c", Tier::Free, vec![]),
    ])
    .unwrap();
    let h = harness_with_catalog(catalog);
    enroll(&h, "ada", Tier::Free, Archetype::Explorer);

    h.engine.get_or_create_assignment("ada", day(1)).await.unwrap();

    let mut handles = Vec::with_capacity(CALLERS);
    for _ in 0..CALLERS {
        let engine = h.engine.clone();
        handles.push(tokio::spawn(
            async move { engine.reroll("ada", day(1)).await },
        ));
    }

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(assignment) => {
                successes += 1;
                assert!(assignment.reroll_used);
            }
            Err(EngineError::RerollAlreadyUsed { .. }) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(successes, 1);

    let stored = h.engine.get_or_create_assignment("ada", day(1)).await.unwrap();
    assert!(stored.reroll_used);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_completions_grant_a_single_reward() {
    let catalog =
        ActivityCatalog::from_activities(vec![activity("only", Tier::Free, vec![])]).unwrap();
    let h = harness_with_catalog(catalog);
    enroll(&h, "ada", Tier::Free, Archetype::Explorer);

    let assignment = h.engine.get_or_create_assignment("ada", day(1)).await.unwrap();

    let mut handles = Vec::with_capacity(CALLERS);
    for _ in 0..CALLERS {
        let engine = h.engine.clone();
        let activity_id = assignment.activity_id.clone();
        handles.push(tokio::spawn(async move {
            engine
                .complete_activity(
                    "ada",
                    day(1),
                    &activity_id,
                    CompletionInput {
                        engagement_secs: 45,
                        reflection_text: "a reflection comfortably past the gate".to_string(),
                        mood: 4,
                    },
                )
                .await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(outcome) => {
                successes += 1;
                assert!(outcome.qualifies);
            }
            Err(EngineError::AlreadyCompleted { .. }) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(successes, 1);

    let summary = h.engine.progression_summary("ada").await.unwrap();
    assert_eq!(summary.total_xp, 10);
    assert_eq!(summary.total_tokens, 1);
    assert_eq!(summary.current_streak, 1);

    let completions = h.engine.completions_for_day("ada", day(1)).await.unwrap();
    assert_eq!(completions.len(), 1);
}
