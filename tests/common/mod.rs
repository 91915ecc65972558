use std::sync::Arc;

use chrono::NaiveDate;
use tempfile::TempDir;

use ritual_engine::{
    ActivityCatalog, ActivityDefinition, Archetype, Database, DayRange, Difficulty, EngineConfig,
    RitualEngine, StaticProfiles, Tier, UserProfile,
};

pub struct TestHarness {
    pub engine: RitualEngine,
    pub profiles: Arc<StaticProfiles>,
    _tmp: TempDir,
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, d).unwrap()
}

pub fn harness_with_catalog(catalog: ActivityCatalog) -> TestHarness {
    init_logging();
    let tmp = TempDir::new().unwrap();
    let db = Database::new(tmp.path().join("engine.db")).unwrap();
    let profiles = Arc::new(StaticProfiles::new());
    let engine = RitualEngine::new(db, catalog, EngineConfig::default(), profiles.clone()).unwrap();
    TestHarness {
        engine,
        profiles,
        _tmp: tmp,
    }
}

pub fn harness() -> TestHarness {
    harness_with_catalog(ActivityCatalog::builtin().unwrap())
}

/// Register a user enrolled long before the test window so the newcomer
/// day-range filter stays out of the way unless a test wants it.
pub fn enroll(harness: &TestHarness, user_id: &str, tier: Tier, archetype: Archetype) {
    harness.profiles.insert(
        user_id,
        UserProfile {
            tier,
            archetype,
            enrolled_on: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        },
    );
}

pub fn activity(id: &str, min_tier: Tier, affinity: Vec<Archetype>) -> ActivityDefinition {
    ActivityDefinition {
        id: id.to_string(),
        title: id.to_string(),
        description: format!("test activity {id}"),
        category: "test".to_string(),
        difficulty: Difficulty::Gentle,
        duration_mins: 5,
        min_tier,
        archetype_affinity: affinity,
        day_range: None,
        reward_xp: 10,
        reward_tokens: 1,
    }
}

#[allow(dead_code)]
pub fn ranged_activity(id: &str, min_day: u32, max_day: u32) -> ActivityDefinition {
    let mut definition = activity(id, Tier::Free, vec![]);
    definition.day_range = Some(DayRange { min_day, max_day });
    definition
}
