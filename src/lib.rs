//! Daily ritual assignment, completion and progression engine.
//!
//! The engine decides which guided activity a user sees each calendar day,
//! gates whether completing it earns reward currency, advances the
//! consecutive-day streak, and persists the reflective journal entry tied
//! to the assignment. Everything durable lives in SQLite; every invariant
//! (one assignment per day, one reroll, idempotent completion) is enforced
//! at the SQL layer so the engine stays correct across multiple instances.

mod catalog;
mod config;
mod db;
mod engine;
mod error;
mod gate;
mod profile;
mod rewards;
mod selection;
mod streak;

pub use catalog::{ActivityCatalog, ActivityDefinition, DayRange, Difficulty};
pub use config::EngineConfig;
pub use db::models::{
    CompletionRecord, DailyAssignment, JournalEntry, JournalSource, UserProgression,
};
pub use db::{CompletionWriteOutcome, Database};
pub use engine::{
    CompletionInput, CompletionOutcome, JournalDraft, ProgressionSummary, RitualEngine,
};
pub use error::{EngineError, EngineResult};
pub use profile::{Archetype, ProfileDirectory, StaticProfiles, Tier, UserProfile};
pub use rewards::Reward;
pub use streak::StreakState;
