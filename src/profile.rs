//! User-facing classification types and the profile lookup seam.
//!
//! Tier and archetype are closed enumerations on purpose: the eligibility
//! filter matches on them exhaustively, so adding a variant is a
//! compile-time obligation rather than a silent fall-through.

use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Subscription tier. Ordering matters: `Free < Plus < Pro`, and an activity
/// is visible to every tier at or above its `min_tier`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Tier {
    Free,
    Plus,
    Pro,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Free => "free",
            Tier::Plus => "plus",
            Tier::Pro => "pro",
        }
    }

    /// Pro users receive a second (bonus) activity each day.
    pub fn daily_activity_slots(&self) -> usize {
        match self {
            Tier::Free | Tier::Plus => 1,
            Tier::Pro => 2,
        }
    }

    /// Journal tags are a paid feature.
    pub fn allows_journal_tags(&self) -> bool {
        *self >= Tier::Plus
    }
}

/// Behavioral classification assigned by the onboarding quiz.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Archetype {
    Explorer,
    Reflector,
    Grounder,
    Connector,
}

impl Archetype {
    pub fn as_str(&self) -> &'static str {
        match self {
            Archetype::Explorer => "explorer",
            Archetype::Reflector => "reflector",
            Archetype::Grounder => "grounder",
            Archetype::Connector => "connector",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub tier: Tier,
    pub archetype: Archetype,
    pub enrolled_on: NaiveDate,
}

impl UserProfile {
    pub fn days_since_enrollment(&self, today: NaiveDate) -> u32 {
        (today - self.enrolled_on).num_days().max(0) as u32
    }
}

/// Read-only lookup for a user's current tier, archetype and enrollment
/// date. The account system owns this data; the engine only consumes it.
pub trait ProfileDirectory: Send + Sync + 'static {
    fn profile(&self, user_id: &str) -> Result<Option<UserProfile>>;
}

/// In-memory directory used by tests and demos.
pub struct StaticProfiles {
    entries: RwLock<HashMap<String, UserProfile>>,
}

impl StaticProfiles {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn insert(&self, user_id: impl Into<String>, profile: UserProfile) {
        let mut guard = match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.insert(user_id.into(), profile);
    }
}

impl Default for StaticProfiles {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileDirectory for StaticProfiles {
    fn profile(&self, user_id: &str) -> Result<Option<UserProfile>> {
        let guard = match self.entries.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        Ok(guard.get(user_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_ordering_follows_subscription_ladder() {
        assert!(Tier::Free < Tier::Plus);
        assert!(Tier::Plus < Tier::Pro);
    }

    #[test]
    fn pro_gets_two_daily_slots() {
        assert_eq!(Tier::Free.daily_activity_slots(), 1);
        assert_eq!(Tier::Plus.daily_activity_slots(), 1);
        assert_eq!(Tier::Pro.daily_activity_slots(), 2);
    }

    #[test]
    fn days_since_enrollment_clamps_at_zero() {
        let profile = UserProfile {
            tier: Tier::Free,
            archetype: Archetype::Explorer,
            enrolled_on: NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
        };
        let before = NaiveDate::from_ymd_opt(2025, 6, 9).unwrap();
        assert_eq!(profile.days_since_enrollment(before), 0);
        let later = NaiveDate::from_ymd_opt(2025, 6, 24).unwrap();
        assert_eq!(profile.days_since_enrollment(later), 14);
    }
}
