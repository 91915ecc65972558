//! The activity catalog: static, versioned content describing every guided
//! activity the engine can assign. Authored out-of-band and deployed with
//! the binary; never mutated by user action.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::profile::{Archetype, Tier};

/// Effort level of an activity. Ordering matters for reward balance:
/// `Gentle < Moderate < Deep`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Difficulty {
    Gentle,
    Moderate,
    Deep,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Gentle => "gentle",
            Difficulty::Moderate => "moderate",
            Difficulty::Deep => "deep",
        }
    }
}

/// Inclusive day window (days since enrollment) in which an activity may be
/// assigned. Activities without a range are valid on any day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DayRange {
    pub min_day: u32,
    pub max_day: u32,
}

impl DayRange {
    pub fn contains(&self, day: u32) -> bool {
        day >= self.min_day && day <= self.max_day
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDefinition {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub duration_mins: u32,
    pub min_tier: Tier,
    #[serde(default)]
    pub archetype_affinity: Vec<Archetype>,
    #[serde(default)]
    pub day_range: Option<DayRange>,
    pub reward_xp: u32,
    pub reward_tokens: u32,
}

pub struct ActivityCatalog {
    activities: Vec<ActivityDefinition>,
    by_id: HashMap<String, usize>,
}

impl ActivityCatalog {
    /// The catalog shipped with the engine.
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(include_str!("activities.json"))
            .context("built-in activity catalog is malformed")
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let activities: Vec<ActivityDefinition> =
            serde_json::from_str(json).context("failed to parse activity catalog JSON")?;
        Self::from_activities(activities)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read activity catalog from {}", path.display()))?;
        Self::from_json_str(&contents)
    }

    pub fn from_activities(activities: Vec<ActivityDefinition>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(activities.len());
        for (index, activity) in activities.iter().enumerate() {
            if activity.id.is_empty() {
                bail!("activity at index {index} has an empty id");
            }
            if by_id.insert(activity.id.clone(), index).is_some() {
                bail!("duplicate activity id in catalog: {}", activity.id);
            }
        }
        Ok(Self { activities, by_id })
    }

    pub fn get(&self, activity_id: &str) -> Option<&ActivityDefinition> {
        self.by_id
            .get(activity_id)
            .map(|&index| &self.activities[index])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActivityDefinition> {
        self.activities.iter()
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// The assignment of last resort: a hard-coded activity per tier, used
    /// when filtering leaves nothing to draw from. Keeps the resolver total
    /// for every non-empty catalog state.
    pub fn fallback_for(tier: Tier) -> ActivityDefinition {
        let (id, title, description) = match tier {
            Tier::Free => (
                "fallback-breath",
                "Three Slow Breaths",
                "Pause wherever you are and take three slow, deliberate breaths.",
            ),
            Tier::Plus => (
                "fallback-body-scan",
                "One-Minute Body Scan",
                "Close your eyes and sweep your attention from head to toe, noticing without fixing.",
            ),
            Tier::Pro => (
                "fallback-stillness",
                "Two Minutes of Stillness",
                "Sit in silence for two minutes and let whatever arises pass through.",
            ),
        };
        ActivityDefinition {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            category: "grounding".to_string(),
            difficulty: Difficulty::Gentle,
            duration_mins: 2,
            min_tier: Tier::Free,
            archetype_affinity: Vec::new(),
            day_range: None,
            reward_xp: 10,
            reward_tokens: 1,
        }
    }
}
