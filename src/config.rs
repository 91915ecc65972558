use serde::{Deserialize, Serialize};

/// Tunable thresholds for the engine.
///
/// The quality gate and the newcomer cohort window are product-tuned
/// values; they live here (and only here) so balance changes never touch
/// engine code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Minimum engagement time for a completion to earn rewards.
    pub min_engagement_secs: u32,

    /// Minimum reflection length (characters) for a completion to earn rewards.
    pub min_reflection_chars: usize,

    /// Users within this many days of enrollment draw from the guided
    /// early-days content when any is eligible.
    pub newcomer_window_days: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_engagement_secs: 20,
            min_reflection_chars: 20,
            newcomer_window_days: 14,
        }
    }
}
