//! The quality gate: minimum-effort thresholds a completion must meet to
//! mint reward currency. Mood is recorded but never gates.

use crate::config::EngineConfig;

/// Both thresholds must be met. Reflection length is measured in characters
/// across all free-text fields, not bytes.
pub fn qualifies(config: &EngineConfig, engagement_secs: u32, reflection_chars: usize) -> bool {
    engagement_secs >= config.min_engagement_secs
        && reflection_chars >= config.min_reflection_chars
}
