//! Progressive-relaxation eligibility filter.
//!
//! Each narrowing step falls back to the previous candidate set when it
//! would empty it, so the result is never empty as long as the catalog
//! holds any activity at or below the user's tier.

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::{ActivityCatalog, ActivityDefinition};
use crate::profile::{Archetype, Tier};

pub struct EligibilityContext {
    pub tier: Tier,
    pub archetype: Archetype,
    pub days_since_enrollment: u32,
    pub newcomer_window_days: u32,
}

impl EligibilityContext {
    fn is_newcomer(&self) -> bool {
        self.days_since_enrollment < self.newcomer_window_days
    }
}

/// Narrow the catalog to the activities this user may be assigned today.
///
/// 1. Keep activities at or below the user's tier.
/// 2. Apply the day-range filter: newcomers draw from the guided
///    early-days content (activities whose range contains their day);
///    everyone else simply excludes content whose window has passed.
///    Falls back to step 1's result when empty.
/// 3. If any remaining activity declares archetype affinities, prefer the
///    subset matching the user's archetype. Falls back when empty.
///
/// Returns an empty slice only for a catalog with nothing at or below the
/// user's tier; callers then use [`ActivityCatalog::fallback_for`].
pub fn eligible_activities<'a>(
    catalog: &'a ActivityCatalog,
    ctx: &EligibilityContext,
) -> Vec<&'a ActivityDefinition> {
    let tier_eligible: Vec<&ActivityDefinition> = catalog
        .iter()
        .filter(|activity| activity.min_tier <= ctx.tier)
        .collect();

    let day = ctx.days_since_enrollment;
    let day_filtered: Vec<&ActivityDefinition> = if ctx.is_newcomer() {
        tier_eligible
            .iter()
            .copied()
            .filter(|activity| {
                activity
                    .day_range
                    .map_or(false, |range| range.contains(day))
            })
            .collect()
    } else {
        tier_eligible
            .iter()
            .copied()
            .filter(|activity| {
                activity.day_range.map_or(true, |range| range.contains(day))
            })
            .collect()
    };
    let day_filtered = if day_filtered.is_empty() {
        debug!("day-range filter emptied the candidate set (day {day}); skipping it");
        tier_eligible
    } else {
        day_filtered
    };

    let any_affinity = day_filtered
        .iter()
        .any(|activity| !activity.archetype_affinity.is_empty());
    if !any_affinity {
        return day_filtered;
    }

    let affine: Vec<&ActivityDefinition> = day_filtered
        .iter()
        .copied()
        .filter(|activity| activity.archetype_affinity.contains(&ctx.archetype))
        .collect();
    if affine.is_empty() {
        debug!(
            "no candidate matches archetype {}; keeping the wider set",
            ctx.archetype.as_str()
        );
        day_filtered
    } else {
        affine
    }
}

/// Uniform random draw from the candidate set, optionally excluding one
/// activity id (used by reroll so the user sees something new whenever the
/// set allows it).
pub fn draw_activity<'a, R: Rng>(
    candidates: &[&'a ActivityDefinition],
    exclude: Option<&str>,
    rng: &mut R,
) -> Option<&'a ActivityDefinition> {
    if candidates.len() > 1 {
        if let Some(excluded_id) = exclude {
            let remaining: Vec<&ActivityDefinition> = candidates
                .iter()
                .copied()
                .filter(|activity| activity.id != excluded_id)
                .collect();
            return remaining.choose(rng).copied();
        }
    }
    candidates.choose(rng).copied()
}
