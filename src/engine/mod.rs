//! The engine facade: daily assignment resolution, reroll, completion and
//! progression reads.
//!
//! Every operation assumes stateless callers: two requests for the same
//! user may land on different instances, so nothing here relies on
//! in-process state. The assignment race is settled by the store's
//! conditional insert, the reroll by a conditional update, and the
//! completion side effects by a single transaction.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{ActivityCatalog, ActivityDefinition};
use crate::config::EngineConfig;
use crate::db::models::{CompletionRecord, DailyAssignment, JournalEntry, JournalSource};
use crate::db::{CompletionWriteOutcome, Database};
use crate::error::{EngineError, EngineResult};
use crate::profile::{ProfileDirectory, Tier, UserProfile};
use crate::rewards::{reward_for, Reward};
use crate::selection::{draw_activity, eligible_activities, EligibilityContext};
use crate::gate;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionInput {
    pub engagement_secs: u32,
    pub reflection_text: String,
    pub mood: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionOutcome {
    pub qualifies: bool,
    pub reward: Reward,
    pub current_streak: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalDraft {
    pub reflection: String,
    pub mood: i32,
    #[serde(default)]
    pub tags: Vec<String>,
    pub source: JournalSource,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionSummary {
    pub total_xp: u64,
    pub total_tokens: u64,
    pub current_streak: u32,
    pub longest_streak: u32,
}

#[derive(Clone)]
pub struct RitualEngine {
    db: Database,
    catalog: Arc<ActivityCatalog>,
    config: EngineConfig,
    profiles: Arc<dyn ProfileDirectory>,
}

impl RitualEngine {
    pub fn new(
        db: Database,
        catalog: ActivityCatalog,
        config: EngineConfig,
        profiles: Arc<dyn ProfileDirectory>,
    ) -> EngineResult<Self> {
        if catalog.is_empty() {
            return Err(EngineError::NoEligibleActivity);
        }
        Ok(Self {
            db,
            catalog: Arc::new(catalog),
            config,
            profiles,
        })
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    async fn require_profile(&self, user_id: &str) -> EngineResult<UserProfile> {
        self.profiles
            .profile(user_id)?
            .ok_or_else(|| EngineError::UnknownUser {
                user_id: user_id.to_string(),
            })
    }

    fn eligibility_context(&self, profile: &UserProfile, date: NaiveDate) -> EligibilityContext {
        EligibilityContext {
            tier: profile.tier,
            archetype: profile.archetype,
            days_since_enrollment: profile.days_since_enrollment(date),
            newcomer_window_days: self.config.newcomer_window_days,
        }
    }

    /// Look an activity up in the catalog, accepting the per-tier fallback
    /// ids that are assignable without being catalog entries.
    fn resolve_activity(&self, activity_id: &str) -> EngineResult<ActivityDefinition> {
        if let Some(activity) = self.catalog.get(activity_id) {
            return Ok(activity.clone());
        }
        for tier in [Tier::Free, Tier::Plus, Tier::Pro] {
            let fallback = ActivityCatalog::fallback_for(tier);
            if fallback.id == activity_id {
                return Ok(fallback);
            }
        }
        Err(EngineError::UnknownActivity {
            activity_id: activity_id.to_string(),
        })
    }

    pub async fn get_or_create_today_assignment(
        &self,
        user_id: &str,
    ) -> EngineResult<DailyAssignment> {
        self.get_or_create_assignment(user_id, Self::today()).await
    }

    /// Idempotent under concurrent invocation: of N simultaneous callers,
    /// exactly one insert wins and every caller observes the winner's
    /// choice.
    pub async fn get_or_create_assignment(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> EngineResult<DailyAssignment> {
        let profile = self.require_profile(user_id).await?;
        self.db
            .ensure_progression(
                user_id,
                profile.tier,
                profile.archetype,
                profile.enrolled_on,
                Utc::now(),
            )
            .await?;

        if let Some(existing) = self.db.get_assignment(user_id, date).await? {
            return Ok(existing);
        }

        let ctx = self.eligibility_context(&profile, date);
        let candidates = eligible_activities(&self.catalog, &ctx);
        let (activity_id, bonus_activity_id) = {
            let mut rng = rand::thread_rng();
            let primary = match draw_activity(&candidates, None, &mut rng) {
                Some(activity) => activity.id.clone(),
                None => {
                    debug!("no eligible candidates for {user_id}; assigning the tier fallback");
                    ActivityCatalog::fallback_for(profile.tier).id
                }
            };
            let bonus = if profile.tier.daily_activity_slots() > 1 && candidates.len() > 1 {
                draw_activity(&candidates, Some(&primary), &mut rng)
                    .map(|activity| activity.id.clone())
            } else {
                None
            };
            (primary, bonus)
        };

        let assignment = DailyAssignment {
            user_id: user_id.to_string(),
            assigned_on: date,
            activity_id,
            bonus_activity_id,
            reroll_used: false,
            created_at: Utc::now(),
        };

        if self.db.insert_assignment_if_absent(&assignment).await? {
            info!(
                "assigned {} to {user_id} for {date}",
                assignment.activity_id
            );
            return Ok(assignment);
        }

        // Lost the race: discard the local draw and adopt the winner's.
        self.db
            .get_assignment(user_id, date)
            .await?
            .ok_or_else(|| {
                EngineError::Storage(anyhow::anyhow!(
                    "assignment for {user_id} on {date} vanished after conditional insert"
                ))
            })
    }

    pub async fn reroll_today(&self, user_id: &str) -> EngineResult<DailyAssignment> {
        self.reroll(user_id, Self::today()).await
    }

    /// Exchange the primary activity for a fresh draw, at most once per
    /// day. The second attempt fails regardless of tier or of how the
    /// attempts interleave with completion.
    pub async fn reroll(&self, user_id: &str, date: NaiveDate) -> EngineResult<DailyAssignment> {
        let profile = self.require_profile(user_id).await?;
        let current = self.get_or_create_assignment(user_id, date).await?;
        if current.reroll_used {
            return Err(EngineError::RerollAlreadyUsed {
                user_id: user_id.to_string(),
                date,
            });
        }

        let ctx = self.eligibility_context(&profile, date);
        let candidates = eligible_activities(&self.catalog, &ctx);
        let replacement = {
            let mut rng = rand::thread_rng();
            match draw_activity(&candidates, Some(&current.activity_id), &mut rng) {
                Some(activity) => activity.id.clone(),
                None => ActivityCatalog::fallback_for(profile.tier).id,
            }
        };

        if !self.db.apply_reroll(user_id, date, &replacement).await? {
            return Err(EngineError::RerollAlreadyUsed {
                user_id: user_id.to_string(),
                date,
            });
        }
        info!("rerolled {user_id} on {date}: {} -> {replacement}", current.activity_id);

        self.db
            .get_assignment(user_id, date)
            .await?
            .ok_or_else(|| {
                EngineError::Storage(anyhow::anyhow!(
                    "assignment for {user_id} on {date} vanished after reroll"
                ))
            })
    }

    pub async fn complete_today(
        &self,
        user_id: &str,
        activity_id: &str,
        input: CompletionInput,
    ) -> EngineResult<CompletionOutcome> {
        self.complete_activity(user_id, Self::today(), activity_id, input)
            .await
    }

    /// Record a completion attempt. Idempotent: a repeat for the same
    /// (user, date, activity) fails with [`EngineError::AlreadyCompleted`]
    /// and changes nothing.
    pub async fn complete_activity(
        &self,
        user_id: &str,
        date: NaiveDate,
        activity_id: &str,
        input: CompletionInput,
    ) -> EngineResult<CompletionOutcome> {
        self.require_profile(user_id).await?;

        let assignment = self.db.get_assignment(user_id, date).await?.ok_or_else(|| {
            EngineError::ActivityNotAssigned {
                user_id: user_id.to_string(),
                activity_id: activity_id.to_string(),
                date,
            }
        })?;
        if !assignment.includes(activity_id) {
            return Err(EngineError::ActivityNotAssigned {
                user_id: user_id.to_string(),
                activity_id: activity_id.to_string(),
                date,
            });
        }

        let activity = self.resolve_activity(activity_id)?;
        let reflection_chars = input.reflection_text.chars().count();
        let qualifies = gate::qualifies(&self.config, input.engagement_secs, reflection_chars);
        let reward = reward_for(&activity, qualifies);
        let now = Utc::now();

        let record = CompletionRecord {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            assigned_on: date,
            activity_id: activity_id.to_string(),
            engagement_secs: input.engagement_secs,
            reflection_chars: reflection_chars as u32,
            mood: input.mood,
            qualifies,
            reward,
            completed_at: now,
        };
        let journal = JournalEntry {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            assigned_on: date,
            activity_id: activity_id.to_string(),
            reflection: input.reflection_text,
            mood: input.mood,
            tags: Vec::new(),
            source: JournalSource::Typed,
            created_at: now,
            updated_at: now,
        };

        match self.db.record_completion(record, journal).await? {
            CompletionWriteOutcome::AlreadyCompleted => Err(EngineError::AlreadyCompleted {
                user_id: user_id.to_string(),
                activity_id: activity_id.to_string(),
                date,
            }),
            CompletionWriteOutcome::Recorded {
                first_of_day,
                current_streak,
            } => {
                info!(
                    "completion for {user_id}/{activity_id} on {date}: qualifies={qualifies}, \
                     first_of_day={first_of_day}, streak={current_streak}"
                );
                Ok(CompletionOutcome {
                    qualifies,
                    reward,
                    current_streak,
                })
            }
        }
    }

    pub async fn progression_summary(&self, user_id: &str) -> EngineResult<ProgressionSummary> {
        self.require_profile(user_id).await?;

        let summary = match self.db.get_progression(user_id).await? {
            Some(progression) => ProgressionSummary {
                total_xp: progression.total_xp,
                total_tokens: progression.total_tokens,
                current_streak: progression.current_streak,
                longest_streak: progression.longest_streak,
            },
            // A known user who has never touched the engine.
            None => ProgressionSummary {
                total_xp: 0,
                total_tokens: 0,
                current_streak: 0,
                longest_streak: 0,
            },
        };
        Ok(summary)
    }

    pub async fn save_journal_entry_today(
        &self,
        user_id: &str,
        activity_id: &str,
        draft: JournalDraft,
    ) -> EngineResult<JournalEntry> {
        self.save_journal_entry(user_id, Self::today(), activity_id, draft)
            .await
    }

    /// Persist a reflection independent of completion or qualification.
    /// A later save for the same (user, date, activity) overwrites.
    pub async fn save_journal_entry(
        &self,
        user_id: &str,
        date: NaiveDate,
        activity_id: &str,
        draft: JournalDraft,
    ) -> EngineResult<JournalEntry> {
        let profile = self.require_profile(user_id).await?;

        let assignment = self.db.get_assignment(user_id, date).await?.ok_or_else(|| {
            EngineError::ActivityNotAssigned {
                user_id: user_id.to_string(),
                activity_id: activity_id.to_string(),
                date,
            }
        })?;
        if !assignment.includes(activity_id) {
            return Err(EngineError::ActivityNotAssigned {
                user_id: user_id.to_string(),
                activity_id: activity_id.to_string(),
                date,
            });
        }

        let tags = if profile.tier.allows_journal_tags() {
            draft.tags
        } else {
            if !draft.tags.is_empty() {
                debug!("dropping journal tags for free-tier user {user_id}");
            }
            Vec::new()
        };

        let now = Utc::now();
        let entry = JournalEntry {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            assigned_on: date,
            activity_id: activity_id.to_string(),
            reflection: draft.reflection,
            mood: draft.mood,
            tags,
            source: draft.source,
            created_at: now,
            updated_at: now,
        };

        Ok(self.db.upsert_journal_entry(entry).await?)
    }

    pub async fn get_journal_entry(
        &self,
        user_id: &str,
        date: NaiveDate,
        activity_id: &str,
    ) -> EngineResult<Option<JournalEntry>> {
        Ok(self.db.get_journal_entry(user_id, date, activity_id).await?)
    }

    pub async fn completions_for_day(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> EngineResult<Vec<CompletionRecord>> {
        Ok(self.db.completions_for_day(user_id, date).await?)
    }

    pub fn catalog(&self) -> &ActivityCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
