use chrono::NaiveDate;

/// All errors the engine surfaces to its callers.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The single daily reroll was already spent. Recoverable; the UI
    /// disables the reroll control.
    #[error("reroll already used for user {user_id} on {date}")]
    RerollAlreadyUsed { user_id: String, date: NaiveDate },

    /// A completion already exists for this (user, date, activity).
    /// Recoverable; callers treat it as a no-op; no reward is re-granted.
    #[error("activity {activity_id} already completed by user {user_id} on {date}")]
    AlreadyCompleted {
        user_id: String,
        activity_id: String,
        date: NaiveDate,
    },

    /// The activity is not part of the user's assignment for that day.
    #[error("activity {activity_id} is not assigned to user {user_id} on {date}")]
    ActivityNotAssigned {
        user_id: String,
        activity_id: String,
        date: NaiveDate,
    },

    /// The activity id does not exist in the catalog.
    #[error("unknown activity: {activity_id}")]
    UnknownActivity { activity_id: String },

    /// The profile directory has no record of this user.
    #[error("no profile found for user {user_id}")]
    UnknownUser { user_id: String },

    /// The activity catalog is empty. The eligibility fallback makes this
    /// unreachable for any non-empty catalog, so hitting it is a
    /// configuration error, not a per-request failure.
    #[error("activity catalog is empty")]
    NoEligibleActivity,

    /// Data-store unavailability or corruption, propagated as a transient
    /// failure. Retries belong to the caller.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
