use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Longest demo session a caller may ask for (one day).
pub const MAX_DEMO_SESSION_MINUTES: i64 = 24 * 60;

/// How the current user signed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthMode {
    /// A durable account backed by the remote store.
    Account,
    /// A local, profile-based guest session with no account.
    Guest,
    /// Time-boxed trial; its data is discarded at expiry or sign-out.
    Demo { expires_at: DateTime<Utc> },
}

/// Explicit session context handed to the tracker at sign-in.
///
/// Replaces any ambient "current user" state: everything that needs to know
/// who owns the data receives this value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Owner of the subscription collection.
    pub owner_id: String,
    pub mode: AuthMode,
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn account(owner_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            owner_id: owner_id.into(),
            mode: AuthMode::Account,
            started_at: now,
        }
    }

    pub fn guest(owner_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            owner_id: owner_id.into(),
            mode: AuthMode::Guest,
            started_at: now,
        }
    }

    /// Start a demo session lasting `minutes` from `now`.
    ///
    /// `minutes` must be within `1..=MAX_DEMO_SESSION_MINUTES`.
    pub fn demo(now: DateTime<Utc>, minutes: i64) -> Result<Self, CoreError> {
        check_demo_minutes(minutes)?;
        let expires_at = Duration::try_minutes(minutes)
            .and_then(|length| now.checked_add_signed(length))
            .ok_or_else(|| {
                CoreError::Validation(format!("demo session of {minutes} minutes is out of range"))
            })?;
        Ok(Self {
            owner_id: format!("demo-{}", uuid::Uuid::new_v4()),
            mode: AuthMode::Demo { expires_at },
            started_at: now,
        })
    }

    #[must_use]
    pub fn is_demo(&self) -> bool {
        matches!(self.mode, AuthMode::Demo { .. })
    }

    /// Only demo sessions expire.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.mode {
            AuthMode::Demo { expires_at } => expires_at <= now,
            _ => false,
        }
    }

    /// Whole minutes left in a demo session, rounded up. `None` for
    /// non-demo sessions, `Some(0)` once expired.
    #[must_use]
    pub fn remaining_minutes(&self, now: DateTime<Utc>) -> Option<i64> {
        match self.mode {
            AuthMode::Demo { expires_at } => {
                let secs = (expires_at - now).num_seconds();
                Some(if secs <= 0 { 0 } else { (secs + 59) / 60 })
            }
            _ => None,
        }
    }

    pub fn ensure_active(&self, now: DateTime<Utc>) -> Result<(), CoreError> {
        if self.is_expired_at(now) {
            log::warn!("demo session {} expired", self.owner_id);
            return Err(CoreError::SessionExpired);
        }
        Ok(())
    }
}

pub(crate) fn check_demo_minutes(minutes: i64) -> Result<(), CoreError> {
    if (1..=MAX_DEMO_SESSION_MINUTES).contains(&minutes) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "demo session length must be between 1 and {MAX_DEMO_SESSION_MINUTES} minutes (got {minutes})"
        )))
    }
}
