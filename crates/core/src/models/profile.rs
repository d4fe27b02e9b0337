use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A local, account-less user profile. Each profile owns one collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(display_name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: format!("user_{}", Uuid::new_v4().simple()),
            display_name: display_name.into(),
            created_at: now,
        }
    }
}
