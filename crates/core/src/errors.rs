use thiserror::Error;

/// Unified error type for the entire subscription-tracker-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input ───────────────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Subscription not found: {0}")]
    SubscriptionNotFound(String),

    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    // ── Session ─────────────────────────────────────────────────────
    #[error("Session expired — sign in again")]
    SessionExpired,

    // ── Persistence ─────────────────────────────────────────────────
    #[error("Store error ({store}): {message}")]
    Persistence {
        store: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    // ── Snapshot file ───────────────────────────────────────────────
    #[error("Invalid file format: {0}")]
    InvalidFileFormat(String),

    #[error("Unsupported file version: {0}")]
    UnsupportedVersion(u16),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("File I/O error: {0}")]
    FileIO(String),
}

impl CoreError {
    /// True for failures raised by a store call (transport, auth, quota, I/O).
    #[must_use]
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            CoreError::Persistence { .. } | CoreError::Network(_) | CoreError::FileIO(_)
        )
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<bincode::Error> for CoreError {
    fn from(e: bincode::Error) -> Self {
        CoreError::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest messages carry the full URL; drop the query string so
        // tokens passed as parameters never end up in logs.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
