use serde::{Deserialize, Serialize};

use super::session::check_demo_minutes;
use crate::errors::CoreError;

/// Display currency. Costs are stored as whole amounts of the smallest
/// unit the user enters in; the currency only affects formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    KRW,
    USD,
    JPY,
    EUR,
}

impl Currency {
    #[must_use]
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::KRW => "₩",
            Currency::USD => "$",
            Currency::JPY => "¥",
            Currency::EUR => "€",
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Currency::KRW => "원",
            Currency::USD => "USD",
            Currency::JPY => "엔",
            Currency::EUR => "EUR",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Currency::KRW => write!(f, "KRW"),
            Currency::USD => write!(f, "USD"),
            Currency::JPY => write!(f, "JPY"),
            Currency::EUR => write!(f, "EUR"),
        }
    }
}

/// User-configurable tracker settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub currency: Currency,

    /// Subscriptions due within this many days are reported as alerts.
    pub alert_threshold_days: i64,

    /// A trial ending within this many days is flagged as "ending soon".
    pub trial_warning_days: i64,

    /// Lifetime of a demo session.
    pub demo_session_minutes: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency: Currency::KRW,
            alert_threshold_days: 3,
            trial_warning_days: 7,
            demo_session_minutes: 30,
        }
    }
}

impl Settings {
    /// Reject negative windows and a demo length a session cannot hold.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.alert_threshold_days < 0 {
            return Err(CoreError::Validation(format!(
                "alert threshold must be 0 or more days (got {})",
                self.alert_threshold_days
            )));
        }
        if self.trial_warning_days < 0 {
            return Err(CoreError::Validation(format!(
                "trial warning window must be 0 or more days (got {})",
                self.trial_warning_days
            )));
        }
        check_demo_minutes(self.demo_session_minutes)
    }
}
