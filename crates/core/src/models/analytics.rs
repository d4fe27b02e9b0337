use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::subscription::{Category, Subscription};

/// Count and raw-cost sum of the active subscriptions in one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    /// Number of non-paused subscriptions
    pub count: usize,

    /// Sum of raw `cost` (not normalized to monthly)
    pub total: f64,
}

/// Category totals keyed by category, in category order.
pub type CategoryBreakdown = BTreeMap<Category, CategoryTotal>;

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendSummary {
    /// Sum of monthly-equivalent costs of active subscriptions
    pub monthly_total: f64,

    /// Sum of yearly-equivalent costs of active subscriptions
    pub yearly_total: f64,

    /// `monthly_total / 30`, rounded
    pub daily_average: f64,

    pub active_count: usize,
    pub paused_count: usize,

    pub categories: CategoryBreakdown,
}

/// A subscription paired with its days-left countdown for a given day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledSubscription<'a> {
    pub subscription: &'a Subscription,

    /// 0 means due today
    pub days_left: i64,
}
