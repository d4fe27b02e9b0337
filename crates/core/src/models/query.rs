use serde::{Deserialize, Serialize};

use super::analytics::ScheduledSubscription;
use super::subscription::Category;

/// Sort order for subscription listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortKey {
    /// Soonest payment first (default)
    #[default]
    DaysLeft,
    /// Most expensive first
    CostDesc,
    /// Cheapest first
    CostAsc,
    /// Alphabetical by name
    Name,
    /// By category code; the result is grouped by category
    Category,
}

impl SortKey {
    /// Parse the option codes used by the listing UI.
    #[must_use]
    pub fn from_code(code: &str) -> Option<SortKey> {
        match code {
            "daysLeft" => Some(SortKey::DaysLeft),
            "cost-desc" => Some(SortKey::CostDesc),
            "cost-asc" => Some(SortKey::CostAsc),
            "name" => Some(SortKey::Name),
            "category" => Some(SortKey::Category),
            _ => None,
        }
    }
}

/// Filter + sort options for a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionQuery {
    /// Case-insensitive substring matched against name or category code.
    pub text: String,
    pub category: Option<Category>,
    pub sort: SortKey,
    pub include_paused: bool,
}

impl Default for SubscriptionQuery {
    fn default() -> Self {
        Self {
            text: String::new(),
            category: None,
            sort: SortKey::DaysLeft,
            include_paused: true,
        }
    }
}

/// Result of a listing query.
#[derive(Debug, Clone, PartialEq)]
pub enum SubscriptionView<'a> {
    /// Flat, sorted list.
    List(Vec<ScheduledSubscription<'a>>),
    /// Produced for [`SortKey::Category`]: groups in category order, each
    /// keeping the sorted order of its members.
    Grouped(Vec<(Category, Vec<ScheduledSubscription<'a>>)>),
}

impl<'a> SubscriptionView<'a> {
    /// Total number of entries across groups.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            SubscriptionView::List(items) => items.len(),
            SubscriptionView::Grouped(groups) => groups.iter().map(|(_, g)| g.len()).sum(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flatten back into one ordered list.
    #[must_use]
    pub fn into_flat(self) -> Vec<ScheduledSubscription<'a>> {
        match self {
            SubscriptionView::List(items) => items,
            SubscriptionView::Grouped(groups) => groups.into_iter().flat_map(|(_, g)| g).collect(),
        }
    }
}
