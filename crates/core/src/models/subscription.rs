use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::CoreError;

/// Spending category of a subscription.
///
/// Serialized as its short code (`"OTT"`, `"Music"`, ...). Unknown codes
/// read from storage or import files fall back to [`Category::Etc`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Category {
    Ott,
    Music,
    Shopping,
    Utility,
    Work,
    Education,
    Health,
    Finance,
    #[default]
    Etc,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 9] = [
        Category::Ott,
        Category::Music,
        Category::Shopping,
        Category::Utility,
        Category::Work,
        Category::Education,
        Category::Health,
        Category::Finance,
        Category::Etc,
    ];

    /// Stable code used in storage and import/export files.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Category::Ott => "OTT",
            Category::Music => "Music",
            Category::Shopping => "Shopping",
            Category::Utility => "Utility",
            Category::Work => "Work",
            Category::Education => "Education",
            Category::Health => "Health",
            Category::Finance => "Finance",
            Category::Etc => "Etc",
        }
    }

    /// Exact (case-sensitive) lookup by code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.code() == code)
    }

    #[must_use]
    pub fn from_code_or_default(code: &str) -> Category {
        Category::from_code(code.trim()).unwrap_or_default()
    }

    /// Default brand color, used when a subscription has no custom color.
    #[must_use]
    pub fn default_color(&self) -> &'static str {
        match self {
            Category::Ott => "#E50914",
            Category::Music => "#1DB954",
            Category::Shopping => "#FF9900",
            Category::Utility => "#00A4EF",
            Category::Work => "#5A5A5A",
            Category::Education => "#FFD700",
            Category::Health => "#10B981",
            Category::Finance => "#8B5CF6",
            Category::Etc => "#808080",
        }
    }

    /// Localized (Korean) display label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Category::Ott => "영상/스트리밍",
            Category::Music => "음악",
            Category::Shopping => "쇼핑/이커머스",
            Category::Utility => "유틸리티",
            Category::Work => "업무/생산성",
            Category::Education => "교육/학습",
            Category::Health => "건강/운동",
            Category::Finance => "금융/투자",
            Category::Etc => "기타",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(Category::from_code_or_default(&code))
    }
}

/// How often a subscription charges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    #[default]
    Monthly,
    Yearly,
    Weekly,
}

impl BillingCycle {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            BillingCycle::Monthly => "monthly",
            BillingCycle::Yearly => "yearly",
            BillingCycle::Weekly => "weekly",
        }
    }

    #[must_use]
    pub fn from_code(code: &str) -> Option<BillingCycle> {
        match code.trim() {
            "monthly" => Some(BillingCycle::Monthly),
            "yearly" => Some(BillingCycle::Yearly),
            "weekly" => Some(BillingCycle::Weekly),
            _ => None,
        }
    }

    /// Per-month share of a charge of `cost` in this cycle.
    ///
    /// Weekly is a flat four weeks per month, not 52/12.
    #[must_use]
    pub fn monthly_equivalent(&self, cost: f64) -> f64 {
        match self {
            BillingCycle::Monthly => cost,
            BillingCycle::Yearly => cost / 12.0,
            BillingCycle::Weekly => cost * 4.0,
        }
    }

    /// Per-year total of a charge of `cost` in this cycle.
    #[must_use]
    pub fn yearly_equivalent(&self, cost: f64) -> f64 {
        match self {
            BillingCycle::Monthly => cost * 12.0,
            BillingCycle::Yearly => cost,
            BillingCycle::Weekly => cost * 52.0,
        }
    }

    /// Localized (Korean) display label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            BillingCycle::Monthly => "월간",
            BillingCycle::Yearly => "연간",
            BillingCycle::Weekly => "주간",
        }
    }
}

impl std::fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// The user-editable part of a subscription.
///
/// This is what a form submits on create and what an import file carries;
/// `id` and `created_at` are always assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionFields {
    pub name: String,

    /// Charge per billing cycle (not normalized to monthly). A whole
    /// amount; fractions are rejected by [`validate`](Self::validate).
    pub cost: f64,

    /// Nominal day of month, 1–31.
    pub billing_day: u32,

    #[serde(default)]
    pub billing_cycle: BillingCycle,

    #[serde(default)]
    pub category: Category,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub custom_color: Option<String>,

    #[serde(default)]
    pub is_paused: bool,

    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default)]
    pub trial_end_date: Option<NaiveDate>,
}

impl Default for SubscriptionFields {
    fn default() -> Self {
        Self {
            name: String::new(),
            cost: 0.0,
            billing_day: 1,
            billing_cycle: BillingCycle::Monthly,
            category: Category::Etc,
            url: None,
            custom_color: None,
            is_paused: false,
            notes: None,
            trial_end_date: None,
        }
    }
}

impl SubscriptionFields {
    pub fn new(name: impl Into<String>, cost: f64, billing_day: u32, category: Category) -> Self {
        Self {
            name: name.into(),
            cost,
            billing_day,
            category,
            ..Self::default()
        }
    }

    pub fn with_cycle(mut self, cycle: BillingCycle) -> Self {
        self.billing_cycle = cycle;
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = non_empty(url.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = non_empty(notes.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.custom_color = non_empty(color.into());
        self
    }

    pub fn with_trial_end(mut self, date: NaiveDate) -> Self {
        self.trial_end_date = Some(date);
        self
    }

    pub fn paused(mut self) -> Self {
        self.is_paused = true;
        self
    }

    /// Form-level validation, run before any store call.
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut problems = Vec::new();
        if self.name.trim().is_empty() {
            problems.push("name must not be empty".to_string());
        }
        problems.extend(check_cost(self.cost));
        problems.extend(check_billing_day(self.billing_day));
        if let Some(url) = &self.url {
            problems.extend(check_url(url));
        }
        join_problems(problems)
    }
}

/// A partial update. `None` leaves the field untouched; an empty string
/// clears an optional text field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_day: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_cycle: Option<BillingCycle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_paused: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// `Some(None)` clears the trial date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trial_end_date: Option<Option<NaiveDate>>,
}

impl SubscriptionPatch {
    /// Patch that only sets the paused flag.
    #[must_use]
    pub fn pause(is_paused: bool) -> Self {
        Self {
            is_paused: Some(is_paused),
            ..Self::default()
        }
    }

    /// Validate only the fields this patch sets.
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut problems = Vec::new();
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                problems.push("name must not be empty".to_string());
            }
        }
        if let Some(cost) = self.cost {
            problems.extend(check_cost(cost));
        }
        if let Some(day) = self.billing_day {
            problems.extend(check_billing_day(day));
        }
        if let Some(url) = &self.url {
            if !url.is_empty() {
                problems.extend(check_url(url));
            }
        }
        join_problems(problems)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// A recurring subscription owned by one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    /// Opaque identifier assigned by the store. Never changes.
    pub id: String,

    pub name: String,

    /// Charge per billing cycle (not normalized to monthly).
    pub cost: f64,

    /// Nominal day of month, 1–31. Clamped into shorter months.
    pub billing_day: u32,

    #[serde(default)]
    pub billing_cycle: BillingCycle,

    pub category: Category,

    #[serde(default)]
    pub url: Option<String>,

    /// Overrides the category color when set.
    #[serde(default)]
    pub custom_color: Option<String>,

    /// Paused subscriptions stay listed but count for nothing in totals and alerts.
    #[serde(default)]
    pub is_paused: bool,

    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default)]
    pub trial_end_date: Option<NaiveDate>,

    /// Set once by the store.
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    /// Materialize a stored record from its editable fields.
    pub fn from_fields(
        id: impl Into<String>,
        fields: SubscriptionFields,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: fields.name,
            cost: fields.cost,
            billing_day: fields.billing_day,
            billing_cycle: fields.billing_cycle,
            category: fields.category,
            url: fields.url.and_then(non_empty),
            custom_color: fields.custom_color.and_then(non_empty),
            is_paused: fields.is_paused,
            notes: fields.notes.and_then(non_empty),
            trial_end_date: fields.trial_end_date,
            created_at,
        }
    }

    /// The editable fields of this record (drops `id` and `created_at`).
    #[must_use]
    pub fn fields(&self) -> SubscriptionFields {
        SubscriptionFields {
            name: self.name.clone(),
            cost: self.cost,
            billing_day: self.billing_day,
            billing_cycle: self.billing_cycle,
            category: self.category,
            url: self.url.clone(),
            custom_color: self.custom_color.clone(),
            is_paused: self.is_paused,
            notes: self.notes.clone(),
            trial_end_date: self.trial_end_date,
        }
    }

    /// Apply a partial update in place. `id` and `created_at` are never touched.
    pub fn apply_patch(&mut self, patch: &SubscriptionPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(cost) = patch.cost {
            self.cost = cost;
        }
        if let Some(day) = patch.billing_day {
            self.billing_day = day;
        }
        if let Some(cycle) = patch.billing_cycle {
            self.billing_cycle = cycle;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(url) = &patch.url {
            self.url = non_empty(url.clone());
        }
        if let Some(color) = &patch.custom_color {
            self.custom_color = non_empty(color.clone());
        }
        if let Some(paused) = patch.is_paused {
            self.is_paused = paused;
        }
        if let Some(notes) = &patch.notes {
            self.notes = non_empty(notes.clone());
        }
        if let Some(trial) = patch.trial_end_date {
            self.trial_end_date = trial;
        }
    }

    /// Custom color if set, otherwise the category default.
    #[must_use]
    pub fn effective_color(&self) -> &str {
        self.custom_color
            .as_deref()
            .unwrap_or_else(|| self.category.default_color())
    }

    /// Days until the trial ends, or `None` when there is no trial or it
    /// has already ended.
    #[must_use]
    pub fn trial_days_left(&self, today: NaiveDate) -> Option<i64> {
        let days = crate::services::billing_calendar::days_until_trial_end(self.trial_end_date, today);
        (self.trial_end_date.is_some() && days >= 0).then_some(days)
    }

    /// Monthly-equivalent cost, ignoring the paused flag.
    #[must_use]
    pub fn monthly_cost(&self) -> f64 {
        self.billing_cycle.monthly_equivalent(self.cost)
    }

    /// Yearly-equivalent cost, ignoring the paused flag.
    #[must_use]
    pub fn yearly_cost(&self) -> f64 {
        self.billing_cycle.yearly_equivalent(self.cost)
    }
}

// ── Field checks shared by the form validators ──────────────────────

/// Largest cost that survives the integer import path exactly (2^53 - 1).
pub const MAX_COST: f64 = 9_007_199_254_740_991.0;

/// Costs are whole amounts in the smallest display unit (e.g. won). Import
/// truncates to an integer, so a fractional cost would not survive an
/// export/import round trip.
pub(crate) fn check_cost(cost: f64) -> Option<String> {
    if !cost.is_finite() || cost < 0.0 {
        return Some(format!("cost must be a number >= 0 (got {cost})"));
    }
    if cost.fract() != 0.0 {
        return Some(format!("cost must be a whole amount (got {cost})"));
    }
    (cost > MAX_COST).then(|| format!("cost must be at most {MAX_COST} (got {cost})"))
}

pub(crate) fn check_billing_day(day: u32) -> Option<String> {
    (!(1..=31).contains(&day)).then(|| format!("billing day must be between 1 and 31 (got {day})"))
}

pub(crate) fn check_url(url: &str) -> Option<String> {
    url::Url::parse(url)
        .err()
        .map(|e| format!("invalid url '{url}': {e}"))
}

fn join_problems(problems: Vec<String>) -> Result<(), CoreError> {
    if problems.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(problems.join("; ")))
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
