use std::cmp::Ordering;

use chrono::{Datelike, NaiveDate};

use crate::models::analytics::{CategoryBreakdown, CategoryTotal, ScheduledSubscription, SpendSummary};
use crate::models::query::{SortKey, SubscriptionQuery, SubscriptionView};
use crate::models::subscription::{Category, Subscription};
use crate::services::billing_calendar;

/// Cost roll-ups and listings over a subscription list.
///
/// Pure business logic: no I/O, no clock. Paused subscriptions are listed
/// but never contribute to money totals or alerts.
pub struct AggregationService;

impl AggregationService {
    pub fn new() -> Self {
        Self
    }

    /// Sum of monthly-equivalent costs of active subscriptions.
    ///
    /// monthly → cost, yearly → cost / 12, weekly → cost × 4.
    #[must_use]
    pub fn monthly_total(&self, subscriptions: &[Subscription]) -> f64 {
        active(subscriptions).map(Subscription::monthly_cost).sum()
    }

    /// Sum of yearly-equivalent costs of active subscriptions.
    ///
    /// monthly → cost × 12, yearly → cost, weekly → cost × 52. Computed on
    /// its own, not derived from the monthly total.
    #[must_use]
    pub fn yearly_total(&self, subscriptions: &[Subscription]) -> f64 {
        active(subscriptions).map(Subscription::yearly_cost).sum()
    }

    /// Count and raw cost per category over active subscriptions.
    /// Categories without an active member are absent.
    #[must_use]
    pub fn category_breakdown(&self, subscriptions: &[Subscription]) -> CategoryBreakdown {
        let mut breakdown = CategoryBreakdown::new();
        for sub in active(subscriptions) {
            let entry = breakdown.entry(sub.category).or_insert_with(CategoryTotal::default);
            entry.count += 1;
            entry.total += sub.cost;
        }
        breakdown
    }

    /// Categories ordered by total spend, largest first, at most `limit`.
    #[must_use]
    pub fn top_categories(
        &self,
        breakdown: &CategoryBreakdown,
        limit: usize,
    ) -> Vec<(Category, CategoryTotal)> {
        let mut ranked: Vec<(Category, CategoryTotal)> =
            breakdown.iter().map(|(c, t)| (*c, *t)).collect();
        ranked.sort_by(|a, b| b.1.total.partial_cmp(&a.1.total).unwrap_or(Ordering::Equal));
        ranked.truncate(limit);
        ranked
    }

    /// The active subscription with the highest raw cost; the first one wins a tie.
    #[must_use]
    pub fn most_expensive<'a>(&self, subscriptions: &'a [Subscription]) -> Option<&'a Subscription> {
        active(subscriptions).fold(None, |best: Option<&Subscription>, sub| match best {
            Some(b) if b.cost >= sub.cost => Some(b),
            _ => Some(sub),
        })
    }

    /// Headline numbers for the dashboard.
    #[must_use]
    pub fn spend_summary(&self, subscriptions: &[Subscription]) -> SpendSummary {
        let monthly_total = self.monthly_total(subscriptions);
        let paused_count = subscriptions.iter().filter(|s| s.is_paused).count();
        SpendSummary {
            monthly_total,
            yearly_total: self.yearly_total(subscriptions),
            daily_average: (monthly_total / 30.0).round(),
            active_count: subscriptions.len() - paused_count,
            paused_count,
            categories: self.category_breakdown(subscriptions),
        }
    }

    /// Every subscription with its days-left countdown, in input order.
    #[must_use]
    pub fn schedule<'a>(
        &self,
        subscriptions: &'a [Subscription],
        today: NaiveDate,
    ) -> Vec<ScheduledSubscription<'a>> {
        subscriptions
            .iter()
            .map(|subscription| ScheduledSubscription {
                subscription,
                days_left: billing_calendar::days_until_next_billing(today, subscription.billing_day),
            })
            .collect()
    }

    /// Active subscriptions due within `threshold_days`, soonest first.
    /// Equal countdowns keep their input order.
    #[must_use]
    pub fn alerts<'a>(
        &self,
        subscriptions: &'a [Subscription],
        today: NaiveDate,
        threshold_days: i64,
    ) -> Vec<ScheduledSubscription<'a>> {
        let mut due: Vec<ScheduledSubscription<'a>> = self
            .schedule(subscriptions, today)
            .into_iter()
            .filter(|s| !s.subscription.is_paused && s.days_left <= threshold_days)
            .collect();
        due.sort_by_key(|s| s.days_left);
        due
    }

    /// Active subscriptions in calendar order starting from today: billing
    /// days earlier than today are placed after the end of the month.
    #[must_use]
    pub fn payment_timeline<'a>(
        &self,
        subscriptions: &'a [Subscription],
        today: NaiveDate,
    ) -> Vec<ScheduledSubscription<'a>> {
        let day = today.day();
        let mut items: Vec<ScheduledSubscription<'a>> = self
            .schedule(subscriptions, today)
            .into_iter()
            .filter(|s| !s.subscription.is_paused)
            .collect();
        items.sort_by_key(|s| {
            let billing_day = s.subscription.billing_day;
            if billing_day < day {
                billing_day + 31
            } else {
                billing_day
            }
        });
        items
    }

    /// Filter, then sort, a listing.
    ///
    /// Steps run in a fixed order: text match on name or category code,
    /// exact category, paused exclusion, then the stable sort. Sorting by
    /// category also groups the result.
    #[must_use]
    pub fn view<'a>(
        &self,
        subscriptions: &'a [Subscription],
        query: &SubscriptionQuery,
        today: NaiveDate,
    ) -> SubscriptionView<'a> {
        let needle = query.text.trim().to_lowercase();

        let mut items: Vec<ScheduledSubscription<'a>> = self
            .schedule(subscriptions, today)
            .into_iter()
            .filter(|s| {
                needle.is_empty()
                    || s.subscription.name.to_lowercase().contains(&needle)
                    || s.subscription.category.code().to_lowercase().contains(&needle)
            })
            .filter(|s| query.category.map_or(true, |c| s.subscription.category == c))
            .filter(|s| query.include_paused || !s.subscription.is_paused)
            .collect();

        match query.sort {
            SortKey::DaysLeft => items.sort_by_key(|s| s.days_left),
            SortKey::CostDesc => items.sort_by(|a, b| {
                b.subscription
                    .cost
                    .partial_cmp(&a.subscription.cost)
                    .unwrap_or(Ordering::Equal)
            }),
            SortKey::CostAsc => items.sort_by(|a, b| {
                a.subscription
                    .cost
                    .partial_cmp(&b.subscription.cost)
                    .unwrap_or(Ordering::Equal)
            }),
            SortKey::Name => items.sort_by(|a, b| compare_text(&a.subscription.name, &b.subscription.name)),
            SortKey::Category => items.sort_by(|a, b| {
                compare_text(a.subscription.category.code(), b.subscription.category.code())
            }),
        }

        if query.sort != SortKey::Category {
            return SubscriptionView::List(items);
        }

        let mut groups: Vec<(Category, Vec<ScheduledSubscription<'a>>)> = Vec::new();
        for item in items {
            match groups.last_mut() {
                Some((category, members)) if *category == item.subscription.category => {
                    members.push(item);
                }
                _ => groups.push((item.subscription.category, vec![item])),
            }
        }
        SubscriptionView::Grouped(groups)
    }
}

impl Default for AggregationService {
    fn default() -> Self {
        Self::new()
    }
}

fn active(subscriptions: &[Subscription]) -> impl Iterator<Item = &Subscription> {
    subscriptions.iter().filter(|s| !s.is_paused)
}

/// Case-insensitive ordering with a case-sensitive tiebreak. Hangul
/// syllables are in dictionary order in Unicode, so this also sorts Korean
/// names the way a Korean collator would for complete syllables.
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
