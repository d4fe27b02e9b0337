//! Billing-date arithmetic.
//!
//! Every function takes `today` explicitly and never reads the clock, so the
//! results are deterministic for a given input.

use chrono::{Datelike, NaiveDate};

/// Number of days in `month` (1–12) of `year`.
#[must_use]
pub fn days_in_month(year: i32, month: u32) -> u32 {
    (28..=31)
        .rev()
        .find(|&d| NaiveDate::from_ymd_opt(year, month, d).is_some())
        .unwrap_or(28)
}

/// The next date a subscription billed on `billing_day` charges, counting
/// today if today is the billing day.
///
/// When the billing day has already passed this month the charge moves to
/// next month. A billing day past the end of the target month lands on that
/// month's last day (31 → 30th in April, 29th or 28th in February).
#[must_use]
pub fn next_billing_date(today: NaiveDate, billing_day: u32) -> NaiveDate {
    let billing_day = billing_day.clamp(1, 31);
    let (year, month) = if today.day() > billing_day {
        following_month(today.year(), today.month())
    } else {
        (today.year(), today.month())
    };
    clamp_into_month(year, month, billing_day).unwrap_or(today)
}

/// Whole days from `today` until the next charge. 0 on the billing day,
/// never negative.
#[must_use]
pub fn days_until_next_billing(today: NaiveDate, billing_day: u32) -> i64 {
    if today.day() == billing_day {
        return 0;
    }
    (next_billing_date(today, billing_day) - today).num_days()
}

/// Signed days until a trial ends; negative once it has ended, `-1` when no
/// trial is set.
#[must_use]
pub fn days_until_trial_end(trial_end: Option<NaiveDate>, today: NaiveDate) -> i64 {
    match trial_end {
        Some(end) => (end - today).num_days(),
        None => -1,
    }
}

/// True when a trial ends within the next `window_days` days (today included).
#[must_use]
pub fn is_trial_ending_soon(trial_end: Option<NaiveDate>, today: NaiveDate, window_days: i64) -> bool {
    if trial_end.is_none() {
        return false;
    }
    let days = days_until_trial_end(trial_end, today);
    (0..=window_days).contains(&days)
}

fn following_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// Walk back from `day` until the date exists in the given month.
fn clamp_into_month(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    (1..=day)
        .rev()
        .find_map(|d| NaiveDate::from_ymd_opt(year, month, d))
}
