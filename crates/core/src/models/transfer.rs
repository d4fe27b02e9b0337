use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};

use super::subscription::{BillingCycle, Category, SubscriptionFields, MAX_COST};

/// Version tag written into JSON exports.
pub const EXPORT_VERSION: &str = "1.0";

/// Top-level document of a JSON export.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEnvelope {
    pub version: String,
    /// RFC 3339 timestamp of the export
    pub exported_at: String,
    pub subscriptions: Vec<ExportEntry>,
}

/// One exported subscription: only the user-editable fields. Optional text
/// fields are written as empty strings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEntry {
    pub name: String,
    #[serde(serialize_with = "serialize_cost")]
    pub cost: f64,
    pub billing_day: u32,
    pub category: Category,
    pub billing_cycle: BillingCycle,
    pub url: String,
    pub custom_color: String,
    pub is_paused: bool,
    pub notes: String,
}

impl From<&SubscriptionFields> for ExportEntry {
    fn from(f: &SubscriptionFields) -> Self {
        Self {
            name: f.name.clone(),
            cost: f.cost,
            billing_day: f.billing_day,
            category: f.category,
            billing_cycle: f.billing_cycle,
            url: f.url.clone().unwrap_or_default(),
            custom_color: f.custom_color.clone().unwrap_or_default(),
            is_paused: f.is_paused,
            notes: f.notes.clone().unwrap_or_default(),
        }
    }
}

/// Whole-number costs are written without a fractional part.
fn serialize_cost<S: Serializer>(cost: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if cost.fract() == 0.0 && cost.abs() < 9_007_199_254_740_992.0 {
        serializer.serialize_i64(*cost as i64)
    } else {
        serializer.serialize_f64(*cost)
    }
}

/// Text format of an import/export file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportFormat {
    Json,
    Csv,
}

impl ImportFormat {
    /// Pick the format from a file name extension (case-insensitive).
    #[must_use]
    pub fn from_file_name(name: &str) -> Option<ImportFormat> {
        let lower = name.to_lowercase();
        if lower.ends_with(".json") {
            Some(ImportFormat::Json)
        } else if lower.ends_with(".csv") {
            Some(ImportFormat::Csv)
        } else {
            None
        }
    }

    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            ImportFormat::Json => "json",
            ImportFormat::Csv => "csv",
        }
    }

    /// Download name for an export made on `date`, e.g. `subscriptions_2025-03-01.csv`.
    #[must_use]
    pub fn export_file_name(&self, date: NaiveDate) -> String {
        format!("subscriptions_{}.{}", date.format("%Y-%m-%d"), self.extension())
    }

    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImportFormat::Json => "application/json",
            ImportFormat::Csv => "text/csv;charset=utf-8",
        }
    }
}

/// A parsed but not yet normalized import row.
///
/// Numbers are already coerced (integer truncation, defaults on failure) but
/// not range-checked, so the advisory validator can still report them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImportRecord {
    pub name: String,
    pub cost: i64,
    pub billing_day: i64,
    pub category: String,
    pub billing_cycle: String,
    pub url: String,
    pub custom_color: String,
    pub is_paused: bool,
    pub notes: String,
}

impl ImportRecord {
    /// Normalize into storable fields: billing day clamped to 1–31, cost
    /// clamped into `0..=MAX_COST`, unknown category → `Etc`, unknown cycle →
    /// monthly. Whitespace-only text becomes `None`, the same as on a
    /// stored subscription.
    #[must_use]
    pub fn into_fields(self) -> SubscriptionFields {
        SubscriptionFields {
            name: self.name,
            cost: self.cost.clamp(0, MAX_COST as i64) as f64,
            billing_day: self.billing_day.clamp(1, 31) as u32,
            billing_cycle: BillingCycle::from_code(&self.billing_cycle).unwrap_or_default(),
            category: Category::from_code_or_default(&self.category),
            url: non_empty(self.url),
            custom_color: non_empty(self.custom_color),
            is_paused: self.is_paused,
            notes: non_empty(self.notes),
            trial_end_date: None,
        }
    }
}

/// Outcome of the advisory record validator.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Parsed import file plus the validation report of each failing row.
#[derive(Debug, Clone, Default)]
pub struct ImportOutcome {
    pub records: Vec<ImportRecord>,

    /// `(index into records, report)` for every record that failed validation
    pub invalid: Vec<(usize, ValidationReport)>,
}

impl ImportOutcome {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Normalized fields of every parsed record, valid or not.
    #[must_use]
    pub fn into_fields(self) -> Vec<SubscriptionFields> {
        self.records.into_iter().map(ImportRecord::into_fields).collect()
    }
}

/// What an import did: how many records were stored and which of them the
/// advisory validator flagged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub invalid: Vec<(usize, ValidationReport)>,
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(s)
    }
}
