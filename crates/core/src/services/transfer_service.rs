use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use crate::errors::CoreError;
use crate::models::subscription::{check_url, Category, Subscription, MAX_COST};
use crate::models::transfer::{
    ExportEntry, ExportEnvelope, ImportFormat, ImportOutcome, ImportRecord, ValidationReport,
    EXPORT_VERSION,
};

/// Column headers of the CSV export, in column order.
pub const CSV_HEADERS: [&str; 9] = [
    "서비스명",
    "월 결제금액",
    "결제일",
    "카테고리",
    "결제주기",
    "URL",
    "일시정지",
    "메모",
    "생성일",
];

/// Paused-column token for `true`.
pub const PAUSED_YES: &str = "예";
/// Paused-column token for `false`.
pub const PAUSED_NO: &str = "아니오";

/// Rows with fewer fields than this are dropped on CSV import.
const MIN_CSV_FIELDS: usize = 4;

/// Converts subscription lists to and from JSON and CSV text.
///
/// Parsing never fails: malformed input yields zero records so callers can
/// report "no valid data" the same way whatever went wrong.
pub struct TransferService;

impl TransferService {
    pub fn new() -> Self {
        Self
    }

    // ── JSON ────────────────────────────────────────────────────────

    /// Export as a versioned JSON envelope holding only editable fields.
    /// Absent optional text is written as `""` and reads back as `None`.
    pub fn export_json(
        &self,
        subscriptions: &[Subscription],
        exported_at: DateTime<Utc>,
    ) -> Result<String, CoreError> {
        let envelope = ExportEnvelope {
            version: EXPORT_VERSION.to_string(),
            exported_at: iso_timestamp(exported_at),
            subscriptions: subscriptions
                .iter()
                .map(|s| ExportEntry::from(&s.fields()))
                .collect(),
        };
        serde_json::to_string_pretty(&envelope)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize export: {e}")))
    }

    /// Read a JSON envelope. Missing fields take their defaults; anything
    /// unreadable yields an empty list.
    #[must_use]
    pub fn parse_json(&self, text: &str) -> Vec<ImportRecord> {
        let document: Value = match serde_json::from_str(text) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("JSON import failed: {e}");
                return Vec::new();
            }
        };

        let Some(entries) = document.get("subscriptions").and_then(Value::as_array) else {
            log::warn!("JSON import: no subscriptions array");
            return Vec::new();
        };

        entries.iter().map(json_record).collect()
    }

    // ── CSV ─────────────────────────────────────────────────────────

    /// Export as CSV with a header row. Only values containing a comma are
    /// quoted; embedded quotes and newlines are written as-is.
    #[must_use]
    pub fn export_csv(&self, subscriptions: &[Subscription]) -> String {
        let mut lines = Vec::with_capacity(subscriptions.len() + 1);
        lines.push(CSV_HEADERS.join(","));

        for sub in subscriptions {
            let cells = [
                quote_if_needed(&sub.name),
                format_cost(sub.cost),
                sub.billing_day.to_string(),
                sub.category.code().to_string(),
                sub.billing_cycle.code().to_string(),
                quote_if_needed(sub.url.as_deref().unwrap_or("")),
                (if sub.is_paused { PAUSED_YES } else { PAUSED_NO }).to_string(),
                quote_if_needed(sub.notes.as_deref().unwrap_or("")),
                iso_timestamp(sub.created_at),
            ];
            lines.push(cells.join(","));
        }

        lines.join("\n")
    }

    /// Read CSV text, skipping the header row.
    ///
    /// Rows with fewer than four fields are dropped. Numbers are read as
    /// integers (fractions truncated); an unreadable cost becomes 0 and an
    /// unreadable billing day becomes 1.
    #[must_use]
    pub fn parse_csv(&self, text: &str) -> Vec<ImportRecord> {
        let lines: Vec<&str> = text.trim().split('\n').collect();
        if lines.len() < 2 {
            return Vec::new();
        }

        let mut records = Vec::new();
        for (row, line) in lines.into_iter().enumerate().skip(1) {
            let values = split_csv_line(line.strip_suffix('\r').unwrap_or(line));
            if values.len() < MIN_CSV_FIELDS {
                log::debug!("CSV import: dropping row {row} ({} fields)", values.len());
                continue;
            }

            let cell = |i: usize| values.get(i).map(|v| v.trim()).unwrap_or("");
            records.push(ImportRecord {
                name: cell(0).to_string(),
                cost: parse_int_prefix(cell(1)).filter(|n| *n != 0).unwrap_or(0),
                billing_day: parse_int_prefix(cell(2)).filter(|n| *n != 0).unwrap_or(1),
                category: or_default(cell(3), Category::Etc.code()),
                billing_cycle: or_default(cell(4), "monthly"),
                url: cell(5).to_string(),
                custom_color: String::new(),
                is_paused: cell(6) == PAUSED_YES,
                notes: cell(7).to_string(),
            });
        }
        records
    }

    // ── Import / validation ─────────────────────────────────────────

    /// Parse `text` in `format` and validate each record.
    #[must_use]
    pub fn import_text(&self, format: ImportFormat, text: &str) -> ImportOutcome {
        let records = match format {
            ImportFormat::Json => self.parse_json(text),
            ImportFormat::Csv => self.parse_csv(text),
        };
        let invalid = records
            .iter()
            .enumerate()
            .filter_map(|(i, r)| {
                let report = self.validate_record(r);
                (!report.valid).then_some((i, report))
            })
            .collect();
        ImportOutcome { records, invalid }
    }

    /// Advisory check of an import record. Not the same gate as the form
    /// validator on [`SubscriptionFields`](crate::models::subscription::SubscriptionFields).
    #[must_use]
    pub fn validate_record(&self, record: &ImportRecord) -> ValidationReport {
        let mut errors = Vec::new();

        if record.name.trim().is_empty() {
            errors.push("name is required".to_string());
        }
        if record.cost < 0 {
            errors.push(format!("cost must be 0 or more (got {})", record.cost));
        } else if record.cost > MAX_COST as i64 {
            errors.push(format!("cost must be at most {MAX_COST} (got {})", record.cost));
        }
        if !(1..=31).contains(&record.billing_day) {
            errors.push(format!(
                "billing day must be between 1 and 31 (got {})",
                record.billing_day
            ));
        }
        if Category::from_code(&record.category).is_none() {
            errors.push(format!("unknown category '{}'", record.category));
        }
        if !record.url.is_empty() {
            errors.extend(check_url(&record.url));
        }

        ValidationReport {
            valid: errors.is_empty(),
            errors,
        }
    }
}

impl Default for TransferService {
    fn default() -> Self {
        Self::new()
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

fn json_record(entry: &Value) -> ImportRecord {
    let text = |key: &str| entry.get(key).map(value_text).unwrap_or_default();
    let int = |key: &str| entry.get(key).and_then(value_int).filter(|n| *n != 0);

    ImportRecord {
        name: text("name"),
        cost: int("cost").unwrap_or(0),
        billing_day: int("billingDay").unwrap_or(1),
        category: or_default(&text("category"), Category::Etc.code()),
        billing_cycle: or_default(&text("billingCycle"), "monthly"),
        url: text("url"),
        custom_color: text("customColor"),
        is_paused: entry.get("isPaused").and_then(Value::as_bool).unwrap_or(false),
        notes: text("notes"),
    }
}

fn value_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "true".to_string(),
        _ => String::new(),
    }
}

/// Integer coercion: numbers are truncated, strings read like `parseInt`.
fn value_int(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < 9.2e18)
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => parse_int_prefix(s),
        _ => None,
    }
}

/// Leading-integer parse: optional sign, then digits; the rest is ignored.
/// `"12.9"` → 12, `"15일"` → 15, `"abc"` → `None`.
pub(crate) fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    let magnitude: i64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Split one CSV line on commas outside double quotes. A quote only toggles
/// the in-field state and is dropped; doubled quotes are not an escape.
pub(crate) fn split_csv_line(line: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => values.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    values.push(current);
    values
}

fn quote_if_needed(value: &str) -> String {
    if value.contains(',') {
        format!("\"{value}\"")
    } else {
        value.to_string()
    }
}

fn format_cost(cost: f64) -> String {
    if cost.fract() == 0.0 && cost.abs() < 9.2e18 {
        format!("{}", cost as i64)
    } else {
        cost.to_string()
    }
}

fn or_default(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
