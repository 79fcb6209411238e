use std::fmt;
use std::path::Path;

use chrono::NaiveDate;
use regex::Regex;

use crate::catalog::Catalog;
use crate::hasher::dedup_hash;
use crate::models::{RawRow, TransactionRecord};
use crate::txn_type::resolve_type;

/// Why a row was left out of the batch. Pending rows are dropped by design;
/// the other two are true errors and count against the file.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    Pending,
    UnparsableDate(String),
    MissingAmount,
}

impl SkipReason {
    pub fn is_error(&self) -> bool {
        !matches!(self, SkipReason::Pending)
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Pending => write!(f, "pending/unsettled"),
            SkipReason::UnparsableDate(raw) => write!(f, "unparsable date '{raw}'"),
            SkipReason::MissingAmount => write!(f, "missing or unparsable amount"),
        }
    }
}

// ---------------------------------------------------------------------------
// Field parsing helpers
// ---------------------------------------------------------------------------

/// Parse the two supported calendar formats plus already-ISO input.
/// Month and day may be unpadded. The year format is chosen by token width
/// so "25" windows to 2025 instead of parsing as year 25.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d);
    }
    let parts: Vec<&str> = raw.split('/').collect();
    if parts.len() != 3 {
        return None;
    }
    let fmt = if parts[2].len() >= 4 { "%m/%d/%Y" } else { "%m/%d/%y" };
    NaiveDate::parse_from_str(raw, fmt).ok()
}

/// Strip thousands separators, currency symbols and surrounding quotes;
/// accept parenthesized negatives. Unparsable input is None, not zero.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let s = raw.replace(',', "").replace('"', "").replace('$', "");
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Some(inner) = s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        return inner.trim().parse::<f64>().ok().map(|v| -v);
    }
    s.parse().ok()
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

pub struct Normalizer<'a> {
    catalog: &'a Catalog,
    embedded_number: Regex,
    filename_code: Regex,
}

impl<'a> Normalizer<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            // "Checking (...1425)", "Checking ****1425", "Checking X1425"
            embedded_number: Regex::new(
                r"(?:\((?:\.{3}|\*+|[xX])?(\d{3,4})\)|(?:\*{2,}|[xX])(\d{4}))\s*$",
            )
            .expect("static regex"),
            filename_code: Regex::new(r"(\d{4})").expect("static regex"),
        }
    }

    /// Turn a raw row into a canonical record, or say why it was skipped.
    /// Never panics and never fails the batch: every coercion problem maps
    /// to a SkipReason.
    pub fn normalize(
        &self,
        row: &RawRow,
        source_file: &Path,
    ) -> Result<TransactionRecord, SkipReason> {
        let action = row.action.trim();
        let lowered = action.to_lowercase();
        if lowered.contains("pending") || lowered.contains("unsettled") {
            return Err(SkipReason::Pending);
        }

        let date = parse_date(&row.date).ok_or_else(|| SkipReason::UnparsableDate(row.date.clone()))?;
        let amount = parse_amount(&row.amount).ok_or(SkipReason::MissingAmount)?;

        let (account, account_number) = self.resolve_account(row, source_file);

        let symbol = row
            .symbol
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let description = {
            let d = row.description.trim();
            if d.is_empty() { action.to_string() } else { d.to_string() }
        };

        let currency = row
            .currency
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or("USD")
            .to_string();

        let hash = dedup_hash(date, &account_number, action, amount, &description);

        Ok(TransactionRecord {
            date,
            account,
            account_number,
            action: action.to_string(),
            description,
            amount,
            currency,
            symbol,
            payee: None,
            txn_type: resolve_type(action),
            category_id: None,
            subcategory_id: None,
            confidence: 0.0,
            review_needed: false,
            source_file: source_file
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            dedup_hash: hash,
        })
    }

    /// Explicit account column wins; an embedded masked number is split out
    /// and stripped from the name. With no account column at all, the
    /// filename is scanned for an embedded account code.
    fn resolve_account(&self, row: &RawRow, source_file: &Path) -> (String, String) {
        let explicit_number = row
            .account_number
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        if let Some(raw_account) = row.account.as_deref().map(str::trim).filter(|a| !a.is_empty()) {
            if let Some(caps) = self.embedded_number.captures(raw_account) {
                let number = caps
                    .get(1)
                    .or_else(|| caps.get(2))
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default();
                let name = self.embedded_number.replace(raw_account, "").trim().to_string();
                return (name, explicit_number.unwrap_or(number));
            }
            return (raw_account.to_string(), explicit_number.unwrap_or_default());
        }

        self.account_from_filename(source_file, explicit_number)
    }

    fn account_from_filename(
        &self,
        source_file: &Path,
        explicit_number: Option<String>,
    ) -> (String, String) {
        let stem = source_file
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        for caps in self.filename_code.captures_iter(&stem) {
            let code = &caps[1];
            if let Some(name) = self.catalog.account_name_for_code(code) {
                return (name.to_string(), explicit_number.unwrap_or_else(|| code.to_string()));
            }
        }
        // Unknown code still yields a stable label instead of failing the row.
        if let Some(caps) = self.filename_code.captures(&stem) {
            let code = caps[1].to_string();
            return (
                format!("Unknown Account ({code})"),
                explicit_number.unwrap_or(code),
            );
        }
        ("Unknown Account".to_string(), explicit_number.unwrap_or_default())
    }
}
