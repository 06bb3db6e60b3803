//! Coercion of raw string cells into typed ledger records.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use tracing::debug;

use crate::config::ReconConfig;
use crate::error::ReconError;
use crate::model::{BankRecord, Ledger, Normalized, SalesRecord, NOT_AVAILABLE};
use crate::table::RawTable;

// ---------------------------------------------------------------------------
// Scalar normalization
// ---------------------------------------------------------------------------

/// Trim and lowercase a column label.
pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Canonicalize a decimal-comma / thousands-dot amount (`"$ 1.500,50"` ->
/// `1500.50`). Returns `None` when nothing numeric remains.
pub fn normalize_amount(raw: &str) -> Option<Decimal> {
    let canonical: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .filter(|c| *c != '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if !canonical.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    Decimal::from_str(&canonical).ok()
}

/// Parse `raw` with a single explicit strftime `format`. A format without a
/// time of day yields midnight, but only when `allow_date_only` is set.
pub fn parse_timestamp(raw: &str, format: &str, allow_date_only: bool) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
        return Some(ts);
    }
    if allow_date_only {
        return NaiveDate::parse_from_str(raw, format)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0));
    }
    None
}

/// Upper-case and trim a cancellation flag for token comparison.
pub fn normalize_flag(raw: &str) -> String {
    raw.trim().to_uppercase()
}

// ---------------------------------------------------------------------------
// Ledger normalization
// ---------------------------------------------------------------------------

/// Normalize the sales ledger. Fails only when the date or amount column is
/// missing; rows with an unparseable date or amount are dropped and counted.
pub fn normalize_sales(
    table: &RawTable,
    config: &ReconConfig,
) -> Result<Normalized<SalesRecord>, ReconError> {
    let cols = &config.sales;
    let date_col = require_column(table, Ledger::Sales, &cols.date_column)?;
    let amount_col = require_column(table, Ledger::Sales, &cols.amount_column)?;

    let client_col = optional_column(table, &cols.client_column);
    let cancelled_col = optional_column(table, &cols.cancelled_column);
    let method_col = optional_column(table, &cols.payment_method_column);
    let detail_col = optional_column(table, &cols.detail_column);

    let mut records = Vec::with_capacity(table.len());
    let mut dropped = 0;

    for (row, cells) in table.rows().iter().enumerate() {
        let date_raw = cell(cells, &date_col);
        let amount_raw = cell(cells, &amount_col);

        let Some(payment_timestamp) = parse_timestamp(date_raw, &cols.date_format, false) else {
            debug!(ledger = %Ledger::Sales, row, value = date_raw, "dropping row: unparseable date");
            dropped += 1;
            continue;
        };
        let Some(amount) = normalize_amount(amount_raw) else {
            debug!(ledger = %Ledger::Sales, row, value = amount_raw, "dropping row: unparseable amount");
            dropped += 1;
            continue;
        };

        records.push(SalesRecord {
            row,
            payment_timestamp,
            amount,
            client: client_col.as_ref().map(|c| cell(cells, c).trim().to_string()),
            cancelled_flag: cancelled_col.as_ref().map(|c| normalize_flag(cell(cells, c))),
            payment_method: descriptive(cells, method_col.as_deref()),
            detail: descriptive(cells, detail_col.as_deref()),
            fields: owned_fields(cells),
        });
    }

    Ok(Normalized {
        records,
        rows_read: table.len(),
        dropped,
    })
}

/// Normalize the bank statement. Same failure policy as [`normalize_sales`];
/// date-only timestamps are accepted.
pub fn normalize_bank(
    table: &RawTable,
    config: &ReconConfig,
) -> Result<Normalized<BankRecord>, ReconError> {
    let cols = &config.bank;
    let date_col = require_column(table, Ledger::Bank, &cols.date_column)?;
    let amount_col = require_column(table, Ledger::Bank, &cols.amount_column)?;

    let concept_col = optional_column(table, &cols.concept_column);
    let branch_col = optional_column(table, &cols.branch_column);

    let mut records = Vec::with_capacity(table.len());
    let mut dropped = 0;

    for (row, cells) in table.rows().iter().enumerate() {
        let date_raw = cell(cells, &date_col);
        let amount_raw = cell(cells, &amount_col);

        let Some(transaction_date) = parse_timestamp(date_raw, &cols.date_format, true) else {
            debug!(ledger = %Ledger::Bank, row, value = date_raw, "dropping row: unparseable date");
            dropped += 1;
            continue;
        };
        let Some(amount) = normalize_amount(amount_raw) else {
            debug!(ledger = %Ledger::Bank, row, value = amount_raw, "dropping row: unparseable amount");
            dropped += 1;
            continue;
        };

        records.push(BankRecord {
            row,
            transaction_date,
            amount,
            concept: descriptive(cells, concept_col.as_deref()),
            origin_branch: descriptive(cells, branch_col.as_deref()),
            fields: owned_fields(cells),
        });
    }

    Ok(Normalized {
        records,
        rows_read: table.len(),
        dropped,
    })
}

fn require_column(table: &RawTable, ledger: Ledger, name: &str) -> Result<String, ReconError> {
    optional_column(table, name).ok_or_else(|| ReconError::MissingColumn {
        ledger,
        column: normalize_column_name(name),
    })
}

fn optional_column(table: &RawTable, name: &str) -> Option<String> {
    let name = normalize_column_name(name);
    if name.is_empty() || !table.has_column(&name) {
        return None;
    }
    Some(name)
}

fn cell<'a>(cells: &'a HashMap<String, String>, column: &str) -> &'a str {
    cells.get(column).map(String::as_str).unwrap_or("")
}

fn descriptive(cells: &HashMap<String, String>, column: Option<&str>) -> String {
    match column.map(|c| cell(cells, c).trim()) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn owned_fields(cells: &HashMap<String, String>) -> BTreeMap<String, String> {
    cells.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
}
