use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;

/// Placeholder for optional descriptive fields that are absent or blank.
pub const NOT_AVAILABLE: &str = "N/A";

// ---------------------------------------------------------------------------
// Ledgers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Ledger {
    Sales,
    Bank,
}

impl std::fmt::Display for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sales => write!(f, "sales"),
            Self::Bank => write!(f, "bank"),
        }
    }
}

// ---------------------------------------------------------------------------
// Normalized records
// ---------------------------------------------------------------------------

/// One row of the sales ledger after normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesRecord {
    /// Zero-based position of the row in the input table.
    pub row: usize,
    pub payment_timestamp: NaiveDateTime,
    pub amount: Decimal,
    /// Trimmed client name; `None` when the ledger has no client column.
    pub client: Option<String>,
    /// Upper-cased, trimmed cancellation flag; `None` when the ledger has no
    /// cancellation column.
    pub cancelled_flag: Option<String>,
    pub payment_method: String,
    pub detail: String,
    /// Every raw cell of the row, keyed by normalized column name.
    pub fields: BTreeMap<String, String>,
}

impl SalesRecord {
    pub fn client_display(&self) -> &str {
        match self.client.as_deref() {
            Some(c) if !c.is_empty() => c,
            _ => NOT_AVAILABLE,
        }
    }
}

/// One row of the bank statement after normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BankRecord {
    /// Zero-based position of the row in the input table (after skipped
    /// preamble rows and the header).
    pub row: usize,
    /// Midnight when the statement only carries a date.
    pub transaction_date: NaiveDateTime,
    pub amount: Decimal,
    pub concept: String,
    pub origin_branch: String,
    pub fields: BTreeMap<String, String>,
}

/// Normalized ledger plus the number of rows dropped for an unparseable date
/// or amount.
#[derive(Debug, Clone)]
pub struct Normalized<T> {
    pub records: Vec<T>,
    pub rows_read: usize,
    pub dropped: usize,
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// A sales record paired with the bank record representing the same payment,
/// denormalized for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedPair {
    pub sale_row: usize,
    pub bank_row: usize,
    pub sale_date: String,
    pub sale_amount: Decimal,
    pub sale_client: String,
    pub sale_payment_method: String,
    pub sale_detail: String,
    pub bank_date: String,
    pub bank_amount: Decimal,
    pub bank_concept: String,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconSummary {
    pub sales_rows_read: usize,
    pub sales_rows_dropped: usize,
    pub excluded_client: usize,
    pub cancelled: usize,
    pub filtered_sales: usize,
    pub bank_rows_read: usize,
    pub bank_rows_dropped: usize,
    pub bank_records: usize,
    pub matched: usize,
    pub unmatched_sales: usize,
    pub unmatched_bank: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub engine_version: String,
    pub run_at: String,
    pub tolerance_hours: u32,
    pub positive_bank_amounts_only: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub matched: Vec<MatchedPair>,
    pub unmatched_sales: Vec<SalesRecord>,
    pub unmatched_bank: Vec<BankRecord>,
}
