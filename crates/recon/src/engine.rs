use tracing::{debug, info, info_span};

use crate::config::ReconConfig;
use crate::error::ReconError;
use crate::filter::{filter_sales, SalesCapabilities};
use crate::matcher::{match_greedy, MatchOptions};
use crate::model::{ReconMeta, ReconResult};
use crate::normalize::{normalize_bank, normalize_sales};
use crate::partition::{compute_summary, partition, StageCounts};
use crate::table::RawTable;

/// Run reconciliation of one sales table against one bank table.
///
/// Schema errors on either ledger abort the run before any matching. A run
/// with zero matches is still `Ok`.
pub fn run(config: &ReconConfig, sales: &RawTable, bank: &RawTable) -> Result<ReconResult, ReconError> {
    let span = info_span!("recon_run", sales_rows = sales.len(), bank_rows = bank.len());
    let _enter = span.enter();

    let sales_norm = normalize_sales(sales, config)?;
    let bank_norm = normalize_bank(bank, config)?;
    debug!(
        sales_kept = sales_norm.records.len(),
        sales_dropped = sales_norm.dropped,
        bank_kept = bank_norm.records.len(),
        bank_dropped = bank_norm.dropped,
        "normalized ledgers"
    );

    let caps = SalesCapabilities::detect(sales, config);
    let filtered = filter_sales(sales_norm.records, caps, config);
    debug!(
        kept = filtered.kept.len(),
        excluded_client = filtered.excluded_client,
        cancelled = filtered.cancelled,
        "filtered sales"
    );

    let opts = MatchOptions::from(config);
    let outcome = match_greedy(&filtered.kept, &bank_norm.records, &opts);
    let parts = partition(&filtered.kept, &bank_norm.records, &outcome);

    let summary = compute_summary(
        &parts,
        StageCounts {
            sales_rows_read: sales_norm.rows_read,
            sales_rows_dropped: sales_norm.dropped,
            excluded_client: filtered.excluded_client,
            cancelled: filtered.cancelled,
            bank_rows_read: bank_norm.rows_read,
            bank_rows_dropped: bank_norm.dropped,
        },
    );
    info!(
        matched = summary.matched,
        unmatched_sales = summary.unmatched_sales,
        unmatched_bank = summary.unmatched_bank,
        "reconciliation complete"
    );

    Ok(ReconResult {
        meta: ReconMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            tolerance_hours: config.tolerance_hours,
            positive_bank_amounts_only: config.positive_bank_amounts_only,
        },
        summary,
        matched: parts.matched,
        unmatched_sales: parts.unmatched_sales,
        unmatched_bank: parts.unmatched_bank,
    })
}
