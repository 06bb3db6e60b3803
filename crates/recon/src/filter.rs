use tracing::warn;

use crate::config::ReconConfig;
use crate::model::SalesRecord;
use crate::normalize::normalize_flag;
use crate::table::RawTable;

/// Which optional discriminating columns the sales ledger carries. A missing
/// column disables its rule instead of failing the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalesCapabilities {
    pub has_client: bool,
    pub has_cancellation: bool,
}

impl SalesCapabilities {
    pub fn detect(table: &RawTable, config: &ReconConfig) -> Self {
        Self {
            has_client: table.has_column(&config.sales.client_column),
            has_cancellation: table.has_column(&config.sales.cancelled_column),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FilterOutcome {
    pub kept: Vec<SalesRecord>,
    pub excluded_client: usize,
    pub cancelled: usize,
}

/// Remove sales from excluded clients and cancelled orders, preserving order.
pub fn filter_sales(
    records: Vec<SalesRecord>,
    caps: SalesCapabilities,
    config: &ReconConfig,
) -> FilterOutcome {
    if !caps.has_client {
        warn!(
            column = %config.sales.client_column,
            "sales ledger has no client column; client exclusion skipped"
        );
    }
    if !caps.has_cancellation {
        warn!(
            column = %config.sales.cancelled_column,
            "sales ledger has no cancellation column; cancellation filter skipped"
        );
    }

    let excluded: Vec<String> = config
        .excluded_clients
        .iter()
        .map(|c| c.trim().to_lowercase())
        .collect();
    let token = normalize_flag(&config.cancellation_token);

    let mut kept = Vec::with_capacity(records.len());
    let mut excluded_client = 0;
    let mut cancelled = 0;

    for record in records {
        if caps.has_client {
            if let Some(ref client) = record.client {
                let client = client.trim().to_lowercase();
                if excluded.iter().any(|e| *e == client) {
                    excluded_client += 1;
                    continue;
                }
            }
        }
        if caps.has_cancellation {
            if let Some(ref flag) = record.cancelled_flag {
                if normalize_flag(flag) == token {
                    cancelled += 1;
                    continue;
                }
            }
        }
        kept.push(record);
    }

    FilterOutcome {
        kept,
        excluded_client,
        cancelled,
    }
}
