use chrono::{NaiveDateTime, TimeDelta};
use rust_decimal::Decimal;

use crate::config::ReconConfig;
use crate::model::{BankRecord, SalesRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    /// Half-width of the inclusive window around each sale.
    pub tolerance: TimeDelta,
    /// Reject bank entries whose amount is zero or negative.
    pub positive_bank_amounts_only: bool,
}

impl From<&ReconConfig> for MatchOptions {
    fn from(config: &ReconConfig) -> Self {
        Self {
            tolerance: config.tolerance(),
            positive_bank_amounts_only: config.positive_bank_amounts_only,
        }
    }
}

/// One-to-one partial matching between a sales slice and a bank slice.
/// Consumed markers belong to this run only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    /// `(sales index, bank index)` in the order pairs were formed.
    pub pairs: Vec<(usize, usize)>,
    pub sales_consumed: Vec<bool>,
    pub bank_consumed: Vec<bool>,
}

/// Greedy first-match: each sale, in order, takes the first unconsumed bank
/// entry (in bank order) with an equal amount inside the tolerance window.
/// A formed pair is never revisited. O(n * m).
pub fn match_greedy(sales: &[SalesRecord], bank: &[BankRecord], opts: &MatchOptions) -> MatchOutcome {
    let mut sales_consumed = vec![false; sales.len()];
    let mut bank_consumed = vec![false; bank.len()];
    let mut pairs = Vec::new();

    for (si, sale) in sales.iter().enumerate() {
        // Window edges past the calendar range clamp to its ends.
        let window_start = sale
            .payment_timestamp
            .checked_sub_signed(opts.tolerance)
            .unwrap_or(NaiveDateTime::MIN);
        let window_end = sale
            .payment_timestamp
            .checked_add_signed(opts.tolerance)
            .unwrap_or(NaiveDateTime::MAX);

        let candidate = bank.iter().enumerate().position(|(bi, entry)| {
            !bank_consumed[bi]
                && entry.transaction_date >= window_start
                && entry.transaction_date <= window_end
                && entry.amount == sale.amount
                && (!opts.positive_bank_amounts_only || entry.amount > Decimal::ZERO)
        });

        if let Some(bi) = candidate {
            sales_consumed[si] = true;
            bank_consumed[bi] = true;
            pairs.push((si, bi));
        }
    }

    MatchOutcome {
        pairs,
        sales_consumed,
        bank_consumed,
    }
}
