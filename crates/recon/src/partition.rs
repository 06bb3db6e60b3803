use crate::matcher::MatchOutcome;
use crate::model::{BankRecord, MatchedPair, ReconSummary, SalesRecord};

const SALE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const BANK_DATE_FORMAT: &str = "%Y-%m-%d";

/// The three disjoint result sets of a run.
#[derive(Debug, Clone)]
pub struct Partition {
    pub matched: Vec<MatchedPair>,
    pub unmatched_sales: Vec<SalesRecord>,
    pub unmatched_bank: Vec<BankRecord>,
}

/// Split matched and unmatched records using the consumed markers of
/// `outcome`. Input order is preserved in every output set.
pub fn partition(sales: &[SalesRecord], bank: &[BankRecord], outcome: &MatchOutcome) -> Partition {
    let matched = outcome
        .pairs
        .iter()
        .map(|&(si, bi)| matched_pair(&sales[si], &bank[bi]))
        .collect();

    let unmatched_sales = sales
        .iter()
        .zip(&outcome.sales_consumed)
        .filter(|(_, consumed)| !**consumed)
        .map(|(s, _)| s.clone())
        .collect();

    let unmatched_bank = bank
        .iter()
        .zip(&outcome.bank_consumed)
        .filter(|(_, consumed)| !**consumed)
        .map(|(b, _)| b.clone())
        .collect();

    Partition {
        matched,
        unmatched_sales,
        unmatched_bank,
    }
}

fn matched_pair(sale: &SalesRecord, bank: &BankRecord) -> MatchedPair {
    MatchedPair {
        sale_row: sale.row,
        bank_row: bank.row,
        sale_date: sale.payment_timestamp.format(SALE_DATE_FORMAT).to_string(),
        sale_amount: sale.amount,
        sale_client: sale.client_display().to_string(),
        sale_payment_method: sale.payment_method.clone(),
        sale_detail: sale.detail.clone(),
        bank_date: bank.transaction_date.format(BANK_DATE_FORMAT).to_string(),
        bank_amount: bank.amount,
        bank_concept: bank.concept.clone(),
    }
}

/// Per-stage row counts for a run.
#[derive(Debug, Clone, Copy, Default)]
pub struct StageCounts {
    pub sales_rows_read: usize,
    pub sales_rows_dropped: usize,
    pub excluded_client: usize,
    pub cancelled: usize,
    pub bank_rows_read: usize,
    pub bank_rows_dropped: usize,
}

/// Compute summary statistics from a partition and the upstream stage counts.
pub fn compute_summary(partition: &Partition, counts: StageCounts) -> ReconSummary {
    let matched = partition.matched.len();
    ReconSummary {
        sales_rows_read: counts.sales_rows_read,
        sales_rows_dropped: counts.sales_rows_dropped,
        excluded_client: counts.excluded_client,
        cancelled: counts.cancelled,
        filtered_sales: matched + partition.unmatched_sales.len(),
        bank_rows_read: counts.bank_rows_read,
        bank_rows_dropped: counts.bank_rows_dropped,
        bank_records: matched + partition.unmatched_bank.len(),
        matched,
        unmatched_sales: partition.unmatched_sales.len(),
        unmatched_bank: partition.unmatched_bank.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NOT_AVAILABLE;
    use chrono::NaiveDateTime;
    use rust_decimal::Decimal;
    use std::collections::BTreeMap;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn sale(row: usize, client: Option<&str>) -> SalesRecord {
        SalesRecord {
            row,
            payment_timestamp: ts("2024-01-10 12:30:15"),
            amount: Decimal::new(150050, 2),
            client: client.map(Into::into),
            cancelled_flag: None,
            payment_method: "Transferencia".into(),
            detail: NOT_AVAILABLE.into(),
            fields: BTreeMap::new(),
        }
    }

    fn bank(row: usize) -> BankRecord {
        BankRecord {
            row,
            transaction_date: ts("2024-01-11 00:00:00"),
            amount: Decimal::new(150050, 2),
            concept: "Transferencia recibida".into(),
            origin_branch: NOT_AVAILABLE.into(),
            fields: BTreeMap::new(),
        }
    }

    #[test]
    fn splits_by_consumed_markers() {
        let sales = vec![sale(0, Some("Ana")), sale(1, Some("Luis")), sale(2, None)];
        let bank_rows = vec![bank(0), bank(1)];
        let outcome = MatchOutcome {
            pairs: vec![(2, 1), (0, 0)],
            sales_consumed: vec![true, false, true],
            bank_consumed: vec![true, true],
        };

        let part = partition(&sales, &bank_rows, &outcome);

        // Formation order, not row order
        assert_eq!(part.matched.len(), 2);
        assert_eq!(part.matched[0].sale_row, 2);
        assert_eq!(part.matched[0].bank_row, 1);
        assert_eq!(part.matched[0].sale_client, NOT_AVAILABLE);
        assert_eq!(part.matched[1].sale_client, "Ana");

        assert_eq!(part.unmatched_sales.len(), 1);
        assert_eq!(part.unmatched_sales[0].row, 1);
        assert!(part.unmatched_bank.is_empty());
    }

    #[test]
    fn display_fields_formatted() {
        let sales = vec![sale(0, Some("Ana"))];
        let bank_rows = vec![bank(4)];
        let outcome = MatchOutcome {
            pairs: vec![(0, 0)],
            sales_consumed: vec![true],
            bank_consumed: vec![true],
        };
        let part = partition(&sales, &bank_rows, &outcome);
        let pair = &part.matched[0];
        assert_eq!(pair.sale_date, "2024-01-10 12:30:15");
        assert_eq!(pair.bank_date, "2024-01-11");
        assert_eq!(pair.bank_row, 4);
        assert_eq!(pair.sale_amount, Decimal::new(150050, 2));
        assert_eq!(pair.sale_payment_method, "Transferencia");
        assert_eq!(pair.bank_concept, "Transferencia recibida");
    }

    #[test]
    fn summary_counts() {
        let sales = vec![sale(0, None), sale(1, None), sale(2, None)];
        let bank_rows = vec![bank(0), bank(1)];
        let outcome = MatchOutcome {
            pairs: vec![(0, 1)],
            sales_consumed: vec![true, false, false],
            bank_consumed: vec![false, true],
        };
        let part = partition(&sales, &bank_rows, &outcome);
        let counts = StageCounts {
            sales_rows_read: 6,
            sales_rows_dropped: 1,
            excluded_client: 1,
            cancelled: 1,
            bank_rows_read: 3,
            bank_rows_dropped: 1,
        };
        let summary = compute_summary(&part, counts);
        assert_eq!(summary.matched, 1);
        assert_eq!(summary.filtered_sales, 3);
        assert_eq!(summary.unmatched_sales, 2);
        assert_eq!(summary.bank_records, 2);
        assert_eq!(summary.unmatched_bank, 1);
        assert_eq!(summary.sales_rows_read, 6);
        assert_eq!(summary.excluded_client + summary.cancelled, 2);
    }
}
