//! Human-readable result tables.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};

use ledgermatch_recon::normalize::normalize_column_name;
use ledgermatch_recon::{RawTable, ReconResult};

const MATCHED_HEADERS: [&str; 8] = [
    "Sale date",
    "Sale amount",
    "Client",
    "Payment method",
    "Detail",
    "Bank date",
    "Bank amount",
    "Concept",
];

pub fn summary_line(result: &ReconResult) -> String {
    let s = &result.summary;
    format!(
        "recon: {} matched, {} unmatched sales, {} unmatched bank entries \
         ({} sales after filters, {} bank entries; dropped {} sales / {} bank rows, \
         excluded {} client / {} cancelled)",
        s.matched,
        s.unmatched_sales,
        s.unmatched_bank,
        s.filtered_sales,
        s.bank_records,
        s.sales_rows_dropped,
        s.bank_rows_dropped,
        s.excluded_client,
        s.cancelled,
    )
}

/// Render the three result sets. Unmatched tables show only the configured
/// display columns that the source ledger actually carries.
pub fn render_result(
    result: &ReconResult,
    sales: &RawTable,
    sales_display: &[String],
    bank: &RawTable,
    bank_display: &[String],
) -> String {
    let mut out = String::new();

    out.push_str("Matched transactions\n");
    if result.matched.is_empty() {
        out.push_str("No matched transactions found.\n");
    } else {
        let mut table = styled_table(&MATCHED_HEADERS);
        for pair in &result.matched {
            table.add_row(vec![
                pair.sale_date.clone(),
                pair.sale_amount.to_string(),
                pair.sale_client.clone(),
                pair.sale_payment_method.clone(),
                pair.sale_detail.clone(),
                pair.bank_date.clone(),
                pair.bank_amount.to_string(),
                pair.bank_concept.clone(),
            ]);
        }
        out.push_str(&format!("{table}\n"));
    }

    out.push_str("\nUnmatched sales\n");
    if result.unmatched_sales.is_empty() {
        out.push_str("All sales were reconciled, or none remained after filtering.\n");
    } else {
        let columns = present_columns(sales, sales_display);
        let rows = result.unmatched_sales.iter().map(|r| &r.fields);
        out.push_str(&format!("{}\n", field_table(&columns, rows)));
    }

    out.push_str("\nUnmatched bank entries\n");
    if result.unmatched_bank.is_empty() {
        out.push_str("All bank entries were reconciled, or the statement had none.\n");
    } else {
        let columns = present_columns(bank, bank_display);
        let rows = result.unmatched_bank.iter().map(|r| &r.fields);
        out.push_str(&format!("{}\n", field_table(&columns, rows)));
    }

    out
}

fn present_columns(table: &RawTable, wanted: &[String]) -> Vec<String> {
    let present: Vec<String> = wanted
        .iter()
        .map(|c| normalize_column_name(c))
        .filter(|c| table.has_column(c))
        .collect();
    if present.is_empty() {
        // Nothing configured matches; fall back to every column.
        return table.columns().to_vec();
    }
    present
}

fn field_table<'a>(
    columns: &[String],
    rows: impl Iterator<Item = &'a std::collections::BTreeMap<String, String>>,
) -> Table {
    let mut table = styled_table(columns);
    for fields in rows {
        table.add_row(
            columns
                .iter()
                .map(|c| fields.get(c).cloned().unwrap_or_default())
                .collect::<Vec<_>>(),
        );
    }
    table
}

fn styled_table<S: AsRef<str>>(headers: &[S]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h.as_ref()).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        );
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgermatch_recon::{run, ReconConfig};

    fn run_small(sales_csv: &str, bank_csv: &str) -> (ReconResult, RawTable, RawTable) {
        let sales = RawTable::from_csv(sales_csv, 0).unwrap();
        let bank = RawTable::from_csv(bank_csv, 0).unwrap();
        let result = run(&ReconConfig::default(), &sales, &bank).unwrap();
        (result, sales, bank)
    }

    #[test]
    fn empty_sections_have_messages() {
        let (result, sales, bank) = run_small(
            "Fecha Pago,Monto\n",
            "Fecha,Importe Pesos\n",
        );
        let config = ReconConfig::default();
        let text = render_result(
            &result,
            &sales,
            &config.sales.display_columns,
            &bank,
            &config.bank.display_columns,
        );
        assert!(text.contains("No matched transactions found."));
        assert!(text.contains("All sales were reconciled"));
        assert!(text.contains("All bank entries were reconciled"));
    }

    #[test]
    fn unmatched_tables_use_present_display_columns() {
        let (result, sales, bank) = run_small(
            "Id. Venta,Fecha Pago,Monto,Interno\n7,10/01/2024 12:00:00,\"10,00\",secreto\n",
            "Fecha,Importe Pesos,Concepto\n1/20/2024,\"99,00\",Deposito\n",
        );
        let config = ReconConfig::default();
        let text = render_result(
            &result,
            &sales,
            &config.sales.display_columns,
            &bank,
            &config.bank.display_columns,
        );
        assert!(text.contains("id. venta"));
        assert!(!text.contains("interno"));
        assert!(!text.contains("secreto"));
        assert!(text.contains("Deposito"));
        assert!(!text.contains("suc. origen"));
    }

    #[test]
    fn summary_mentions_counts() {
        let (result, _, _) = run_small(
            "Fecha Pago,Monto\n10/01/2024 12:00:00,\"10,00\"\n",
            "Fecha,Importe Pesos\n1/10/2024,\"10,00\"\n",
        );
        let line = summary_line(&result);
        assert!(line.starts_with("recon: 1 matched, 0 unmatched sales, 0 unmatched bank entries"));
    }
}
