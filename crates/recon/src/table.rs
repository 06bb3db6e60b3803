//! Raw, string-typed ledger tables as handed to the engine.

use std::collections::HashMap;

use tracing::warn;

use crate::error::ReconError;
use crate::normalize::normalize_column_name;

/// A decoded table: normalized column names plus rows of raw cell values,
/// in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<HashMap<String, String>>,
}

impl RawTable {
    /// Build a table from header names and positional rows. Header names are
    /// normalized; short rows are padded with empty cells. When two headers
    /// normalize to the same name, the first column wins.
    pub fn new<H, R, C>(headers: H, rows: R) -> Self
    where
        H: IntoIterator,
        H::Item: AsRef<str>,
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let positional: Vec<String> = headers
            .into_iter()
            .map(|h| normalize_column_name(h.as_ref()))
            .collect();

        let mut columns: Vec<String> = Vec::with_capacity(positional.len());
        for name in &positional {
            if columns.contains(name) {
                warn!(column = %name, "duplicate column after normalization; keeping the first");
            } else {
                columns.push(name.clone());
            }
        }

        let rows: Vec<HashMap<String, String>> = rows
            .into_iter()
            .map(|cells| {
                let mut cells = cells.into_iter();
                let mut row = HashMap::with_capacity(columns.len());
                for col in &positional {
                    let value: String = cells.next().map(Into::into).unwrap_or_default();
                    row.entry(col.clone()).or_insert(value);
                }
                row
            })
            .collect();

        Self { columns, rows }
    }

    /// Parse delimited text. `skip_rows` non-blank preamble lines are
    /// discarded before the header row (bank exports carry account metadata
    /// above the data). Blank lines do not count toward `skip_rows`.
    pub fn from_csv(data: &str, skip_rows: usize) -> Result<Self, ReconError> {
        let body = skip_lines(data, skip_rows);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(body.as_bytes());

        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(|v| v.to_string()).collect::<Vec<_>>());
        }

        Ok(Self::new(headers, rows))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[HashMap<String, String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column lookup by any casing/padding of its name.
    pub fn has_column(&self, name: &str) -> bool {
        let name = normalize_column_name(name);
        self.columns.iter().any(|c| *c == name)
    }
}

fn skip_lines(data: &str, n: usize) -> &str {
    let mut rest = data;
    let mut skipped = 0;
    while skipped < n {
        let Some(pos) = rest.find('\n') else {
            return "";
        };
        if !rest[..pos].trim().is_empty() {
            skipped += 1;
        }
        rest = &rest[pos + 1..];
    }
    // Blank lines between the preamble and the header row
    while let Some(pos) = rest.find('\n') {
        if !rest[..pos].trim().is_empty() {
            break;
        }
        rest = &rest[pos + 1..];
    }
    rest
}
