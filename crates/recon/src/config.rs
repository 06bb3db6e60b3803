use chrono::format::{Item, Numeric, StrftimeItems};
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::error::ReconError;

/// Widest accepted matching window: one hundred leap years, in hours.
pub const MAX_TOLERANCE_HOURS: u32 = 24 * 366 * 100;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Reconciliation settings. Every field has a default, so an empty TOML
/// document is a valid config.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconConfig {
    /// Half-width of the matching window around each sale, in hours.
    pub tolerance_hours: u32,
    /// Client names (case-insensitive) whose sales never take part in
    /// reconciliation.
    pub excluded_clients: Vec<String>,
    /// Cancellation column value marking a cancelled sale.
    pub cancellation_token: String,
    /// Only strictly positive bank amounts may satisfy a match.
    pub positive_bank_amounts_only: bool,
    pub sales: SalesConfig,
    pub bank: BankConfig,
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            tolerance_hours: 24,
            excluded_clients: vec!["academia amateur".into(), "academia pro".into()],
            cancellation_token: "SI".into(),
            positive_bank_amounts_only: true,
            sales: SalesConfig::default(),
            bank: BankConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Ledger column mappings
// ---------------------------------------------------------------------------

/// Sales ledger columns, compared after header normalization.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SalesConfig {
    pub date_column: String,
    pub amount_column: String,
    pub client_column: String,
    pub cancelled_column: String,
    pub payment_method_column: String,
    pub detail_column: String,
    /// strftime format; must carry a time of day.
    pub date_format: String,
    /// Columns shown when listing unmatched sales.
    pub display_columns: Vec<String>,
}

impl Default for SalesConfig {
    fn default() -> Self {
        Self {
            date_column: "fecha pago".into(),
            amount_column: "monto".into(),
            client_column: "cliente".into(),
            cancelled_column: "cancelado".into(),
            payment_method_column: "medio de pago".into(),
            detail_column: "detalle".into(),
            date_format: "%d/%m/%Y %H:%M:%S".into(),
            display_columns: vec![
                "id. venta".into(),
                "fecha pago".into(),
                "monto".into(),
                "cliente".into(),
                "medio de pago".into(),
                "cancelado".into(),
            ],
        }
    }
}

/// Bank statement columns, compared after header normalization.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct BankConfig {
    pub date_column: String,
    pub amount_column: String,
    pub concept_column: String,
    pub branch_column: String,
    /// strftime format; date-only formats yield midnight.
    pub date_format: String,
    /// Non-blank preamble lines before the header row in bank exports.
    /// Blank spacer lines are skipped without counting toward this.
    pub skip_rows: usize,
    /// Columns shown when listing unmatched bank entries.
    pub display_columns: Vec<String>,
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            date_column: "fecha".into(),
            amount_column: "importe pesos".into(),
            concept_column: "concepto".into(),
            branch_column: "suc. origen".into(),
            date_format: "%m/%d/%Y".into(),
            skip_rows: 7,
            display_columns: vec![
                "fecha".into(),
                "importe pesos".into(),
                "concepto".into(),
                "suc. origen".into(),
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ReconError> {
        toml::to_string_pretty(self).map_err(|e| ReconError::ConfigParse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.tolerance_hours > MAX_TOLERANCE_HOURS {
            return Err(ReconError::ConfigValidation(format!(
                "tolerance_hours must be at most {MAX_TOLERANCE_HOURS}, got {}",
                self.tolerance_hours
            )));
        }

        if self.cancellation_token.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "cancellation_token must not be empty".into(),
            ));
        }

        let required = [
            ("sales.date_column", &self.sales.date_column),
            ("sales.amount_column", &self.sales.amount_column),
            ("bank.date_column", &self.bank.date_column),
            ("bank.amount_column", &self.bank.amount_column),
        ];
        for (key, column) in required {
            if column.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!("{key} must not be empty")));
            }
        }

        validate_date_format("sales.date_format", &self.sales.date_format)?;
        validate_date_format("bank.date_format", &self.bank.date_format)?;
        if !has_time_of_day(&self.sales.date_format) {
            return Err(ReconError::ConfigValidation(format!(
                "sales.date_format '{}' has no time of day (expected %H, %I, %T or similar)",
                self.sales.date_format
            )));
        }

        Ok(())
    }

    /// The matching window half-width.
    pub fn tolerance(&self) -> TimeDelta {
        TimeDelta::hours(i64::from(self.tolerance_hours))
    }
}

fn validate_date_format(key: &str, format: &str) -> Result<(), ReconError> {
    if format.trim().is_empty() {
        return Err(ReconError::ConfigValidation(format!("{key} must not be empty")));
    }
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(ReconError::ConfigValidation(format!(
            "{key}: invalid strftime format '{format}'"
        )));
    }
    Ok(())
}

fn has_time_of_day(format: &str) -> bool {
    StrftimeItems::new(format).any(|item| {
        matches!(
            item,
            Item::Numeric(Numeric::Hour | Numeric::Hour12 | Numeric::Timestamp, _)
        )
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
