use thiserror::Error;

use crate::model::Ledger;

#[derive(Debug, Error)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),
    /// Config validation error (empty format, empty column name, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),
    /// Required column absent after header normalization. Fatal to the run.
    #[error("{ledger} ledger: missing column '{column}'")]
    MissingColumn { ledger: Ledger, column: String },
    /// Malformed CSV input.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// IO error (file read, etc.).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReconError {
    /// True for errors caused by the shape of an input table rather than
    /// by configuration or IO.
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::MissingColumn { .. })
    }
}

pub type Result<T> = std::result::Result<T, ReconError>;
