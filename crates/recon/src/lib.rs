//! `ledgermatch-recon` — sales-to-bank ledger reconciliation engine.
//!
//! Pure engine crate: receives decoded tables, returns matched pairs plus the
//! unmatched sales and bank entries. No CLI dependencies.

pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod partition;
pub mod table;

pub use config::ReconConfig;
pub use engine::run;
pub use error::ReconError;
pub use model::{BankRecord, Ledger, MatchedPair, ReconResult, ReconSummary, SalesRecord};
pub use table::RawTable;
