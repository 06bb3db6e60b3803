//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success (including a run with no matches) |
//! | 1       | Universal        | General error (serialization, other)     |
//! | 2       | Universal        | CLI usage error (bad args)               |
//! | 3-9     | recon            | Reconciliation-specific codes            |
//!
//! A panic exits with 101 and is never a documented outcome.
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use ledgermatch_recon::ReconError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - failure outside the recon codes below (result or
/// config serialization). Prefer a specific code when one fits.
pub const EXIT_ERROR: u8 = 1;

// Usage errors (2) are emitted by clap itself on argument parse failure.

// =============================================================================
// Recon (3-9)
// =============================================================================

/// Config file could not be parsed or failed validation.
pub const EXIT_RECON_INVALID_CONFIG: u8 = 3;

/// A ledger is missing a required column. No results were produced.
pub const EXIT_RECON_SCHEMA: u8 = 4;

/// Input file unreadable, malformed CSV, or output not writable.
pub const EXIT_RECON_IO: u8 = 5;

/// Unmatched records remain (only with --fail-on-unmatched).
pub const EXIT_RECON_UNMATCHED: u8 = 6;

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_RECON_INVALID_CONFIG,
        ReconError::MissingColumn { .. } => EXIT_RECON_SCHEMA,
        ReconError::Csv(_) | ReconError::Io(_) => EXIT_RECON_IO,
    }
}
