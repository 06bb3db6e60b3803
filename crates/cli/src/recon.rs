//! `ledgermatch` subcommands: run, validate, init-config.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use tracing::info;

use ledgermatch_recon::{Ledger, RawTable, ReconConfig, ReconError};

use crate::exit_codes::{recon_exit_code, EXIT_ERROR, EXIT_RECON_IO, EXIT_RECON_UNMATCHED};
use crate::render::{render_result, summary_line};
use crate::CliError;

#[derive(Subcommand)]
pub enum ReconCommands {
    /// Reconcile a sales ledger against a bank statement
    #[command(after_help = "\
Examples:
  ledgermatch run ventas.csv banco.csv
  ledgermatch run ventas.csv banco.csv --json
  ledgermatch run ventas.csv banco.csv --config recon.toml --output result.json
  ledgermatch run ventas.csv banco.csv --bank-skip-rows 0 --tolerance-hours 48")]
    Run {
        /// Sales ledger CSV
        sales: PathBuf,

        /// Bank statement CSV
        bank: PathBuf,

        /// Path to a .recon.toml config file (defaults apply when omitted)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Output JSON to stdout instead of tables
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Preamble lines before the header row of the bank statement
        #[arg(long)]
        bank_skip_rows: Option<usize>,

        /// Half-width of the matching window, in hours
        #[arg(long)]
        tolerance_hours: Option<u32>,

        /// Exit non-zero when any sale or bank entry is left unmatched
        #[arg(long)]
        fail_on_unmatched: bool,
    },

    /// Validate a recon config without running
    #[command(after_help = "\
Examples:
  ledgermatch validate recon.toml")]
    Validate {
        /// Path to the .recon.toml config file
        config: PathBuf,
    },

    /// Print the default config as TOML
    #[command(after_help = "\
Examples:
  ledgermatch init-config > recon.toml")]
    InitConfig,
}

pub fn cmd_recon(cmd: ReconCommands) -> Result<(), CliError> {
    match cmd {
        ReconCommands::Run {
            sales,
            bank,
            config,
            json,
            output,
            bank_skip_rows,
            tolerance_hours,
            fail_on_unmatched,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(skip) = bank_skip_rows {
                config.bank.skip_rows = skip;
            }
            if let Some(hours) = tolerance_hours {
                config.tolerance_hours = hours;
            }
            config.validate().map_err(recon_err)?;
            cmd_recon_run(&config, &sales, &bank, json, output, fail_on_unmatched)
        }
        ReconCommands::Validate { config } => cmd_recon_validate(&config),
        ReconCommands::InitConfig => cmd_recon_init_config(),
    }
}

fn recon_err(err: ReconError) -> CliError {
    let hint = match &err {
        ReconError::MissingColumn { ledger: Ledger::Bank, .. } => Some(
            "bank exports carry preamble lines above the header; check --bank-skip-rows".to_string(),
        ),
        ReconError::MissingColumn { .. } => {
            Some("column names are matched case-insensitively after trimming".to_string())
        }
        _ => None,
    };
    CliError {
        code: recon_exit_code(&err),
        message: err.to_string(),
        hint,
    }
}

fn load_config(path: Option<&Path>) -> Result<ReconConfig, CliError> {
    let Some(path) = path else {
        return Ok(ReconConfig::default());
    };
    let text = std::fs::read_to_string(path).map_err(|e| {
        CliError::new(EXIT_RECON_IO, format!("cannot read config {}: {e}", path.display()))
    })?;
    ReconConfig::from_toml(&text).map_err(recon_err)
}

fn read_table(path: &Path, skip_rows: usize) -> Result<RawTable, CliError> {
    let data = std::fs::read_to_string(path)
        .map_err(|e| CliError::new(EXIT_RECON_IO, format!("cannot read {}: {e}", path.display())))?;
    RawTable::from_csv(&data, skip_rows).map_err(|e| {
        CliError::new(recon_exit_code(&e), format!("{}: {e}", path.display()))
    })
}

fn cmd_recon_run(
    config: &ReconConfig,
    sales_path: &Path,
    bank_path: &Path,
    json_output: bool,
    output_file: Option<PathBuf>,
    fail_on_unmatched: bool,
) -> Result<(), CliError> {
    let sales = read_table(sales_path, 0)?;
    let bank = read_table(bank_path, config.bank.skip_rows)?;
    info!(
        sales = %sales_path.display(),
        bank = %bank_path.display(),
        "loaded ledgers"
    );

    let result = ledgermatch_recon::run(config, &sales, &bank).map_err(recon_err)?;

    if json_output || output_file.is_some() {
        let json_str = serde_json::to_string_pretty(&result).map_err(|e| {
            CliError::new(EXIT_ERROR, format!("JSON serialization error: {e}"))
        })?;

        if let Some(ref path) = output_file {
            std::fs::write(path, &json_str).map_err(|e| {
                CliError::new(EXIT_RECON_IO, format!("cannot write output: {e}"))
            })?;
            eprintln!("wrote {}", path.display());
        }

        if json_output {
            println!("{json_str}");
        }
    }

    if !json_output {
        print!(
            "{}",
            render_result(
                &result,
                &sales,
                &config.sales.display_columns,
                &bank,
                &config.bank.display_columns,
            )
        );
    }

    // Human summary to stderr
    eprintln!("{}", summary_line(&result));

    let s = &result.summary;
    if fail_on_unmatched && (s.unmatched_sales > 0 || s.unmatched_bank > 0) {
        return Err(CliError::new(EXIT_RECON_UNMATCHED, "unmatched records remain"));
    }

    Ok(())
}

fn cmd_recon_validate(path: &Path) -> Result<(), CliError> {
    let config = load_config(Some(path))?;
    eprintln!(
        "config OK: tolerance {}h, {} excluded client(s), cancellation token \"{}\", positive bank amounts only: {}",
        config.tolerance_hours,
        config.excluded_clients.len(),
        config.cancellation_token,
        config.positive_bank_amounts_only,
    );
    Ok(())
}

fn cmd_recon_init_config() -> Result<(), CliError> {
    let text = ReconConfig::default()
        .to_toml()
        .map_err(|e| CliError::new(EXIT_ERROR, e.to_string()))?;
    print!("{text}");
    Ok(())
}
