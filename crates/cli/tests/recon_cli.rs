// End-to-end tests for the `ledgermatch` binary.
// Run with: cargo test -p ledgermatch-cli --test recon_cli

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use ledgermatch_recon::ReconConfig;

const SALES_CSV: &str = "\
Id. Venta,Fecha Pago,Monto,Cliente,Medio de Pago,Cancelado
1,10/01/2024 12:00:00,\"1.500,50\",Juan Perez,Transferencia,NO
2,10/01/2024 15:00:00,\"2.000,00\",academia amateur,Transferencia,NO
3,12/01/2024 10:00:00,\"450,00\",Luis Diaz,Transferencia,NO
";

const BANK_CSV: &str = "\
Banco Ejemplo
Extracto
Cuenta 123
Titular Academia
Periodo 01/2024
Moneda Pesos
Generado 01/02/2024
Fecha,Concepto,Importe Pesos,Suc. Origen
1/11/2024,Transferencia recibida,\"1.500,50\",0010
1/10/2024,Transferencia recibida,\"2.000,00\",0010
";

fn ledgermatch() -> Command {
    Command::new(env!("CARGO_BIN_EXE_ledgermatch"))
}

fn write_inputs(dir: &Path) -> (PathBuf, PathBuf) {
    let sales = dir.join("ventas.csv");
    let bank = dir.join("banco.csv");
    fs::write(&sales, SALES_CSV).unwrap();
    fs::write(&bank, BANK_CSV).unwrap();
    (sales, bank)
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

#[test]
fn run_json_reports_three_sets() {
    let dir = tempfile::tempdir().unwrap();
    let (sales, bank) = write_inputs(dir.path());

    let out = ledgermatch().arg("run").arg(&sales).arg(&bank).arg("--json").output().unwrap();
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));

    let json: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(json["summary"]["matched"], 1);
    assert_eq!(json["summary"]["excluded_client"], 1);
    assert_eq!(json["summary"]["unmatched_sales"], 1);
    assert_eq!(json["summary"]["unmatched_bank"], 1);
    assert_eq!(json["matched"][0]["sale_client"], "Juan Perez");
    assert_eq!(json["matched"][0]["bank_date"], "2024-01-11");
    assert!(stderr(&out).contains("recon: 1 matched"));
}

#[test]
fn run_tables_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let (sales, bank) = write_inputs(dir.path());

    let out = ledgermatch().arg("run").arg(&sales).arg(&bank).output().unwrap();
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));

    let text = stdout(&out);
    assert!(text.contains("Matched transactions"));
    assert!(text.contains("Juan Perez"));
    assert!(text.contains("Unmatched sales"));
    assert!(text.contains("Luis Diaz"));
    assert!(!text.contains("academia amateur"));
}

#[test]
fn output_file_written() {
    let dir = tempfile::tempdir().unwrap();
    let (sales, bank) = write_inputs(dir.path());
    let result_path = dir.path().join("result.json");

    let out = ledgermatch()
        .arg("run")
        .arg(&sales)
        .arg(&bank)
        .arg("--output")
        .arg(&result_path)
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&result_path).unwrap()).unwrap();
    assert_eq!(json["summary"]["matched"], 1);
}

#[test]
fn fail_on_unmatched_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let (sales, bank) = write_inputs(dir.path());

    let out = ledgermatch()
        .arg("run")
        .arg(&sales)
        .arg(&bank)
        .arg("--json")
        .arg("--fail-on-unmatched")
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(6));
}

#[test]
fn missing_amount_column_is_schema_error() {
    let dir = tempfile::tempdir().unwrap();
    let (_, bank) = write_inputs(dir.path());
    let sales = dir.path().join("sin-monto.csv");
    fs::write(&sales, "Fecha Pago,Cliente\n10/01/2024 12:00:00,Ana\n").unwrap();

    let out = ledgermatch().arg("run").arg(&sales).arg(&bank).arg("--json").output().unwrap();
    assert_eq!(out.status.code(), Some(4));
    assert!(stdout(&out).is_empty(), "no partial results on schema error");
    assert!(stderr(&out).contains("missing column 'monto'"));
}

#[test]
fn wrong_skip_rows_hints_at_flag() {
    let dir = tempfile::tempdir().unwrap();
    let (sales, bank) = write_inputs(dir.path());

    let out = ledgermatch()
        .arg("run")
        .arg(&sales)
        .arg(&bank)
        .arg("--bank-skip-rows")
        .arg("0")
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(4));
    assert!(stderr(&out).contains("--bank-skip-rows"));
}

#[test]
fn missing_input_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let (sales, _) = write_inputs(dir.path());

    let out = ledgermatch()
        .arg("run")
        .arg(&sales)
        .arg(dir.path().join("nope.csv"))
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(5));
}

#[test]
fn config_file_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let (sales, bank) = write_inputs(dir.path());
    let config = dir.path().join("recon.toml");
    fs::write(&config, "excluded_clients = []\n").unwrap();

    let out = ledgermatch()
        .arg("run")
        .arg(&sales)
        .arg(&bank)
        .arg("--config")
        .arg(&config)
        .arg("--json")
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));
    let json: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(json["summary"]["matched"], 2);
}

#[test]
fn tolerance_override_is_validated() {
    let dir = tempfile::tempdir().unwrap();
    let (sales, bank) = write_inputs(dir.path());

    let out = ledgermatch()
        .arg("run")
        .arg(&sales)
        .arg(&bank)
        .arg("--tolerance-hours")
        .arg("4000000000")
        .arg("--json")
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(3), "stderr: {}", stderr(&out));
    assert!(stdout(&out).is_empty());
    assert!(stderr(&out).contains("tolerance_hours"));
}

#[test]
fn validate_rejects_bad_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("bad.toml");
    fs::write(&config, "cancellation_token = \"\"\n").unwrap();

    let out = ledgermatch().arg("validate").arg(&config).output().unwrap();
    assert_eq!(out.status.code(), Some(3));
    assert!(stderr(&out).contains("cancellation_token"));
}

#[test]
fn init_config_round_trips() {
    let out = ledgermatch().arg("init-config").output().unwrap();
    assert_eq!(out.status.code(), Some(0));
    let config = ReconConfig::from_toml(&stdout(&out)).unwrap();
    assert_eq!(config, ReconConfig::default());
}
