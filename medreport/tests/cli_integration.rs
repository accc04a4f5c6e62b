//! Integration tests for the medreport CLI

use std::fs;
use std::process::Command;

fn run_medreport(args: &[&str]) -> (String, String, bool) {
    let mut cmd_args = vec!["run", "-p", "medreport", "--"];
    cmd_args.extend(args);

    let output = Command::new("cargo")
        .args(&cmd_args)
        .current_dir(env!("CARGO_MANIFEST_DIR").to_string() + "/..")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();

    (stdout, stderr, success)
}

const TABLE_JOB: &str = r#"{
  "format": "csv",
  "title": "Test Report",
  "filename": "test",
  "columns": [
    {"key": "generic_name", "header": "Generic Name"},
    {"key": "status", "header": "Status"}
  ],
  "tables": [
    {
      "id": "t1",
      "department": "medical",
      "classification": "Medicines",
      "data": [{"generic_name": "Paracetamol", "status": "low_stock"}],
      "stats": {"totalItems": 1, "lowStockItems": 1, "outOfStockItems": 0, "expiredItems": 0}
    }
  ]
}"#;

const LEGACY_JOB: &str = r#"{
  "format": "csv",
  "title": "Legacy Report",
  "filename": "legacy",
  "schema": "inventory",
  "data": [{"generic_name": "Amoxicillin", "status": "out_of_stock", "stock_quantity": 0}],
  "department": "medical",
  "classification": "Medicines"
}"#;

#[test]
fn test_cli_help() {
    let (stdout, _, success) = run_medreport(&["--help"]);

    assert!(success);
    assert!(stdout.contains("medreport"));
    assert!(stdout.contains("export"));
    assert!(stdout.contains("formats"));
}

#[test]
fn test_formats_listing() {
    let (stdout, _, success) = run_medreport(&["formats"]);

    assert!(success);
    for extension in ["xlsx", "pdf", "csv", "docx"] {
        assert!(stdout.contains(extension), "missing {extension}");
    }
}

#[test]
fn test_export_table_job_to_csv() {
    let dir = tempfile::tempdir().unwrap();
    let job_path = dir.path().join("job.json");
    fs::write(&job_path, TABLE_JOB).unwrap();

    let (stdout, stderr, success) = run_medreport(&[
        "export",
        job_path.to_str().unwrap(),
        "--out-dir",
        dir.path().to_str().unwrap(),
    ]);

    assert!(success, "stderr: {stderr}");
    assert!(stdout.contains("test.csv"));

    let content = fs::read_to_string(dir.path().join("test.csv")).unwrap();
    assert!(content.contains("Generic Name,Status"));
    assert!(content.contains("Paracetamol,Low Stock"));
}

#[test]
fn test_export_legacy_job_with_inventory_schema() {
    let dir = tempfile::tempdir().unwrap();
    let job_path = dir.path().join("job.json");
    fs::write(&job_path, LEGACY_JOB).unwrap();

    let (_, stderr, success) = run_medreport(&[
        "export",
        job_path.to_str().unwrap(),
        "--out-dir",
        dir.path().to_str().unwrap(),
    ]);

    assert!(success, "stderr: {stderr}");
    let content = fs::read_to_string(dir.path().join("legacy.csv")).unwrap();
    assert!(content.contains("Amoxicillin"));
    assert!(content.contains("Out Of Stock"));
}

#[test]
fn test_format_override_produces_spreadsheet() {
    let dir = tempfile::tempdir().unwrap();
    let job_path = dir.path().join("job.json");
    fs::write(&job_path, TABLE_JOB).unwrap();

    let (_, stderr, success) = run_medreport(&[
        "export",
        job_path.to_str().unwrap(),
        "--out-dir",
        dir.path().to_str().unwrap(),
        "--format",
        "xlsx",
    ]);

    assert!(success, "stderr: {stderr}");
    let bytes = fs::read(dir.path().join("test.xlsx")).unwrap();
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn test_unsupported_format_fails_without_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let job_path = dir.path().join("job.json");
    fs::write(&job_path, TABLE_JOB.replace("\"csv\"", "\"xml\"")).unwrap();

    let (_, stderr, success) = run_medreport(&[
        "export",
        job_path.to_str().unwrap(),
        "--out-dir",
        dir.path().to_str().unwrap(),
    ]);

    assert!(!success);
    assert!(stderr.contains("unsupported export format"));
    assert!(stderr.contains("xml"));
    // No file of any supported extension was produced
    let produced: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext != "json"))
        .collect();
    assert!(produced.is_empty());
}

#[test]
fn test_stamped_filename() {
    let dir = tempfile::tempdir().unwrap();
    let job_path = dir.path().join("job.json");
    fs::write(&job_path, TABLE_JOB).unwrap();

    let (stdout, stderr, success) = run_medreport(&[
        "export",
        job_path.to_str().unwrap(),
        "--out-dir",
        dir.path().to_str().unwrap(),
        "--stamp",
    ]);

    assert!(success, "stderr: {stderr}");
    assert!(stdout.contains("test_"));
    let stamped = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .find(|e| {
            let name = e.file_name().to_string_lossy().to_string();
            name.starts_with("test_") && name.ends_with(".csv")
        });
    assert!(stamped.is_some());
}
