use assert_cmd::Command;
use kestrel_report::ReportConfig;
use predicates::prelude::*;
use std::path::PathBuf;

#[allow(deprecated)]
fn get_kestrel_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("kestrel")
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Test that build_report normalizes the bundle and writes the workbook
#[test]
fn test_build_report_writes_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let config = ReportConfig::new(dir.path(), Some("t1".to_string()));

    let run = kestrel_cli::commands::report::build_report(&fixture("bundle.json"), config, false)
        .expect("Should build report from bundle");

    assert!(run.manifest.success);
    assert_eq!(run.manifest.url_count, 2);
    assert_eq!(
        run.manifest.sheets,
        vec!["Summary", "Core Web Vitals", "Network Analysis", "Opportunities"]
    );
    assert!(run.manifest.filename.starts_with("page_speed_analysis_t1_"));
    assert!(run.manifest.filename.ends_with(".xlsx"));
    assert!(dir.path().join(&run.manifest.filename).exists());

    assert_eq!(
        run.document.template("https://shop.example.com/about"),
        Some("content-page")
    );
    let home = run.document.page("https://shop.example.com/").unwrap();
    assert_eq!(home.strategies.len(), 2);
    assert!(run.document.network("https://shop.example.com/").is_some());
    assert!(run.document.network("https://shop.example.com/about").is_none());
}

#[test]
fn test_report_json_prints_manifest() {
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = Command::new(get_kestrel_bin());
    cmd.arg("--format")
        .arg("json")
        .arg("report")
        .arg(fixture("bundle.json"))
        .arg("--output-dir")
        .arg(dir.path());

    let output = cmd.assert().success().get_output().stdout.clone();
    let manifest: serde_json::Value = serde_json::from_slice(&output).unwrap();

    assert_eq!(manifest["success"], true);
    assert_eq!(manifest["url_count"], 2);
    assert_eq!(manifest["sheets"].as_array().unwrap().len(), 4);
    let filename = manifest["filename"].as_str().unwrap();
    assert!(dir.path().join(filename).exists());
}

#[test]
fn test_report_reads_output_settings_from_env() {
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = Command::new(get_kestrel_bin());
    cmd.env("KESTREL_OUTPUT_DIR", dir.path())
        .env("KESTREL_JOB_ID", "nightly")
        .arg("report")
        .arg(fixture("bundle.json"))
        .arg("--format")
        .arg("json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("page_speed_analysis_nightly_"));

    let written: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(written.len(), 1);
}

#[test]
fn test_report_table_lists_scores() {
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = Command::new(get_kestrel_bin());
    cmd.arg("report")
        .arg(fixture("bundle.json"))
        .arg("--output-dir")
        .arg(dir.path())
        .arg("--format")
        .arg("table");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("URL,Template,Mobile Score,Desktop Score"))
        .stdout(predicate::str::contains("https://shop.example.com/,homepage,47,78"))
        .stdout(predicate::str::contains("https://shop.example.com/about,content-page,91,99"));
}

#[test]
fn test_report_pretty_output() {
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = Command::new(get_kestrel_bin());
    cmd.arg("report")
        .arg(fixture("bundle.json"))
        .arg("--output-dir")
        .arg(dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Page Speed Report"))
        .stdout(predicate::str::contains("Network Analysis"))
        .stdout(predicate::str::contains("[homepage]"));
}

#[test]
fn test_report_without_page_data_fails() {
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = Command::new(get_kestrel_bin());
    cmd.arg("--format")
        .arg("json")
        .arg("report")
        .arg(fixture("bundle_no_data.json"))
        .arg("--output-dir")
        .arg(dir.path());

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("\"success\": false"))
        .stdout(predicate::str::contains("No analyzable page data"));

    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_report_missing_bundle_fails() {
    let mut cmd = Command::new(get_kestrel_bin());
    cmd.arg("report").arg(fixture("does-not-exist.json"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read input file"));
}
