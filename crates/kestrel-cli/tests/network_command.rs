use assert_cmd::Command;
use kestrel_core::network::{Blocks, ResourceType};
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

/// Test that the capture events merge into one record per URL
#[test]
fn test_summarize_network_fixture() {
    let summary =
        kestrel_cli::commands::network::summarize_network(&fixture("network_capture.json"))
            .expect("Should summarize capture fixture");

    assert_eq!(summary.total_requests, 6);
    assert_eq!(summary.total_transfer_bytes, 863_232);

    let by_type_sum: u64 = summary.by_type.values().map(|t| t.bytes).sum();
    assert_eq!(by_type_sum, summary.total_transfer_bytes);

    assert_eq!(summary.totals(ResourceType::Script).bytes, 262_144);
    assert_eq!(summary.totals(ResourceType::Xhr).count, 1);
    assert_eq!(summary.totals(ResourceType::Media).count, 0);

    let largest = summary.largest().unwrap();
    assert_eq!(largest.url, "https://shop.example.com/img/hero.jpg");
    assert!(summary.largest_resources.iter().all(|r| r.size_bytes > 0));

    let blocking: Vec<_> = summary
        .blocking_resources
        .iter()
        .map(|b| (b.url.as_str(), b.blocks))
        .collect();
    assert_eq!(
        blocking,
        vec![
            ("https://shop.example.com/css/site.css", Blocks::Render),
            ("https://shop.example.com/js/vendor.js", Blocks::Parser),
        ]
    );

    let timing = summary.timing.as_ref().unwrap();
    assert_eq!(timing.load_event, 2875.3);
}

#[test]
fn test_network_table_output() {
    let mut cmd = Command::new(get_kestrel_bin());
    cmd.arg("network")
        .arg(fixture("network_capture.json"))
        .arg("--format")
        .arg("table");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Type,Count,Bytes"))
        .stdout(predicate::str::contains("image,1,524288"))
        .stdout(predicate::str::contains("total,6,863232"));
}

#[test]
fn test_network_pretty_shows_timing() {
    let mut cmd = Command::new(get_kestrel_bin());
    cmd.arg("network").arg(fixture("network_capture.json"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Navigation Timing"))
        .stdout(predicate::str::contains("Load Event"))
        .stdout(predicate::str::contains("hero.jpg"));
}

#[test]
fn test_network_invalid_json_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("capture.json");
    std::fs::write(&path, "{ \"events\": [ { \"event\": \"unknown_event\" } ] }").unwrap();

    let mut cmd = Command::new(get_kestrel_bin());
    cmd.arg("network").arg(&path);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse provider document"));
}
