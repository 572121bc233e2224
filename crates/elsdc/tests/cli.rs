use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;

fn testdata(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../testdata")
        .join(name)
}

fn elsdc() -> Command {
    Command::cargo_bin("elsdc").expect("binary")
}

#[test]
fn export_writes_ellipse_records_and_svg() {
    let dir = tempfile::tempdir().expect("tempdir");
    elsdc()
        .args(["export", "--results"])
        .arg(testdata("two_ellipses.json"))
        .arg("--out-dir")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"ellipse_lines\": 2"));

    let text = fs::read_to_string(dir.path().join("two_ellipses_out_ellipse.txt")).expect("ascii");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("5 "));
    assert!(lines[1].starts_with("9 "));

    let svg = fs::read_to_string(dir.path().join("two_ellipses.svg")).expect("svg");
    assert!(svg.contains("width=\"8px\" height=\"6px\""));
    assert!(!svg.contains("<polyline"));
    assert!(!dir.path().join("two_ellipses_out_polygon.txt").exists());
    assert!(!dir.path().join("two_ellipses_labels.png").exists());
}

#[test]
fn export_flags_enable_optional_outputs() {
    let dir = tempfile::tempdir().expect("tempdir");
    elsdc()
        .args(["export", "--polygons", "--labels-png", "--results"])
        .arg(testdata("mixed.json"))
        .arg("--out-dir")
        .arg(dir.path())
        .assert()
        .success();

    let polys = fs::read_to_string(dir.path().join("mixed_out_polygon.txt")).expect("polygons");
    assert_eq!(polys.lines().count(), 2);
    assert!(polys.lines().nth(1).expect("line").starts_with("3 2 "));
    let png = fs::read(dir.path().join("mixed_labels.png")).expect("png");
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    let svg = fs::read_to_string(dir.path().join("mixed.svg")).expect("svg");
    assert!(svg.contains("<circle class=\"circle\""));
}

#[test]
fn config_file_overrides_output_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let svg_path = dir.path().join("custom.svg");
    let config = dir.path().join("export.json");
    fs::write(
        &config,
        serde_json::json!({
            "svg_path": svg_path,
            "svg": { "ellipse_stroke": "black" }
        })
        .to_string(),
    )
    .expect("config");

    elsdc()
        .args(["export", "--results"])
        .arg(testdata("two_ellipses.json"))
        .arg("--config")
        .arg(&config)
        .arg("--out-dir")
        .arg(dir.path())
        .assert()
        .success();

    let svg = fs::read_to_string(&svg_path).expect("svg");
    assert!(svg.contains("stroke=\"black\""));
    assert!(!dir.path().join("two_ellipses.svg").exists());
}

#[test]
fn summary_prints_counts() {
    elsdc()
        .args(["summary", "--results"])
        .arg(testdata("mixed.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"polygons\": 2"))
        .stdout(predicate::str::contains("\"full_arcs\": 1"))
        .stdout(predicate::str::contains("\"labelled_pixels\": 4"));
}

#[test]
fn missing_results_file_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    elsdc()
        .args(["export", "--results"])
        .arg(dir.path().join("nope.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load results"));
}

#[test]
fn inconsistent_results_are_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bad.json");
    let mut json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(testdata("two_ellipses.json")).expect("read"))
            .expect("json");
    json["primitives"]["ellipse_labels"][1] = 5.into();
    fs::write(&path, json.to_string()).expect("write");

    elsdc()
        .args(["summary", "--results"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("used by more than one primitive"));
}
