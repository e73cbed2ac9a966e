// CLI surface tests, run against the compiled binary
// Rendering paths that need a real font degrade to a skip when none exists

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

fn cmd() -> Command {
    Command::cargo_bin("phrasecloud").unwrap()
}

fn write_csv(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn missing_input_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    cmd()
        .current_dir(dir.path())
        .arg("absent.csv")
        .assert()
        .failure()
        .stderr(predicate::str::contains("absent.csv"));
}

#[test]
fn missing_heading_column_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(dir.path(), "wrong.csv", "HEADING,COUNT\nFISHERIES,4\n");

    cmd()
        .current_dir(dir.path())
        .args(["wrong.csv", "--dump"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("NORMAL_HEADING"));
}

#[test]
fn malformed_count_points_at_the_row() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(
        dir.path(),
        "bad.csv",
        "NORMAL_HEADING,COUNT\nFISHERIES,4\nRICE,many\n",
    );

    cmd()
        .current_dir(dir.path())
        .args(["bad.csv", "--dump"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 3").and(predicate::str::contains("many")));
}

#[test]
fn header_only_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(dir.path(), "empty.csv", "NORMAL_HEADING,COUNT\n");

    cmd()
        .current_dir(dir.path())
        .arg("empty.csv")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no data rows"));
}

#[test]
fn dump_prints_title_cased_frequencies() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(
        dir.path(),
        "h.csv",
        "NORMAL_HEADING,COUNT\nAGRICULTURE,3\nFISHERIES,9\nAGRICULTURE,5\n",
    );

    cmd()
        .current_dir(dir.path())
        .args(["h.csv", "--dump"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"Agriculture\"")
                .and(predicate::str::contains("\"count\": 5"))
                .and(predicate::str::contains("\"Fisheries\"")),
        );
}

#[test]
fn dump_with_sum_policy_adds_counts() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(
        dir.path(),
        "h.csv",
        "NORMAL_HEADING,COUNT\nAGRICULTURE,3\nAGRICULTURE,5\n",
    );

    cmd()
        .current_dir(dir.path())
        .args(["h.csv", "--dump", "--on-duplicate", "sum"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\": 8"));
}

#[test]
fn dump_reads_count_column_by_name() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(
        dir.path(),
        "named.csv",
        "FREQ,NORMAL_HEADING,YEAR\n7,IRRIGATION,1998\n",
    );

    cmd()
        .current_dir(dir.path())
        .args(["named.csv", "--dump", "--count-column", "FREQ"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\": 7"));
}

#[test]
fn out_of_range_relative_scaling_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(dir.path(), "h.csv", "NORMAL_HEADING,COUNT\nTEA,4\n");

    cmd()
        .current_dir(dir.path())
        .args(["h.csv", "--relative-scaling", "1.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("relative_scaling"));
}

#[test]
fn zero_canvas_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(dir.path(), "h.csv", "NORMAL_HEADING,COUNT\nTEA,4\n");

    cmd()
        .current_dir(dir.path())
        .args(["h.csv", "--width", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Canvas dimensions"));
}

#[test]
fn unknown_background_color_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(dir.path(), "h.csv", "NORMAL_HEADING,COUNT\nTEA,4\n");

    cmd()
        .current_dir(dir.path())
        .args(["h.csv", "--background", "chartreuse"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("chartreuse"));
}

#[test]
fn malformed_palette_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(dir.path(), "h.csv", "NORMAL_HEADING,COUNT\nTEA,4\n");

    cmd()
        .current_dir(dir.path())
        .args(["h.csv", "--palette", "#12"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid color"));
}

#[test]
fn help_lists_the_layout_options() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("--max-words")
                .and(predicate::str::contains("--relative-scaling"))
                .and(predicate::str::contains("--seed"))
                .and(predicate::str::contains("--show")),
        );
}

#[test]
fn renders_png_when_a_system_font_exists() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(
        dir.path(),
        "h.csv",
        "NORMAL_HEADING,COUNT\nBUDDHISM,9\nTEA TRADE,4\nRICE,2\n",
    );

    let output = cmd()
        .current_dir(dir.path())
        .args([
            "h.csv", "-o", "cloud.png", "--width", "400", "--height", "300", "--seed", "7",
        ])
        .output()
        .unwrap();

    if !output.status.success() {
        // Machines without any probe-list font can't exercise rendering
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("font"), "unexpected failure: {}", stderr);
        return;
    }
    assert!(dir.path().join("cloud.png").exists());
}

#[test]
fn default_output_name_is_first_attempt_png() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(dir.path(), "h.csv", "NORMAL_HEADING,COUNT\nBUDDHISM,9\nTEA,4\n");

    let output = cmd()
        .current_dir(dir.path())
        .args(["h.csv", "--width", "300", "--height", "200", "--seed", "1"])
        .output()
        .unwrap();

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("font"), "unexpected failure: {}", stderr);
        return;
    }
    assert!(dir.path().join("first_attempt.png").exists());
}
