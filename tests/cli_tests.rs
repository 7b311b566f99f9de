//! End-to-end CLI tests running the built binary against a temporary
//! database.

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn bankroll(dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_bankroll"));
    cmd.arg("--db")
        .arg(dir.path().join("pool.db"))
        .arg("--config")
        .arg(dir.path().join("config.toml"))
        .env_remove("BANKROLL_DB")
        .env_remove("RUST_LOG");
    cmd
}

fn add_person(dir: &TempDir, name: &str) {
    bankroll(dir)
        .args(["people", "add", name])
        .assert()
        .success();
}

#[test]
fn people_add_and_list() {
    let dir = TempDir::new().unwrap();
    add_person(&dir, "Ryan");
    add_person(&dir, "Friend");

    bankroll(&dir)
        .args(["people", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ryan").and(predicate::str::contains("Friend")));
}

#[test]
fn db_init_seeds_configured_people() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");
    std::fs::write(&config_path, "[seed]\npeople = [\"Ryan\", \"Friend\"]\n").unwrap();

    bankroll(&dir)
        .args(["db", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("People seeded"));

    bankroll(&dir)
        .args(["people", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ryan"));
}

#[test]
fn bet_lifecycle_over_the_cli() {
    let dir = TempDir::new().unwrap();
    add_person(&dir, "Ryan");
    add_person(&dir, "Friend");

    bankroll(&dir)
        .args([
            "bet",
            "new",
            "--leg",
            "Lakers vs Celtics|Lakers -2.5|+150",
            "--leg",
            "Jets vs Bills|Under 44.5|-200",
            "--stake",
            "Ryan=60",
            "--stake",
            "Friend=40",
        ])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Placed bet #1")
                .and(predicate::str::contains("$100.00"))
                .and(predicate::str::contains("$375.00")),
        );

    bankroll(&dir)
        .args(["bet", "settle", "1", "--leg", "1=won", "--leg", "2=won"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("settled: WON")
                .and(predicate::str::contains("$375.00"))
                .and(predicate::str::contains("$165.00"))
                .and(predicate::str::contains("$110.00")),
        );

    // Settling again must fail and say why.
    bankroll(&dir)
        .args(["bet", "settle", "1", "--leg", "1=won"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already settled"));
}

#[test]
fn bet_preview_works_without_a_database() {
    let dir = TempDir::new().unwrap();
    // Point --db at a directory that does not exist; preview must not touch it.
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_bankroll"));
    cmd.arg("--db")
        .arg(dir.path().join("missing").join("nested").join("pool.db"))
        .arg("--config")
        .arg(dir.path().join("config.toml"))
        .args([
            "bet",
            "preview",
            "--leg",
            "Lakers vs Celtics|Lakers -2.5|+150",
            "--leg",
            "Jets vs Bills|Under 44.5|-200",
            "--stake",
            "Ryan=100",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("$375.00"));
    assert!(!dir.path().join("missing").exists());
}

#[test]
fn dashboard_shows_ownership_and_exposure() {
    let dir = TempDir::new().unwrap();
    add_person(&dir, "Ryan");

    bankroll(&dir)
        .args([
            "tx", "add", "--person", "Ryan", "--kind", "deposit", "--amount", "100",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("deposit").and(predicate::str::contains("$100.00")));

    bankroll(&dir)
        .args([
            "bet",
            "new",
            "--leg",
            "A vs B|A wins|-110",
            "--stake",
            "Ryan=10",
        ])
        .assert()
        .success();

    bankroll(&dir)
        .args(["dashboard"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Ownership")
                .and(predicate::str::contains("Ryan"))
                .and(predicate::str::contains("$90.00"))
                .and(predicate::str::contains("$10.00")),
        );
}

#[test]
fn json_output_is_machine_readable() {
    let dir = TempDir::new().unwrap();
    add_person(&dir, "Ryan");

    let output = bankroll(&dir)
        .args(["people", "list", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let line = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(line.trim()).unwrap();
    assert_eq!(parsed["command"], "people.list");
    assert_eq!(parsed["people"][0]["name"], "Ryan");
}

#[test]
fn history_export_writes_csv() {
    let dir = TempDir::new().unwrap();
    add_person(&dir, "Ryan");
    bankroll(&dir)
        .args([
            "bet",
            "new",
            "--leg",
            "A vs B|A wins|+100",
            "--stake",
            "Ryan=25",
        ])
        .assert()
        .success();

    let csv_path: PathBuf = dir.path().join("bets.csv");
    bankroll(&dir)
        .args(["history", "export", "-o"])
        .arg(&csv_path)
        .assert()
        .success();

    let csv = std::fs::read_to_string(&csv_path).unwrap();
    assert!(csv.starts_with("id,participants,stake,status,placed_at,settled_at\n"));
    assert!(csv.contains("Ryan ($25.00)"));
    assert!(csv.contains("OPEN"));
}

#[test]
fn unknown_person_fails_with_nonzero_exit() {
    let dir = TempDir::new().unwrap();
    bankroll(&dir)
        .args([
            "tx", "add", "--person", "Nobody", "--kind", "deposit", "--amount", "10",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nobody"));
}

#[test]
fn db_normalize_reports_clean_database() {
    let dir = TempDir::new().unwrap();
    bankroll(&dir)
        .args(["db", "normalize"])
        .assert()
        .success()
        .stdout(predicate::str::contains("canonical"));
}
