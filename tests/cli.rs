use assert_cmd::{cargo_bin_cmd, Command};
use predicates::prelude::*;
use tempfile::TempDir;

/// `fuelog` with HOME pointed at a scratch directory so settings, database
/// and log never touch the real user profile.
fn fuelog(home: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("fuelog");
    cmd.env("HOME", home.path())
        .env_remove("FUELOG_REST_KEY")
        .env_remove("FUELOG_LOG");
    cmd
}

fn init(home: &TempDir) {
    let data_dir = home.path().join("data");
    fuelog(home)
        .args(["init", "--data-dir", data_dir.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("sqlite"));
}

fn add(home: &TempDir, km: &str, date: &str) {
    fuelog(home)
        .args(["add", "--km", km, "--liters", "40", "--price", "1.5", "--date", date])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved"));
}

#[test]
fn test_init_creates_database() {
    let home = TempDir::new().unwrap();
    init(&home);
    assert!(home.path().join("data").join("fuelog.db").exists());
    assert!(home.path().join(".config").join("fuelog").join("settings.json").exists());
}

#[test]
fn test_empty_history() {
    let home = TempDir::new().unwrap();
    init(&home);
    fuelog(&home)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No fill-ups yet"));
}

#[test]
fn test_add_normalizes_values() {
    let home = TempDir::new().unwrap();
    init(&home);
    fuelog(&home)
        .args([
            "add", "--km", "12345", "--liters", "40.1234", "--price", "1.5555", "--date",
            "2024-03-01",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("40.123 l at 1.556"));
    fuelog(&home)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("12345"))
        .stdout(predicate::str::contains("40.123"))
        .stdout(predicate::str::contains("2024-03-01"));
}

#[test]
fn test_add_rejects_zero_liters() {
    let home = TempDir::new().unwrap();
    init(&home);
    fuelog(&home)
        .args(["add", "--km", "100", "--liters", "0", "--price", "1.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Liters: must be a positive number"));
    fuelog(&home)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No fill-ups yet"));
}

#[test]
fn test_only_latest_five_are_editable() {
    let home = TempDir::new().unwrap();
    init(&home);
    for i in 1..=6 {
        add(&home, &format!("{}", i * 500), &format!("2024-01-0{i}"));
    }
    fuelog(&home)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("edit/delete").count(5))
        .stdout(predicate::str::contains("read-only").count(1));

    // id 1 is the oldest of six rows
    fuelog(&home)
        .args(["edit", "1", "--liters", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("read-only"));
    fuelog(&home)
        .args(["delete", "1", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("read-only"));
}

#[test]
fn test_edit_and_delete() {
    let home = TempDir::new().unwrap();
    init(&home);
    add(&home, "1000", "2024-01-01");
    add(&home, "1500", "2024-01-08");

    fuelog(&home)
        .args(["edit", "2", "--price", "1.9999"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated"));
    fuelog(&home)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("2.000"));

    fuelog(&home)
        .args(["edit", "2", "--liters=-3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Liters: must be a positive number"));

    fuelog(&home)
        .args(["delete", "2", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted"));
    fuelog(&home)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("1500").not())
        .stdout(predicate::str::contains("1000"));
}

#[test]
fn test_edit_requires_a_change() {
    let home = TempDir::new().unwrap();
    init(&home);
    add(&home, "1000", "2024-01-01");
    fuelog(&home)
        .args(["edit", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nothing to change"));
}

#[test]
fn test_edit_keeps_zero_km() {
    let home = TempDir::new().unwrap();
    init(&home);
    add(&home, "0", "2024-01-01");
    fuelog(&home)
        .args(["edit", "1", "--liters", "30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated"));
    fuelog(&home)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("30.000"));
}

#[test]
fn test_history_limit_out_of_range_is_rejected() {
    let home = TempDir::new().unwrap();
    init(&home);
    fuelog(&home)
        .args(["history", "--limit", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--limit"));
    fuelog(&home)
        .args(["history", "--limit", "51"])
        .assert()
        .failure();
    fuelog(&home)
        .args(["history", "--limit", "50"])
        .assert()
        .success();
}
