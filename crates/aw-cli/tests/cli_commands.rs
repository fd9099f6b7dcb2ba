//! Integration tests for the `aw` command-line binary.

#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn aw() -> Command {
    Command::cargo_bin("aw").unwrap()
}

// -- simulate --

#[test]
fn simulate_runs_to_an_outcome() {
    aw()
        .args(["simulate", "Octopus Leg", "--skill", "30", "-c", "Sil:3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Taco Octopus"))
        .stdout(predicate::str::contains("Outcome:"))
        .stdout(predicate::str::contains("Player hits for"))
        .stdout(predicate::str::contains("Sil"));
}

#[test]
fn simulate_is_reproducible_with_a_seed() {
    let first = aw()
        .args(["simulate", "Dango", "-c", "Chloe:4", "--seed", "7", "--json"])
        .output()
        .unwrap();
    let second = aw()
        .args(["simulate", "Dango", "-c", "Chloe:4", "--seed", "7", "--json"])
        .output()
        .unwrap();
    assert!(first.status.success());
    assert_eq!(
        strip_ids(&String::from_utf8_lossy(&first.stdout)),
        strip_ids(&String::from_utf8_lossy(&second.stdout))
    );
}

/// Session ids are random; everything else must match.
fn strip_ids(json: &str) -> String {
    json.lines()
        .filter(|line| {
            let line = line.trim_start();
            !(line.starts_with("\"id\": \"") && line.matches('-').count() == 4)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn simulate_flee() {
    aw()
        .args(["simulate", "Dango", "--flee"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fled"))
        .stdout(predicate::str::contains("You fled from the battle!"));
}

#[test]
fn simulate_verbose_prints_the_log() {
    aw()
        .args(["simulate", "Dango", "--skill", "20", "-c", "Sil:5", "--verbose"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Combat Log"))
        .stdout(predicate::str::contains("--- Round 1 ---"))
        .stdout(predicate::str::contains("appears!"));
}

#[test]
fn simulate_json_snapshot() {
    aw()
        .args(["simulate", "Octopus Leg", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"resource\": \"Octopus Leg\""))
        .stdout(predicate::str::contains("\"resource_consumed\": true"));
}

#[test]
fn simulate_help_describes_accessory_tiers() {
    aw()
        .args(["simulate", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("100 base HP"))
        .stdout(predicate::str::contains("+2").not());
}

#[test]
fn simulate_unknown_material() {
    aw()
        .args(["simulate", "Moon Rock"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no creature is mapped"));
}

#[test]
fn simulate_unknown_companion() {
    aw()
        .args(["simulate", "Dango", "-c", "Nobody"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown companion"));
}

#[test]
fn simulate_rejects_oversized_party() {
    aw()
        .args([
            "simulate", "Dango", "-c", "Sil", "-c", "Piena", "-c", "Chloe", "-c", "Abigail",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at most 3"));
}

#[test]
fn simulate_bad_companion_level() {
    aw()
        .args(["simulate", "Dango", "-c", "Sil:zero"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid companion level"));
}

// -- bestiary --

#[test]
fn bestiary_lists_creatures() {
    aw()
        .arg("bestiary")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ice Shark"))
        .stdout(predicate::str::contains("Star Fragment"))
        .stdout(predicate::str::contains("36 creature(s)"))
        .stdout(predicate::str::contains("Deep-Dark"));
}

#[test]
fn bestiary_filters_by_rank() {
    aw()
        .args(["bestiary", "--min-rank", "35"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Crane Turtle"))
        .stdout(predicate::str::contains("Ice Shark").not());
}

#[test]
fn bestiary_single_creature() {
    aw()
        .args(["bestiary", "--creature", "ice shark"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ice Shard"))
        .stdout(predicate::str::contains("1 creature(s)"));
}

#[test]
fn bestiary_unknown_creature() {
    aw()
        .args(["bestiary", "--creature", "Fire Shark"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no creature named"));
}

// -- companions --

#[test]
fn companions_at_level() {
    aw()
        .args(["companions", "--level", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Companions at level 3"))
        .stdout(predicate::str::contains("Bombard"))
        .stdout(predicate::str::contains("Nahatra"));
}

// -- tables --

#[test]
fn tables_round_trip_through_a_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tables.json");

    aw()
        .args(["tables", "--output", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));

    aw()
        .args(["bestiary", "--tables", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ice Shark"));

    aw()
        .args([
            "simulate",
            "Octopus Leg",
            "--tables",
            path.to_str().unwrap(),
        ])
        .assert()
        .success();
}

#[test]
fn malformed_tables_fail() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();

    aw()
        .args(["bestiary", "--tables", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to decode tables"));
}

#[test]
fn missing_subcommand_shows_help() {
    aw().assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
