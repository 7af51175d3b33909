//! Integration tests for the `fb` CLI commands.
#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const LAB: &str = r#"% A short walk out of the lab.
factor loc : (COSI, Hallway, ITL)
factor door : (shut, open)

transition leave : (loc = COSI, choice : "Step out into the hallway",
                    loc -> Hallway, "You leave the lab.")
transition arrive : (loc = Hallway, choice : "Walk to the ITL",
                     loc -> ITL, "You reach the ITL.")
transition creak : (loc = Hallway & door = shut, spontaneous 1,
                    door -> open, "A door creaks open.")

description : (loc = ITL, "Rows of humming machines.")
"#;

/// Write `source` to a story file in a fresh temp directory.
fn story(source: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("story.fab");
    fs::write(&path, source).unwrap();
    (dir, path)
}

fn fb() -> Command {
    Command::cargo_bin("fb").unwrap()
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

#[test]
fn check_passes_valid_story() {
    let (_dir, path) = story(LAB);
    fb().arg("check")
        .arg(&path)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("All checks passed")
                .and(predicate::str::contains("2 factors, 3 transitions, 1 description blocks")),
        );
}

#[test]
fn check_verbose_lists_factors() {
    let (_dir, path) = story(LAB);
    fb().args(["check", "--verbose"])
        .arg(&path)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Hallway")
                .and(predicate::str::contains("creak"))
                .and(predicate::str::contains("spontaneous 1")),
        );
}

#[test]
fn check_reports_warnings_but_succeeds() {
    let (_dir, path) = story("factor sun : (day, night)\ntransition : (sun = dusk, spontaneous 1, sun -> night)");
    fb().arg("check")
        .arg(&path)
        .assert()
        .success()
        .stderr(
            predicate::str::contains("can never hold").and(predicate::str::contains("1 warning")),
        );
}

#[test]
fn check_fails_on_syntax_error() {
    let (_dir, path) = story("factor sun : day, night)");
    fb().arg("check")
        .arg(&path)
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("expected `(`, found `day`")
                .and(predicate::str::contains("error: compilation failed")),
        );
}

#[test]
fn check_fails_on_undefined_factor() {
    let (_dir, path) = story("factor weather : (sunny)\ntransition : (weathr = sunny, spontaneous 1, weather -> sunny)");
    fb().arg("check")
        .arg(&path)
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("undefined factor `weathr`")
                .and(predicate::str::contains("did you mean `weather`?")),
        );
}

#[test]
fn check_missing_file() {
    fb().args(["check", "does-not-exist.fab"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read"));
}

// ---------------------------------------------------------------------------
// play
// ---------------------------------------------------------------------------

#[test]
fn play_walks_through_the_story() {
    let (_dir, path) = story(LAB);
    fb().arg("play")
        .arg(&path)
        .write_stdin("2\n2\n0\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("2. Step out into the hallway")
                .and(predicate::str::contains("You leave the lab.\nA door creaks open.\n"))
                .and(predicate::str::contains("You reach the ITL.")),
        );
}

#[test]
fn play_exits_at_end_of_input() {
    let (_dir, path) = story(LAB);
    fb().args(["play", "--seed", "7", "--shuffle"])
        .arg(&path)
        .write_stdin("1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Seed: 7"));
}

#[test]
fn play_undo_and_redo() {
    let (_dir, path) = story(LAB);
    fb().arg("play")
        .arg(&path)
        .write_stdin("u\n2\nu\nu\nr\n0\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to undo.").count(1));
}

#[test]
fn play_rejects_broken_story() {
    let (_dir, path) = story("factor : (a)");
    fb().arg("play").arg(&path).assert().failure();
}

// ---------------------------------------------------------------------------
// export
// ---------------------------------------------------------------------------

#[test]
fn export_json_to_stdout() {
    let (_dir, path) = story(LAB);
    fb().arg("export")
        .arg(&path)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"factors\"")
                .and(predicate::str::contains("\"condition\": \"loc = Hallway & door = shut\""))
                .and(predicate::str::contains("\"probability_per_turn\": 1.0")),
        );
}

#[test]
fn export_json_to_file() {
    let (dir, path) = story(LAB);
    let out = dir.path().join("story.json");
    fb().arg("export")
        .arg(&path)
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported to"));

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["factors"].as_array().unwrap().len(), 2);
    assert_eq!(json["transitions"][1]["name"], "arrive");
    assert_eq!(json["descriptions"][0]["text"], "Rows of humming machines.");
}
