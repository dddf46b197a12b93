#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use tempfile::NamedTempFile;

#[allow(deprecated)]
fn run_cli(script: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.write_stdin(script.to_string()).assert()
}

#[test]
fn cli_reports_open_schedules() {
    run_cli("add Night_Owl Mon-Sun 5 pm - 2 am\nadd Cafe Mon-Fri 7 am - 3 pm\nopen 2024-03-16T01:30:00\nquit\n")
        .success()
        .stdout(str_contains("Created Night_Owl (7 entries)"))
        .stdout(str_contains("Open at 2024-03-16T01:30:00: Night_Owl"));
}

#[test]
fn cli_rejects_bad_hours_and_datetimes() {
    run_cli("add Broken Mon 9 am to 5 pm\nopen yesterday\nquit\n")
        .success()
        .stdout(str_contains("Error parsing schedule 'Mon 9 am to 5 pm'"))
        .stdout(str_contains("Invalid datetime format"));
}

#[test]
fn cli_parse_shows_entries_without_storing() {
    run_cli("parse Sat-Sun 10 am - 1 am\nlist\nquit\n")
        .success()
        .stdout(str_contains("Parsed 2 entries:"))
        .stdout(str_contains("Sat 10:00-01:00 (+1)"))
        .stdout(str_contains("No schedules stored."));
}

#[test]
fn cli_update_then_delete() {
    run_cli("add Cafe Mon 9 am - 5 pm\nupdate Cafe Tue 9 am - 5 pm\nopen 2024-03-18T10:00\ndelete Cafe\nshow Cafe\nquit\n")
        .success()
        .stdout(str_contains("Updated Cafe (1 entries)"))
        .stdout(str_contains("Nothing open at 2024-03-18T10:00."))
        .stdout(str_contains("Deleted schedule Cafe."))
        .stdout(str_contains("schedule 'Cafe' not found"));
}

#[test]
fn cli_save_and_load_json_round_trip() {
    let tmp = NamedTempFile::new().expect("create temp file");
    let path = tmp.path().to_string_lossy().to_string();
    let script = format!(
        "add Cafe Mon-Sun 9 am - 5 pm\nsave json {path}\ndelete Cafe\nload json {path}\nshow Cafe\nquit\n"
    );
    run_cli(&script)
        .success()
        .stdout(str_contains("Saved 1 schedules to"))
        .stdout(str_contains("Imported 1 schedules from"))
        .stdout(str_contains("Cafe (7 entries)"));
}
