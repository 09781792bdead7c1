//! Spawned-binary tests for startup preconditions and the stdio protocol.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_refuses_to_run_outside_a_supervisor() {
    Command::cargo_bin("cn")
        .unwrap()
        .env_remove("SUPERVISOR_SERVER_URL")
        .args(["-t", "dummy-token"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("SUPERVISOR_SERVER_URL"));
}

#[test]
fn test_refuses_to_run_without_a_webhook_credential() {
    Command::cargo_bin("cn")
        .unwrap()
        .env("SUPERVISOR_SERVER_URL", "unix:///tmp/supervisor.sock")
        .env("HOME", "/nonexistent")
        .env_remove("XDG_CONFIG_HOME")
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("webhook credential"));
}

#[test]
fn test_acknowledges_tick_events_and_exits_cleanly_on_eof() {
    // A TICK frame never reaches the webhook, so no credential is used
    // and the whole exchange runs offline.
    Command::cargo_bin("cn")
        .unwrap()
        .env("SUPERVISOR_SERVER_URL", "unix:///tmp/supervisor.sock")
        .args(["-t", "dummy-token"])
        .write_stdin("ver:3.0 eventname:TICK_60 len:9\nwhen:1234")
        .assert()
        .success()
        .stdout("READY\nRESULT 2\nOKREADY\n");
}

#[test]
fn test_expected_exit_is_acknowledged_without_dispatch() {
    let payload = "processname:web groupname:apps pid:123 from_state:RUNNING expected:1";
    let input = format!("ver:3.0 eventname:PROCESS_STATE_EXITED len:{}\n{}", payload.len(), payload);

    Command::cargo_bin("cn")
        .unwrap()
        .env("SUPERVISOR_SERVER_URL", "unix:///tmp/supervisor.sock")
        .args(["-t", "dummy-token"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout("READY\nRESULT 2\nOKREADY\n");
}

#[test]
fn test_truncated_payload_exits_nonzero() {
    Command::cargo_bin("cn")
        .unwrap()
        .env("SUPERVISOR_SERVER_URL", "unix:///tmp/supervisor.sock")
        .args(["-t", "dummy-token"])
        .write_stdin("ver:3.0 eventname:PROCESS_STATE_EXITED len:50\nshort")
        .assert()
        .failure()
        .stderr(predicate::str::contains("truncated"));
}
