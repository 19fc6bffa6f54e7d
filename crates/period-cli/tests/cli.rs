use assert_cmd::Command;
use predicates::prelude::*;

fn period() -> Command {
    let mut cmd = Command::cargo_bin("period").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn json_stdout(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

// ── resolve ─────────────────────────────────────────────────────────────

#[test]
fn test_resolve_week_preset() {
    let json = json_stdout(period().args([
        "resolve",
        "--view-mode",
        "week",
        "--now",
        "2024-06-15T10:00:00-03:00",
    ]));
    assert_eq!(json["timezone"], "America/Sao_Paulo");
    assert_eq!(json["view_mode"], "week");
    assert_eq!(json["source"], "preset");
    assert_eq!(json["current"]["from_local"], "2024-06-09T00:00:00-03:00");
    assert_eq!(json["current"]["to_local"], "2024-06-15T23:59:00-03:00");
    assert_eq!(json["previous"]["from_local"], "2024-06-03T00:00:00-03:00");
    assert_eq!(json["previous"]["to_local"], "2024-06-09T00:00:00-03:00");
}

#[test]
fn test_resolve_defaults_to_month() {
    let json = json_stdout(period().args(["resolve", "--now", "2024-06-15T13:00:00Z"]));
    assert_eq!(json["view_mode"], "month");
    assert_eq!(json["current"]["from_local"], "2024-06-01T00:00:00-03:00");
    assert_eq!(json["previous"]["to_local"], "2024-05-31T23:59:00-03:00");
}

#[test]
fn test_resolve_custom_range() {
    let json = json_stdout(period().args([
        "resolve",
        "--from",
        "2024-06-01",
        "--to",
        "2024-06-07",
        "--now",
        "2024-06-15T13:00:00Z",
    ]));
    assert_eq!(json["source"], "custom");
    assert_eq!(json["view_mode"], "custom");
    assert_eq!(json["current"]["from_utc"], "2024-06-01T03:00:00+00:00");
    assert_eq!(json["previous"]["to_utc"], "2024-06-01T02:59:59.999+00:00");
    assert_eq!(
        json["current"]["duration_seconds"],
        json["previous"]["duration_seconds"]
    );
}

#[test]
fn test_resolve_malformed_dates_fall_back() {
    let json = json_stdout(period().args([
        "resolve",
        "--view-mode",
        "today",
        "--from",
        "not-a-date",
        "--now",
        "2024-06-15T13:00:00Z",
    ]));
    assert_eq!(json["source"], "preset");
    assert_eq!(json["current"]["from_local"], "2024-06-15T00:00:00-03:00");
}

#[test]
fn test_resolve_with_timezone_and_policy_flags() {
    let json = json_stdout(period().args([
        "resolve",
        "-m",
        "today",
        "--timezone",
        "UTC",
        "--end-of-day",
        "last_instant",
        "--now",
        "2024-06-15T13:00:00Z",
    ]));
    assert_eq!(json["timezone"], "UTC");
    assert_eq!(json["current"]["to_utc"], "2024-06-15T23:59:59.999+00:00");
}

#[test]
fn test_resolve_invalid_now_fails() {
    period()
        .args(["resolve", "--now", "tomorrow"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid --now"));
}

#[test]
fn test_invalid_timezone_fails() {
    period()
        .args(["resolve", "--timezone", "Mars/Olympus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid timezone"));
}

// ── config file ─────────────────────────────────────────────────────────

#[test]
fn test_config_file_sets_defaults() {
    let path = std::env::temp_dir().join(format!("period-cli-config-{}.json", std::process::id()));
    std::fs::write(
        &path,
        r#"{"timezone": "Europe/Lisbon", "default_view_mode": "year"}"#,
    )
    .unwrap();

    let json = json_stdout(period().args([
        "resolve",
        "--config",
        path.to_str().unwrap(),
        "--now",
        "2024-06-15T13:00:00Z",
    ]));
    std::fs::remove_file(&path).ok();

    assert_eq!(json["timezone"], "Europe/Lisbon");
    assert_eq!(json["view_mode"], "year");
    assert_eq!(json["current"]["from_local"], "2024-01-01T00:00:00+00:00");
}

#[test]
fn test_missing_config_file_fails() {
    period()
        .args(["resolve", "--config", "/nonexistent/period.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config"));
}

// ── day ─────────────────────────────────────────────────────────────────

#[test]
fn test_day_bounds() {
    let json = json_stdout(period().args(["day", "2024-06-15"]));
    assert_eq!(json["from_utc"], "2024-06-15T03:00:00+00:00");
    assert_eq!(json["to_utc"], "2024-06-16T02:59:00+00:00");
}

#[test]
fn test_day_unparseable_fails() {
    period()
        .args(["day", "someday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no day boundary"));
}

// ── previous ────────────────────────────────────────────────────────────

#[test]
fn test_previous_period() {
    let json = json_stdout(period().args([
        "previous",
        "--from",
        "2024-06-10T03:00:00Z",
        "--to",
        "2024-06-16T02:59:00Z",
    ]));
    assert_eq!(json["from_utc"], "2024-06-04T03:00:59.999+00:00");
    assert_eq!(json["to_utc"], "2024-06-10T02:59:59.999+00:00");
}

#[test]
fn test_previous_rejects_reversed_range() {
    period()
        .args([
            "previous",
            "--from",
            "2024-06-16T00:00:00Z",
            "--to",
            "2024-06-10T00:00:00Z",
        ])
        .assert()
        .failure();
}

// ── compare ─────────────────────────────────────────────────────────────

#[test]
fn test_compare_delta() {
    let json = json_stdout(period().args(["compare", "--current", "150", "--previous", "100"]));
    assert_eq!(json["delta_percent"], 50.0);
}

#[test]
fn test_compare_zero_previous_has_no_delta() {
    let json = json_stdout(period().args(["compare", "--current", "150", "--previous", "0"]));
    assert!(json["delta_percent"].is_null());
}

#[test]
fn test_logs_go_to_stderr() {
    period()
        .args([
            "--log-level",
            "debug",
            "resolve",
            "--from",
            "bogus",
            "--now",
            "2024-06-15T13:00:00Z",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{"))
        .stderr(predicate::str::contains("resolved preset period"));
}
