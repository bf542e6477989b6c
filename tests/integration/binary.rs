//! End-to-end runs of the launch_plan binary

use crate::helpers::{strings, Launch};

#[test]
fn test_dry_run_prints_plan_and_argv() {
    let out = Launch::new()
        .env("WEB_CONCURRENCY", "5")
        .env("PORT", "9090")
        .dry_run();

    assert_eq!(out["plan"]["worker_count"], 5);
    assert_eq!(out["plan"]["bind_host"], "0.0.0.0");
    assert_eq!(out["plan"]["port"], 9090);
    assert_eq!(out["plan"]["request_timeout_secs"], 300);

    assert_eq!(
        strings(&out["argv"]),
        vec![
            "gunicorn",
            "main:app",
            "--workers",
            "5",
            "--bind",
            "0.0.0.0:9090",
            "--timeout",
            "300"
        ]
    );
}

#[test]
fn test_dry_run_cap_profile() {
    let out = Launch::new()
        .env("WEB_CONCURRENCY", "8")
        .env("WORKER_PROFILE", "constrained")
        .dry_run();

    assert_eq!(out["plan"]["worker_count"], 3);
}

#[test]
fn test_dry_run_heuristic_is_odd_and_at_least_three() {
    let out = Launch::new().dry_run();
    let workers = out["plan"]["worker_count"].as_u64().unwrap();
    assert!(workers >= 3);
    assert_eq!(workers % 2, 1);
}

#[test]
fn test_garbage_planner_input_still_starts() {
    let out = Launch::new()
        .env("PORT", "eighty")
        .env("WORKER_CAP", "none")
        .env("REQUEST_TIMEOUT", "never")
        .dry_run();

    assert_eq!(out["plan"]["port"], 8000);
    assert_eq!(out["plan"]["request_timeout_secs"], 300);
}

#[test]
fn test_dry_run_stdout_is_clean_with_json_logs() {
    let out = Launch::new()
        .env("LOG_FORMAT", "json")
        .env("LOG_LEVEL", "debug")
        .dry_run();
    assert!(out["plan"].is_object());
}

#[test]
fn test_invalid_launch_mode_exits_2() {
    let output = Launch::new().env("LAUNCH_MODE", "fork").run();
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("LAUNCH_MODE"));
}

#[cfg(unix)]
#[test]
fn test_exec_propagates_launcher_exit_code() {
    // `false` ignores its arguments and exits 1
    let output = Launch::new().env("LAUNCHER", "false").run();
    assert_eq!(output.status.code(), Some(1));

    let output = Launch::new().env("LAUNCHER", "true").run();
    assert_eq!(output.status.code(), Some(0));
}

#[cfg(unix)]
#[test]
fn test_spawn_propagates_launcher_exit_code() {
    let output = Launch::new()
        .env("LAUNCHER", "false")
        .env("LAUNCH_MODE", "spawn")
        .run();
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_extra_args_cannot_raise_capped_workers() {
    let output = Launch::new()
        .env("WORKER_PROFILE", "constrained")
        .env("LAUNCHER_ARGS", "--workers 40")
        .env("DRY_RUN", "1")
        .run();
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("LAUNCHER_ARGS"));
}

/// Write an executable shell launcher that exits 42 on SIGTERM.
#[cfg(unix)]
fn trapping_launcher(dir: &std::path::Path, body: &str) -> String {
    use std::os::unix::fs::PermissionsExt;

    let script = dir.join("launcher.sh");
    std::fs::write(
        &script,
        format!("#!/bin/sh\ntrap 'exit 42' TERM\n{body}\nwhile :; do sleep 1 & wait $!; done\n"),
    )
    .unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    script.to_str().unwrap().to_string()
}

#[cfg(unix)]
#[test]
fn test_spawn_forwards_sigterm_to_launcher() {
    use std::io::{BufRead, BufReader};

    let dir = tempfile::TempDir::new().unwrap();
    let launcher = trapping_launcher(dir.path(), "echo ready");

    let mut child = Launch::new()
        .env("LAUNCHER", &launcher)
        .env("LAUNCH_MODE", "spawn")
        .spawn();

    // The launcher only prints once the supervisor has started it
    let mut line = String::new();
    BufReader::new(child.stdout.take().unwrap())
        .read_line(&mut line)
        .unwrap();
    assert_eq!(line.trim(), "ready");

    let rc = unsafe { libc::kill(child.id() as libc::pid_t, libc::SIGTERM) };
    assert_eq!(rc, 0);

    let status = child.wait().unwrap();
    assert_eq!(status.code(), Some(42));
}

#[cfg(unix)]
#[test]
fn test_spawn_forwards_sigterm_sent_as_launcher_starts() {
    let dir = tempfile::TempDir::new().unwrap();
    // Signals the supervisor before doing anything else
    let launcher = trapping_launcher(dir.path(), "kill -TERM $PPID");

    let output = Launch::new()
        .env("LAUNCHER", &launcher)
        .env("LAUNCH_MODE", "spawn")
        .run();
    assert_eq!(output.status.code(), Some(42));
}

#[test]
fn test_missing_launcher_exits_127() {
    let output = Launch::new()
        .env("LAUNCHER", "definitely-not-a-launcher-binary")
        .env("LAUNCH_MODE", "spawn")
        .run();
    assert_eq!(output.status.code(), Some(127));

    let output = Launch::new()
        .env("LAUNCHER", "definitely-not-a-launcher-binary")
        .run();
    assert_eq!(output.status.code(), Some(127));
}
