//! Planner scenarios through the public API

use std::collections::HashMap;

use launch_plan::config::{Config, LauncherConfig, PlannerConfig};
use launch_plan::{compute_plan, format_launch_command, CapPolicy, LaunchCommand};

#[test]
fn test_single_core_no_overrides() {
    let plan = compute_plan(Some(1), &PlannerConfig::default());

    assert_eq!(plan.worker_count(), 3);
    assert_eq!(plan.bind_host().to_string(), "0.0.0.0");
    assert_eq!(plan.port(), 8000);
    assert_eq!(plan.request_timeout_secs(), 300);
}

#[test]
fn test_eight_cores_with_cap_profile() {
    let env = HashMap::from([("WORKER_PROFILE", "constrained")]);
    let config = Config::from_source(&env).unwrap();

    assert_eq!(compute_plan(Some(8), &config.planner).worker_count(), 3);
    assert_eq!(compute_plan(Some(1), &config.planner).worker_count(), 3);
}

#[test]
fn test_eight_cores_uncapped() {
    assert_eq!(
        compute_plan(Some(8), &PlannerConfig::default()).worker_count(),
        17
    );
}

#[test]
fn test_detection_failure() {
    let config = PlannerConfig::default();
    assert_eq!(compute_plan(None, &config).worker_count(), 3);
    assert_eq!(compute_plan(Some(0), &config).worker_count(), 3);
    assert_eq!(compute_plan(Some(-1), &config).worker_count(), 3);
}

#[test]
fn test_port_from_environment() {
    let env = HashMap::from([("PORT", "9090")]);
    let config = Config::from_source(&env).unwrap();
    assert_eq!(compute_plan(Some(1), &config.planner).port(), 9090);

    let env = HashMap::from([("PORT", "0")]);
    let config = Config::from_source(&env).unwrap();
    assert_eq!(compute_plan(Some(1), &config.planner).port(), 8000);
}

#[test]
fn test_same_inputs_same_plan() {
    let config = PlannerConfig::default()
        .with_port(8443)
        .with_cap(CapPolicy::CONSTRAINED);
    let first = compute_plan(Some(3), &config);
    let second = compute_plan(Some(3), &config);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_rendered_command_carries_every_field() {
    let plan = compute_plan(Some(4), &PlannerConfig::default().with_port(9000));
    let flags = format_launch_command(&plan);

    assert_eq!(flags.len(), 6);
    assert_eq!(flags[0..2], ["--workers", "9"]);
    assert_eq!(flags[2..4], ["--bind", "0.0.0.0:9000"]);
    assert_eq!(flags[4..6], ["--timeout", "300"]);

    let command = LaunchCommand::for_plan(&LauncherConfig::default(), &plan);
    assert!(command.args.ends_with(&flags));
    assert_eq!(command.args[0], "main:app");
}
