//! Test helpers and utilities

use std::process::{Child, Command, Output, Stdio};

/// Runs the `launch_plan` binary with a clean environment.
pub struct Launch {
    command: Command,
}

#[allow(dead_code)]
impl Launch {
    /// Binary with only `PATH` inherited.
    pub fn new() -> Self {
        let mut command = Command::new(env!("CARGO_BIN_EXE_launch_plan"));
        command
            .env_clear()
            .env("PATH", std::env::var("PATH").unwrap_or_default());
        Self { command }
    }

    /// Set an environment variable for the run.
    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.command.env(key, value);
        self
    }

    /// Run to completion.
    pub fn run(mut self) -> Output {
        self.command.output().expect("failed to run launch_plan")
    }

    /// Start in the background with stdout piped.
    pub fn spawn(mut self) -> Child {
        self.command
            .stdout(Stdio::piped())
            .spawn()
            .expect("failed to start launch_plan")
    }

    /// Run with `DRY_RUN=1` and parse the JSON printed on stdout.
    pub fn dry_run(self) -> serde_json::Value {
        let output = self.env("DRY_RUN", "1").run();
        assert!(
            output.status.success(),
            "dry run failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("dry run prints JSON")
    }
}

/// Collect a JSON array of strings.
pub fn strings(value: &serde_json::Value) -> Vec<String> {
    value
        .as_array()
        .expect("expected array")
        .iter()
        .map(|v| v.as_str().expect("expected string").to_string())
        .collect()
}
