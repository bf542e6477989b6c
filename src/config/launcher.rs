//! Launcher configuration.

use super::parse::{env_bool, env_opt, env_or, split_args, EnvSource};
use super::ConfigError;
use crate::launcher::{planned_flag, LaunchMode};

/// Default worker-pool launcher program.
pub const DEFAULT_LAUNCHER: &str = "gunicorn";

/// Default application entrypoint handed to the launcher.
pub const DEFAULT_APP_MODULE: &str = "main:app";

/// How and what to launch once the plan is computed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LauncherConfig {
    /// Launcher program, looked up on `PATH`.
    pub program: String,
    /// Application entrypoint (e.g. `main:app`).
    pub app_module: String,
    /// Optional `--worker-class` value.
    pub worker_class: Option<String>,
    /// Extra arguments appended after the planned flags.
    pub extra_args: Vec<String>,
    /// Replace this process or supervise a child.
    pub mode: LaunchMode,
    /// Print the plan instead of launching.
    pub dry_run: bool,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_LAUNCHER.to_string(),
            app_module: DEFAULT_APP_MODULE.to_string(),
            worker_class: None,
            extra_args: Vec::new(),
            mode: LaunchMode::default(),
            dry_run: false,
        }
    }
}

impl LauncherConfig {
    /// Load configuration from environment variables.
    pub fn from_env(env: &impl EnvSource) -> Result<Self, ConfigError> {
        Ok(Self {
            program: Self::required(env, "LAUNCHER", DEFAULT_LAUNCHER)?,
            app_module: Self::required(env, "APP_MODULE", DEFAULT_APP_MODULE)?,
            worker_class: env_opt(env, "WORKER_CLASS"),
            extra_args: Self::parse_extra_args(env)?,
            mode: Self::parse_mode(env)?,
            dry_run: env_bool(env, "DRY_RUN", false),
        })
    }

    /// Unset means default; set but blank is a mistake worth stopping for.
    fn required(env: &impl EnvSource, key: &str, default: &str) -> Result<String, ConfigError> {
        let value = env_or(env, key, default).trim().to_string();
        if value.is_empty() {
            return Err(ConfigError::Missing { key: key.into() });
        }
        Ok(value)
    }

    /// The plan owns the worker count, bind address and timeout.
    fn parse_extra_args(env: &impl EnvSource) -> Result<Vec<String>, ConfigError> {
        let args = env_opt(env, "LAUNCHER_ARGS")
            .map(|s| split_args(&s))
            .unwrap_or_default();

        for arg in &args {
            if let Some(flag) = planned_flag(arg) {
                return Err(ConfigError::Invalid {
                    key: "LAUNCHER_ARGS".into(),
                    message: format!("'{}' would override {} from the launch plan", arg, flag),
                });
            }
        }
        Ok(args)
    }

    fn parse_mode(env: &impl EnvSource) -> Result<LaunchMode, ConfigError> {
        match env_opt(env, "LAUNCH_MODE") {
            None => Ok(LaunchMode::default()),
            Some(raw) => raw.parse().map_err(|message| ConfigError::Invalid {
                key: "LAUNCH_MODE".into(),
                message,
            }),
        }
    }
}
