//! Configuration module for launch_plan.
//!
//! This is the only place that reads process environment variables; the
//! planner and launcher receive plain values.
//!
//! # Example
//!
//! ```rust,ignore
//! use launch_plan::config::Config;
//!
//! let config = Config::from_env()?;
//! println!("Launcher: {}", config.launcher.program);
//! println!("Cap: {}", config.planner.cap);
//! ```

mod error;
mod launcher;
mod logging;
mod parse;
mod planner;

pub use error::ConfigError;
pub use launcher::{LauncherConfig, DEFAULT_APP_MODULE, DEFAULT_LAUNCHER};
pub use logging::{LogFormat, LoggingConfig, DEFAULT_LOG_FILTER};
pub use parse::{parse_duration, EnvSource, ProcessEnv};
pub use planner::PlannerConfig;

/// Complete application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Worker-count planner inputs.
    pub planner: PlannerConfig,
    /// Launcher program and mode.
    pub launcher: LauncherConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(&ProcessEnv)
    }

    /// Load configuration from any settings source.
    pub fn from_source(env: &impl EnvSource) -> Result<Self, ConfigError> {
        Ok(Self {
            planner: PlannerConfig::from_env(env),
            launcher: LauncherConfig::from_env(env)?,
            logging: LoggingConfig::from_env(env),
        })
    }

    /// Print configuration summary to log.
    pub fn log_summary(&self) {
        use tracing::info;

        info!("Configuration loaded:");
        info!("  Launcher: {} {}", self.launcher.program, self.launcher.app_module);
        info!("  Mode: {}", self.launcher.mode);
        info!("  Worker cap: {}", self.planner.cap);

        if let Some(port) = self.planner.port_override {
            info!("  Port override: {}", port);
        }

        if let Some(workers) = self.planner.worker_override {
            info!("  Worker override: {}", workers);
        }

        if let Some(timeout) = self.planner.request_timeout {
            info!("  Request timeout: {}s", timeout.as_secs());
        }

        if let Some(ref class) = self.launcher.worker_class {
            info!("  Worker class: {}", class);
        }

        if !self.launcher.extra_args.is_empty() {
            info!("  Extra args: {}", self.launcher.extra_args.join(" "));
        }

        if self.launcher.dry_run {
            info!("  Dry run: enabled");
        }
    }
}
