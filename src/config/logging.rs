//! Logging configuration.

use super::parse::{env_opt, env_or, EnvSource};

/// Filter used when neither `LOG_LEVEL` nor `RUST_LOG` is usable.
pub const DEFAULT_LOG_FILTER: &str = "launch_plan=info";

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines (tracing-subscriber default).
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Logging configuration loaded from environment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log level filter (from LOG_LEVEL or RUST_LOG).
    pub filter: String,
    /// Output format (from LOG_FORMAT).
    pub format: LogFormat,
    /// Service name for structured logging.
    pub service_name: String,
}

impl LoggingConfig {
    /// Load configuration from environment variables.
    ///
    /// Priority: LOG_LEVEL > RUST_LOG > default
    ///
    /// LOG_LEVEL accepts simple values: trace, debug, info, warn, error
    /// RUST_LOG accepts full tracing filter syntax: launch_plan=debug,tokio=warn
    pub fn from_env(env: &impl EnvSource) -> Self {
        let format = match env_opt(env, "LOG_FORMAT").map(|s| s.to_lowercase()) {
            Some(ref f) if f == "json" => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Self {
            filter: Self::resolve_log_filter(env),
            format,
            service_name: env_or(env, "SERVICE_NAME", "launch_plan"),
        }
    }

    fn resolve_log_filter(env: &impl EnvSource) -> String {
        // 1. LOG_LEVEL (simple: debug, info, warn, error)
        if let Some(level) = env_opt(env, "LOG_LEVEL") {
            let level = level.to_lowercase();
            match level.as_str() {
                "trace" | "debug" | "info" | "warn" | "error" => {
                    return format!("launch_plan={}", level);
                }
                _ => {
                    // Logging is not up yet
                    eprintln!(
                        "Warning: Invalid LOG_LEVEL '{}', expected: trace, debug, info, warn, error",
                        level
                    );
                }
            }
        }

        // 2. RUST_LOG (full tracing filter syntax)
        if let Some(filter) = env_opt(env, "RUST_LOG") {
            return filter;
        }

        DEFAULT_LOG_FILTER.to_string()
    }
}
