//! Planner configuration.

use std::num::NonZeroUsize;
use std::time::Duration;

use tracing::warn;

use super::parse::{env_lenient, env_opt, parse_duration, EnvSource};
use crate::planner::CapPolicy;

/// Operator inputs to the worker-count planner.
///
/// Values are kept raw; range checks happen in [`crate::planner::compute_plan`]
/// so that every reading, however odd, still maps to a valid plan.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlannerConfig {
    /// Port override from `PORT`.
    pub port_override: Option<i64>,
    /// Explicit worker count from `WEB_CONCURRENCY`.
    pub worker_override: Option<i64>,
    /// Cap profile applied to the computed worker count.
    pub cap: CapPolicy,
    /// Request timeout override from `REQUEST_TIMEOUT`.
    pub request_timeout: Option<Duration>,
}

impl PlannerConfig {
    /// Load configuration from environment variables.
    ///
    /// Never fails: bad values are logged and dropped.
    pub fn from_env(env: &impl EnvSource) -> Self {
        Self {
            port_override: env_lenient(env, "PORT"),
            worker_override: env_lenient(env, "WEB_CONCURRENCY"),
            cap: Self::parse_cap(env),
            request_timeout: Self::parse_request_timeout(env),
        }
    }

    /// Set the port override.
    pub fn with_port(mut self, port: i64) -> Self {
        self.port_override = Some(port);
        self
    }

    /// Set an explicit worker count.
    pub fn with_workers(mut self, workers: i64) -> Self {
        self.worker_override = Some(workers);
        self
    }

    /// Set the cap policy.
    pub fn with_cap(mut self, cap: CapPolicy) -> Self {
        self.cap = cap;
        self
    }

    /// Set the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// `WORKER_CAP` wins over `WORKER_PROFILE`.
    fn parse_cap(env: &impl EnvSource) -> CapPolicy {
        if let Some(threshold) = env_lenient::<usize>(env, "WORKER_CAP").and_then(positive) {
            let fallback = env_lenient::<usize>(env, "WORKER_CAP_FALLBACK")
                .and_then(positive)
                .unwrap_or(threshold);
            return CapPolicy::capped(threshold, fallback);
        }

        match env_opt(env, "WORKER_PROFILE") {
            None => CapPolicy::default(),
            Some(name) => CapPolicy::from_profile(&name).unwrap_or_else(|| {
                warn!(profile = %name, "unknown worker profile, running uncapped");
                CapPolicy::default()
            }),
        }
    }

    fn parse_request_timeout(env: &impl EnvSource) -> Option<Duration> {
        let raw = env_opt(env, "REQUEST_TIMEOUT")?;
        match parse_duration(&raw) {
            Ok(timeout) => timeout,
            Err(e) => {
                warn!(value = %raw, error = %e, "ignoring REQUEST_TIMEOUT");
                None
            }
        }
    }
}

fn positive(value: usize) -> Option<NonZeroUsize> {
    let nz = NonZeroUsize::new(value);
    if nz.is_none() {
        warn!("ignoring zero worker cap setting");
    }
    nz
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn nz(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_defaults() {
        let env: HashMap<&str, &str> = HashMap::new();
        assert_eq!(PlannerConfig::from_env(&env), PlannerConfig::default());
    }

    #[test]
    fn test_overrides() {
        let env = HashMap::from([
            ("PORT", "9090"),
            ("WEB_CONCURRENCY", "6"),
            ("REQUEST_TIMEOUT", "2m"),
        ]);
        let config = PlannerConfig::from_env(&env);
        assert_eq!(config.port_override, Some(9090));
        assert_eq!(config.worker_override, Some(6));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(120)));
        assert_eq!(config.cap, CapPolicy::Uncapped);
    }

    #[test]
    fn test_garbage_values_fall_back() {
        let env = HashMap::from([
            ("PORT", "http"),
            ("WEB_CONCURRENCY", "many"),
            ("REQUEST_TIMEOUT", "soon"),
            ("WORKER_PROFILE", "gigantic"),
        ]);
        assert_eq!(PlannerConfig::from_env(&env), PlannerConfig::default());
    }

    #[test]
    fn test_negative_port_kept_raw() {
        let env = HashMap::from([("PORT", "-1")]);
        assert_eq!(PlannerConfig::from_env(&env).port_override, Some(-1));
    }

    #[test]
    fn test_constrained_profile() {
        let env = HashMap::from([("WORKER_PROFILE", "constrained")]);
        assert_eq!(
            PlannerConfig::from_env(&env).cap,
            CapPolicy::Capped {
                threshold: nz(4),
                fallback: nz(3),
            }
        );
    }

    #[test]
    fn test_explicit_cap_beats_profile() {
        let env = HashMap::from([
            ("WORKER_PROFILE", "constrained"),
            ("WORKER_CAP", "8"),
            ("WORKER_CAP_FALLBACK", "6"),
        ]);
        assert_eq!(
            PlannerConfig::from_env(&env).cap,
            CapPolicy::Capped {
                threshold: nz(8),
                fallback: nz(6),
            }
        );
    }

    #[test]
    fn test_cap_fallback_defaults_to_threshold() {
        let env = HashMap::from([("WORKER_CAP", "5"), ("WORKER_CAP_FALLBACK", "0")]);
        assert_eq!(
            PlannerConfig::from_env(&env).cap,
            CapPolicy::Capped {
                threshold: nz(5),
                fallback: nz(5),
            }
        );
    }

    #[test]
    fn test_cap_fallback_above_threshold_is_clamped() {
        let env = HashMap::from([("WORKER_CAP", "4"), ("WORKER_CAP_FALLBACK", "64")]);
        let config = PlannerConfig::from_env(&env);
        assert_eq!(
            config.cap,
            CapPolicy::Capped {
                threshold: nz(4),
                fallback: nz(4),
            }
        );

        // 2 cores → raw 5 trips the cap, and the fallback must not exceed it
        let plan = crate::planner::compute_plan(Some(2), &config);
        assert!(plan.worker_count() <= 4);
    }

    #[test]
    fn test_zero_cap_ignored() {
        let env = HashMap::from([("WORKER_CAP", "0")]);
        assert_eq!(PlannerConfig::from_env(&env).cap, CapPolicy::Uncapped);
    }

    #[test]
    fn test_timeout_off_means_default() {
        let env = HashMap::from([("REQUEST_TIMEOUT", "off")]);
        assert_eq!(PlannerConfig::from_env(&env).request_timeout, None);
    }
}
