//! Worker-count planning.
//!
//! Turns a host core reading and operator settings into a [`LaunchPlan`].
//! Planning is total: a missing core reading, a zero or negative one, an
//! absurdly large one, or a bad port all resolve to a valid plan.
//!
//! # Example
//!
//! ```rust
//! use launch_plan::config::PlannerConfig;
//! use launch_plan::planner::{compute_plan, CapPolicy};
//!
//! let plan = compute_plan(Some(8), &PlannerConfig::default());
//! assert_eq!(plan.worker_count(), 17);
//!
//! let capped = PlannerConfig::default().with_cap(CapPolicy::CONSTRAINED);
//! assert_eq!(compute_plan(Some(8), &capped).worker_count(), 3);
//! ```

mod plan;
mod policy;

use std::num::{NonZeroU16, NonZeroU64, NonZeroUsize};

use tracing::debug;

use crate::config::PlannerConfig;

pub use plan::{LaunchPlan, DEFAULT_PORT, DEFAULT_REQUEST_TIMEOUT_SECS, WILDCARD_HOST};
pub use policy::CapPolicy;

/// Compute the launch plan.
///
/// `detected_cores` is the raw host reading; `None` means detection failed.
pub fn compute_plan(detected_cores: Option<i64>, config: &PlannerConfig) -> LaunchPlan {
    let cores = resolve_cores(detected_cores);

    let raw = match config.worker_override.and_then(positive_usize) {
        Some(workers) => {
            debug!(workers = workers.get(), "using explicit worker count");
            workers
        }
        None => heuristic_workers(cores),
    };

    let worker_count = config.cap.apply(raw);
    if worker_count != raw {
        debug!(
            raw = raw.get(),
            capped = worker_count.get(),
            policy = %config.cap,
            "worker count capped"
        );
    }

    let port = config
        .port_override
        .and_then(|p| u16::try_from(p).ok())
        .and_then(NonZeroU16::new)
        .unwrap_or(DEFAULT_PORT);

    let request_timeout_secs = config
        .request_timeout
        .and_then(|t| NonZeroU64::new(t.as_secs()))
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

    debug!(
        cores = cores.get(),
        workers = worker_count.get(),
        port = port.get(),
        timeout = request_timeout_secs.get(),
        "launch plan computed"
    );

    LaunchPlan::new(worker_count, port, request_timeout_secs)
}

/// Positive readings are used as is, anything else means one core.
fn resolve_cores(detected: Option<i64>) -> NonZeroUsize {
    match detected.and_then(positive_usize) {
        Some(cores) => cores,
        None => {
            debug!(?detected, "no usable core count, assuming 1");
            NonZeroUsize::MIN
        }
    }
}

const TWO: NonZeroUsize = match NonZeroUsize::new(2) {
    Some(n) => n,
    None => unreachable!(),
};

/// `2 * cores + 1`: one busy worker per core, one blocked on I/O, one spare.
fn heuristic_workers(cores: NonZeroUsize) -> NonZeroUsize {
    cores.saturating_mul(TWO).saturating_add(1)
}

fn positive_usize(value: i64) -> Option<NonZeroUsize> {
    if value <= 0 {
        return None;
    }
    // Readings beyond the address space saturate rather than wrap
    Some(
        usize::try_from(value)
            .ok()
            .and_then(NonZeroUsize::new)
            .unwrap_or(NonZeroUsize::MAX),
    )
}
