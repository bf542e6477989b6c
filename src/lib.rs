//! launch_plan - worker-pool sizing and launch for containerized web apps.
//!
//! Computes how many worker processes an external pre-fork launcher
//! (gunicorn and friends) should start, then hands over to it.
//!
//! # Features
//!
//! - **Worker sizing**: `2 * cores + 1`, with optional cap profiles
//! - **Cgroup aware**: CPU quotas from cgroup v1/v2 win over host CPU count
//! - **Total planning**: bad or missing inputs fall back, startup never aborts
//! - **Exec or supervise**: replace the process, or run the launcher as a
//!   child with signal forwarding and exit-code passthrough
//! - **Structured logging**: text or JSON lines via tracing
//!
//! # Example
//!
//! ```rust
//! use launch_plan::config::{LauncherConfig, PlannerConfig};
//! use launch_plan::launcher::LaunchCommand;
//! use launch_plan::planner::compute_plan;
//!
//! let plan = compute_plan(Some(1), &PlannerConfig::default());
//! let command = LaunchCommand::for_plan(&LauncherConfig::default(), &plan);
//! assert_eq!(
//!     command.to_string(),
//!     "gunicorn main:app --workers 3 --bind 0.0.0.0:8000 --timeout 300"
//! );
//! ```

/// Package version from Cargo.toml
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Git commit hash (8 chars), empty when built without git
pub const BUILD_VERSION: &str = env!("BUILD_VERSION");

/// Full version string: "0.1.0 (abc12345)" or "0.1.0 ()"
pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_VERSION"), ")");

pub mod config;
pub mod launcher;
pub mod logging;
pub mod planner;
pub mod system;

// Re-exports for convenience
pub use config::Config;
pub use launcher::{format_launch_command, LaunchCommand, LaunchMode};
pub use planner::{compute_plan, CapPolicy, LaunchPlan};
