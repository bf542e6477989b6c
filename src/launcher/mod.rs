//! Worker-pool launcher invocation.
//!
//! Renders a [`LaunchPlan`] into launcher arguments and hands control to the
//! external launcher, either by replacing this process ([`LaunchMode::Exec`])
//! or by supervising it as a child ([`LaunchMode::Spawn`]).
//!
//! The rendered command follows the gunicorn convention:
//!
//! ```text
//! <launcher> <app-entrypoint> --workers <n> --bind <host>:<port> --timeout <secs>
//! ```

mod error;
mod process;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::warn;

use crate::config::LauncherConfig;
use crate::planner::LaunchPlan;

pub use error::{LaunchError, EXIT_CANNOT_RUN, EXIT_NOT_FOUND};
pub use process::{launch, LaunchOutcome};

/// How the launcher process is started.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LaunchMode {
    /// Replace the current process (container PID 1 becomes the launcher).
    #[default]
    Exec,
    /// Run the launcher as a child, forward signals, pass its exit code on.
    Spawn,
}

impl FromStr for LaunchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exec" => Ok(Self::Exec),
            "spawn" | "child" => Ok(Self::Spawn),
            other => Err(format!("expected exec or spawn, got '{}'", other)),
        }
    }
}

impl fmt::Display for LaunchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exec => write!(f, "exec"),
            Self::Spawn => write!(f, "spawn"),
        }
    }
}

/// Render the plan as launcher flags.
///
/// Always `--workers N --bind HOST:PORT --timeout SECS`, in that order.
pub fn format_launch_command(plan: &LaunchPlan) -> Vec<String> {
    vec![
        "--workers".to_string(),
        plan.worker_count().to_string(),
        "--bind".to_string(),
        plan.bind_addr().to_string(),
        "--timeout".to_string(),
        plan.request_timeout_secs().to_string(),
    ]
}

/// Planned flags with their gunicorn short forms.
const PLANNED_FLAGS: [(&str, char); 3] = [("--workers", 'w'), ("--bind", 'b'), ("--timeout", 't')];

/// The planned flag `arg` would set on a gunicorn-style launcher, if any.
///
/// Catches `--workers`, `--workers=8`, abbreviated long options the launcher
/// would expand (`--work`), and short forms with or without an attached value
/// (`-w`, `-w8`).
pub fn planned_flag(arg: &str) -> Option<&'static str> {
    if let Some(long) = arg.strip_prefix("--") {
        let name = long.split_once('=').map_or(long, |(name, _)| name);
        if name.is_empty() {
            return None;
        }
        return PLANNED_FLAGS
            .iter()
            .find(|(flag, _)| flag[2..].starts_with(name))
            .map(|(flag, _)| *flag);
    }

    let short = arg.strip_prefix('-')?.chars().next()?;
    PLANNED_FLAGS
        .iter()
        .find(|(_, c)| *c == short)
        .map(|(flag, _)| *flag)
}

/// `--flag=value` and `-fvalue` carry their value in the same token.
fn has_inline_value(arg: &str) -> bool {
    match arg.strip_prefix("--") {
        Some(long) => long.contains('='),
        None => arg.len() > 2,
    }
}

/// Program and arguments to run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LaunchCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl LaunchCommand {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Assemble the full launcher invocation for a plan.
    pub fn for_plan(config: &LauncherConfig, plan: &LaunchPlan) -> Self {
        let mut args = vec![config.app_module.clone()];

        if let Some(ref class) = config.worker_class {
            args.push("--worker-class".to_string());
            args.push(class.clone());
        }

        args.extend(format_launch_command(plan));

        // Extra args come last and the launcher honors the last occurrence
        let mut extra = config.extra_args.iter();
        while let Some(arg) = extra.next() {
            match planned_flag(arg) {
                None => args.push(arg.clone()),
                Some(flag) => {
                    warn!(arg = %arg, flag, "dropping extra launcher argument that overrides the plan");
                    if !has_inline_value(arg) {
                        extra.next();
                    }
                }
            }
        }

        Self {
            program: config.program.clone(),
            args,
        }
    }

    /// Program followed by its arguments.
    pub fn argv(&self) -> Vec<&str> {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect()
    }
}

impl fmt::Display for LaunchCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.argv().join(" "))
    }
}
