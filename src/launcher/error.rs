//! Launcher error types.

use std::fmt;
use std::io;

/// Exit code when the launcher program cannot be found.
pub const EXIT_NOT_FOUND: u8 = 127;

/// Exit code when the launcher program exists but cannot be started.
pub const EXIT_CANNOT_RUN: u8 = 126;

/// Error type for starting or supervising the launcher.
///
/// Failures inside the launcher itself are not errors here; its exit code is
/// passed through as a [`LaunchOutcome`](super::LaunchOutcome).
#[derive(Debug)]
pub enum LaunchError {
    /// Replacing the current process failed.
    Exec { program: String, error: io::Error },
    /// Spawning the child process failed.
    Spawn { program: String, error: io::Error },
    /// Waiting on the child process failed.
    Wait(io::Error),
    /// Building the supervisor runtime failed.
    Runtime(io::Error),
    /// Installing signal handlers failed.
    Signal(io::Error),
}

impl LaunchError {
    /// Process exit code to report for this error (shell conventions).
    pub fn exit_code(&self) -> u8 {
        match self {
            LaunchError::Exec { error, .. } | LaunchError::Spawn { error, .. }
                if error.kind() == io::ErrorKind::NotFound =>
            {
                EXIT_NOT_FOUND
            }
            _ => EXIT_CANNOT_RUN,
        }
    }
}

impl fmt::Display for LaunchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchError::Exec { program, error } => {
                write!(f, "failed to exec '{}': {}", program, error)
            }
            LaunchError::Spawn { program, error } => {
                write!(f, "failed to spawn '{}': {}", program, error)
            }
            LaunchError::Wait(e) => write!(f, "failed to wait for launcher: {}", e),
            LaunchError::Runtime(e) => write!(f, "failed to build runtime: {}", e),
            LaunchError::Signal(e) => write!(f, "failed to install signal handler: {}", e),
        }
    }
}

impl std::error::Error for LaunchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LaunchError::Exec { error, .. } | LaunchError::Spawn { error, .. } => Some(error),
            LaunchError::Wait(e) | LaunchError::Runtime(e) | LaunchError::Signal(e) => Some(e),
        }
    }
}
