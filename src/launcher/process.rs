//! Starting and supervising the launcher process.

use std::process::{ExitCode, ExitStatus};

use tracing::{info, warn};

use super::{LaunchCommand, LaunchError, LaunchMode};

/// Exit status of a supervised launcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LaunchOutcome {
    code: i32,
}

impl LaunchOutcome {
    /// Map a child exit status to a shell-style code.
    ///
    /// Killed by a signal maps to `128 + signal`.
    pub fn from_status(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return Self { code };
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return Self { code: 128 + signal };
            }
        }

        Self { code: 1 }
    }

    #[inline]
    pub fn code(&self) -> i32 {
        self.code
    }

    #[inline]
    pub fn success(&self) -> bool {
        self.code == 0
    }

    /// Exit code for this process, truncated the way the OS would.
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_byte())
    }

    fn exit_byte(&self) -> u8 {
        (self.code & 0xff) as u8
    }
}

/// Run the launcher.
///
/// In exec mode this only returns on failure. In spawn mode it returns once
/// the child exits.
pub fn launch(command: &LaunchCommand, mode: LaunchMode) -> Result<LaunchOutcome, LaunchError> {
    info!(mode = %mode, command = %command, "starting launcher");

    match mode {
        LaunchMode::Exec => exec(command),
        LaunchMode::Spawn => spawn_and_wait(command),
    }
}

#[cfg(unix)]
fn exec(command: &LaunchCommand) -> Result<LaunchOutcome, LaunchError> {
    use std::os::unix::process::CommandExt;

    let error = std::process::Command::new(&command.program)
        .args(&command.args)
        .exec();

    Err(LaunchError::Exec {
        program: command.program.clone(),
        error,
    })
}

#[cfg(not(unix))]
fn exec(command: &LaunchCommand) -> Result<LaunchOutcome, LaunchError> {
    warn!("exec mode is unix-only, supervising as a child instead");
    spawn_and_wait(command)
}

/// Spawn the launcher on a single-threaded runtime and wait for it.
fn spawn_and_wait(command: &LaunchCommand) -> Result<LaunchOutcome, LaunchError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(LaunchError::Runtime)?;

    runtime.block_on(supervise(command))
}

async fn supervise(command: &LaunchCommand) -> Result<LaunchOutcome, LaunchError> {
    // Registered before the child exists so an early SIGTERM is still forwarded
    let mut signals = ShutdownSignals::install()?;

    let mut child = tokio::process::Command::new(&command.program)
        .args(&command.args)
        .spawn()
        .map_err(|error| LaunchError::Spawn {
            program: command.program.clone(),
            error,
        })?;

    let pid = child.id();
    info!(pid, "launcher started");

    let status = signals.wait_forwarding(&mut child, pid).await?;
    let outcome = LaunchOutcome::from_status(status);

    if outcome.success() {
        info!("launcher exited cleanly");
    } else {
        warn!(code = outcome.code(), "launcher exited with failure");
    }

    Ok(outcome)
}

/// Termination signals passed on to the supervised launcher.
#[cfg(unix)]
struct ShutdownSignals {
    sigterm: tokio::signal::unix::Signal,
    sigint: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl ShutdownSignals {
    fn install() -> Result<Self, LaunchError> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            sigterm: signal(SignalKind::terminate()).map_err(LaunchError::Signal)?,
            sigint: signal(SignalKind::interrupt()).map_err(LaunchError::Signal)?,
        })
    }

    async fn wait_forwarding(
        &mut self,
        child: &mut tokio::process::Child,
        pid: Option<u32>,
    ) -> Result<ExitStatus, LaunchError> {
        loop {
            tokio::select! {
                status = child.wait() => return status.map_err(LaunchError::Wait),
                _ = self.sigterm.recv() => forward_signal(pid, libc::SIGTERM),
                _ = self.sigint.recv() => forward_signal(pid, libc::SIGINT),
            }
        }
    }
}

#[cfg(not(unix))]
struct ShutdownSignals;

#[cfg(not(unix))]
impl ShutdownSignals {
    fn install() -> Result<Self, LaunchError> {
        Ok(Self)
    }

    async fn wait_forwarding(
        &mut self,
        child: &mut tokio::process::Child,
        _pid: Option<u32>,
    ) -> Result<ExitStatus, LaunchError> {
        tokio::select! {
            status = child.wait() => status.map_err(LaunchError::Wait),
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down launcher...");
                if let Err(e) = child.start_kill() {
                    warn!(error = %e, "failed to stop launcher");
                }
                child.wait().await.map_err(LaunchError::Wait)
            }
        }
    }
}

/// Pass a termination signal on; the child decides how to shut down.
#[cfg(unix)]
fn forward_signal(pid: Option<u32>, signal: libc::c_int) {
    let Some(pid) = pid.and_then(|p| libc::pid_t::try_from(p).ok()) else {
        // Already reaped
        return;
    };

    info!(pid, signal, "forwarding signal to launcher");

    // SAFETY: kill(2) has no memory-safety preconditions.
    let rc = unsafe { libc::kill(pid, signal) };
    if rc != 0 {
        warn!(
            pid,
            signal,
            error = %std::io::Error::last_os_error(),
            "failed to forward signal"
        );
    }
}
