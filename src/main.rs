use std::process::ExitCode;

use serde::Serialize;
use tracing::{error, info};

use launch_plan::config::{Config, LoggingConfig, ProcessEnv};
use launch_plan::launcher::{self, LaunchCommand};
use launch_plan::planner::{compute_plan, LaunchPlan};
use launch_plan::{logging, system};

/// Exit code for configuration errors.
const EXIT_CONFIG: u8 = 2;

/// Dry-run output on stdout.
#[derive(Serialize)]
struct DryRun<'a> {
    plan: &'a LaunchPlan,
    argv: Vec<&'a str>,
}

fn main() -> ExitCode {
    // Logging first so fallbacks taken while reading the rest are visible
    logging::init(&LoggingConfig::from_env(&ProcessEnv));
    info!("Starting launch_plan {}", launch_plan::VERSION);

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::from(EXIT_CONFIG);
        }
    };
    config.log_summary();

    let cores = system::detect_cores();
    let plan = compute_plan(cores, &config.planner);
    info!(
        cores = ?cores,
        workers = plan.worker_count(),
        bind = %plan.bind_addr(),
        timeout = plan.request_timeout_secs(),
        "launch plan ready"
    );

    let command = LaunchCommand::for_plan(&config.launcher, &plan);

    if config.launcher.dry_run {
        let output = DryRun {
            plan: &plan,
            argv: command.argv(),
        };
        return match serde_json::to_string(&output) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!(error = %e, "failed to render dry run");
                ExitCode::FAILURE
            }
        };
    }

    match launcher::launch(&command, config.launcher.mode) {
        Ok(outcome) => outcome.exit_code(),
        Err(e) => {
            error!(error = %e, "launcher failed to start");
            ExitCode::from(e.exit_code())
        }
    }
}
