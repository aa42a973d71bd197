//! The `orrery` binary: loads config, initializes logging, and runs either the
//! window or the headless driver.

use std::process::ExitCode;

use clap::Parser;
use orrery_app::headless::run_headless;
use orrery_app::platform::PlatformDirs;
use orrery_app::window::run_with_config;
use orrery_config::{CliArgs, Config};
use tracing::{error, info};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    // A missing OS config dir is only fatal when no --config was given.
    let dirs = match (PlatformDirs::resolve(), args.config.clone()) {
        (Ok(dirs), Some(dir)) => dirs.with_config_dir(dir),
        (Ok(dirs), None) => dirs,
        (Err(_), Some(dir)) => PlatformDirs {
            log_dir: dir.join("logs"),
            config_dir: dir,
        },
        (Err(e), None) => {
            eprintln!("Failed to resolve platform directories: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = dirs.create_dirs() {
        eprintln!("Failed to create {}: {e}", dirs.config_dir.display());
        return ExitCode::FAILURE;
    }

    let mut config = match Config::load_or_create(&dirs.config_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            return ExitCode::FAILURE;
        }
    };
    config.apply_cli_overrides(&args);

    orrery_log::init_logging(
        Some(&dirs.log_dir),
        cfg!(debug_assertions),
        Some(&config),
    );

    info!("Orrery starting");
    info!(
        "Window: {}x{} | Title: {}",
        config.window.width, config.window.height, config.window.title
    );
    info!("Config: {}", dirs.config_dir.display());

    match args.headless_frames {
        Some(frames) => match run_headless(&config, frames) {
            Ok(_) => ExitCode::SUCCESS,
            Err(e) => {
                error!("Headless run failed: {e}");
                ExitCode::FAILURE
            }
        },
        None => {
            run_with_config(config, dirs.config_dir);
            ExitCode::SUCCESS
        }
    }
}
