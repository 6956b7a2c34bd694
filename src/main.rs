//! Main entry point for the Air Quality Monitor.
//!
//! The binary performs the following steps:
//! 1. Parses the command line and loads the optional TOML configuration.
//! 2. Initializes logging.
//! 3. Opens the PMS7003 sensor on the configured serial device.
//! 4. Spawns the poller, which reads the sensor once per interval.
//! 5. Runs the terminal dashboard (or headless JSON output) until the user
//!    quits, a shutdown signal arrives or a sensor read fails.
//!
//! # Errors
//!
//! The process exits with an error if:
//! * The configuration file cannot be read, parsed or validated.
//! * The sensor device cannot be opened.
//! * Any sensor read fails. There is no retry and no reconnect.

use std::{fs::OpenOptions, io, sync::Mutex, time::Duration};

use anyhow::{Context, Result};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{fmt::writer::BoxMakeWriter, EnvFilter};

mod aqi;
mod cli;
mod config;
mod error;
mod poller;
mod sensors;
mod service;
mod ui;

use cli::Cli;
use config::{AppConfig, LoggingConfig, RunMode};
use sensors::pms7003::Pms7003;
use sensors::ParticulateSensor;

/// How long shutdown waits for a sensor read stuck in the kernel
const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

fn init_logging(config: &LoggingConfig, run_mode: RunMode) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .context("Invalid log level")?;

    // Never write log lines over the dashboard.
    let (writer, ansi) = match (&config.file, run_mode) {
        (Some(path), _) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path))?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        (None, RunMode::Interactive) => (BoxMakeWriter::new(io::sink), false),
        (None, RunMode::Headless) => (BoxMakeWriter::new(io::stderr), config.colored),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

async fn run(config: AppConfig, run_mode: RunMode) -> Result<()> {
    info!(device = %config.sensor.device, mode = ?config.sensor.mode, "Opening sensor");
    let sensor = Pms7003::open(&config.sensor)
        .with_context(|| format!("Failed to open sensor on {}", config.sensor.device))?;
    info!("{}", sensor.get_info());

    let (tx, rx) = watch::channel(None);
    let cancel = CancellationToken::new();
    let interval = Duration::from_millis(config.service.poll_interval_ms);
    let poller = tokio::spawn(poller::run(sensor, interval, tx, cancel.clone()));

    let result = match run_mode {
        RunMode::Interactive => {
            let app = ui::App::new(config.sensor.device.clone(), config.display.full_screen);
            ui::run_dashboard(app, rx, poller).await
        }
        RunMode::Headless => service::run_headless(rx, poller).await,
    };

    cancel.cancel();
    result.context("Air quality monitor stopped")
}

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    let mut config =
        AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config.apply_cli_overrides(&cli);
    config.validate().context("Invalid configuration")?;

    if cli.dump_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let mut run_mode = config.service.run_mode;
    let stdout_is_tty = atty::is(atty::Stream::Stdout);
    if run_mode == RunMode::Interactive && !stdout_is_tty {
        run_mode = RunMode::Headless;
    }

    init_logging(&config.logging, run_mode)?;
    if run_mode != config.service.run_mode {
        warn!("stdout is not a terminal, falling back to headless mode");
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let result = runtime.block_on(run(config, run_mode));
    runtime.shutdown_timeout(SHUTDOWN_GRACE);

    if let Err(e) = &result {
        tracing::error!(error = %format!("{:#}", e), "exiting");
    }
    result
}
