//! Command-line interface argument parsing.
//!
//! This module defines the CLI structure and parsing logic using clap.
//! Flags left unset fall through to the config file, then to built-in defaults.

use crate::config::{RunMode, SensorMode};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Log level for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Show all messages including trace
    Trace,
    /// Show debug messages and above
    Debug,
    /// Show info messages and above (default)
    Info,
    /// Show warnings and errors only
    Warn,
    /// Show errors only
    Error,
}

impl LogLevel {
    /// Convert LogLevel to an EnvFilter directive
    pub fn to_filter_string(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Air Quality Monitor: live PM1.0 / PM2.5 / PM10 readings from a PMS7003 sensor
#[derive(Parser, Debug)]
#[command(name = "air-quality-monitor")]
#[command(version)]
#[command(
    about = "Polls a PMS7003 particulate sensor and shows color-coded readings",
    long_about = None
)]
pub struct Cli {
    /// Serial device the sensor is attached to [default: /dev/ttyAMA0]
    #[arg(long)]
    pub device: Option<String>,

    /// Start in full-screen layout (a bare flag means true)
    #[arg(
        long = "fullScreen",
        value_name = "BOOL",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub full_screen: Option<bool>,

    /// Path to an optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Run mode (interactive dashboard or headless JSON output)
    #[arg(short, long, value_enum)]
    pub mode: Option<RunMode>,

    /// Log level
    #[arg(short, long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Poll interval in milliseconds [default: 1000]
    #[arg(short = 'i', long)]
    pub interval_ms: Option<u64>,

    /// Sensor reporting mode [default: active]
    #[arg(long, value_enum)]
    pub sensor_mode: Option<SensorMode>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub dump_config: bool,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(LogLevel::Info.to_filter_string(), "info");
        assert_eq!(LogLevel::Debug.to_filter_string(), "debug");
        assert_eq!(LogLevel::Error.to_filter_string(), "error");
    }

    #[test]
    fn test_default_values() {
        let cli = Cli::parse_from(["air-quality-monitor"]);
        assert_eq!(cli.device, None);
        assert_eq!(cli.full_screen, None);
        assert_eq!(cli.config, None);
        assert_eq!(cli.mode, None);
        assert!(!cli.dump_config);
    }

    #[test]
    fn test_full_screen_forms() {
        let bare = Cli::parse_from(["air-quality-monitor", "--fullScreen"]);
        assert_eq!(bare.full_screen, Some(true));

        let explicit = Cli::parse_from(["air-quality-monitor", "--fullScreen", "false"]);
        assert_eq!(explicit.full_screen, Some(false));

        let equals = Cli::parse_from(["air-quality-monitor", "--fullScreen=true"]);
        assert_eq!(equals.full_screen, Some(true));
    }

    #[test]
    fn test_device_and_mode() {
        let cli = Cli::parse_from([
            "air-quality-monitor",
            "--device",
            "/dev/ttyUSB0",
            "--mode",
            "headless",
        ]);
        assert_eq!(cli.device.as_deref(), Some("/dev/ttyUSB0"));
        assert_eq!(cli.mode, Some(RunMode::Headless));
    }

    #[test]
    fn test_rejects_non_bool_full_screen() {
        assert!(Cli::try_parse_from(["air-quality-monitor", "--fullScreen", "maybe"]).is_err());
    }
}
