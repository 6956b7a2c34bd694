//! Application configuration management.
//!
//! This module handles loading, parsing, and validating the application configuration
//! from TOML files with support for runtime overrides from CLI arguments.
//! Every field has a default, so running without a config file reproduces the
//! stock behavior: `/dev/ttyAMA0`, active mode, one reading per second.

use crate::error::{ConfigError, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Run mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Interactive terminal dashboard (default)
    Interactive,
    /// No UI, one JSON line per reading on stdout
    Headless,
}

/// PMS7003 reporting mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SensorMode {
    /// Sensor streams frames continuously
    Active,
    /// Sensor answers one frame per read request
    Passive,
}

/// Top-level application configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceConfig,
    pub sensor: SensorConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
}

/// Service runtime configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ServiceConfig {
    pub run_mode: RunMode,
    pub poll_interval_ms: u64,
}

/// Serial sensor configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SensorConfig {
    pub device: String,
    pub baud_rate: u32,
    pub mode: SensorMode,
    /// Upper bound on a single read. `None` blocks until a frame arrives.
    pub read_timeout_ms: Option<u64>,
}

/// Display configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct DisplayConfig {
    pub full_screen: bool,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
    pub json: bool,
    pub colored: bool,
}

// Default value functions
fn default_device() -> String {
    "/dev/ttyAMA0".to_string()
}

fn default_poll_interval() -> u64 {
    1000
}

fn default_baud_rate() -> u32 {
    9600
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            run_mode: RunMode::Interactive,
            poll_interval_ms: default_poll_interval(),
        }
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            device: default_device(),
            baud_rate: default_baud_rate(),
            mode: SensorMode::Active,
            read_timeout_ms: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
            json: false,
            colored: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::ReadError)?;

        let config: AppConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise fall back to the defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.service.poll_interval_ms == 0 {
            return Err(invalid("service.poll_interval_ms", "must be greater than 0"));
        }

        if self.sensor.device.trim().is_empty() {
            return Err(invalid("sensor.device", "cannot be empty"));
        }

        if self.sensor.baud_rate == 0 {
            return Err(invalid("sensor.baud_rate", "must be greater than 0"));
        }

        if self.sensor.read_timeout_ms == Some(0) {
            return Err(invalid("sensor.read_timeout_ms", "must be greater than 0 when set"));
        }

        if let Err(e) = EnvFilter::try_new(&self.logging.level) {
            return Err(invalid("logging.level", &e.to_string()));
        }

        Ok(())
    }

    /// Apply CLI argument overrides to configuration
    pub fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(device) = &cli.device {
            self.sensor.device = device.clone();
        }

        if let Some(full_screen) = cli.full_screen {
            self.display.full_screen = full_screen;
        }

        if let Some(mode) = cli.mode {
            self.service.run_mode = mode;
        }

        if let Some(interval) = cli.interval_ms {
            self.service.poll_interval_ms = interval;
        }

        if let Some(mode) = cli.sensor_mode {
            self.sensor.mode = mode;
        }

        if let Some(level) = cli.log_level {
            self.logging.level = level.to_filter_string().to_string();
        }
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()).into())
    }
}

fn invalid(field: &str, message: &str) -> crate::error::AppError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.sensor.device, "/dev/ttyAMA0");
        assert_eq!(config.sensor.baud_rate, 9600);
        assert_eq!(config.sensor.mode, SensorMode::Active);
        assert_eq!(config.sensor.read_timeout_ms, None);
        assert_eq!(config.service.poll_interval_ms, 1000);
        assert!(!config.display.full_screen);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_poll_interval() {
        let mut config = AppConfig::default();
        config.service.poll_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_device() {
        let mut config = AppConfig::default();
        config.sensor.device = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_read_timeout() {
        let mut config = AppConfig::default();
        config.sensor.read_timeout_ms = Some(0);
        assert!(config.validate().is_err());
        config.sensor.read_timeout_ms = Some(2500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_bad_log_level() {
        let mut config = AppConfig::default();
        config.logging.level = "air_quality_monitor=loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[sensor]\ndevice = \"/dev/ttyUSB0\"\nmode = \"passive\"\nread_timeout_ms = 3000\n\n\
             [display]\nfull_screen = true"
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.sensor.device, "/dev/ttyUSB0");
        assert_eq!(config.sensor.mode, SensorMode::Passive);
        assert_eq!(config.sensor.read_timeout_ms, Some(3000));
        assert_eq!(config.sensor.baud_rate, 9600);
        assert!(config.display.full_screen);
        assert_eq!(config.service.run_mode, RunMode::Interactive);
    }

    #[test]
    fn test_from_file_rejects_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[service]\npoll_interval_ms = 0").unwrap();
        assert!(AppConfig::from_file(file.path()).is_err());

        let mut garbage = tempfile::NamedTempFile::new().unwrap();
        writeln!(garbage, "[sensor\ndevice =").unwrap();
        assert!(AppConfig::from_file(garbage.path()).is_err());
    }

    #[test]
    fn test_load_without_path_uses_defaults() {
        let config = AppConfig::load(None).unwrap();
        assert_eq!(config.sensor.device, "/dev/ttyAMA0");
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "air-quality-monitor",
            "--device",
            "/dev/ttyS1",
            "--fullScreen",
            "true",
            "-i",
            "2000",
            "--sensor-mode",
            "passive",
        ]);
        let mut config = AppConfig::default();
        config.apply_cli_overrides(&cli);
        assert_eq!(config.sensor.device, "/dev/ttyS1");
        assert!(config.display.full_screen);
        assert_eq!(config.service.poll_interval_ms, 2000);
        assert_eq!(config.sensor.mode, SensorMode::Passive);
    }

    #[test]
    fn test_toml_output_reloads() {
        let mut config = AppConfig::default();
        config.sensor.read_timeout_ms = Some(1500);
        let text = config.to_toml().unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.sensor.read_timeout_ms, Some(1500));
        assert_eq!(parsed.service.run_mode, RunMode::Interactive);
    }
}
