//! Headless service mode.
//!
//! Runs the poller without a terminal UI and writes one JSON object per
//! reading to stdout until a shutdown signal arrives or a read fails.

use crate::aqi::{self, ColorBucket};
use crate::error::{Result, ServiceError};
use crate::poller::Sample;
use chrono::{DateTime, Local};
use futures_util::StreamExt;
use serde::Serialize;
use signal_hook::consts::signal::{SIGINT, SIGTERM};
use signal_hook_tokio::Signals;
use std::io::Write;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

/// One line of headless output
#[derive(Debug, Serialize)]
pub struct ReadingRecord {
    pub timestamp: DateTime<Local>,
    pub pm1_0: u16,
    pub pm2_5: u16,
    pub pm10: u16,
    pub pm2_5_category: ColorBucket,
}

impl From<&Sample> for ReadingRecord {
    fn from(sample: &Sample) -> Self {
        Self {
            timestamp: sample.taken_at,
            pm1_0: sample.reading.pm1_0,
            pm2_5: sample.reading.pm2_5,
            pm10: sample.reading.pm10,
            pm2_5_category: aqi::classify(sample.reading.pm2_5),
        }
    }
}

/// Stream of SIGINT/SIGTERM deliveries
pub fn shutdown_signals() -> Result<Signals> {
    Signals::new([SIGINT, SIGTERM]).map_err(|e| ServiceError::SignalError(e.to_string()).into())
}

fn emit<W: Write>(out: &mut W, sample: &Sample) -> Result<()> {
    serde_json::to_writer(&mut *out, &ReadingRecord::from(sample))
        .map_err(|e| ServiceError::OutputError(e.to_string()))?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Run until SIGINT/SIGTERM or until the poller fails
pub async fn run_headless(
    mut rx: watch::Receiver<Option<Sample>>,
    mut poller: JoinHandle<Result<()>>,
) -> Result<()> {
    info!("Starting in headless mode");
    let mut signals = shutdown_signals()?;
    let signals_handle = signals.handle();

    let result = loop {
        tokio::select! {
            biased;

            finished = &mut poller => {
                break match finished {
                    Ok(result) => result,
                    Err(e) => Err(e.into()),
                };
            }
            signal = signals.next() => {
                info!(?signal, "shutdown signal received");
                break Ok(());
            }
            changed = rx.changed() => {
                if changed.is_err() {
                    continue;
                }
                let latest = *rx.borrow_and_update();
                if let Some(sample) = latest {
                    emit(&mut std::io::stdout().lock(), &sample)?;
                }
            }
        }
    };

    signals_handle.close();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, SensorError};
    use crate::sensors::SensorReading;

    fn sample() -> Sample {
        Sample {
            reading: SensorReading::new(10, 75, 250),
            taken_at: Local::now(),
        }
    }

    #[test]
    fn test_emit_json_line() {
        let mut out = Vec::new();
        let sample = sample();
        emit(&mut out, &sample).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with('\n'));
        assert_eq!(text.lines().count(), 1);

        let value: serde_json::Value = serde_json::from_str(text.trim_end()).unwrap();
        assert_eq!(value["pm1_0"], 10);
        assert_eq!(value["pm2_5"], 75);
        assert_eq!(value["pm10"], 250);
        assert_eq!(value["pm2_5_category"], "moderate");
        let stamp = value["timestamp"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(stamp).is_ok());
    }

    #[tokio::test]
    async fn test_poller_failure_ends_headless_run() {
        let (_tx, rx) = watch::channel(None);
        let poller: JoinHandle<Result<()>> =
            tokio::spawn(async { Err(AppError::Sensor(SensorError::Disconnected)) });

        let result = run_headless(rx, poller).await;
        assert!(matches!(
            result,
            Err(AppError::Sensor(SensorError::Disconnected))
        ));
    }
}
