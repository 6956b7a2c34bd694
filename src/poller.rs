//! Periodic sensor polling.
//!
//! One task reads the sensor once per tick and publishes the latest sample on a
//! `watch` channel. Any read error ends the task with that error.

use crate::error::Result;
use crate::sensors::{ParticulateSensor, SensorReading};
use chrono::{DateTime, Local};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// A reading and the wall-clock time it was taken
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub reading: SensorReading,
    pub taken_at: DateTime<Local>,
}

/// Poll `sensor` every `interval` until cancelled or a read fails
pub async fn run<S>(
    mut sensor: S,
    interval: Duration,
    tx: watch::Sender<Option<Sample>>,
    cancel: CancellationToken,
) -> Result<()>
where
    S: ParticulateSensor + 'static,
{
    info!(sensor = %sensor.get_info(), ?interval, "poller started");

    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let read = task::spawn_blocking(move || {
            let result = sensor.read();
            (sensor, result)
        });

        let (returned, result) = tokio::select! {
            _ = cancel.cancelled() => break,
            joined = read => joined?,
        };
        sensor = returned;

        let reading = result.inspect_err(|e| error!(error = %e, "sensor read failed"))?;
        debug!(
            pm1_0 = reading.pm1_0,
            pm2_5 = reading.pm2_5,
            pm10 = reading.pm10,
            "reading"
        );

        tx.send_replace(Some(Sample {
            reading,
            taken_at: Local::now(),
        }));

        if tx.is_closed() {
            debug!("no display attached");
            break;
        }
    }

    info!("poller stopped");
    Ok(())
}
