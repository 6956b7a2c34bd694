use crate::error::SensorError;
use serde::Serialize;

pub mod pms7003;

/// One PM1.0 / PM2.5 / PM10 reading, atmospheric, in µg/m³
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SensorReading {
    pub pm1_0: u16,
    pub pm2_5: u16,
    pub pm10: u16,
}

impl SensorReading {
    pub fn new(pm1_0: u16, pm2_5: u16, pm10: u16) -> Self {
        Self { pm1_0, pm2_5, pm10 }
    }
}

/// A particulate sensor that yields one reading per blocking call
#[cfg_attr(test, mockall::automock)]
pub trait ParticulateSensor: Send {
    fn read(&mut self) -> Result<SensorReading, SensorError>;
    fn get_info(&self) -> String;
}
