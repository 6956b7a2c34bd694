use super::{ParticulateSensor, SensorReading};
use crate::config::{SensorConfig, SensorMode};
use crate::error::SensorError;
use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

const START_1: u8 = 0x42;
const START_2: u8 = 0x4D;

/// Total size of a data frame including start bytes, length and checksum
pub const FRAME_LEN: usize = 32;
/// Body length announced by a data frame (13 words + checksum)
const DATA_BODY_LEN: u16 = 28;
/// Body length of the reply to a command frame
const ACK_BODY_LEN: u16 = 4;

/// Serial poll slice. Expiry only ends the read when a read timeout is configured.
const POLL_SLICE: Duration = Duration::from_millis(500);

/// Rejected start pairs tolerated by one read before the last rejection is returned
const MAX_FALSE_STARTS: usize = 16;

/// Poll slice for the port, never longer than the read timeout itself
fn poll_slice(read_timeout: Option<Duration>) -> Duration {
    read_timeout.map_or(POLL_SLICE, |limit| limit.min(POLL_SLICE))
}

/// Byte stream the sensor is attached to
pub trait Transport: Read + Write + Send {
    /// Drop whatever the sensor has sent but we have not read yet
    fn discard_input(&mut self) -> io::Result<()>;
}

impl Transport for Box<dyn SerialPort> {
    fn discard_input(&mut self) -> io::Result<()> {
        self.clear(ClearBuffer::Input).map_err(io::Error::from)
    }
}

/// Host-to-sensor commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    PassiveMode,
    ActiveMode,
    PassiveRead,
}

impl Command {
    pub fn to_bytes(self) -> [u8; 7] {
        let (cmd, data): (u8, u16) = match self {
            Command::PassiveMode => (0xE1, 0x0000),
            Command::ActiveMode => (0xE1, 0x0001),
            Command::PassiveRead => (0xE2, 0x0000),
        };
        let [data_h, data_l] = data.to_be_bytes();
        let mut out = [START_1, START_2, cmd, data_h, data_l, 0, 0];
        let lrc = checksum(&out[..5]);
        out[5..].copy_from_slice(&lrc.to_be_bytes());
        out
    }
}

/// Decoded PMS7003 data frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// PM concentrations under standard particle (CF=1) calibration
    pub pm1_0_cf1: u16,
    pub pm2_5_cf1: u16,
    pub pm10_cf1: u16,
    /// PM concentrations under atmospheric environment
    pub pm1_0: u16,
    pub pm2_5: u16,
    pub pm10: u16,
    /// Particles per 0.1 L above 0.3, 0.5, 1.0, 2.5, 5.0 and 10 µm
    pub particles: [u16; 6],
    pub version: u8,
    pub error_code: u8,
}

impl Frame {
    pub fn decode(raw: &[u8; FRAME_LEN]) -> Result<Self, SensorError> {
        if raw[0] != START_1 || raw[1] != START_2 {
            return Err(SensorError::BadStart);
        }

        let length = u16::from_be_bytes([raw[2], raw[3]]);
        if length != DATA_BODY_LEN {
            return Err(SensorError::BadLength(length));
        }

        let expected = u16::from_be_bytes([raw[30], raw[31]]);
        let computed = checksum(&raw[..30]);
        if expected != computed {
            return Err(SensorError::ChecksumMismatch { expected, computed });
        }

        let word = |i: usize| u16::from_be_bytes([raw[4 + 2 * i], raw[5 + 2 * i]]);

        Ok(Self {
            pm1_0_cf1: word(0),
            pm2_5_cf1: word(1),
            pm10_cf1: word(2),
            pm1_0: word(3),
            pm2_5: word(4),
            pm10: word(5),
            particles: [word(6), word(7), word(8), word(9), word(10), word(11)],
            version: raw[28],
            error_code: raw[29],
        })
    }

    pub fn reading(&self) -> SensorReading {
        SensorReading::new(self.pm1_0, self.pm2_5, self.pm10)
    }
}

fn checksum(bytes: &[u8]) -> u16 {
    bytes
        .iter()
        .fold(0u16, |acc, &b| acc.wrapping_add(u16::from(b)))
}

/// Plantower PMS7003 on a serial transport
pub struct Pms7003<T: Transport> {
    port: T,
    device: String,
    mode: SensorMode,
    read_timeout: Option<Duration>,
    /// Bytes handed back after a rejected frame start, read before the port
    pending: VecDeque<u8>,
}

impl Pms7003<Box<dyn SerialPort>> {
    /// Open the serial device and switch the sensor to the configured mode
    pub fn open(config: &SensorConfig) -> Result<Self, SensorError> {
        let port = serialport::new(&config.device, config.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(poll_slice(config.read_timeout_ms.map(Duration::from_millis)))
            .open()
            .map_err(|source| SensorError::Open {
                device: config.device.clone(),
                source,
            })?;

        Self::with_transport(port, config)
    }
}

impl<T: Transport> Pms7003<T> {
    pub fn with_transport(port: T, config: &SensorConfig) -> Result<Self, SensorError> {
        let mut sensor = Self {
            port,
            device: config.device.clone(),
            mode: config.mode,
            read_timeout: config.read_timeout_ms.map(Duration::from_millis),
            pending: VecDeque::new(),
        };

        let command = match sensor.mode {
            SensorMode::Active => Command::ActiveMode,
            SensorMode::Passive => Command::PassiveMode,
        };
        sensor.send(command)?;
        debug!(device = %sensor.device, mode = ?sensor.mode, "sensor mode set");

        Ok(sensor)
    }

    fn send(&mut self, command: Command) -> Result<(), SensorError> {
        self.port.write_all(&command.to_bytes())?;
        self.port.flush()?;
        Ok(())
    }

    fn check_deadline(&self, deadline: Option<Instant>) -> Result<(), SensorError> {
        match (deadline, self.read_timeout) {
            (Some(deadline), Some(limit)) if Instant::now() >= deadline => {
                Err(SensorError::Timeout(limit))
            }
            _ => Ok(()),
        }
    }

    /// Fill `buf` completely, waiting through poll slices until `deadline`
    fn fill(&mut self, buf: &mut [u8], deadline: Option<Instant>) -> Result<(), SensorError> {
        let mut filled = 0;
        while filled < buf.len() {
            if let Some(byte) = self.pending.pop_front() {
                buf[filled] = byte;
                filled += 1;
                continue;
            }

            // A port that never stops sending must still hit the deadline.
            self.check_deadline(deadline)?;
            match self.port.read(&mut buf[filled..]) {
                Ok(0) => return Err(SensorError::Disconnected),
                Ok(n) => filled += n,
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::TimedOut
                            | io::ErrorKind::WouldBlock
                            | io::ErrorKind::Interrupted
                    ) => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Consume bytes up to and including the next 0x42 0x4D pair
    fn sync(&mut self, deadline: Option<Instant>) -> Result<(), SensorError> {
        let mut byte = [0u8; 1];
        let mut prev = 0u8;
        loop {
            self.fill(&mut byte, deadline)?;
            if prev == START_1 && byte[0] == START_2 {
                return Ok(());
            }
            prev = byte[0];
        }
    }

    /// Read the next data frame, skipping noise before the start bytes and command replies.
    ///
    /// A start pair can also occur inside the data words of a frame. When the bytes behind
    /// it do not form a valid frame, scanning resumes right after the rejected 0x42.
    pub fn read_frame(&mut self) -> Result<Frame, SensorError> {
        let deadline = self.read_timeout.map(|limit| Instant::now() + limit);
        let mut false_starts = 0;

        loop {
            self.sync(deadline)?;

            let mut raw = [0u8; FRAME_LEN];
            raw[0] = START_1;
            raw[1] = START_2;
            self.fill(&mut raw[2..4], deadline)?;
            let length = u16::from_be_bytes([raw[2], raw[3]]);

            if length == ACK_BODY_LEN {
                let mut ack = [0u8; ACK_BODY_LEN as usize];
                self.fill(&mut ack, deadline)?;
                trace!(?ack, "skipped command reply");
                continue;
            }

            let (rejection, consumed) = if length == DATA_BODY_LEN {
                self.fill(&mut raw[4..], deadline)?;
                match Frame::decode(&raw) {
                    Ok(frame) => return Ok(frame),
                    Err(e) => (e, FRAME_LEN),
                }
            } else {
                (SensorError::BadLength(length), 4)
            };

            false_starts += 1;
            if false_starts >= MAX_FALSE_STARTS {
                return Err(rejection);
            }
            debug!(error = %rejection, false_starts, "rejected frame start, rescanning");
            for &byte in raw[1..consumed].iter().rev() {
                self.pending.push_front(byte);
            }
        }
    }
}

impl<T: Transport> ParticulateSensor for Pms7003<T> {
    fn read(&mut self) -> Result<SensorReading, SensorError> {
        self.port.discard_input()?;
        self.pending.clear();
        if self.mode == SensorMode::Passive {
            self.send(Command::PassiveRead)?;
        }

        let frame = self.read_frame()?;
        trace!(
            pm1_0 = frame.pm1_0,
            pm2_5 = frame.pm2_5,
            pm10 = frame.pm10,
            pm1_0_cf1 = frame.pm1_0_cf1,
            pm2_5_cf1 = frame.pm2_5_cf1,
            pm10_cf1 = frame.pm10_cf1,
            particles = ?frame.particles,
            version = frame.version,
            error_code = frame.error_code,
            "frame received"
        );
        Ok(frame.reading())
    }

    fn get_info(&self) -> String {
        let mode = match self.mode {
            SensorMode::Active => "active",
            SensorMode::Passive => "passive",
        };
        format!("PMS7003 on {} ({} mode)", self.device, mode)
    }
}
