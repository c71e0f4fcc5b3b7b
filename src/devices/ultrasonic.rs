//! LEGO ultrasonic distance sensor.
//!
//! Distances are in centimetres; 255 means nothing was in range. In single
//! shot and event capture modes the sensor records up to eight echoes.

use crate::error::Error;
use crate::link::{I2cLink, MuxLink, SensorLink};
use crate::traits::{I2cBus, MuxChannel, MuxSensorType, SensorMux};

/// Default bus address.
pub const ULTRASONIC_ADDRESS: u8 = 0x10;

/// Distance reported when nothing is in range.
pub const NO_ECHO: u8 = 255;

const COMMAND_REGISTER: u8 = 0x41;

/// Measurement mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UltrasonicMode {
    /// Transmitter off.
    Off,
    /// One ping per command, echoes held until the next.
    SingleShot,
    /// Ping continuously (power-on default).
    Continuous,
    /// Listen for other ultrasonic sensors without pinging.
    EventCapture,
}

impl UltrasonicMode {
    const fn code(self) -> u8 {
        match self {
            Self::Off => 0x00,
            Self::SingleShot => 0x01,
            Self::Continuous => 0x02,
            Self::EventCapture => 0x03,
        }
    }
}

const CMD_RESET: u8 = 0x04;

/// LEGO ultrasonic sensor.
#[derive(Debug)]
pub struct Ultrasonic<L> {
    link: L,
}

impl<B: I2cBus> Ultrasonic<I2cLink<B>> {
    /// Sensor at the default address.
    pub fn new(bus: B) -> Self {
        Self::with_address(bus, ULTRASONIC_ADDRESS)
    }

    /// Sensor at a custom address.
    pub fn with_address(bus: B, address: u8) -> Self {
        Self {
            link: I2cLink::new(bus, address),
        }
    }

    /// Switch measurement mode.
    pub fn set_mode(&mut self, mode: UltrasonicMode) -> Result<(), Error<B::Error>> {
        log::debug!("ultrasonic: {:?} mode", mode);
        self.link.write_command(COMMAND_REGISTER, mode.code())
    }

    /// Take one measurement (single shot mode).
    pub fn single_shot(&mut self) -> Result<(), Error<B::Error>> {
        self.set_mode(UltrasonicMode::SingleShot)
    }

    /// Warm reset.
    pub fn reset(&mut self) -> Result<(), Error<B::Error>> {
        self.link.write_command(COMMAND_REGISTER, CMD_RESET)
    }
}

impl<M: SensorMux> Ultrasonic<MuxLink<M>> {
    /// Sensor on a multiplexer channel.
    pub fn muxed(mux: M, channel: MuxChannel) -> Self {
        Self {
            link: MuxLink::new(mux, channel, MuxSensorType::LegoUltrasonic),
        }
    }
}

impl<L: SensorLink> Ultrasonic<L> {
    /// Distance to the nearest object in cm, or [`NO_ECHO`].
    pub fn read_distance(&mut self) -> Result<u8, Error<L::BusError>> {
        let mut buf = [0u8; 1];
        self.link.read_data(0, &mut buf)?;
        Ok(buf[0])
    }

    /// Distances of the last eight echoes, nearest first.
    pub fn read_distances(&mut self) -> Result<[u8; 8], Error<L::BusError>> {
        let mut buf = [0u8; 8];
        self.link.read_data(0, &mut buf)?;
        Ok(buf)
    }

    /// Returns the link.
    pub fn release(self) -> L {
        self.link
    }
}
