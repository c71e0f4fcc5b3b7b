//! HiTechnic angle sensor.
//!
//! Reports the shaft angle in degrees, an accumulated angle that keeps
//! counting past full turns, and the rotation speed.
//!
//! # Registers
//!
//! | Offset | Size | Content |
//! |--------|------|---------|
//! | 0 | 2 | Angle: `b0 * 2 + b1` |
//! | 2 | 4 | Accumulated angle, big-endian signed |
//! | 6 | 2 | RPM, big-endian signed |

use crate::error::Error;
use crate::link::{I2cLink, MuxLink, SensorLink};
use crate::traits::{I2cBus, MuxChannel, MuxSensorType, SensorMux};

/// Default bus address.
pub const ANGLE_ADDRESS: u8 = 0x02;

const COMMAND_REGISTER: u8 = 0x41;
const CMD_RESET_ANGLE: u8 = 0x43;
const CMD_RESET_ACCUMULATED: u8 = 0x52;

/// HiTechnic angle sensor.
#[derive(Debug)]
pub struct AngleSensor<L> {
    link: L,
}

impl<B: I2cBus> AngleSensor<I2cLink<B>> {
    /// Sensor on a direct I2C port.
    pub fn new(bus: B) -> Self {
        Self {
            link: I2cLink::new(bus, ANGLE_ADDRESS),
        }
    }

    /// Make the current shaft position angle 0.
    ///
    /// The sensor stores the zero point in non-volatile memory.
    pub fn reset_angle(&mut self) -> Result<(), Error<B::Error>> {
        log::debug!("angle: resetting zero point");
        self.link.write_command(COMMAND_REGISTER, CMD_RESET_ANGLE)
    }

    /// Zero the accumulated angle.
    pub fn reset_accumulated_angle(&mut self) -> Result<(), Error<B::Error>> {
        self.link.write_command(COMMAND_REGISTER, CMD_RESET_ACCUMULATED)
    }
}

impl<M: SensorMux> AngleSensor<MuxLink<M>> {
    /// Sensor on a multiplexer channel.
    pub fn muxed(mux: M, channel: MuxChannel) -> Self {
        Self {
            link: MuxLink::new(mux, channel, MuxSensorType::Angle),
        }
    }
}

impl<L: SensorLink> AngleSensor<L> {
    /// Shaft angle in degrees, 0..=359.
    pub fn read_angle(&mut self) -> Result<u16, Error<L::BusError>> {
        let mut buf = [0u8; 2];
        self.link.read_data(0, &mut buf)?;
        Ok(u16::from(buf[0]) * 2 + u16::from(buf[1]))
    }

    /// Accumulated angle in degrees since the last reset.
    pub fn read_accumulated_angle(&mut self) -> Result<i32, Error<L::BusError>> {
        let mut buf = [0u8; 4];
        self.link.read_data(2, &mut buf)?;
        Ok(i32::from_be_bytes(buf))
    }

    /// Rotation speed in revolutions per minute; negative when turning backwards.
    pub fn read_rpm(&mut self) -> Result<i16, Error<L::BusError>> {
        let mut buf = [0u8; 2];
        self.link.read_data(6, &mut buf)?;
        Ok(i16::from_be_bytes(buf))
    }

    /// Returns the link.
    pub fn release(self) -> L {
        self.link
    }
}
