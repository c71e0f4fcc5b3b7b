//! HiTechnic IR seeker V2.
//!
//! Reports two independent readings of the five detectors: DC (any infrared,
//! including sunlight) and AC (modulated beacons only, such as the HiTechnic
//! IR ball).
//!
//! # Registers
//!
//! | Offset | Size | Content |
//! |--------|------|---------|
//! | 0 | 1 | DC direction |
//! | 1 | 5 | DC strengths |
//! | 6 | 1 | DC average strength |
//! | 7 | 1 | AC direction |
//! | 8 | 5 | AC strengths |

use crate::error::Error;
use crate::link::{I2cLink, MuxLink, SensorLink};
use crate::traits::{I2cBus, MuxChannel, MuxSensorType, SensorMux};

use super::irseeker::SENSOR_COUNT;

/// Default bus address.
pub const IRSEEKER2_ADDRESS: u8 = 0x10;

const DSP_MODE_REGISTER: u8 = 0x41;

const DC_DIRECTION: u8 = 0;
const DC_STRENGTHS: u8 = 1;
const DC_AVERAGE: u8 = 6;
const AC_DIRECTION: u8 = 7;
const AC_STRENGTHS: u8 = 8;

/// Carrier frequency the AC filter tracks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DspMode {
    /// 1200 Hz carrier (HiTechnic IR ball default).
    Hz1200,
    /// 600 Hz carrier.
    Hz600,
}

impl DspMode {
    const fn code(self) -> u8 {
        match self {
            Self::Hz1200 => 0,
            Self::Hz600 => 1,
        }
    }
}

/// HiTechnic IR seeker V2.
#[derive(Debug)]
pub struct IrSeekerV2<L> {
    link: L,
}

impl<B: I2cBus> IrSeekerV2<I2cLink<B>> {
    /// Seeker on a direct I2C port.
    pub fn new(bus: B) -> Self {
        Self {
            link: I2cLink::new(bus, IRSEEKER2_ADDRESS),
        }
    }

    /// Select the AC carrier frequency.
    pub fn set_dsp_mode(&mut self, mode: DspMode) -> Result<(), Error<B::Error>> {
        self.link.write_command(DSP_MODE_REGISTER, mode.code())
    }
}

impl<M: SensorMux> IrSeekerV2<MuxLink<M>> {
    /// Seeker on a multiplexer channel.
    pub fn muxed(mux: M, channel: MuxChannel) -> Self {
        Self {
            link: MuxLink::new(mux, channel, MuxSensorType::IrSeekerV2),
        }
    }
}

impl<L: SensorLink> IrSeekerV2<L> {
    /// DC direction zone, 0 (no signal) or 1..=9.
    pub fn read_dc_direction(&mut self) -> Result<u8, Error<L::BusError>> {
        self.read_byte(DC_DIRECTION)
    }

    /// DC strength of detector `sensor`, 0..=4.
    pub fn read_dc_strength(&mut self, sensor: u8) -> Result<u8, Error<L::BusError>> {
        self.read_detector(DC_STRENGTHS, sensor)
    }

    /// DC strength of every detector.
    pub fn read_dc_strengths(&mut self) -> Result<[u8; 5], Error<L::BusError>> {
        self.read_block(DC_STRENGTHS)
    }

    /// Average DC strength.
    pub fn read_dc_average(&mut self) -> Result<u8, Error<L::BusError>> {
        self.read_byte(DC_AVERAGE)
    }

    /// AC direction zone, 0 (no signal) or 1..=9.
    pub fn read_ac_direction(&mut self) -> Result<u8, Error<L::BusError>> {
        self.read_byte(AC_DIRECTION)
    }

    /// AC strength of detector `sensor`, 0..=4.
    pub fn read_ac_strength(&mut self, sensor: u8) -> Result<u8, Error<L::BusError>> {
        self.read_detector(AC_STRENGTHS, sensor)
    }

    /// AC strength of every detector.
    pub fn read_ac_strengths(&mut self) -> Result<[u8; 5], Error<L::BusError>> {
        self.read_block(AC_STRENGTHS)
    }

    /// Returns the link.
    pub fn release(self) -> L {
        self.link
    }

    fn read_byte(&mut self, offset: u8) -> Result<u8, Error<L::BusError>> {
        let mut buf = [0u8; 1];
        self.link.read_data(offset, &mut buf)?;
        Ok(buf[0])
    }

    fn read_detector(&mut self, base: u8, sensor: u8) -> Result<u8, Error<L::BusError>> {
        if sensor >= SENSOR_COUNT {
            return Err(Error::InvalidSensor(sensor));
        }
        self.read_byte(base + sensor)
    }

    fn read_block(&mut self, offset: u8) -> Result<[u8; 5], Error<L::BusError>> {
        let mut buf = [0u8; 5];
        self.link.read_data(offset, &mut buf)?;
        Ok(buf)
    }
}
