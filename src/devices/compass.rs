//! HiTechnic compass.
//!
//! Headings are in degrees, 0..=359. The driver also keeps a target heading
//! so callers can steer by the signed error [`Compass::read_relative_heading`].

use crate::error::Error;
use crate::link::{I2cLink, MuxLink, SensorLink};
use crate::traits::{I2cBus, MuxChannel, MuxSensorType, SensorMux};

/// Default bus address.
pub const COMPASS_ADDRESS: u8 = 0x02;

const MODE_REGISTER: u8 = 0x41;
const MODE_MEASURE: u8 = 0x00;
const MODE_CALIBRATE: u8 = 0x43;
const CALIBRATION_FAILED: u8 = 0x02;

/// HiTechnic compass.
#[derive(Debug)]
pub struct Compass<L> {
    link: L,
    target: u16,
}

impl<B: I2cBus> Compass<I2cLink<B>> {
    /// Compass on a direct I2C port.
    pub fn new(bus: B) -> Self {
        Self {
            link: I2cLink::new(bus, COMPASS_ADDRESS),
            target: 0,
        }
    }

    /// Enter hard-iron calibration mode.
    ///
    /// Rotate the sensor slowly through at least one and a half turns, then
    /// call [`stop_calibration`](Self::stop_calibration).
    pub fn start_calibration(&mut self) -> Result<(), Error<B::Error>> {
        log::debug!("compass: calibration started");
        self.link.write_command(MODE_REGISTER, MODE_CALIBRATE)
    }

    /// Return to measurement mode and check the calibration was accepted.
    pub fn stop_calibration(&mut self) -> Result<(), Error<B::Error>> {
        self.link.write_command(MODE_REGISTER, MODE_MEASURE)?;
        let mut status = [0u8; 1];
        self.link.read_register(MODE_REGISTER, &mut status)?;
        if status[0] == CALIBRATION_FAILED {
            log::warn!("compass: calibration rejected");
            return Err(Error::CalibrationFailed);
        }
        Ok(())
    }
}

impl<M: SensorMux> Compass<MuxLink<M>> {
    /// Compass on a multiplexer channel.
    pub fn muxed(mux: M, channel: MuxChannel) -> Self {
        Self {
            link: MuxLink::new(mux, channel, MuxSensorType::Compass),
            target: 0,
        }
    }
}

impl<L: SensorLink> Compass<L> {
    /// Absolute heading, 0..=359.
    pub fn read_heading(&mut self) -> Result<u16, Error<L::BusError>> {
        let mut buf = [0u8; 2];
        self.link.read_data(0, &mut buf)?;
        Ok(u16::from(buf[0]) * 2 + u16::from(buf[1]))
    }

    /// Heading relative to the target, -180..=179.
    ///
    /// ```rust
    /// use nxt_drivers::devices::Compass;
    /// use nxt_drivers::hal::MockBus;
    ///
    /// let mut bus = MockBus::new();
    /// bus.queue_reply(&[5, 0]); // 10 degrees
    ///
    /// let mut compass = Compass::new(&mut bus);
    /// compass.set_target_offset(350);
    /// assert_eq!(compass.read_relative_heading().unwrap(), 20);
    /// ```
    pub fn read_relative_heading(&mut self) -> Result<i16, Error<L::BusError>> {
        let heading = self.read_heading()?;
        Ok(relative_heading(heading, self.target))
    }

    /// Make the current heading the target. Returns it.
    pub fn set_target(&mut self) -> Result<u16, Error<L::BusError>> {
        self.target = self.read_heading()?;
        Ok(self.target)
    }

    /// Set the target heading explicitly.
    pub fn set_target_offset(&mut self, target: u16) {
        self.target = target % 360;
    }

    /// Current target heading.
    pub fn target(&self) -> u16 {
        self.target
    }

    /// Returns the link.
    pub fn release(self) -> L {
        self.link
    }
}

/// Signed difference `heading - target`, wrapped into -180..=179.
pub fn relative_heading(heading: u16, target: u16) -> i16 {
    let diff = i32::from(heading) - i32::from(target) + 180;
    (diff.rem_euclid(360) - 180) as i16
}
