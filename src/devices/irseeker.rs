//! HiTechnic IR seeker (first generation).
//!
//! Five IR detectors arranged in an arc. The direction is a zone number:
//! 0 means no signal, 1..=9 sweep from left to right with 5 straight ahead.

use crate::error::Error;
use crate::link::{I2cLink, MuxLink, SensorLink};
use crate::traits::{I2cBus, MuxChannel, MuxSensorType, SensorMux};

/// Default bus address.
pub const IRSEEKER_ADDRESS: u8 = 0x02;

/// Number of detectors.
pub const SENSOR_COUNT: u8 = 5;

/// HiTechnic IR seeker.
#[derive(Debug)]
pub struct IrSeeker<L> {
    link: L,
}

impl<B: I2cBus> IrSeeker<I2cLink<B>> {
    /// Seeker on a direct I2C port.
    pub fn new(bus: B) -> Self {
        Self {
            link: I2cLink::new(bus, IRSEEKER_ADDRESS),
        }
    }
}

impl<M: SensorMux> IrSeeker<MuxLink<M>> {
    /// Seeker on a multiplexer channel.
    pub fn muxed(mux: M, channel: MuxChannel) -> Self {
        Self {
            link: MuxLink::new(mux, channel, MuxSensorType::IrSeeker),
        }
    }
}

impl<L: SensorLink> IrSeeker<L> {
    /// Direction zone, 0 (no signal) or 1..=9.
    pub fn read_direction(&mut self) -> Result<u8, Error<L::BusError>> {
        let mut buf = [0u8; 1];
        self.link.read_data(0, &mut buf)?;
        Ok(buf[0])
    }

    /// Signal strength of detector `sensor`, 0..=4.
    pub fn read_strength(&mut self, sensor: u8) -> Result<u8, Error<L::BusError>> {
        if sensor >= SENSOR_COUNT {
            return Err(Error::InvalidSensor(sensor));
        }
        let mut buf = [0u8; 1];
        self.link.read_data(1 + sensor, &mut buf)?;
        Ok(buf[0])
    }

    /// Signal strength of every detector, left to right.
    pub fn read_all_strengths(&mut self) -> Result<[u8; 5], Error<L::BusError>> {
        let mut buf = [0u8; 5];
        self.link.read_data(1, &mut buf)?;
        Ok(buf)
    }

    /// Returns the link.
    pub fn release(self) -> L {
        self.link
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use crate::hal::{MockBus, MockMux, Transaction};

    #[test]
    fn direction_and_strengths() {
        let mut bus = MockBus::new();
        bus.queue_reply(&[5]);
        bus.queue_reply(&[40]);
        bus.queue_reply(&[1, 2, 3, 4, 5]);
        let mut seeker = IrSeeker::new(&mut bus);

        assert_eq!(seeker.read_direction().unwrap(), 5);
        assert_eq!(seeker.read_strength(4).unwrap(), 40);
        assert_eq!(seeker.read_all_strengths().unwrap(), [1, 2, 3, 4, 5]);

        assert_eq!(
            bus.transactions,
            vec![
                Transaction::write_read(0x02, 0x42, 1),
                Transaction::write_read(0x02, 0x47, 1),
                Transaction::write_read(0x02, 0x43, 5),
            ]
        );
    }

    #[test]
    fn invalid_sensor_issues_no_transaction() {
        let mut bus = MockBus::new();
        let mut seeker = IrSeeker::new(&mut bus);

        assert_eq!(seeker.read_strength(5), Err(Error::InvalidSensor(5)));
        assert!(bus.transactions.is_empty());
    }

    #[test]
    fn muxed_seeker() {
        let mut mux = MockMux::new();
        mux.attach(MuxChannel::C1, MuxSensorType::IrSeeker);
        mux.queue_reply(&[7]);
        let mut seeker = IrSeeker::muxed(&mut mux, MuxChannel::C1);

        assert_eq!(seeker.read_direction().unwrap(), 7);
    }
}
