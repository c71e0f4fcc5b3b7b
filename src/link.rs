//! How a driver reaches its sensor: a direct I2C port or a multiplexer channel.
//!
//! HiTechnic-style sensors expose their measurements as a block of data
//! registers starting at `0x42`. Whether that block is read straight off the
//! bus or through a sensor multiplexer is decided by the [`SensorLink`] the
//! driver is built on. Read operations are generic over the link; command
//! register writes only exist for drivers on an [`I2cLink`].
//!
//! # Example
//!
//! ```rust
//! use nxt_drivers::hal::{MockBus, MockMux};
//! use nxt_drivers::link::{I2cLink, MuxLink, SensorLink};
//! use nxt_drivers::traits::{MuxChannel, MuxSensorType};
//!
//! let mut bus = MockBus::new();
//! bus.queue_reply(&[3]);
//! let mut direct = I2cLink::new(&mut bus, 0x02);
//! let mut buf = [0u8; 1];
//! direct.read_data(0, &mut buf).unwrap();
//! assert_eq!(buf, [3]);
//!
//! let mut mux = MockMux::new();
//! mux.attach(MuxChannel::C2, MuxSensorType::Compass);
//! let mut muxed = MuxLink::new(&mut mux, MuxChannel::C2, MuxSensorType::Angle);
//! assert!(muxed.read_data(0, &mut buf).is_err()); // wrong sensor type
//! ```

use crate::error::Error;
use crate::traits::{I2cBus, MuxChannel, MuxSensorType, SensorMux};

/// First data register of HiTechnic-style sensors.
pub const DATA_BASE: u8 = 0x42;

/// Source of a sensor's data registers.
pub trait SensorLink {
    /// Error type of the underlying transport.
    type BusError;

    /// Read `buf.len()` bytes starting `offset` bytes into the data block.
    fn read_data(&mut self, offset: u8, buf: &mut [u8]) -> Result<(), Error<Self::BusError>>;
}

/// Sensor attached directly to an I2C port.
#[derive(Debug)]
pub struct I2cLink<B> {
    bus: B,
    address: u8,
}

impl<B: I2cBus> I2cLink<B> {
    /// Creates a link to the device at `address` (8-bit NXT form).
    pub const fn new(bus: B, address: u8) -> Self {
        Self { bus, address }
    }

    /// Device address.
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Write a single command byte to `register`.
    pub fn write_command(&mut self, register: u8, command: u8) -> Result<(), Error<B::Error>> {
        self.write_register(register, &[command])
    }

    /// Write `payload` starting at `register`.
    pub fn write_register(&mut self, register: u8, payload: &[u8]) -> Result<(), Error<B::Error>> {
        self.bus
            .write(self.address, register, payload)
            .map_err(Error::Bus)
    }

    /// Read `buf.len()` bytes starting at absolute `register`.
    pub fn read_register(&mut self, register: u8, buf: &mut [u8]) -> Result<(), Error<B::Error>> {
        self.bus
            .write_read(self.address, register, buf)
            .map_err(Error::Bus)
    }

    /// Returns the underlying bus.
    pub fn release(self) -> B {
        self.bus
    }
}

impl<B: I2cBus> SensorLink for I2cLink<B> {
    type BusError = B::Error;

    fn read_data(&mut self, offset: u8, buf: &mut [u8]) -> Result<(), Error<B::Error>> {
        self.read_register(DATA_BASE + offset, buf)
    }
}

/// Sensor attached to a multiplexer channel.
///
/// Every read first confirms the multiplexer detected the expected sensor
/// type on the channel.
#[derive(Debug)]
pub struct MuxLink<M> {
    mux: M,
    channel: MuxChannel,
    expected: MuxSensorType,
}

impl<M: SensorMux> MuxLink<M> {
    /// Creates a link to `channel`, which must hold an `expected` sensor.
    pub const fn new(mux: M, channel: MuxChannel, expected: MuxSensorType) -> Self {
        Self {
            mux,
            channel,
            expected,
        }
    }

    /// Multiplexer channel.
    pub const fn channel(&self) -> MuxChannel {
        self.channel
    }

    /// Fails with [`Error::SensorTypeMismatch`] unless the channel holds the expected sensor.
    pub fn check_type(&mut self) -> Result<(), Error<M::Error>> {
        let found = self.mux.sensor_type(self.channel).map_err(Error::Bus)?;
        if found != self.expected {
            log::warn!(
                "mux channel {:?}: expected {} sensor, found {}",
                self.channel,
                self.expected,
                found
            );
            return Err(Error::SensorTypeMismatch {
                expected: self.expected,
                found,
            });
        }
        Ok(())
    }

    /// Returns the underlying multiplexer.
    pub fn release(self) -> M {
        self.mux
    }
}

impl<M: SensorMux> SensorLink for MuxLink<M> {
    type BusError = M::Error;

    fn read_data(&mut self, offset: u8, buf: &mut [u8]) -> Result<(), Error<M::Error>> {
        self.check_type()?;
        self.mux
            .read_port(self.channel, offset, buf)
            .map_err(Error::Bus)
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use crate::hal::{MockBus, MockMux, MuxCall, Transaction};

    #[test]
    fn i2c_link_reads_relative_to_data_base() {
        let mut bus = MockBus::new();
        bus.queue_reply(&[1, 2]);
        let mut link = I2cLink::new(&mut bus, 0x10);

        let mut buf = [0u8; 2];
        link.read_data(6, &mut buf).unwrap();

        assert_eq!(buf, [1, 2]);
        assert_eq!(
            bus.transactions,
            vec![Transaction::write_read(0x10, 0x48, 2)]
        );
    }

    #[test]
    fn i2c_link_command_write() {
        let mut bus = MockBus::new();
        let mut link = I2cLink::new(&mut bus, 0x02);
        link.write_command(0x41, 0x43).unwrap();
        assert_eq!(bus.transactions, vec![Transaction::write(0x02, 0x41, &[0x43])]);
    }

    #[test]
    fn i2c_link_propagates_bus_error() {
        let mut bus = MockBus::new();
        bus.fail_next(1);
        let mut link = I2cLink::new(&mut bus, 0x02);
        let mut buf = [0u8; 1];
        assert!(matches!(link.read_data(0, &mut buf), Err(Error::Bus(_))));
    }

    #[test]
    fn mux_link_reads_matching_type() {
        let mut mux = MockMux::new();
        mux.attach(MuxChannel::C3, MuxSensorType::Angle);
        mux.queue_reply(&[9, 8]);
        let mut link = MuxLink::new(&mut mux, MuxChannel::C3, MuxSensorType::Angle);

        let mut buf = [0u8; 2];
        link.read_data(2, &mut buf).unwrap();

        assert_eq!(buf, [9, 8]);
        assert_eq!(
            mux.calls,
            vec![
                MuxCall::SensorType(MuxChannel::C3),
                MuxCall::ReadPort {
                    channel: MuxChannel::C3,
                    offset: 2,
                    len: 2
                },
            ]
        );
    }

    #[test]
    fn mux_link_mismatch_skips_data_read() {
        let mut mux = MockMux::new();
        mux.attach(MuxChannel::C1, MuxSensorType::IrSeeker);
        let mut link = MuxLink::new(&mut mux, MuxChannel::C1, MuxSensorType::IrSeekerV2);

        let mut buf = [0u8; 1];
        let err = link.read_data(0, &mut buf).unwrap_err();

        assert_eq!(
            err,
            Error::SensorTypeMismatch {
                expected: MuxSensorType::IrSeekerV2,
                found: MuxSensorType::IrSeeker,
            }
        );
        assert_eq!(mux.calls, vec![MuxCall::SensorType(MuxChannel::C1)]);
    }
}
