//! Adapters from `embedded-hal` 1.0 traits to the driver traits.
//!
//! Lets any HAL that implements [`embedded_hal::i2c::I2c`] and
//! [`embedded_hal::delay::DelayNs`] drive these sensors.
//!
//! # Example
//!
//! ```rust,ignore
//! use nxt_drivers::hal::{EhBus, EhDelay};
//! use nxt_drivers::irlink::{IrLink, DirectCommand, PfChannel};
//!
//! let i2c = hal::i2c::I2c::new(/* ... */);
//! let delay = hal::timer::Delay::new(/* ... */);
//!
//! let mut link = IrLink::new(EhBus::new(i2c), EhDelay::new(delay));
//! link.combo_direct(PfChannel::Ch1, DirectCommand::Forward, DirectCommand::Reverse)?;
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{I2c, Operation};

use crate::traits::{Delay, I2cBus};

/// [`I2cBus`] over an `embedded-hal` I2C peripheral.
///
/// NXT-style 8-bit addresses are shifted right by one to the 7-bit form the
/// HAL expects. Register reads use a repeated start.
#[derive(Debug)]
pub struct EhBus<I> {
    i2c: I,
}

impl<I: I2c> EhBus<I> {
    /// Wraps an I2C peripheral.
    pub const fn new(i2c: I) -> Self {
        Self { i2c }
    }

    /// Returns the wrapped peripheral.
    pub fn release(self) -> I {
        self.i2c
    }

    const fn seven_bit(address: u8) -> u8 {
        address >> 1
    }
}

impl<I: I2c> I2cBus for EhBus<I> {
    type Error = I::Error;

    fn write(&mut self, address: u8, register: u8, payload: &[u8]) -> Result<(), I::Error> {
        let reg = [register];
        if payload.is_empty() {
            return self.i2c.write(Self::seven_bit(address), &reg);
        }
        // Adjacent writes in one transaction go out without a restart.
        self.i2c.transaction(
            Self::seven_bit(address),
            &mut [Operation::Write(&reg), Operation::Write(payload)],
        )
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), I::Error> {
        self.i2c.read(Self::seven_bit(address), buf)
    }

    fn write_read(&mut self, address: u8, register: u8, buf: &mut [u8]) -> Result<(), I::Error> {
        self.i2c.write_read(Self::seven_bit(address), &[register], buf)
    }
}

/// [`Delay`] over an `embedded-hal` delay provider.
#[derive(Debug)]
pub struct EhDelay<D> {
    delay: D,
}

impl<D: DelayNs> EhDelay<D> {
    /// Wraps a delay provider.
    pub const fn new(delay: D) -> Self {
        Self { delay }
    }

    /// Returns the wrapped delay provider.
    pub fn release(self) -> D {
        self.delay
    }
}

impl<D: DelayNs> Delay for EhDelay<D> {
    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use crate::devices::{AngleSensor, Compass};
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    #[test]
    fn register_read_uses_seven_bit_address() {
        let expectations = [I2cTransaction::write_read(0x01, vec![0x42], vec![90, 1])];
        let mut i2c = I2cMock::new(&expectations);

        let mut sensor = AngleSensor::new(EhBus::new(i2c.clone()));
        assert_eq!(sensor.read_angle().unwrap(), 181);

        i2c.done();
    }

    #[test]
    fn command_write_is_single_write() {
        let expectations = [I2cTransaction::write(0x01, vec![0x41, 0x43])];
        let mut i2c = I2cMock::new(&expectations);

        let mut compass = Compass::new(EhBus::new(i2c.clone()));
        compass.start_calibration().unwrap();

        i2c.done();
    }

    #[test]
    fn multi_byte_write_is_one_transaction() {
        let expectations = [
            I2cTransaction::transaction_start(0x58),
            I2cTransaction::write(0x58, vec![0x42]),
            I2cTransaction::write(0x58, vec![0xDC, 0x05]),
            I2cTransaction::transaction_end(0x58),
        ];
        let mut i2c = I2cMock::new(&expectations);

        let mut bus = EhBus::new(i2c.clone());
        bus.write(0xB0, 0x42, &[0xDC, 0x05]).unwrap();

        i2c.done();
    }

    #[test]
    fn delay_adapter_forwards() {
        let mut delay = EhDelay::new(NoopDelay::new());
        delay.delay_ms(48);
    }
}
