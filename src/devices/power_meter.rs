//! Mindsensors power meter.
//!
//! Measures current and voltage on a supply line and integrates the
//! capacity used since the last counter reset. All values are little-endian.

use crate::error::Error;
use crate::link::I2cLink;
use crate::traits::I2cBus;

/// Default bus address.
pub const POWER_METER_ADDRESS: u8 = 0x12;

const COMMAND_REGISTER: u8 = 0x41;
const CURRENT_REGISTER: u8 = 0x42;
const VOLTAGE_REGISTER: u8 = 0x44;
const CAPACITY_REGISTER: u8 = 0x46;
const TIME_REGISTER: u8 = 0x56;
const CMD_RESET: u8 = b'R';

/// One combined voltage and current sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PowerReading {
    /// Voltage in millivolts.
    pub voltage_mv: u16,
    /// Current in milliamps; negative when flowing backwards.
    pub current_ma: i16,
}

/// Mindsensors power meter.
#[derive(Debug)]
pub struct PowerMeter<B> {
    link: I2cLink<B>,
}

impl<B: I2cBus> PowerMeter<B> {
    /// Meter at the default address.
    pub fn new(bus: B) -> Self {
        Self {
            link: I2cLink::new(bus, POWER_METER_ADDRESS),
        }
    }

    /// Present current in mA.
    pub fn read_current(&mut self) -> Result<i16, Error<B::Error>> {
        let mut buf = [0u8; 2];
        self.link.read_register(CURRENT_REGISTER, &mut buf)?;
        Ok(i16::from_le_bytes(buf))
    }

    /// Present voltage in mV.
    pub fn read_voltage(&mut self) -> Result<u16, Error<B::Error>> {
        let mut buf = [0u8; 2];
        self.link.read_register(VOLTAGE_REGISTER, &mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    /// Voltage and current from the same sample.
    pub fn read_voltage_current(&mut self) -> Result<PowerReading, Error<B::Error>> {
        let mut buf = [0u8; 4];
        self.link.read_register(CURRENT_REGISTER, &mut buf)?;
        Ok(PowerReading {
            current_ma: i16::from_le_bytes([buf[0], buf[1]]),
            voltage_mv: u16::from_le_bytes([buf[2], buf[3]]),
        })
    }

    /// Capacity used since the last reset in mAh.
    pub fn read_capacity_used(&mut self) -> Result<u16, Error<B::Error>> {
        let mut buf = [0u8; 2];
        self.link.read_register(CAPACITY_REGISTER, &mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    /// Time since the last reset in ms.
    pub fn read_time(&mut self) -> Result<u32, Error<B::Error>> {
        let mut buf = [0u8; 4];
        self.link.read_register(TIME_REGISTER, &mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    /// Zero the capacity and time counters.
    pub fn reset_counters(&mut self) -> Result<(), Error<B::Error>> {
        log::debug!("power meter: counters reset");
        self.link.write_command(COMMAND_REGISTER, CMD_RESET)
    }

    /// Returns the bus.
    pub fn release(self) -> B {
        self.link.release()
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use crate::hal::{MockBus, Transaction};

    #[test]
    fn little_endian_values() {
        let mut bus = MockBus::new();
        bus.queue_reply(&[0x18, 0xFC]); // -1000 mA
        bus.queue_reply(&[0x10, 0x27]); // 10000 mV
        bus.queue_reply(&[0xE8, 0x03]); // 1000 mAh
        bus.queue_reply(&[0x40, 0x42, 0x0F, 0x00]); // 1_000_000 ms
        let mut meter = PowerMeter::new(&mut bus);

        assert_eq!(meter.read_current().unwrap(), -1000);
        assert_eq!(meter.read_voltage().unwrap(), 10000);
        assert_eq!(meter.read_capacity_used().unwrap(), 1000);
        assert_eq!(meter.read_time().unwrap(), 1_000_000);

        assert_eq!(
            bus.transactions,
            vec![
                Transaction::write_read(0x12, 0x42, 2),
                Transaction::write_read(0x12, 0x44, 2),
                Transaction::write_read(0x12, 0x46, 2),
                Transaction::write_read(0x12, 0x56, 4),
            ]
        );
    }

    #[test]
    fn combined_sample() {
        let mut bus = MockBus::new();
        bus.queue_reply(&[0xF4, 0x01, 0x40, 0x1F]);
        let mut meter = PowerMeter::new(&mut bus);

        assert_eq!(
            meter.read_voltage_current().unwrap(),
            PowerReading {
                voltage_mv: 8000,
                current_ma: 500
            }
        );
        assert_eq!(bus.transactions, vec![Transaction::write_read(0x12, 0x42, 4)]);
    }

    #[test]
    fn reset_sends_ascii_r() {
        let mut bus = MockBus::new();
        let mut meter = PowerMeter::new(&mut bus);
        meter.reset_counters().unwrap();
        assert_eq!(bus.transactions, vec![Transaction::write(0x12, 0x41, b"R")]);
    }
}
