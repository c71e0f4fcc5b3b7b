//! Mindsensors NXTServo controller.
//!
//! Eight hobby servo outputs, numbered 1..=8. Positions are pulse widths in
//! microseconds. Quick positions are a single byte, one step per 10 µs.

use crate::error::Error;
use crate::link::I2cLink;
use crate::traits::I2cBus;

/// Default bus address.
pub const SERVO_ADDRESS: u8 = 0xB0;

/// Number of servo outputs.
pub const CHANNELS: u8 = 8;

/// Shortest pulse width in µs.
pub const MIN_POSITION: u16 = 500;
/// Centered pulse width in µs.
pub const MID_POSITION: u16 = 1500;
/// Longest pulse width in µs.
pub const MAX_POSITION: u16 = 2500;

/// Lowest quick position.
pub const MIN_QUICK_POSITION: u8 = 50;
/// Highest quick position.
pub const MAX_QUICK_POSITION: u8 = 250;

const COMMAND_REGISTER: u8 = 0x41;
const POSITION_BASE: u8 = 0x42;
const SPEED_BASE: u8 = 0x52;
const QUICK_POSITION_BASE: u8 = 0x5A;

/// Millivolts per battery register step, times 100.
const BATTERY_STEP_MV_X100: u32 = 3886;

/// Mindsensors NXTServo.
///
/// # Example
///
/// ```rust
/// use nxt_drivers::devices::Servo;
/// use nxt_drivers::hal::{MockBus, Transaction};
///
/// let mut bus = MockBus::new();
/// let mut servo = Servo::new(&mut bus);
/// servo.set_position(2, 1500).unwrap();
///
/// assert_eq!(
///     bus.transactions,
///     vec![Transaction::write(0xB0, 0x44, &[0xDC, 0x05])]
/// );
/// ```
#[derive(Debug)]
pub struct Servo<B> {
    link: I2cLink<B>,
}

impl<B: I2cBus> Servo<B> {
    /// Controller at the default address.
    pub fn new(bus: B) -> Self {
        Self::with_address(bus, SERVO_ADDRESS)
    }

    /// Controller at a custom address.
    pub fn with_address(bus: B, address: u8) -> Self {
        Self {
            link: I2cLink::new(bus, address),
        }
    }

    /// Move `channel` to `position` µs, clamped to 500..=2500.
    pub fn set_position(&mut self, channel: u8, position: u16) -> Result<(), Error<B::Error>> {
        let index = channel_index(channel)?;
        let position = position.clamp(MIN_POSITION, MAX_POSITION);
        self.link
            .write_register(POSITION_BASE + index * 2, &position.to_le_bytes())
    }

    /// Set the speed of `channel`, then move it.
    pub fn set_position_with_speed(
        &mut self,
        channel: u8,
        position: u16,
        speed: u8,
    ) -> Result<(), Error<B::Error>> {
        self.set_speed(channel, speed)?;
        self.set_position(channel, position)
    }

    /// Set how fast `channel` moves. 0 is full speed.
    pub fn set_speed(&mut self, channel: u8, speed: u8) -> Result<(), Error<B::Error>> {
        let index = channel_index(channel)?;
        self.link.write_command(SPEED_BASE + index, speed)
    }

    /// Move `channel` to a quick position, clamped to 50..=250.
    pub fn set_quick_position(&mut self, channel: u8, position: u8) -> Result<(), Error<B::Error>> {
        let index = channel_index(channel)?;
        let position = position.clamp(MIN_QUICK_POSITION, MAX_QUICK_POSITION);
        self.link.write_command(QUICK_POSITION_BASE + index, position)
    }

    /// Set the speed of `channel`, then move it to a quick position.
    pub fn set_quick_position_with_speed(
        &mut self,
        channel: u8,
        position: u8,
        speed: u8,
    ) -> Result<(), Error<B::Error>> {
        self.set_speed(channel, speed)?;
        self.set_quick_position(channel, position)
    }

    /// Last commanded position of `channel` in µs.
    pub fn read_position(&mut self, channel: u8) -> Result<u16, Error<B::Error>> {
        let index = channel_index(channel)?;
        let mut buf = [0u8; 2];
        self.link.read_register(POSITION_BASE + index * 2, &mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    /// Servo supply voltage in mV.
    pub fn read_battery_mv(&mut self) -> Result<u32, Error<B::Error>> {
        let mut buf = [0u8; 1];
        self.link.read_register(COMMAND_REGISTER, &mut buf)?;
        Ok(u32::from(buf[0]) * BATTERY_STEP_MV_X100 / 100)
    }

    /// Returns the bus.
    pub fn release(self) -> B {
        self.link.release()
    }
}

fn channel_index<E>(channel: u8) -> Result<u8, Error<E>> {
    if (1..=CHANNELS).contains(&channel) {
        Ok(channel - 1)
    } else {
        Err(Error::InvalidChannel(channel))
    }
}
