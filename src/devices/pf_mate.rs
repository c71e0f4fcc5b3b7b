//! Mindsensors PF Mate.
//!
//! An I2C device that sends Power Functions IR commands itself. The driver
//! fills its six control registers in one write, then tells it to transmit.

use crate::error::Error;
use crate::irlink::{DirectCommand, PfChannel};
use crate::link::I2cLink;
use crate::traits::I2cBus;

/// Default bus address.
pub const PF_MATE_ADDRESS: u8 = 0x48;

/// Highest speed step.
pub const MAX_SPEED: u8 = 7;

const COMMAND_REGISTER: u8 = 0x41;
const CONTROL_REGISTER: u8 = 0x42;
const CMD_GO: u8 = 0x47;

/// Which receiver outputs a command applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MotorSelect {
    Both,
    A,
    B,
}

impl MotorSelect {
    const fn code(self) -> u8 {
        match self {
            Self::Both => 0x00,
            Self::A => 0x01,
            Self::B => 0x02,
        }
    }
}

/// Operation and speed for one output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotorControl {
    /// What the output does.
    pub op: DirectCommand,
    /// Speed step 0..=7; larger values are clamped.
    pub speed: u8,
}

impl MotorControl {
    /// Control with `op` at `speed`.
    pub const fn new(op: DirectCommand, speed: u8) -> Self {
        Self { op, speed }
    }
}

/// Mindsensors PF Mate.
///
/// # Example
///
/// ```rust
/// use nxt_drivers::devices::{MotorControl, PfMate};
/// use nxt_drivers::hal::{MockBus, Transaction};
/// use nxt_drivers::irlink::{DirectCommand, PfChannel};
///
/// let mut bus = MockBus::new();
/// let mut mate = PfMate::new(&mut bus);
/// mate.control_motor_a(PfChannel::Ch2, MotorControl::new(DirectCommand::Forward, 5))
///     .unwrap();
///
/// assert_eq!(
///     bus.transactions,
///     vec![
///         Transaction::write(0x48, 0x42, &[2, 1, 1, 5, 0, 0]),
///         Transaction::write(0x48, 0x41, &[0x47]),
///     ]
/// );
/// ```
#[derive(Debug)]
pub struct PfMate<B> {
    link: I2cLink<B>,
}

impl<B: I2cBus> PfMate<B> {
    /// PF Mate at the default address.
    pub fn new(bus: B) -> Self {
        Self {
            link: I2cLink::new(bus, PF_MATE_ADDRESS),
        }
    }

    /// Drive output A of the receiver on `channel`.
    pub fn control_motor_a(
        &mut self,
        channel: PfChannel,
        a: MotorControl,
    ) -> Result<(), Error<B::Error>> {
        self.control(channel, MotorSelect::A, a, MotorControl::default())
    }

    /// Drive output B of the receiver on `channel`.
    pub fn control_motor_b(
        &mut self,
        channel: PfChannel,
        b: MotorControl,
    ) -> Result<(), Error<B::Error>> {
        self.control(channel, MotorSelect::B, MotorControl::default(), b)
    }

    /// Drive both outputs of the receiver on `channel`.
    pub fn control_motor_ab(
        &mut self,
        channel: PfChannel,
        a: MotorControl,
        b: MotorControl,
    ) -> Result<(), Error<B::Error>> {
        self.control(channel, MotorSelect::Both, a, b)
    }

    /// Returns the bus.
    pub fn release(self) -> B {
        self.link.release()
    }

    fn control(
        &mut self,
        channel: PfChannel,
        select: MotorSelect,
        a: MotorControl,
        b: MotorControl,
    ) -> Result<(), Error<B::Error>> {
        // The device numbers receiver channels from 1
        let registers = [
            channel.value() + 1,
            select.code(),
            a.op.code(),
            a.speed.min(MAX_SPEED),
            b.op.code(),
            b.speed.min(MAX_SPEED),
        ];
        self.link.write_register(CONTROL_REGISTER, &registers)?;
        self.link.write_command(COMMAND_REGISTER, CMD_GO)
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use crate::hal::{MockBus, Transaction};

    #[test]
    fn motor_b_only() {
        let mut bus = MockBus::new();
        let mut mate = PfMate::new(&mut bus);
        mate.control_motor_b(PfChannel::Ch4, MotorControl::new(DirectCommand::Reverse, 3))
            .unwrap();

        assert_eq!(
            bus.transactions[0],
            Transaction::write(0x48, 0x42, &[4, 2, 0, 0, 2, 3])
        );
    }

    #[test]
    fn both_motors_clamp_speed() {
        let mut bus = MockBus::new();
        let mut mate = PfMate::new(&mut bus);
        mate.control_motor_ab(
            PfChannel::Ch1,
            MotorControl::new(DirectCommand::Brake, 0),
            MotorControl::new(DirectCommand::Forward, 99),
        )
        .unwrap();

        assert_eq!(
            bus.transactions,
            vec![
                Transaction::write(0x48, 0x42, &[1, 0, 3, 0, 1, 7]),
                Transaction::write(0x48, 0x41, &[0x47]),
            ]
        );
    }

    #[test]
    fn failed_control_write_skips_go() {
        let mut bus = MockBus::new();
        bus.fail_next(1);
        let mut mate = PfMate::new(&mut bus);

        assert!(mate
            .control_motor_a(PfChannel::Ch1, MotorControl::new(DirectCommand::Forward, 7))
            .is_err());
        assert_eq!(bus.transactions.len(), 1);
    }
}
