//! Power Functions motor commands and their 2-byte logical form.
//!
//! A logical command is four nibbles: a toggle/escape/channel nibble, a mode
//! nibble, a data nibble and a checksum nibble. The two "combo" modes drive
//! both outputs of a receiver at once:
//!
//! ```text
//! Combo Direct:  0 0 C C | 0 0 0 1 | B B A A | L L L L
//! Combo PWM:     0 1 C C | A A A A | B B B B | L L L L
//! ```
//!
//! where `CC` is the receiver channel, `A`/`B` the per-output codes and
//! `LLLL = 0xF ^ nibble1 ^ nibble2 ^ nibble3`.

/// Receiver channel, as selected by the switch on the PF IR receiver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PfChannel {
    /// Channel 1 (wire value 0).
    Ch1,
    /// Channel 2 (wire value 1).
    Ch2,
    /// Channel 3 (wire value 2).
    Ch3,
    /// Channel 4 (wire value 3).
    Ch4,
}

impl PfChannel {
    /// Channel from its wire value 0..=3.
    pub const fn new(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Ch1),
            1 => Some(Self::Ch2),
            2 => Some(Self::Ch3),
            3 => Some(Self::Ch4),
            _ => None,
        }
    }

    /// Wire value 0..=3.
    pub const fn value(self) -> u8 {
        self as u8
    }
}

/// Per-output command in Combo Direct mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DirectCommand {
    /// Let the motor coast.
    #[default]
    Float,
    /// Full speed forward.
    Forward,
    /// Full speed reverse.
    Reverse,
    /// Short the motor terminals.
    Brake,
}

impl DirectCommand {
    /// 2-bit wire code.
    pub const fn code(self) -> u8 {
        match self {
            Self::Float => 0,
            Self::Forward => 1,
            Self::Reverse => 2,
            Self::Brake => 3,
        }
    }
}

/// One of the seven PWM speed steps.
///
/// Serializes as the bare step number. Deserializing anything outside
/// 1..=7 fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct PwmSpeed(u8);

impl PwmSpeed {
    /// Slowest step.
    pub const MIN: PwmSpeed = PwmSpeed(1);
    /// Fastest step.
    pub const MAX: PwmSpeed = PwmSpeed(7);

    /// Speed step 1..=7.
    pub const fn new(step: u8) -> Option<Self> {
        match step {
            1..=7 => Some(Self(step)),
            _ => None,
        }
    }

    /// Speed step, clamped into 1..=7.
    pub fn clamped(step: u8) -> Self {
        Self(step.clamp(1, 7))
    }

    /// Step 1..=7.
    pub const fn get(self) -> u8 {
        self.0
    }

    // Keeps wire codes inside one nibble.
    const fn step(self) -> u8 {
        match self.0 {
            0 => 1,
            s if s > 7 => 7,
            s => s,
        }
    }
}

/// A speed step outside 1..=7.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidPwmSpeed(pub u8);

impl core::fmt::Display for InvalidPwmSpeed {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "PWM speed step {} outside 1..=7", self.0)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InvalidPwmSpeed {}

impl TryFrom<u8> for PwmSpeed {
    type Error = InvalidPwmSpeed;

    fn try_from(step: u8) -> Result<Self, Self::Error> {
        Self::new(step).ok_or(InvalidPwmSpeed(step))
    }
}

impl From<PwmSpeed> for u8 {
    fn from(speed: PwmSpeed) -> u8 {
        speed.0
    }
}

/// Per-output command in Combo PWM mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PwmCommand {
    /// Let the motor coast.
    #[default]
    Float,
    /// Forward at the given step.
    Forward(PwmSpeed),
    /// Short the motor terminals.
    Brake,
    /// Reverse at the given step.
    Reverse(PwmSpeed),
}

impl PwmCommand {
    /// 4-bit wire code: 0 float, 1..=7 forward, 8 brake, 9..=15 reverse 7..=1.
    pub const fn code(self) -> u8 {
        match self {
            Self::Float => 0,
            Self::Forward(speed) => speed.step(),
            Self::Brake => 8,
            Self::Reverse(speed) => 16 - speed.step(),
        }
    }

    /// Decode a 4-bit wire code. Only the low nibble is used.
    pub const fn from_code(code: u8) -> Self {
        match code & 0x0F {
            0 => Self::Float,
            8 => Self::Brake,
            c @ 1..=7 => Self::Forward(PwmSpeed(c)),
            c => Self::Reverse(PwmSpeed(16 - c)),
        }
    }

    /// Signed speed -7..=7 mapped onto a command; zero floats.
    ///
    /// ```rust
    /// use nxt_drivers::irlink::{PwmCommand, PwmSpeed};
    ///
    /// assert_eq!(PwmCommand::from_speed(3), PwmCommand::Forward(PwmSpeed::new(3).unwrap()));
    /// assert_eq!(PwmCommand::from_speed(-20), PwmCommand::Reverse(PwmSpeed::MAX));
    /// assert_eq!(PwmCommand::from_speed(0), PwmCommand::Float);
    /// ```
    pub fn from_speed(speed: i8) -> Self {
        match speed {
            0 => Self::Float,
            s if s > 0 => Self::Forward(PwmSpeed::clamped(s.unsigned_abs())),
            s => Self::Reverse(PwmSpeed::clamped(s.unsigned_abs())),
        }
    }
}

/// Checksum nibble over the first three nibbles of a logical command.
pub const fn checksum(byte0: u8, byte1_high: u8) -> u8 {
    0x0F ^ (byte0 >> 4) ^ (byte0 & 0x0F) ^ (byte1_high & 0x0F)
}

/// The 2-byte, pre-encoding form of a Power Functions command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogicalCommand {
    bytes: [u8; 2],
}

impl LogicalCommand {
    /// Wrap raw bytes as-is, without recomputing the checksum.
    pub const fn from_bytes(bytes: [u8; 2]) -> Self {
        Self { bytes }
    }

    /// Combo Direct command for both outputs of `channel`.
    ///
    /// ```rust
    /// use nxt_drivers::irlink::{DirectCommand, LogicalCommand, PfChannel};
    ///
    /// let cmd = LogicalCommand::combo_direct(
    ///     PfChannel::Ch1,
    ///     DirectCommand::Forward,
    ///     DirectCommand::Reverse,
    /// );
    /// assert_eq!(cmd.bytes(), [0x01, 0x68]);
    /// assert!(cmd.checksum_ok());
    /// ```
    pub const fn combo_direct(
        channel: PfChannel,
        motor_b: DirectCommand,
        motor_a: DirectCommand,
    ) -> Self {
        let byte0 = (channel.value() << 4) | 0x01;
        let high = (motor_b.code() << 2) | motor_a.code();
        Self {
            bytes: [byte0, (high << 4) | checksum(byte0, high)],
        }
    }

    /// Combo PWM command for both outputs of `channel`.
    pub const fn combo_pwm(channel: PfChannel, motor_b: PwmCommand, motor_a: PwmCommand) -> Self {
        let byte0 = 0x40 | (channel.value() << 4) | motor_a.code();
        let high = motor_b.code();
        Self {
            bytes: [byte0, (high << 4) | checksum(byte0, high)],
        }
    }

    /// Both bytes, most significant first.
    pub const fn bytes(&self) -> [u8; 2] {
        self.bytes
    }

    /// The 16 bits as one word, byte 0 in the high half.
    pub const fn word(&self) -> u16 {
        u16::from_be_bytes(self.bytes)
    }

    /// Receiver channel bits.
    pub const fn channel(&self) -> PfChannel {
        match (self.bytes[0] >> 4) & 0x03 {
            0 => PfChannel::Ch1,
            1 => PfChannel::Ch2,
            2 => PfChannel::Ch3,
            _ => PfChannel::Ch4,
        }
    }

    /// Checksum nibble stored in the command.
    pub const fn stored_checksum(&self) -> u8 {
        self.bytes[1] & 0x0F
    }

    /// Whether the stored checksum matches the one recomputed from the other nibbles.
    pub const fn checksum_ok(&self) -> bool {
        checksum(self.bytes[0], self.bytes[1] >> 4) == self.stored_checksum()
    }
}
