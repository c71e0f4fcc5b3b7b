//! Sensor multiplexer abstraction.
//!
//! A HiTechnic-style sensor multiplexer sits on one NXT port and exposes four
//! channels. It scans the attached sensors on startup and reports the type it
//! detected on each channel; digital sensor data is then read from the
//! multiplexer's own register window for that channel.
//!
//! The multiplexer firmware protocol itself belongs to the platform. Drivers
//! only need the operations in [`SensorMux`].

use core::fmt;

/// One of the four multiplexer channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MuxChannel {
    /// Channel 1.
    C1,
    /// Channel 2.
    C2,
    /// Channel 3.
    C3,
    /// Channel 4.
    C4,
}

impl MuxChannel {
    /// All channels in order.
    pub const ALL: [MuxChannel; 4] = [Self::C1, Self::C2, Self::C3, Self::C4];

    /// Zero-based channel index.
    pub const fn index(self) -> usize {
        match self {
            Self::C1 => 0,
            Self::C2 => 1,
            Self::C3 => 2,
            Self::C4 => 3,
        }
    }

    /// Channel from a zero-based index.
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::C1),
            1 => Some(Self::C2),
            2 => Some(Self::C3),
            3 => Some(Self::C4),
            _ => None,
        }
    }
}

/// Sensor type detected by the multiplexer on a channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MuxSensorType {
    /// Nothing detected.
    None,
    /// Generic analogue sensor.
    Analogue,
    /// LEGO ultrasonic sensor.
    LegoUltrasonic,
    /// HiTechnic compass.
    Compass,
    /// HiTechnic color sensor v2.
    ColorV2,
    /// HiTechnic angle sensor.
    Angle,
    /// HiTechnic IR seeker v1.
    IrSeeker,
    /// HiTechnic IR seeker v2.
    IrSeekerV2,
}

impl fmt::Display for MuxSensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Analogue => "analogue",
            Self::LegoUltrasonic => "LEGO ultrasonic",
            Self::Compass => "compass",
            Self::ColorV2 => "color v2",
            Self::Angle => "angle",
            Self::IrSeeker => "IR seeker",
            Self::IrSeekerV2 => "IR seeker v2",
        };
        f.write_str(name)
    }
}

/// Sensor multiplexer trait.
///
/// # Implementation Notes
///
/// - `read_port` offsets are relative to the attached sensor's data block,
///   i.e. offset 0 is what the sensor itself exposes at register `0x42`
/// - `read_analogue` returns the raw 10-bit sample of an analogue channel
pub trait SensorMux {
    /// Error type for multiplexer operations.
    type Error;

    /// Returns the sensor type detected on `channel`.
    fn sensor_type(&mut self, channel: MuxChannel) -> Result<MuxSensorType, Self::Error>;

    /// Reads `buf.len()` data bytes of the sensor on `channel`, starting at `offset`.
    fn read_port(
        &mut self,
        channel: MuxChannel,
        offset: u8,
        buf: &mut [u8],
    ) -> Result<(), Self::Error>;

    /// Reads the raw analogue value of `channel`.
    fn read_analogue(&mut self, channel: MuxChannel) -> Result<u16, Self::Error>;

    /// Switches the analogue supply of `channel` on or off.
    fn set_analogue_active(&mut self, channel: MuxChannel, active: bool) -> Result<(), Self::Error>;
}

impl<T: SensorMux + ?Sized> SensorMux for &mut T {
    type Error = T::Error;

    fn sensor_type(&mut self, channel: MuxChannel) -> Result<MuxSensorType, Self::Error> {
        T::sensor_type(self, channel)
    }

    fn read_port(
        &mut self,
        channel: MuxChannel,
        offset: u8,
        buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        T::read_port(self, channel, offset, buf)
    }

    fn read_analogue(&mut self, channel: MuxChannel) -> Result<u16, Self::Error> {
        T::read_analogue(self, channel)
    }

    fn set_analogue_active(
        &mut self,
        channel: MuxChannel,
        active: bool,
    ) -> Result<(), Self::Error> {
        T::set_analogue_active(self, channel, active)
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn channel_index_round_trip() {
        for (i, ch) in MuxChannel::ALL.iter().enumerate() {
            assert_eq!(ch.index(), i);
            assert_eq!(MuxChannel::from_index(i), Some(*ch));
        }
        assert_eq!(MuxChannel::from_index(4), None);
    }

    #[test]
    fn sensor_type_display() {
        assert_eq!(format!("{}", MuxSensorType::ColorV2), "color v2");
        assert_eq!(format!("{}", MuxSensorType::None), "none");
    }
}
