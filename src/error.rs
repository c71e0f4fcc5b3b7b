//! Error type shared by every driver.
//!
//! All fallible driver operations return `Result<T, Error<E>>`, where `E` is
//! the error type of the underlying transport ([`I2cBus`], [`SensorMux`] or
//! [`AnalogPort`]).
//!
//! [`I2cBus`]: crate::traits::I2cBus
//! [`SensorMux`]: crate::traits::SensorMux
//! [`AnalogPort`]: crate::traits::AnalogPort

use core::fmt;

use crate::traits::MuxSensorType;

/// Driver error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error<E> {
    /// The transport reported a failure.
    Bus(E),

    /// A multiplexer channel holds a different sensor than the driver expects.
    ///
    /// Checked before any data is read.
    SensorTypeMismatch {
        /// Sensor type the driver needs.
        expected: MuxSensorType,
        /// Sensor type the multiplexer reported.
        found: MuxSensorType,
    },

    /// Every IR-Link transmission attempt failed.
    TransmitFailed {
        /// Number of writes attempted.
        attempts: u8,
        /// Error from the last attempt.
        source: E,
    },

    /// The compass rejected its calibration data.
    CalibrationFailed,

    /// Channel number out of range for the device.
    InvalidChannel(u8),

    /// Sensor element index out of range for the device.
    InvalidSensor(u8),

    /// Request does not fit in a single NXT I2C message.
    PayloadTooLarge {
        /// Requested length in bytes.
        len: usize,
        /// Maximum length in bytes.
        max: usize,
    },
}

impl<E> Error<E> {
    /// Returns the transport error, if this is one.
    pub fn bus_error(&self) -> Option<&E> {
        match self {
            Error::Bus(e) | Error::TransmitFailed { source: e, .. } => Some(e),
            _ => None,
        }
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Bus(e) => write!(f, "bus transaction failed: {:?}", e),
            Error::SensorTypeMismatch { expected, found } => {
                write!(f, "expected {} sensor on mux channel, found {}", expected, found)
            }
            Error::TransmitFailed { attempts, source } => {
                write!(f, "IR transmission failed after {} attempts: {:?}", attempts, source)
            }
            Error::CalibrationFailed => f.write_str("compass calibration failed"),
            Error::InvalidChannel(ch) => write!(f, "invalid channel {}", ch),
            Error::InvalidSensor(n) => write!(f, "invalid sensor element {}", n),
            Error::PayloadTooLarge { len, max } => {
                write!(f, "payload of {} bytes exceeds limit of {}", len, max)
            }
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for Error<E> {}
