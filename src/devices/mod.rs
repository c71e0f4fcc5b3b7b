//! Peripheral drivers.
//!
//! Each driver owns (or mutably borrows) its transport. HiTechnic-style
//! sensors are generic over a [`SensorLink`](crate::link::SensorLink) so the
//! same driver works on a direct port (`new`) or a multiplexer channel
//! (`muxed`); command writes are only available on a direct port.
//!
//! | Driver | Device | Address |
//! |--------|--------|---------|
//! | [`AngleSensor`] | HiTechnic angle sensor | `0x02` |
//! | [`ColorSensor`] | HiTechnic color sensor V2 | `0x02` |
//! | [`Compass`] | HiTechnic compass | `0x02` |
//! | [`IrSeeker`] | HiTechnic IR seeker | `0x02` |
//! | [`IrSeekerV2`] | HiTechnic IR seeker V2 | `0x10` |
//! | [`Eeprom`] | 24C-series EEPROM | `0xA0` |
//! | [`Eopd`] | HiTechnic EOPD | analogue |
//! | [`Ultrasonic`] | LEGO ultrasonic sensor | `0x10` |
//! | [`PfMate`] | Mindsensors PF Mate | `0x48` |
//! | [`PowerMeter`] | Mindsensors power meter | `0x12` |
//! | [`Servo`] | Mindsensors NXTServo | `0xB0` |
//!
//! The HiTechnic IR-Link lives in [`crate::irlink`].

pub mod angle;
pub mod color;
pub mod compass;
pub mod eeprom;
pub mod eopd;
pub mod irseeker;
pub mod irseeker2;
pub mod pf_mate;
pub mod power_meter;
pub mod servo;
pub mod ultrasonic;

pub use angle::AngleSensor;
pub use color::{ColorMode, ColorSensor, MainsFrequency, Rgb};
pub use compass::Compass;
pub use eeprom::Eeprom;
pub use eopd::{Eopd, MuxAnalogue};
pub use irseeker::IrSeeker;
pub use irseeker2::{DspMode, IrSeekerV2};
pub use pf_mate::{MotorControl, PfMate};
pub use power_meter::{PowerMeter, PowerReading};
pub use servo::Servo;
pub use ultrasonic::{Ultrasonic, UltrasonicMode};
