//! # nxt-drivers
//!
//! Drivers for I2C and analogue peripherals of NXT-class robot bricks, and a
//! LEGO Power Functions encoder for the HiTechnic IR-Link.
//!
//! ## Features
//!
//! - **IR-Link Power Functions**: Combo Direct and Combo PWM commands,
//!   pulse-width encoded into IR-Link frames and sent with resends
//! - **Sensor drivers**: angle, color, compass, IR seekers, EOPD, ultrasonic
//! - **Actuators and misc**: PF Mate, NXTServo, power meter, EEPROM
//! - **Multiplexer support**: HiTechnic-style sensors work on a direct port
//!   or on a sensor multiplexer channel with type checking
//! - **Platform agnostic**: drivers talk to traits; `no_std` without the
//!   `std` feature
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without hardware:
//!
//! - `traits` - Bus, delay, analogue port and multiplexer abstractions
//! - `link` - Direct and multiplexed access to a sensor's data registers
//! - `irlink` - Power Functions command model, encoder and transmitter
//! - `devices` - One driver per peripheral
//! - `hal` - Concrete implementations (mock for testing, embedded-hal adapters)
//!
//! ## Example
//!
//! ```rust
//! use nxt_drivers::{
//!     hal::{MockBus, MockDelay},
//!     irlink::{IrLink, PfChannel, PwmCommand},
//! };
//!
//! let mut bus = MockBus::new();
//! let mut delay = MockDelay::new();
//! let mut link = IrLink::new(&mut bus, &mut delay);
//!
//! // Receiver on channel 1: output B forward at step 4, output A floating
//! link.combo_pwm(PfChannel::Ch1, PwmCommand::from_speed(4), PwmCommand::Float)
//!     .unwrap();
//!
//! // Each frame is written four times, 48 ms apart
//! assert_eq!(bus.transactions.len(), 4);
//! assert_eq!(delay.total_ms(), 192);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

/// Driver tunables with defaults and builders.
pub mod config;
/// Peripheral drivers.
pub mod devices;
/// Error type shared by every driver.
pub mod error;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Power Functions commands over the HiTechnic IR-Link.
pub mod irlink;
/// Direct and multiplexed sensor register access.
pub mod link;
/// Core traits for hardware abstraction.
pub mod traits;

// Re-exports for convenience
pub use config::{Config, EopdConfig, IrLinkConfig};
pub use error::Error;
pub use irlink::{DirectCommand, IrFrame, IrLink, LogicalCommand, PfChannel, PwmCommand, PwmSpeed};
pub use link::{I2cLink, MuxLink, SensorLink};
pub use traits::{
    // Hardware
    AnalogPort,
    Delay,
    I2cBus,
    // Multiplexer
    MuxChannel,
    MuxSensorType,
    SensorMux,
};
