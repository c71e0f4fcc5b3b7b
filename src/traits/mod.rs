//! Trait definitions for the platform collaborators the drivers call into.
//!
//! The drivers in this crate are plain register glue; everything that touches
//! real hardware goes through one of these traits so the same code runs on
//! the brick and against the mocks in [`crate::hal`].
//!
//! # Submodules
//!
//! - `hardware`: I2C bus transactions, delays, analogue ports
//! - `mux`: Sensor multiplexer channels and detected sensor types

pub mod hardware;
pub mod mux;

pub use hardware::*;
pub use mux::*;
