//! Hardware Abstraction Layer implementations.
//!
//! This module contains concrete implementations of the traits
//! defined in [`crate::traits`].
//!
//! # Available Implementations
//!
//! - `mock`: Test doubles for desktop development (requires `std` feature)
//! - `ehal`: Adapters for `embedded-hal` 1.0 HALs (requires `embedded-hal` feature)

#[cfg(feature = "std")]
pub mod mock;

#[cfg(feature = "embedded-hal")]
pub mod ehal;

#[cfg(feature = "std")]
pub use mock::*;

#[cfg(feature = "embedded-hal")]
pub use ehal::*;
