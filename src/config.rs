//! Driver configuration shared by desktop and brick builds.
//!
//! Holds the few tunables the drivers have. Defaults match the timings the
//! devices were characterized with; builders override individual fields.
//!
//! # Example
//!
//! ```rust
//! use nxt_drivers::config::{Config, EopdConfig, IrLinkConfig};
//!
//! // Use defaults
//! let config = Config::default();
//! assert_eq!(config.irlink.resend_count, 4);
//!
//! // Or customize
//! let config = Config::default()
//!     .with_irlink(IrLinkConfig::default().with_resend_count(6))
//!     .with_eopd(EopdConfig::default().with_settle_ms(20));
//! assert_eq!(config.irlink.resend_count, 6);
//! ```

// ============================================================================
// Main Config
// ============================================================================

/// Complete driver configuration
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// IR-Link transmitter settings
    pub irlink: IrLinkConfig,
    /// EOPD sensor settings
    pub eopd: EopdConfig,
}

impl Config {
    /// Set IR-Link configuration
    pub fn with_irlink(mut self, irlink: IrLinkConfig) -> Self {
        self.irlink = irlink;
        self
    }

    /// Set EOPD configuration
    pub fn with_eopd(mut self, eopd: EopdConfig) -> Self {
        self.eopd = eopd;
        self
    }
}

// ============================================================================
// IR-Link Config
// ============================================================================

/// IR-Link transmitter configuration
///
/// Power Functions receivers miss the odd frame, so every command is sent
/// several times back to back.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IrLinkConfig {
    /// Number of times each frame is written to the IR-Link
    pub resend_count: u8,
    /// Pause after each write in milliseconds
    pub resend_delay_ms: u32,
}

impl Default for IrLinkConfig {
    fn default() -> Self {
        Self {
            resend_count: 4,
            resend_delay_ms: 48,
        }
    }
}

impl IrLinkConfig {
    /// Set the number of writes per frame (at least one)
    pub fn with_resend_count(mut self, count: u8) -> Self {
        self.resend_count = count.max(1);
        self
    }

    /// Set the pause after each write
    pub fn with_resend_delay_ms(mut self, ms: u32) -> Self {
        self.resend_delay_ms = ms;
        self
    }

    /// Total time one transmission spends waiting
    pub fn transmit_time_ms(&self) -> u32 {
        u32::from(self.resend_count) * self.resend_delay_ms
    }
}

// ============================================================================
// EOPD Config
// ============================================================================

/// EOPD sensor configuration
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EopdConfig {
    /// Wait after switching range before readings are valid, in milliseconds
    pub settle_ms: u32,
}

impl Default for EopdConfig {
    fn default() -> Self {
        Self { settle_ms: 10 }
    }
}

impl EopdConfig {
    /// Set the settle time
    pub fn with_settle_ms(mut self, ms: u32) -> Self {
        self.settle_ms = ms;
        self
    }
}
