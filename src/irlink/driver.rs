//! IR-Link transmitter.
//!
//! Builds a frame per command and writes it to the IR-Link several times in a
//! row. Receivers need the repeats; a single frame is easily lost.

use crate::config::IrLinkConfig;
use crate::error::Error;
use crate::traits::{Delay, I2cBus};

use super::command::{DirectCommand, LogicalCommand, PfChannel, PwmCommand};
use super::encoder::IrFrame;

/// HiTechnic IR-Link sending Power Functions commands.
///
/// # Example
///
/// ```rust
/// use nxt_drivers::hal::{MockBus, MockDelay};
/// use nxt_drivers::irlink::{DirectCommand, IrLink, PfChannel};
///
/// let mut bus = MockBus::new();
/// let mut delay = MockDelay::new();
/// let mut link = IrLink::new(&mut bus, &mut delay);
///
/// let delivered = link
///     .combo_direct(PfChannel::Ch1, DirectCommand::Forward, DirectCommand::Reverse)
///     .unwrap();
/// assert_eq!(delivered, 4);
/// assert_eq!(bus.transactions.len(), 4);
/// ```
#[derive(Debug)]
pub struct IrLink<B, D> {
    bus: B,
    delay: D,
    config: IrLinkConfig,
}

impl<B: I2cBus, D: Delay> IrLink<B, D> {
    /// Creates a transmitter with the default resend settings.
    pub fn new(bus: B, delay: D) -> Self {
        Self::with_config(bus, delay, IrLinkConfig::default())
    }

    /// Creates a transmitter with explicit resend settings.
    pub fn with_config(bus: B, delay: D, config: IrLinkConfig) -> Self {
        Self { bus, delay, config }
    }

    /// Current resend settings.
    pub fn config(&self) -> &IrLinkConfig {
        &self.config
    }

    /// Drive both outputs of a receiver in Combo Direct mode.
    ///
    /// Returns the number of frames delivered to the IR-Link.
    pub fn combo_direct(
        &mut self,
        channel: PfChannel,
        motor_b: DirectCommand,
        motor_a: DirectCommand,
    ) -> Result<u8, Error<B::Error>> {
        self.send(&LogicalCommand::combo_direct(channel, motor_b, motor_a))
    }

    /// Drive both outputs of a receiver in Combo PWM mode.
    ///
    /// Returns the number of frames delivered to the IR-Link.
    pub fn combo_pwm(
        &mut self,
        channel: PfChannel,
        motor_b: PwmCommand,
        motor_a: PwmCommand,
    ) -> Result<u8, Error<B::Error>> {
        self.send(&LogicalCommand::combo_pwm(channel, motor_b, motor_a))
    }

    /// Encode and transmit a logical command.
    pub fn send(&mut self, command: &LogicalCommand) -> Result<u8, Error<B::Error>> {
        log::debug!("IR-Link: sending PF command {:02x?}", command.bytes());
        self.transmit(&IrFrame::power_functions(command))
    }

    /// Write `frame` to the IR-Link `resend_count` times.
    ///
    /// Every attempt is followed by `resend_delay_ms`. A failed write does not
    /// stop the remaining attempts. Succeeds with the number of delivered
    /// writes if at least one went through; otherwise fails with
    /// [`Error::TransmitFailed`] carrying the last bus error.
    pub fn transmit(&mut self, frame: &IrFrame) -> Result<u8, Error<B::Error>> {
        if log::log_enabled!(log::Level::Trace) {
            log::trace!("IR-Link frame:\n{}", frame.render_bits());
        }

        let attempts = self.config.resend_count.max(1);
        let mut delivered = 0u8;
        let mut last_error = None;

        for attempt in 1..=attempts {
            match self
                .bus
                .write(frame.address(), frame.register(), frame.wire_bytes())
            {
                Ok(()) => delivered += 1,
                Err(e) => {
                    log::warn!("IR-Link: write {}/{} failed", attempt, attempts);
                    last_error = Some(e);
                }
            }
            self.delay.delay_ms(self.config.resend_delay_ms);
        }

        if delivered == 0 {
            if let Some(source) = last_error {
                log::error!("IR-Link: all {} writes failed", attempts);
                return Err(Error::TransmitFailed { attempts, source });
            }
        }
        Ok(delivered)
    }

    /// Returns the bus and delay.
    pub fn release(self) -> (B, D) {
        (self.bus, self.delay)
    }
}
