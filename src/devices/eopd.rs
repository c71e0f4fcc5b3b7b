//! HiTechnic EOPD (electro-optical proximity detector).
//!
//! An analogue sensor: it emits its own light and reports the reflection, so
//! readings do not depend on ambient light. The port's active line selects
//! the range; long range powers the emitter harder.
//!
//! The sensor can sit on a plain analogue port or on a multiplexer channel,
//! wrapped in [`MuxAnalogue`].

use crate::config::EopdConfig;
use crate::error::Error;
use crate::traits::{AnalogPort, Delay, MuxChannel, SensorMux};

/// Highest raw sample of an NXT analogue port.
pub const ANALOGUE_MAX: u16 = 1023;

/// HiTechnic EOPD.
///
/// # Example
///
/// ```rust
/// use nxt_drivers::devices::Eopd;
/// use nxt_drivers::hal::{MockAnalog, MockDelay};
///
/// let mut port = MockAnalog::new().with_raw(1013);
/// let mut delay = MockDelay::new();
/// let mut eopd = Eopd::new(&mut port, &mut delay);
///
/// eopd.set_long_range().unwrap();
/// assert_eq!(eopd.read_raw().unwrap(), 10);
/// assert_eq!(eopd.read_processed().unwrap(), 10);
/// ```
#[derive(Debug)]
pub struct Eopd<P, D> {
    port: P,
    delay: D,
    config: EopdConfig,
}

impl<P: AnalogPort, D: Delay> Eopd<P, D> {
    /// Sensor on `port` with the default settle time.
    pub fn new(port: P, delay: D) -> Self {
        Self::with_config(port, delay, EopdConfig::default())
    }

    /// Sensor on `port` with explicit settings.
    pub fn with_config(port: P, delay: D, config: EopdConfig) -> Self {
        Self { port, delay, config }
    }

    /// Reflected light level, 0 (nothing) to 1023.
    pub fn read_raw(&mut self) -> Result<u16, Error<P::Error>> {
        let sample = self.port.read_raw().map_err(Error::Bus)?;
        Ok(ANALOGUE_MAX.saturating_sub(sample))
    }

    /// Raw value linearized against distance: `sqrt(raw * 10)`.
    pub fn read_processed(&mut self) -> Result<u16, Error<P::Error>> {
        let raw = self.read_raw()?;
        Ok(isqrt(u32::from(raw) * 10) as u16)
    }

    /// Switch to short range and wait for readings to settle.
    pub fn set_short_range(&mut self) -> Result<(), Error<P::Error>> {
        self.set_short_range_no_wait()?;
        self.delay.delay_ms(self.config.settle_ms);
        Ok(())
    }

    /// Switch to long range and wait for readings to settle.
    pub fn set_long_range(&mut self) -> Result<(), Error<P::Error>> {
        self.set_long_range_no_wait()?;
        self.delay.delay_ms(self.config.settle_ms);
        Ok(())
    }

    /// Switch to short range without waiting.
    pub fn set_short_range_no_wait(&mut self) -> Result<(), Error<P::Error>> {
        log::debug!("eopd: short range");
        self.port.set_active(false).map_err(Error::Bus)
    }

    /// Switch to long range without waiting.
    pub fn set_long_range_no_wait(&mut self) -> Result<(), Error<P::Error>> {
        log::debug!("eopd: long range");
        self.port.set_active(true).map_err(Error::Bus)
    }

    /// Returns the port and delay.
    pub fn release(self) -> (P, D) {
        (self.port, self.delay)
    }
}

/// An analogue multiplexer channel used as an [`AnalogPort`].
#[derive(Debug)]
pub struct MuxAnalogue<M> {
    mux: M,
    channel: MuxChannel,
}

impl<M: SensorMux> MuxAnalogue<M> {
    /// Port on `channel`.
    pub fn new(mux: M, channel: MuxChannel) -> Self {
        Self { mux, channel }
    }

    /// Returns the multiplexer.
    pub fn release(self) -> M {
        self.mux
    }
}

impl<M: SensorMux> AnalogPort for MuxAnalogue<M> {
    type Error = M::Error;

    fn read_raw(&mut self) -> Result<u16, M::Error> {
        self.mux.read_analogue(self.channel)
    }

    fn set_active(&mut self, active: bool) -> Result<(), M::Error> {
        self.mux.set_analogue_active(self.channel, active)
    }
}

/// Integer square root, rounded down.
fn isqrt(n: u32) -> u32 {
    if n < 2 {
        return n;
    }
    // Newton's method from an over-estimate converges from above
    let mut x = n;
    let mut y = n / 2 + (n & 1);
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use crate::hal::{MockAnalog, MockDelay, MockError, MockMux, MuxCall};

    #[test]
    fn isqrt_floors() {
        assert_eq!(isqrt(0), 0);
        assert_eq!(isqrt(1), 1);
        assert_eq!(isqrt(3), 1);
        assert_eq!(isqrt(4), 2);
        assert_eq!(isqrt(99), 9);
        assert_eq!(isqrt(100), 10);
        assert_eq!(isqrt(10230), 101);
        for n in 0..5000u32 {
            let r = isqrt(n);
            assert!(r * r <= n && (r + 1) * (r + 1) > n, "isqrt({})", n);
        }
    }

    #[test]
    fn raw_is_inverted_sample() {
        let mut port = MockAnalog::new().with_raw(23);
        let mut delay = MockDelay::new();
        let mut eopd = Eopd::new(&mut port, &mut delay);

        assert_eq!(eopd.read_raw().unwrap(), 1000);
        assert_eq!(eopd.read_processed().unwrap(), 100);
    }

    #[test]
    fn raw_saturates_on_out_of_range_sample() {
        let mut port = MockAnalog::new().with_raw(2000);
        let mut delay = MockDelay::new();
        let mut eopd = Eopd::new(&mut port, &mut delay);

        assert_eq!(eopd.read_raw().unwrap(), 0);
    }

    #[test]
    fn range_switch_waits() {
        let mut port = MockAnalog::new();
        let mut delay = MockDelay::new();
        {
            let mut eopd = Eopd::new(&mut port, &mut delay);
            eopd.set_long_range().unwrap();
            eopd.set_short_range().unwrap();
            eopd.set_long_range_no_wait().unwrap();
        }
        assert!(port.active);
        assert_eq!(port.mode_changes, 3);
        assert_eq!(delay.delays, vec![10, 10]);
    }

    #[test]
    fn failed_switch_skips_wait() {
        let mut port = MockAnalog {
            failing: true,
            ..Default::default()
        };
        let mut delay = MockDelay::new();
        {
            let config = EopdConfig::default().with_settle_ms(25);
            let mut eopd = Eopd::with_config(&mut port, &mut delay, config);
            assert_eq!(eopd.set_short_range(), Err(Error::Bus(MockError)));
        }
        assert!(delay.delays.is_empty());
    }

    #[test]
    fn muxed_channel() {
        let mut mux = MockMux::new();
        mux.set_analogue(MuxChannel::C3, 823);
        let mut delay = MockDelay::new();
        {
            let port = MuxAnalogue::new(&mut mux, MuxChannel::C3);
            let mut eopd = Eopd::new(port, &mut delay);
            eopd.set_short_range_no_wait().unwrap();
            assert_eq!(eopd.read_raw().unwrap(), 200);
        }
        assert_eq!(
            mux.calls,
            vec![
                MuxCall::SetAnalogueActive {
                    channel: MuxChannel::C3,
                    active: false
                },
                MuxCall::ReadAnalogue(MuxChannel::C3),
            ]
        );
    }
}
