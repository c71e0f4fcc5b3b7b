//! Hardware abstraction traits for the bus, delays and analogue inputs.
//!
//! These are the seams between the drivers and the platform firmware. The
//! drivers never talk to hardware directly; they issue register reads and
//! writes through [`I2cBus`] and wait through [`Delay`].
//!
//! # Key Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`I2cBus`] | Blocking register write/read transactions |
//! | [`Delay`] | Blocking millisecond delay |
//! | [`AnalogPort`] | Raw 10-bit analogue sensor input |
//!
//! # Addresses
//!
//! Device addresses are given in the 8-bit form used throughout NXT
//! documentation (`0x02`, `0x10`, `0xA0`, ...), i.e. the 7-bit address
//! shifted left by one. Adapters to 7-bit APIs must shift them back.
//!
//! # Example
//!
//! ```rust
//! use nxt_drivers::traits::I2cBus;
//! use nxt_drivers::hal::MockBus;
//!
//! let mut bus = MockBus::new();
//! bus.queue_reply(&[0x2A]);
//!
//! let mut reply = [0u8; 1];
//! bus.write_read(0x02, 0x42, &mut reply).unwrap();
//! assert_eq!(reply, [0x2A]);
//! ```

/// Blocking transaction primitive over a two-wire bus.
///
/// Implement this for the platform's I2C port. Only [`write`](Self::write)
/// and [`read`](Self::read) are required; [`write_read`](Self::write_read)
/// defaults to setting the register pointer with an empty write and then
/// reading.
///
/// # Implementation Notes
///
/// - `register` is the first byte on the wire after the address
/// - Calls must block until the transaction completes or fails
/// - No retries; drivers decide whether a failure is worth repeating
pub trait I2cBus {
    /// Error type for bus transactions.
    type Error;

    /// Write `register` followed by `payload` to the device at `address`.
    fn write(&mut self, address: u8, register: u8, payload: &[u8]) -> Result<(), Self::Error>;

    /// Read `buf.len()` bytes from the device at `address`.
    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Read `buf.len()` bytes starting at `register`.
    fn write_read(&mut self, address: u8, register: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.write(address, register, &[])?;
        self.read(address, buf)
    }
}

impl<T: I2cBus + ?Sized> I2cBus for &mut T {
    type Error = T::Error;

    fn write(&mut self, address: u8, register: u8, payload: &[u8]) -> Result<(), Self::Error> {
        T::write(self, address, register, payload)
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        T::read(self, address, buf)
    }

    fn write_read(&mut self, address: u8, register: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        T::write_read(self, address, register, buf)
    }
}

/// Blocking delay.
///
/// Used between IR-Link retransmissions and after switching analogue sensor
/// modes.
pub trait Delay {
    /// Block for the specified number of milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

impl<T: Delay + ?Sized> Delay for &mut T {
    fn delay_ms(&mut self, ms: u32) {
        T::delay_ms(self, ms)
    }
}

/// Raw analogue sensor input.
///
/// NXT sensor ports sample a 10-bit value (0..=1023). Many analogue sensors
/// also use the port's "active" supply line to switch an emitter on or off.
pub trait AnalogPort {
    /// Error type for port operations.
    type Error;

    /// Read the raw 10-bit sample.
    fn read_raw(&mut self) -> Result<u16, Self::Error>;

    /// Switch the port between active (powered) and inactive mode.
    fn set_active(&mut self, active: bool) -> Result<(), Self::Error>;
}

impl<T: AnalogPort + ?Sized> AnalogPort for &mut T {
    type Error = T::Error;

    fn read_raw(&mut self) -> Result<u16, Self::Error> {
        T::read_raw(self)
    }

    fn set_active(&mut self, active: bool) -> Result<(), Self::Error> {
        T::set_active(self, active)
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    // =========================================================================
    // I2cBus Default Methods Tests
    // =========================================================================

    #[derive(Default)]
    struct TestBus {
        writes: Vec<(u8, u8, Vec<u8>)>,
        reads: Vec<(u8, usize)>,
        fill: u8,
    }

    impl I2cBus for TestBus {
        type Error = ();

        fn write(&mut self, address: u8, register: u8, payload: &[u8]) -> Result<(), ()> {
            self.writes.push((address, register, payload.to_vec()));
            Ok(())
        }

        fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), ()> {
            self.reads.push((address, buf.len()));
            buf.fill(self.fill);
            Ok(())
        }
    }

    #[test]
    fn write_read_default_sets_pointer_then_reads() {
        let mut bus = TestBus {
            fill: 7,
            ..Default::default()
        };
        let mut buf = [0u8; 3];

        bus.write_read(0x02, 0x43, &mut buf).unwrap();

        assert_eq!(bus.writes, vec![(0x02, 0x43, vec![])]);
        assert_eq!(bus.reads, vec![(0x02, 3)]);
        assert_eq!(buf, [7, 7, 7]);
    }

    #[test]
    fn mut_ref_forwards_to_inner_bus() {
        let mut bus = TestBus::default();
        {
            let mut borrowed = &mut bus;
            borrowed.write(0x10, 0x41, &[1, 2]).unwrap();
        }
        assert_eq!(bus.writes, vec![(0x10, 0x41, vec![1, 2])]);
    }

    // =========================================================================
    // Delay Tests
    // =========================================================================

    struct TestDelay {
        total: u32,
    }

    impl Delay for TestDelay {
        fn delay_ms(&mut self, ms: u32) {
            self.total += ms;
        }
    }

    #[test]
    fn delay_through_mut_ref() {
        let mut delay = TestDelay { total: 0 };
        {
            let mut borrowed = &mut delay;
            borrowed.delay_ms(10);
            borrowed.delay_ms(5);
        }
        assert_eq!(delay.total, 15);
    }
}
