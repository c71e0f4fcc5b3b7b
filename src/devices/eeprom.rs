//! 24C-series serial EEPROM with 16-bit word addressing.
//!
//! Reads first set the internal address pointer with a write that carries no
//! data, then read sequentially from there. Both directions are limited by
//! the size of a single NXT I2C message.

use heapless::Vec;

use crate::error::Error;
use crate::traits::I2cBus;

/// Default bus address.
pub const EEPROM_ADDRESS: u8 = 0xA0;

/// Page size in bytes. A write must not cross a page boundary.
pub const PAGE_SIZE: u16 = 128;

/// Most bytes one read can return.
pub const MAX_READ: usize = 16;

/// Most data bytes one write can carry.
pub const MAX_WRITE: usize = 13;

/// Serial EEPROM.
///
/// # Example
///
/// ```rust
/// use nxt_drivers::devices::Eeprom;
/// use nxt_drivers::hal::MockBus;
///
/// let mut bus = MockBus::new();
/// bus.queue_reply(b"nxt");
///
/// let mut eeprom = Eeprom::new(&mut bus);
/// let bytes = eeprom.read_vec(0x0100, 3).unwrap();
/// assert_eq!(bytes.as_slice(), b"nxt");
/// ```
#[derive(Debug)]
pub struct Eeprom<B> {
    bus: B,
    address: u8,
}

impl<B: I2cBus> Eeprom<B> {
    /// EEPROM at the default address.
    pub fn new(bus: B) -> Self {
        Self::with_address(bus, EEPROM_ADDRESS)
    }

    /// EEPROM at a custom address, for chips with strapped address pins.
    pub fn with_address(bus: B, address: u8) -> Self {
        Self { bus, address }
    }

    /// Read `buf.len()` bytes starting at `address`.
    pub fn read(&mut self, address: u16, buf: &mut [u8]) -> Result<(), Error<B::Error>> {
        if buf.len() > MAX_READ {
            return Err(Error::PayloadTooLarge {
                len: buf.len(),
                max: MAX_READ,
            });
        }
        let [hi, lo] = address.to_be_bytes();
        self.bus.write(self.address, hi, &[lo]).map_err(Error::Bus)?;
        self.bus.read(self.address, buf).map_err(Error::Bus)
    }

    /// Read `len` bytes starting at `address` into a new buffer.
    pub fn read_vec(
        &mut self,
        address: u16,
        len: usize,
    ) -> Result<Vec<u8, MAX_READ>, Error<B::Error>> {
        if len > MAX_READ {
            return Err(Error::PayloadTooLarge { len, max: MAX_READ });
        }
        let mut buf = [0u8; MAX_READ];
        self.read(address, &mut buf[..len])?;
        // len <= MAX_READ was checked above
        Ok(buf[..len].iter().copied().collect())
    }

    /// Write `data` starting at `address`.
    ///
    /// The chip needs a few milliseconds to commit a write before it answers
    /// again.
    pub fn write(&mut self, address: u16, data: &[u8]) -> Result<(), Error<B::Error>> {
        if data.len() > MAX_WRITE {
            return Err(Error::PayloadTooLarge {
                len: data.len(),
                max: MAX_WRITE,
            });
        }
        let [hi, lo] = address.to_be_bytes();
        let mut payload = [0u8; MAX_WRITE + 1];
        payload[0] = lo;
        payload[1..=data.len()].copy_from_slice(data);
        log::debug!("eeprom: writing {} bytes at {:#06x}", data.len(), address);
        self.bus
            .write(self.address, hi, &payload[..=data.len()])
            .map_err(Error::Bus)
    }

    /// Returns the bus.
    pub fn release(self) -> B {
        self.bus
    }
}
