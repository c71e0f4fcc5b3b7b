//! Mock implementations for testing without hardware.
//!
//! This module provides test doubles for every platform trait, so drivers can
//! be exercised on the desktop. Each mock records what the driver asked of it
//! and can be told to fail.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockBus`] | [`I2cBus`] | Records transactions, replays queued replies |
//! | [`MockDelay`] | [`Delay`] | Records requested delays |
//! | [`MockMux`] | [`SensorMux`] | Per-channel sensor types and analogue values |
//! | [`MockAnalog`] | [`AnalogPort`] | Settable raw value, tracks active state |
//!
//! # Example
//!
//! ```rust
//! use nxt_drivers::devices::AngleSensor;
//! use nxt_drivers::hal::{MockBus, Transaction};
//!
//! let mut bus = MockBus::new();
//! bus.queue_reply(&[45, 1]); // 45 * 2 + 1 degrees
//!
//! let mut sensor = AngleSensor::new(&mut bus);
//! assert_eq!(sensor.read_angle().unwrap(), 91);
//!
//! assert_eq!(bus.transactions, vec![Transaction::write_read(0x02, 0x42, 2)]);
//! ```
//!
//! [`I2cBus`]: crate::traits::I2cBus
//! [`Delay`]: crate::traits::Delay
//! [`SensorMux`]: crate::traits::SensorMux
//! [`AnalogPort`]: crate::traits::AnalogPort

use std::collections::VecDeque;

use crate::traits::{AnalogPort, Delay, I2cBus, MuxChannel, MuxSensorType, SensorMux};

/// Error returned by mocks told to fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MockError;

// ============================================================================
// Bus
// ============================================================================

/// A bus transaction recorded by [`MockBus`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transaction {
    /// Register write.
    Write {
        /// Device address.
        address: u8,
        /// Register written first.
        register: u8,
        /// Bytes following the register.
        payload: Vec<u8>,
    },
    /// Register read.
    WriteRead {
        /// Device address.
        address: u8,
        /// First register read.
        register: u8,
        /// Number of bytes read.
        len: usize,
    },
    /// Bare read.
    Read {
        /// Device address.
        address: u8,
        /// Number of bytes read.
        len: usize,
    },
}

impl Transaction {
    /// Shorthand for [`Transaction::Write`].
    pub fn write(address: u8, register: u8, payload: &[u8]) -> Self {
        Self::Write {
            address,
            register,
            payload: payload.to_vec(),
        }
    }

    /// Shorthand for [`Transaction::WriteRead`].
    pub fn write_read(address: u8, register: u8, len: usize) -> Self {
        Self::WriteRead {
            address,
            register,
            len,
        }
    }

    /// Shorthand for [`Transaction::Read`].
    pub fn read(address: u8, len: usize) -> Self {
        Self::Read { address, len }
    }
}

/// Mock I2C bus.
///
/// Every transaction is appended to [`transactions`](Self::transactions),
/// including ones the mock was told to fail. Reads are answered from a FIFO
/// of queued replies; a read with nothing queued returns zeros.
///
/// # Example
///
/// ```rust
/// use nxt_drivers::hal::{MockBus, Transaction};
/// use nxt_drivers::traits::I2cBus;
///
/// let mut bus = MockBus::new();
/// bus.fail_next(1);
///
/// assert!(bus.write(0x02, 0x41, &[0x00]).is_err());
/// assert!(bus.write(0x02, 0x41, &[0x00]).is_ok());
/// assert_eq!(bus.transactions.len(), 2);
/// assert_eq!(bus.failures, 1);
/// ```
#[derive(Debug, Default)]
pub struct MockBus {
    /// All transactions seen, in order.
    pub transactions: Vec<Transaction>,
    /// Number of transactions that were failed on purpose.
    pub failures: usize,
    replies: VecDeque<Vec<u8>>,
    fail_remaining: usize,
    fail_always: bool,
}

impl MockBus {
    /// Creates a mock bus with no queued replies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the bytes returned by the next read.
    pub fn queue_reply(&mut self, bytes: &[u8]) {
        self.replies.push_back(bytes.to_vec());
    }

    /// Fail the next `count` transactions.
    pub fn fail_next(&mut self, count: usize) {
        self.fail_remaining = count;
    }

    /// Fail every transaction from now on.
    pub fn fail_always(&mut self) {
        self.fail_always = true;
    }

    /// Only the write transactions, in order.
    pub fn writes(&self) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|t| matches!(t, Transaction::Write { .. }))
            .collect()
    }

    /// Forget recorded transactions.
    pub fn clear(&mut self) {
        self.transactions.clear();
        self.failures = 0;
    }

    fn record(&mut self, transaction: Transaction) -> Result<(), MockError> {
        self.transactions.push(transaction);
        if self.fail_always {
            self.failures += 1;
            return Err(MockError);
        }
        if self.fail_remaining > 0 {
            self.fail_remaining -= 1;
            self.failures += 1;
            return Err(MockError);
        }
        Ok(())
    }

    fn fill(&mut self, buf: &mut [u8]) {
        buf.fill(0);
        if let Some(reply) = self.replies.pop_front() {
            let n = reply.len().min(buf.len());
            buf[..n].copy_from_slice(&reply[..n]);
        }
    }
}

impl I2cBus for MockBus {
    type Error = MockError;

    fn write(&mut self, address: u8, register: u8, payload: &[u8]) -> Result<(), MockError> {
        self.record(Transaction::write(address, register, payload))
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), MockError> {
        self.record(Transaction::read(address, buf.len()))?;
        self.fill(buf);
        Ok(())
    }

    fn write_read(&mut self, address: u8, register: u8, buf: &mut [u8]) -> Result<(), MockError> {
        self.record(Transaction::write_read(address, register, buf.len()))?;
        self.fill(buf);
        Ok(())
    }
}

// ============================================================================
// Delay
// ============================================================================

/// Mock delay that records instead of sleeping.
#[derive(Debug, Default)]
pub struct MockDelay {
    /// Every requested delay in milliseconds.
    pub delays: Vec<u32>,
}

impl MockDelay {
    /// Creates a new mock delay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of all requested delays.
    pub fn total_ms(&self) -> u64 {
        self.delays.iter().map(|&ms| u64::from(ms)).sum()
    }
}

impl Delay for MockDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.delays.push(ms);
    }
}

// ============================================================================
// Multiplexer
// ============================================================================

/// A call recorded by [`MockMux`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MuxCall {
    /// `sensor_type(channel)`.
    SensorType(MuxChannel),
    /// `read_port(channel, offset, buf)`.
    ReadPort {
        /// Channel read.
        channel: MuxChannel,
        /// Data offset.
        offset: u8,
        /// Number of bytes.
        len: usize,
    },
    /// `read_analogue(channel)`.
    ReadAnalogue(MuxChannel),
    /// `set_analogue_active(channel, active)`.
    SetAnalogueActive {
        /// Channel configured.
        channel: MuxChannel,
        /// Requested state.
        active: bool,
    },
}

/// Mock sensor multiplexer.
///
/// Channels report [`MuxSensorType::None`] until a sensor is attached.
#[derive(Debug)]
pub struct MockMux {
    /// All calls seen, in order.
    pub calls: Vec<MuxCall>,
    /// Sensor type per channel.
    pub types: [MuxSensorType; 4],
    /// Raw analogue value per channel.
    pub analogue: [u16; 4],
    /// Analogue supply state per channel.
    pub active: [bool; 4],
    replies: VecDeque<Vec<u8>>,
    fail_remaining: usize,
}

impl Default for MockMux {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            types: [MuxSensorType::None; 4],
            analogue: [0; 4],
            active: [false; 4],
            replies: VecDeque::new(),
            fail_remaining: 0,
        }
    }
}

impl MockMux {
    /// Creates a mux with nothing attached.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `sensor` on `channel`.
    pub fn attach(&mut self, channel: MuxChannel, sensor: MuxSensorType) {
        self.types[channel.index()] = sensor;
    }

    /// Queue the bytes returned by the next `read_port`.
    pub fn queue_reply(&mut self, bytes: &[u8]) {
        self.replies.push_back(bytes.to_vec());
    }

    /// Set the raw analogue value of `channel`.
    pub fn set_analogue(&mut self, channel: MuxChannel, raw: u16) {
        self.analogue[channel.index()] = raw;
    }

    /// Fail the next `count` calls.
    pub fn fail_next(&mut self, count: usize) {
        self.fail_remaining = count;
    }

    fn record(&mut self, call: MuxCall) -> Result<(), MockError> {
        self.calls.push(call);
        if self.fail_remaining > 0 {
            self.fail_remaining -= 1;
            return Err(MockError);
        }
        Ok(())
    }
}

impl SensorMux for MockMux {
    type Error = MockError;

    fn sensor_type(&mut self, channel: MuxChannel) -> Result<MuxSensorType, MockError> {
        self.record(MuxCall::SensorType(channel))?;
        Ok(self.types[channel.index()])
    }

    fn read_port(
        &mut self,
        channel: MuxChannel,
        offset: u8,
        buf: &mut [u8],
    ) -> Result<(), MockError> {
        self.record(MuxCall::ReadPort {
            channel,
            offset,
            len: buf.len(),
        })?;
        buf.fill(0);
        if let Some(reply) = self.replies.pop_front() {
            let n = reply.len().min(buf.len());
            buf[..n].copy_from_slice(&reply[..n]);
        }
        Ok(())
    }

    fn read_analogue(&mut self, channel: MuxChannel) -> Result<u16, MockError> {
        self.record(MuxCall::ReadAnalogue(channel))?;
        Ok(self.analogue[channel.index()])
    }

    fn set_analogue_active(&mut self, channel: MuxChannel, active: bool) -> Result<(), MockError> {
        self.record(MuxCall::SetAnalogueActive { channel, active })?;
        self.active[channel.index()] = active;
        Ok(())
    }
}

// ============================================================================
// Analogue port
// ============================================================================

/// Mock analogue sensor port.
///
/// # Example
///
/// ```rust
/// use nxt_drivers::hal::MockAnalog;
/// use nxt_drivers::traits::AnalogPort;
///
/// let mut port = MockAnalog::new().with_raw(900);
/// assert_eq!(port.read_raw().unwrap(), 900);
///
/// port.set_active(true).unwrap();
/// assert!(port.active);
/// ```
#[derive(Debug, Default)]
pub struct MockAnalog {
    /// Raw value returned by `read_raw`.
    pub raw: u16,
    /// Current active state.
    pub active: bool,
    /// Number of `set_active` calls.
    pub mode_changes: usize,
    /// Whether every call fails.
    pub failing: bool,
}

impl MockAnalog {
    /// Creates a port reading zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a port reading `raw`.
    pub fn with_raw(mut self, raw: u16) -> Self {
        self.raw = raw;
        self
    }
}

impl AnalogPort for MockAnalog {
    type Error = MockError;

    fn read_raw(&mut self) -> Result<u16, MockError> {
        if self.failing {
            return Err(MockError);
        }
        Ok(self.raw)
    }

    fn set_active(&mut self, active: bool) -> Result<(), MockError> {
        if self.failing {
            return Err(MockError);
        }
        self.active = active;
        self.mode_changes += 1;
        Ok(())
    }
}
