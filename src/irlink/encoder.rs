//! Pulse-width encoding of logical commands into IR-Link frames.
//!
//! The IR-Link replays its buffer as a bit stream, one bit per IR time slot.
//! Power Functions receivers decode a logical bit from the gap between two
//! marks, so each logical bit becomes a `1` followed by zeros:
//!
//! ```text
//! start   10000000
//! 0       100
//! 1       10000
//! stop    1
//! ```
//!
//! Groups are packed MSB first with no regard for byte boundaries.

use heapless::String;

use super::command::LogicalCommand;

/// Payload size in bytes.
pub const PAYLOAD_SIZE: usize = 11;

/// Payload capacity in bits.
pub const PAYLOAD_BITS: usize = PAYLOAD_SIZE * 8;

/// Output slots used by a logical `0`.
pub const ZERO_BITS: usize = 3;

/// Output slots used by a logical `1`.
pub const ONE_BITS: usize = 5;

/// Slots taken by the start marker.
const START_BITS: usize = 8;

/// Encode a logical command into an 11-byte payload.
///
/// Marks that would land past the payload are dropped. That only happens to
/// the stop bit of an all-ones command, which no valid command is.
///
/// ```rust
/// use nxt_drivers::irlink::{encode_payload, LogicalCommand};
///
/// let payload = encode_payload(&LogicalCommand::from_bytes([0x01, 0x68]));
/// assert_eq!(
///     payload,
///     [0x80, 0x92, 0x49, 0x24, 0x24, 0x21, 0x21, 0x24, 0x80, 0x00, 0x00]
/// );
/// ```
pub fn encode_payload(command: &LogicalCommand) -> [u8; PAYLOAD_SIZE] {
    let mut payload = [0u8; PAYLOAD_SIZE];
    let word = command.word();

    set_mark(&mut payload, 0);
    let mut pos = START_BITS;

    for i in (0..16).rev() {
        set_mark(&mut payload, pos);
        pos += if word & (1 << i) != 0 { ONE_BITS } else { ZERO_BITS };
    }

    // stop
    set_mark(&mut payload, pos);
    payload
}

/// Number of payload slots an encoded command spans, stop bit included.
pub fn encoded_len(command: &LogicalCommand) -> usize {
    let ones = command.word().count_ones() as usize;
    START_BITS + ones * ONE_BITS + (16 - ones) * ZERO_BITS + 1
}

fn set_mark(payload: &mut [u8; PAYLOAD_SIZE], pos: usize) {
    if pos < PAYLOAD_BITS {
        payload[pos / 8] |= 0x80 >> (pos % 8);
    }
}

// ============================================================================
// Frame
// ============================================================================

/// IR-Link bus address (8-bit form).
pub const IRLINK_ADDRESS: u8 = 0x02;

/// First IR-Link transmit buffer register.
pub const IRLINK_REGISTER: u8 = 0x42;

/// IR-Link mode byte for Power Functions motor commands.
pub const MODE_POWER_FUNCTIONS: u8 = 0x02;

/// Total frame size in bytes.
pub const FRAME_SIZE: usize = HEAD_SIZE + PAYLOAD_SIZE + TAIL_SIZE;

/// Header: message length, address, register.
pub const HEAD_SIZE: usize = 3;

/// Trailer: IR data length, IR-Link mode, start flag.
pub const TAIL_SIZE: usize = 3;

/// Frame offset of the payload.
pub const PAYLOAD_START: usize = HEAD_SIZE;

/// Frame offset of the trailer.
pub const TAIL_START: usize = HEAD_SIZE + PAYLOAD_SIZE;

/// Capacity of a [`IrFrame::render_bits`] dump.
pub const DUMP_SIZE: usize = FRAME_SIZE * 17;

/// A complete NXT message for the IR-Link.
///
/// ```text
/// offset  0    1     2     3 .. 13    14   15    16
///         len  addr  reg   payload    11   mode  0x01
/// ```
///
/// The leading length byte counts the bytes after it. On the bus the frame
/// is a write of `bytes[3..]` to register [`IRLINK_REGISTER`]; writing the
/// final `0x01` starts the transmission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IrFrame {
    bytes: [u8; FRAME_SIZE],
}

impl IrFrame {
    /// Frame carrying a Power Functions command.
    pub fn power_functions(command: &LogicalCommand) -> Self {
        let mut bytes = [0u8; FRAME_SIZE];
        bytes[0] = (FRAME_SIZE - 1) as u8;
        bytes[1] = IRLINK_ADDRESS;
        bytes[2] = IRLINK_REGISTER;
        bytes[PAYLOAD_START..TAIL_START].copy_from_slice(&encode_payload(command));
        bytes[TAIL_START] = PAYLOAD_SIZE as u8;
        bytes[TAIL_START + 1] = MODE_POWER_FUNCTIONS;
        bytes[TAIL_START + 2] = 0x01;
        Self { bytes }
    }

    /// The whole message, length byte included.
    pub const fn as_bytes(&self) -> &[u8; FRAME_SIZE] {
        &self.bytes
    }

    /// Bus address the frame goes to.
    pub const fn address(&self) -> u8 {
        self.bytes[1]
    }

    /// Register the frame is written at.
    pub const fn register(&self) -> u8 {
        self.bytes[2]
    }

    /// Encoded payload.
    pub fn payload(&self) -> &[u8] {
        &self.bytes[PAYLOAD_START..TAIL_START]
    }

    /// Bytes written after the register: payload and trailer.
    pub fn wire_bytes(&self) -> &[u8] {
        &self.bytes[PAYLOAD_START..]
    }

    /// Binary dump of the frame, one `index bits 0xhex` line per byte.
    pub fn render_bits(&self) -> String<DUMP_SIZE> {
        use core::fmt::Write;

        let mut out = String::new();
        for (i, byte) in self.bytes.iter().enumerate() {
            // Capacity covers every line
            let _ = writeln!(out, "{:2} {:08b} 0x{:02x}", i, byte, byte);
        }
        out
    }
}
