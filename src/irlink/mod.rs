//! LEGO Power Functions motor control through a HiTechnic IR-Link.
//!
//! Three layers, each usable on its own:
//!
//! - [`command`]: per-motor commands and the 2-byte [`LogicalCommand`]
//! - [`encoder`]: pulse-width encoding into an 11-byte payload and a
//!   17-byte [`IrFrame`]
//! - [`driver`]: [`IrLink`], which writes frames to the device with resends
//!
//! # Example
//!
//! ```rust
//! use nxt_drivers::irlink::{DirectCommand, IrFrame, LogicalCommand, PfChannel};
//!
//! let cmd = LogicalCommand::combo_direct(
//!     PfChannel::Ch1,
//!     DirectCommand::Forward,
//!     DirectCommand::Reverse,
//! );
//! let frame = IrFrame::power_functions(&cmd);
//! assert_eq!(frame.as_bytes()[3], 0x80); // start marker
//! ```

pub mod command;
pub mod driver;
pub mod encoder;

pub use command::{
    checksum, DirectCommand, InvalidPwmSpeed, LogicalCommand, PfChannel, PwmCommand, PwmSpeed,
};
pub use driver::IrLink;
pub use encoder::{encode_payload, encoded_len, IrFrame, FRAME_SIZE, PAYLOAD_SIZE};
