//! Prints the IR-Link frames for a handful of Power Functions commands.
//!
//! Runs entirely against the mock bus, so no hardware is needed. Useful for
//! comparing the encoder output with a logic analyzer capture.
//!
//! # Usage
//!
//! ```sh
//! cargo run --example pf_frames
//! ```

use anyhow::Context;
use nxt_drivers::hal::{MockBus, MockDelay, Transaction};
use nxt_drivers::irlink::{DirectCommand, IrFrame, IrLink, LogicalCommand, PfChannel, PwmCommand};
use nxt_drivers::Config;

fn main() -> anyhow::Result<()> {
    let config = Config::default();

    let commands = [
        (
            "ch1 direct: B forward, A reverse",
            LogicalCommand::combo_direct(
                PfChannel::Ch1,
                DirectCommand::Forward,
                DirectCommand::Reverse,
            ),
        ),
        (
            "ch1 direct: float both",
            LogicalCommand::combo_direct(
                PfChannel::Ch1,
                DirectCommand::Float,
                DirectCommand::Float,
            ),
        ),
        (
            "ch3 pwm: B forward 7, A reverse 7",
            LogicalCommand::combo_pwm(
                PfChannel::Ch3,
                PwmCommand::from_speed(7),
                PwmCommand::from_speed(-7),
            ),
        ),
    ];

    for (label, command) in &commands {
        println!("{} {:02x?} checksum ok: {}", label, command.bytes(), command.checksum_ok());
        println!("{}", IrFrame::power_functions(command).render_bits());
    }

    // Send one through the transmitter to show the bus traffic
    let mut bus = MockBus::new();
    let mut delay = MockDelay::new();
    let mut link = IrLink::with_config(&mut bus, &mut delay, config.irlink.clone());
    let delivered = link
        .send(&commands[0].1)
        .context("transmit failed")?;

    println!("delivered {} of {} writes", delivered, config.irlink.resend_count);
    for transaction in &bus.transactions {
        if let Transaction::Write { address, register, payload } = transaction {
            println!("write {:#04x} reg {:#04x}: {:02x?}", address, register, payload);
        }
    }
    println!("waited {} ms", delay.total_ms());

    Ok(())
}
