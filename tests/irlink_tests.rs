//! Integration tests for Power Functions encoding and IR-Link transmission

#![cfg(feature = "std")]

use nxt_drivers::{
    hal::{MockBus, MockDelay, MockError, Transaction},
    irlink::{
        encode_payload, encoded_len, DirectCommand, IrFrame, IrLink, LogicalCommand, PfChannel,
        PwmCommand, PwmSpeed, FRAME_SIZE, PAYLOAD_SIZE,
    },
    Error, IrLinkConfig,
};

const DIRECT: [DirectCommand; 4] = [
    DirectCommand::Float,
    DirectCommand::Forward,
    DirectCommand::Reverse,
    DirectCommand::Brake,
];

/// Mark positions in a payload, in order.
fn marks(payload: &[u8; PAYLOAD_SIZE]) -> Vec<usize> {
    (0..PAYLOAD_SIZE * 8)
        .filter(|&p| payload[p / 8] & (0x80 >> (p % 8)) != 0)
        .collect()
}

/// Recover the 16-bit word from the gaps between marks.
fn decode(payload: &[u8; PAYLOAD_SIZE]) -> Option<u16> {
    let marks = marks(payload);
    if marks.len() < 18 || marks[0] != 0 || marks[1] != 8 {
        return None;
    }
    let mut word = 0u16;
    for pair in marks[1..18].windows(2) {
        word = (word << 1)
            | match pair[1] - pair[0] {
                3 => 0,
                5 => 1,
                _ => return None,
            };
    }
    Some(word)
}

// ============================================================================
// Encoder Properties
// ============================================================================

#[test]
fn reference_frame_forward_reverse() {
    let cmd = LogicalCommand::combo_direct(
        PfChannel::Ch1,
        DirectCommand::Forward,
        DirectCommand::Reverse,
    );
    assert_eq!(cmd.bytes(), [0x01, 0x68]);

    let frame = IrFrame::power_functions(&cmd);
    let bytes = frame.as_bytes();
    assert_eq!(bytes[3], 0x80);
    assert_eq!(
        &bytes[3..14],
        &[0x80, 0x92, 0x49, 0x24, 0x24, 0x21, 0x21, 0x24, 0x80, 0x00, 0x00]
    );
}

#[test]
fn every_input_fits_and_round_trips() {
    for word in 0..=u16::MAX {
        let cmd = LogicalCommand::from_bytes(word.to_be_bytes());
        let payload = encode_payload(&cmd);
        let found = marks(&payload);

        if encoded_len(&cmd) <= PAYLOAD_SIZE * 8 {
            assert_eq!(found.len(), 18, "word {:#06x}", word);
            assert_eq!(found.last(), Some(&(encoded_len(&cmd) - 1)));
            assert_eq!(decode(&payload), Some(word), "word {:#06x}", word);
        } else {
            // Only the stop bit may be lost
            assert_eq!(found.len(), 17, "word {:#06x}", word);
        }
    }
}

#[test]
fn encoding_is_deterministic() {
    for bytes in [[0x01, 0x68], [0x69, 0x77], [0xFF, 0xFF], [0x00, 0x00]] {
        let cmd = LogicalCommand::from_bytes(bytes);
        assert_eq!(encode_payload(&cmd), encode_payload(&cmd));
        assert_eq!(IrFrame::power_functions(&cmd), IrFrame::power_functions(&cmd));
    }
}

#[test]
fn only_all_ones_overflows() {
    let overflowing: Vec<u16> = (0..=u16::MAX)
        .filter(|&w| encoded_len(&LogicalCommand::from_bytes(w.to_be_bytes())) > PAYLOAD_SIZE * 8)
        .collect();
    assert_eq!(overflowing, vec![0xFFFF]);
}

#[test]
fn constructed_commands_carry_valid_checksums() {
    for ch in 0..4 {
        let channel = PfChannel::new(ch).unwrap();
        for b in DIRECT {
            for a in DIRECT {
                let cmd = LogicalCommand::combo_direct(channel, b, a);
                let [b0, b1] = cmd.bytes();
                let expected = 0xF ^ (b0 >> 4) ^ (b0 & 0xF) ^ (b1 >> 4);
                assert_eq!(b1 & 0xF, expected);
            }
        }
        for b in 0..16 {
            for a in 0..16 {
                let cmd = LogicalCommand::combo_pwm(
                    channel,
                    PwmCommand::from_code(b),
                    PwmCommand::from_code(a),
                );
                assert!(cmd.checksum_ok());
                assert_eq!(cmd.channel(), channel);
            }
        }
    }
}

#[test]
fn known_command_vectors() {
    let cases = [
        (
            LogicalCommand::combo_direct(
                PfChannel::Ch4,
                DirectCommand::Brake,
                DirectCommand::Brake,
            ),
            [0x31, 0xF2],
            [0x80, 0x92, 0x10, 0x92, 0x42, 0x10, 0x84, 0x24, 0x84, 0x80, 0x00],
        ),
        (
            LogicalCommand::combo_pwm(
                PfChannel::Ch1,
                PwmCommand::Forward(PwmSpeed::new(1).unwrap()),
                PwmCommand::Reverse(PwmSpeed::new(1).unwrap()),
            ),
            [0x4F, 0x15],
            [0x80, 0x90, 0x92, 0x10, 0x84, 0x24, 0x90, 0x90, 0x90, 0x80, 0x00],
        ),
    ];
    for (cmd, bytes, payload) in cases {
        assert_eq!(cmd.bytes(), bytes);
        assert_eq!(encode_payload(&cmd), payload);
    }
}

// ============================================================================
// Transmission
// ============================================================================

#[test]
fn frame_goes_out_as_one_register_write() {
    let mut bus = MockBus::new();
    let mut delay = MockDelay::new();
    let config = IrLinkConfig::default().with_resend_count(1);
    let mut link = IrLink::with_config(&mut bus, &mut delay, config);

    let cmd = LogicalCommand::combo_direct(
        PfChannel::Ch1,
        DirectCommand::Forward,
        DirectCommand::Reverse,
    );
    let frame = IrFrame::power_functions(&cmd);
    link.transmit(&frame).unwrap();

    assert_eq!(
        bus.transactions,
        vec![Transaction::write(0x02, 0x42, &frame.as_bytes()[3..])]
    );
    assert_eq!(frame.as_bytes().len(), FRAME_SIZE);
}

#[test]
fn failure_retried_up_to_resend_count() {
    let mut bus = MockBus::new();
    bus.fail_next(2);
    let mut delay = MockDelay::new();
    let mut link = IrLink::new(&mut bus, &mut delay);

    let delivered = link
        .combo_pwm(PfChannel::Ch2, PwmCommand::Brake, PwmCommand::Brake)
        .unwrap();

    assert_eq!(delivered, 2);
    assert_eq!(bus.failures, 2);
    assert_eq!(bus.transactions.len(), 4);
    assert_eq!(delay.delays, vec![48; 4]);
}

#[test]
fn terminal_failure_after_all_attempts() {
    let mut bus = MockBus::new();
    bus.fail_always();
    let mut delay = MockDelay::new();
    let config = IrLinkConfig::default().with_resend_count(6);
    let mut link = IrLink::with_config(&mut bus, &mut delay, config);

    let result = link.combo_direct(PfChannel::Ch3, DirectCommand::Forward, DirectCommand::Forward);

    assert_eq!(
        result,
        Err(Error::TransmitFailed {
            attempts: 6,
            source: MockError
        })
    );
    assert_eq!(bus.transactions.len(), 6);
    assert_eq!(delay.delays.len(), 6);
}

#[test]
fn link_released_after_use() {
    let mut bus = MockBus::new();
    let mut delay = MockDelay::new();
    let link = IrLink::new(&mut bus, &mut delay);
    let (bus_back, delay_back) = link.release();
    assert!(bus_back.transactions.is_empty());
    assert!(delay_back.delays.is_empty());
}
