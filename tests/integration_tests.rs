use embedded_hal_mock::eh1::delay::NoopDelay;
use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction};
use linstack::data_link::{compute_checksum, generate_identifier, validate_checksum};
use linstack::error::LinError;
use linstack::physical::mock::MockChannel;
use linstack::{ChecksumModel, LinConfig, LinFrame, LinStack, Transceiver};
use std::time::Duration;

#[test]
fn test_master_frame_reaches_slave() {
    let pid = generate_identifier(0x01);
    let mut bus = MockChannel::new();

    let mut master = LinStack::new(&mut bus, LinConfig::default()).unwrap();
    master.write(pid, &[0x01, 0x02, 0x03]).unwrap();
    let wire = bus.written();
    assert_eq!(wire, vec![0x00, 0x55, 0xC1, 0x01, 0x02, 0x03, 0xF9]);

    // The slave UART sees everything after break and sync
    let mut rx = MockChannel::new();
    rx.push_rx(&wire[2..]);
    let config = LinConfig {
        ident: pid,
        ..Default::default()
    };
    let mut slave = LinStack::new(&mut rx, config).unwrap();
    let mut buf = [0u8; 8];
    let read = slave.read(&mut buf).unwrap();
    assert_eq!(&buf[..read], &wire[2..]);
}

#[test]
fn test_header_and_response_over_echo() {
    let pid = generate_identifier(0x22);
    let config = LinConfig {
        ident: pid,
        checksum: ChecksumModel::Enhanced,
        ..Default::default()
    };
    let mut bus = MockChannel::new_echo();
    let mut node = LinStack::new(&mut bus, config).unwrap();

    node.write_request(pid).unwrap();
    let mut header = [0u8; 3];
    assert_eq!(node.read_stream(&mut header).unwrap(), 3);
    assert_eq!(header, [0x00, 0x55, pid]);

    node.write_response(&[0xDE, 0xAD]).unwrap();
    let mut response = [0u8; 3];
    assert_eq!(node.read_stream(&mut response).unwrap(), 3);

    let mut frame = vec![pid];
    frame.extend_from_slice(&response);
    let decoded = LinFrame::decode(&frame, ChecksumModel::Enhanced).unwrap();
    assert_eq!(decoded.address(), 0x22);
    assert_eq!(decoded.payload, vec![0xDE, 0xAD]);
}

#[test]
fn test_mismatched_identifier_fails_even_with_good_checksum() {
    let mut bus = MockChannel::new();
    let payload = [0x10, 0x20];
    bus.push_rx(&[0x80, 0x10, 0x20, compute_checksum(&payload)]);
    let config = LinConfig {
        ident: 0xC1,
        ..Default::default()
    };
    let mut slave = LinStack::new(&mut bus, config).unwrap();

    let mut buf = [0u8; 4];
    assert!(matches!(
        slave.read(&mut buf),
        Err(LinError::IdentifierMismatch { .. })
    ));
    assert!(validate_checksum(&buf[1..]));
}

#[test]
fn test_failures_leave_stack_usable() {
    let mut bus = MockChannel::new();
    bus.push_rx(&[0xC1, 0x01, 0x00]);
    let config = LinConfig {
        ident: 0xC1,
        ..Default::default()
    };
    let mut slave = LinStack::new(&mut bus, config).unwrap();

    let mut buf = [0u8; 3];
    assert!(matches!(
        slave.read(&mut buf),
        Err(LinError::ChecksumMismatch { .. })
    ));
    assert!(matches!(
        slave.wait_for_break(Duration::ZERO),
        Err(LinError::Timeout)
    ));
    slave.write_response(&[0x01]).unwrap();
    assert_eq!(bus.written(), vec![0x01, 0xFE]);
}

#[test]
fn test_sleep_wake_cycle() {
    let mut pin = PinMock::new(&[
        Transaction::set(State::Low),
        Transaction::set(State::High),
        Transaction::set(State::Low),
    ]);
    let mut bus = MockChannel::new();
    let transceiver = Transceiver::new(pin.clone(), NoopDelay::new());
    let mut node =
        LinStack::with_transceiver(&mut bus, LinConfig::default(), transceiver).unwrap();

    node.sleep(true).unwrap();
    node.sleep(false).unwrap();
    node.send_wake_up().unwrap();
    node.write_frame(&LinFrame::from_address(0x3C, &[0xAA]).unwrap())
        .unwrap();

    drop(node);
    assert_eq!(bus.written(), vec![0x00, 0x00, 0x55, 0x3C, 0xAA, 0x55]);
    pin.done();
}
