//! E2E tests for the loopback trial and run.

use crate::common::{mock_bench, text};
use cdc_check::loopback::format_bytes;
use cdc_check::port::EchoMode;
use cdc_check::{AppError, LoopbackTester, Variant};
use pretty_assertions::assert_eq;

#[test]
fn test_probe_two_devices_both_succeed() {
    // ACM device echoes, USB adapter has nothing attached
    let (opener, handles) = mock_bench(&[
        ("/dev/ttyACM0", EchoMode::Exact),
        ("/dev/ttyUSB0", EchoMode::Silent),
    ]);
    let tester = LoopbackTester::new(opener, Variant::Probe);
    let mut out = Vec::new();

    let outcomes = tester
        .run(&["/dev/ttyACM0", "/dev/ttyUSB0"], &mut out)
        .expect("probe never fails on content");

    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].device, "/dev/ttyACM0");
    assert!(outcomes[0].echoed);
    assert_eq!(outcomes[1].device, "/dev/ttyUSB0");
    assert!(outcomes[1].received.is_empty());

    let payload = format_bytes(tester.payload());
    assert_eq!(
        text(out),
        format!("/dev/ttyACM0\r\n\t{payload}\n/dev/ttyUSB0\r\n\tb''\n")
    );

    for handle in &handles {
        assert_eq!(handle.opens(), 1);
        assert!(handle.is_released());
        assert_eq!(handle.get_write_log(), vec![tester.payload().to_vec()]);
    }
}

#[test]
fn test_probe_accepts_altered_response() {
    let (opener, _handles) = mock_bench(&[("/dev/ttyACM0", EchoMode::Corrupt)]);
    let tester = LoopbackTester::new(opener, Variant::Probe);

    let outcomes = tester.run(&["/dev/ttyACM0"], &mut Vec::new()).unwrap();
    assert!(!outcomes[0].echoed);
}

#[test]
fn test_verify_exact_echo_completes() {
    let (opener, handles) = mock_bench(&[("/dev/ttyACM0", EchoMode::Exact)]);
    let tester = LoopbackTester::new(opener, Variant::Verify);
    let mut out = Vec::new();

    let outcomes = tester.run(&["/dev/ttyACM0"], &mut out).unwrap();

    assert_eq!(outcomes[0].received, tester.payload());
    assert_eq!(outcomes[0].sent, tester.payload().len());
    let report = text(out);
    assert!(report.starts_with("/dev/ttyACM0\r\n\tsent b'World0,World1,"));
    assert!(report.ends_with("\tPASS\n"));
    assert!(handles[0].is_released());
}

#[test]
fn test_verify_truncated_echo_fails_with_device() {
    // The bridge firmware forwards at most 63 bytes per USB packet
    let (opener, handles) = mock_bench(&[("/dev/ttyACM0", EchoMode::Truncate(63))]);
    let tester = LoopbackTester::new(opener, Variant::Verify);

    let err = tester.run(&["/dev/ttyACM0"], &mut Vec::new()).unwrap_err();

    assert!(err.to_string().contains("/dev/ttyACM0"));
    match err {
        AppError::Mismatch {
            received,
            first_difference,
            ..
        } => {
            assert_eq!(received, 63);
            assert_eq!(first_difference, 63);
        }
        other => panic!("Expected mismatch, got: {other:?}"),
    }
    assert!(handles[0].is_released());
}

#[test]
fn test_first_failure_stops_run() {
    let (opener, handles) = mock_bench(&[
        ("/dev/ttyACM0", EchoMode::Corrupt),
        ("/dev/ttyACM1", EchoMode::Exact),
    ]);
    let tester = LoopbackTester::new(opener, Variant::Verify);

    let err = tester
        .run(&["/dev/ttyACM0", "/dev/ttyACM1"], &mut Vec::new())
        .unwrap_err();

    assert_eq!(err.device(), Some("/dev/ttyACM0"));
    assert_eq!(handles[1].opens(), 0);
}

#[test]
fn test_open_failure_is_fatal() {
    let (opener, handles) = mock_bench(&[
        ("/dev/ttyACM0", EchoMode::Exact),
        ("/dev/ttyUSB0", EchoMode::Exact),
    ]);
    handles[0].fail_open(std::io::ErrorKind::PermissionDenied);
    let tester = LoopbackTester::new(opener, Variant::Probe);
    let mut out = Vec::new();

    let err = tester
        .run(&["/dev/ttyACM0", "/dev/ttyUSB0"], &mut out)
        .unwrap_err();

    assert!(matches!(err, AppError::Port { ref device, .. } if device == "/dev/ttyACM0"));
    assert!(out.is_empty());
    assert_eq!(handles[1].opens(), 0);
}

#[test]
fn test_vanished_device_is_fatal() {
    // Globbed, then unplugged before open
    let (opener, _handles) = mock_bench(&[]);
    let tester = LoopbackTester::new(opener, Variant::Probe);

    let err = tester.run(&["/dev/ttyACM0"], &mut Vec::new()).unwrap_err();
    assert_eq!(err.device(), Some("/dev/ttyACM0"));
}

#[test]
fn test_stale_input_is_discarded() {
    let (opener, handles) = mock_bench(&[("/dev/ttyACM0", EchoMode::Exact)]);
    handles[0].enqueue_read(b"\r\nboot ok\r\n");
    let tester = LoopbackTester::new(opener, Variant::Verify);

    let outcomes = tester.run(&["/dev/ttyACM0"], &mut Vec::new()).unwrap();

    assert!(outcomes[0].echoed);
    assert_eq!(handles[0].input_clears(), 2);
}

#[test]
fn test_no_devices_no_io() {
    let (opener, handles) = mock_bench(&[("/dev/ttyACM0", EchoMode::Exact)]);
    let tester = LoopbackTester::new(opener, Variant::Verify);
    let mut out = Vec::new();

    let outcomes = tester.run::<&str>(&[], &mut out).unwrap();

    assert!(outcomes.is_empty());
    assert!(out.is_empty());
    assert_eq!(handles[0].opens(), 0);
}
