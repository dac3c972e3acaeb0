//! Loopback tests against a real device.
//!
//! `TEST_PORT` names the device; it must echo what it receives.

use cdc_check::port::{PortSettings, SerialPortAdapter, SyncSerialPort, SystemPorts};
use cdc_check::{discover, LoopbackTester, Variant, DEFAULT_PATTERNS};
use std::env;

fn test_port() -> Option<String> {
    let port = env::var("TEST_PORT").ok();
    if port.is_none() {
        println!("⚠️  TEST_PORT not set - skipping test");
    }
    port
}

#[test]
#[ignore] // Requires hardware
fn test_discovery_on_host() {
    let devices = discover(&DEFAULT_PATTERNS).expect("list /dev");
    println!("Found {} device(s)", devices.len());
    for device in &devices {
        println!("  - {}", device);
        assert!(device.starts_with("/dev/ttyACM") || device.starts_with("/dev/ttyUSB"));
    }
}

#[test]
#[ignore] // Requires a loopback device
fn test_probe_real_device() {
    let Some(port) = test_port() else { return };
    let tester = LoopbackTester::new(SystemPorts, Variant::Probe);
    let mut out = Vec::new();

    let outcome = tester.test_device(&port, &mut out).expect("probe trial");

    println!("{}", String::from_utf8_lossy(&out));
    assert!(outcome.echoed, "device did not echo the probe payload");
}

#[test]
#[ignore] // Requires a loopback device
fn test_verify_real_device() {
    let Some(port) = test_port() else { return };
    let tester = LoopbackTester::new(SystemPorts, Variant::Verify);

    let outcome = tester
        .test_device(&port, &mut std::io::sink())
        .expect("verify trial");
    assert_eq!(outcome.received.len(), tester.payload().len());
}

#[test]
#[ignore] // Requires a loopback device
fn test_port_reopens_after_trial() {
    let Some(port) = test_port() else { return };
    let tester = LoopbackTester::new(SystemPorts, Variant::Probe);

    tester
        .test_device(&port, &mut std::io::sink())
        .expect("first trial");

    // The trial must have released the device
    let mut reopened = SyncSerialPort::open(&port, PortSettings::default()).expect("reopen");
    reopened.clear_input().expect("clear input");
}
