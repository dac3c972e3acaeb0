//! E2E tests from discovery through the full run.

use crate::common::{fake_dev, mock_bench, patterns_in, text};
use cdc_check::config::Config;
use cdc_check::port::EchoMode;
use cdc_check::{discover, Variant};
use pretty_assertions::assert_eq;

fn config_for(patterns: Vec<String>, variant: Variant) -> Config {
    let mut config = Config::default();
    config.discovery.patterns = patterns;
    config.check.variant = variant;
    config
}

#[test]
fn test_discovery_order() {
    let dev = fake_dev(&["ttyUSB0", "ttyACM1", "ttyACM0", "ttyS0", "console"]);
    let base = dev.path().to_string_lossy().into_owned();

    let devices = discover(&patterns_in(dev.path())).unwrap();

    assert_eq!(
        devices,
        vec![
            format!("{base}/ttyACM0"),
            format!("{base}/ttyACM1"),
            format!("{base}/ttyUSB0"),
        ]
    );
}

#[test]
fn test_run_with_zero_devices() {
    let dev = fake_dev(&["ttyS0", "ttyS1"]);
    let (opener, _handles) = mock_bench(&[]);
    let config = config_for(patterns_in(dev.path()), Variant::Verify);
    let mut out = Vec::new();

    let outcomes = cdc_check::run(&config, opener, &mut out).unwrap();

    assert!(outcomes.is_empty());
    assert!(out.is_empty());
}

#[test]
fn test_run_discovered_devices() {
    let dev = fake_dev(&["ttyACM0", "ttyUSB0"]);
    let acm = dev.path().join("ttyACM0").to_string_lossy().into_owned();
    let usb = dev.path().join("ttyUSB0").to_string_lossy().into_owned();
    let (opener, handles) = mock_bench(&[(acm.as_str(), EchoMode::Exact), (usb.as_str(), EchoMode::Exact)]);
    let config = config_for(patterns_in(dev.path()), Variant::Verify);
    let mut out = Vec::new();

    let outcomes = cdc_check::run(&config, opener, &mut out).unwrap();

    let order: Vec<&str> = outcomes.iter().map(|o| o.device.as_str()).collect();
    assert_eq!(order, vec![acm.as_str(), usb.as_str()]);
    assert!(outcomes.iter().all(|o| o.echoed));
    assert_eq!(text(out).matches("PASS").count(), 2);
    assert!(handles.iter().all(|h| h.is_released()));
}
