//! Tests that drive the `cdc-check` binary itself.

use crate::common::fake_dev;
use std::path::Path;
use std::process::Command;

/// The binary, run from `dir` so no local config file is picked up.
fn cdc_check(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_cdc-check"));
    cmd.current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("CDC_CHECK_CONFIG")
        .env_remove("CDC_CHECK_VARIANT");
    cmd
}

#[test]
fn test_open_failure_reported_once() {
    // A regular file matches the pattern but is not a tty.
    let dev = fake_dev(&["ttyACM0"]);
    let device = dev.path().join("ttyACM0").to_string_lossy().into_owned();

    let output = cdc_check(dev.path())
        .env("CDC_CHECK_PATTERNS", dev.path().join("ttyACM*"))
        .env("CDC_CHECK_LOG_LEVEL", "error")
        .output()
        .expect("run cdc-check");

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.lines().count(), 1, "stderr was: {stderr}");
    assert_eq!(stderr.matches(device.as_str()).count(), 1, "stderr was: {stderr}");
}

#[test]
fn test_list_opens_nothing() {
    let dev = fake_dev(&["ttyUSB0", "ttyS0"]);
    let device = dev.path().join("ttyUSB0").to_string_lossy().into_owned();

    let output = cdc_check(dev.path())
        .arg("--list")
        .env("CDC_CHECK_PATTERNS", dev.path().join("ttyUSB*"))
        .output()
        .expect("run cdc-check");

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), format!("{device}\n"));
}
