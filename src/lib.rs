//! Loopback smoke test for CDC-ACM and USB-serial bridges.
//!
//! Finds serial devices by glob pattern, writes a fixed `World0,World1,...`
//! payload to each, reads back what the device returns within a short window,
//! and either prints the response or requires it to be an exact echo.
//!
//! # Modules
//!
//! - `config`: TOML configuration with environment overrides
//! - `discovery`: device enumeration by glob pattern
//! - `error`: unified error type
//! - `loopback`: the per-device trial and the run over all devices
//! - `payload`: test payload and run variants
//! - `port`: serial transport abstraction, hardware and mock implementations

pub mod config;
pub mod discovery;
pub mod error;
pub mod loopback;
pub mod payload;
pub mod port;

pub use config::{Config, ConfigError, ConfigLoader, ConfigResult};
pub use discovery::{discover, DevicePattern, DiscoveryError, DEFAULT_PATTERNS};
pub use error::AppError;
pub use loopback::{LoopbackTester, TrialOutcome};
pub use payload::{build_payload, Variant};
pub use port::{
    EchoMode, MockPortOpener, MockSerialPort, PortError, PortOpener, PortSettings,
    SerialPortAdapter, SyncSerialPort, SystemPorts,
};

/// Discover devices for `config` and run one trial on each, reporting to `out`.
pub fn run<O: PortOpener>(
    config: &Config,
    opener: O,
    out: &mut dyn std::io::Write,
) -> Result<Vec<TrialOutcome>, AppError> {
    let devices = discover(&config.discovery.patterns)?;
    if devices.is_empty() {
        tracing::info!(patterns = ?config.discovery.patterns, "no devices found");
        return Ok(Vec::new());
    }

    let tester = LoopbackTester::new(opener, config.check.variant);
    tester.run(&devices, out)
}
