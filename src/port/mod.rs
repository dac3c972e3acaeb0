//! Serial transport boundary.
//!
//! Provides the adapter trait the loopback trial is written against, the
//! `serialport`-backed implementation, and mock devices for tests.

pub mod error;
pub mod mock;
pub mod sync_port;
pub mod traits;

pub use error::PortError;
pub use mock::{EchoMode, MockPortOpener, MockSerialPort};
pub use sync_port::{SyncSerialPort, SystemPorts};
pub use traits::*;
