//! Tests against real serial devices.
//!
//! Set `TEST_PORT` to a device whose TX and RX are bridged (for example the
//! passthrough firmware with a jumper on the UART pins).

pub mod loopback_hardware;
