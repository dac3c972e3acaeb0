//! Mock serial devices for testing.
//!
//! `MockSerialPort` simulates the far end of a USB-serial bridge: it can echo
//! what it receives (exactly, truncated, or altered), stay silent, or fail.
//! `MockPortOpener` maps device paths to mock ports so the loopback tester
//! can run end to end without hardware.

use super::error::PortError;
use super::traits::{PortOpener, PortSettings, SerialPortAdapter};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// How the simulated device answers a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EchoMode {
    /// Never answer.
    #[default]
    Silent,
    /// Echo every byte back unchanged.
    Exact,
    /// Echo at most this many bytes of each write.
    Truncate(usize),
    /// Echo every byte with the last one flipped.
    Corrupt,
}

#[derive(Debug, Default)]
struct MockPortState {
    /// Bytes to be returned by read operations.
    read_queue: VecDeque<u8>,
    /// Every buffer handed to `write_bytes`.
    write_log: Vec<Vec<u8>>,
    echo: EchoMode,
    /// Fail the next write with a timeout.
    should_timeout: bool,
    /// Refuse to open with this error kind.
    open_error: Option<std::io::ErrorKind>,
    timeout: Duration,
    input_clears: usize,
    opens: usize,
    closes: usize,
}

/// Mock serial port.
///
/// Clones share state, so a test keeps one handle for inspection while the
/// tester owns the opened port. Only handles produced by [`MockPortOpener`]
/// count as open; dropping one records a close.
///
/// # Example
/// ```
/// use cdc_check::port::{EchoMode, MockSerialPort, SerialPortAdapter};
///
/// let mut port = MockSerialPort::new("/dev/ttyACM0").with_echo(EchoMode::Exact);
/// port.write_all_bytes(b"World0").unwrap();
///
/// let mut buffer = [0u8; 16];
/// let n = port.read_bytes(&mut buffer).unwrap();
/// assert_eq!(&buffer[..n], b"World0");
/// ```
pub struct MockSerialPort {
    name: String,
    state: Arc<Mutex<MockPortState>>,
    attached: bool,
}

impl MockSerialPort {
    /// Create a new silent mock port with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(Mutex::new(MockPortState {
                timeout: Duration::from_secs(1),
                ..Default::default()
            })),
            attached: false,
        }
    }

    /// Builder form of [`set_echo`](Self::set_echo).
    pub fn with_echo(self, echo: EchoMode) -> Self {
        self.set_echo(echo);
        self
    }

    fn state(&self) -> MutexGuard<'_, MockPortState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn attach(&self) -> Self {
        Self {
            name: self.name.clone(),
            state: Arc::clone(&self.state),
            attached: true,
        }
    }

    pub fn set_echo(&self, echo: EchoMode) {
        self.state().echo = echo;
    }

    /// Queue bytes as if the device had already sent them.
    pub fn enqueue_read(&self, data: &[u8]) {
        self.state().read_queue.extend(data);
    }

    /// Make the next write time out.
    pub fn set_should_timeout(&self, should_timeout: bool) {
        self.state().should_timeout = should_timeout;
    }

    /// Make opening this port fail with the given I/O error kind.
    pub fn fail_open(&self, kind: std::io::ErrorKind) {
        self.state().open_error = Some(kind);
    }

    /// Get a copy of all data written to the port.
    pub fn get_write_log(&self) -> Vec<Vec<u8>> {
        self.state().write_log.clone()
    }

    /// Number of `clear_input` calls so far.
    pub fn input_clears(&self) -> usize {
        self.state().input_clears
    }

    pub fn opens(&self) -> usize {
        self.state().opens
    }

    pub fn closes(&self) -> usize {
        self.state().closes
    }

    /// True when every open has been matched by a close.
    pub fn is_released(&self) -> bool {
        let state = self.state();
        state.opens == state.closes
    }

    /// Get the number of bytes available to read.
    pub fn available_bytes(&self) -> usize {
        self.state().read_queue.len()
    }
}

impl Clone for MockSerialPort {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            state: Arc::clone(&self.state),
            attached: false,
        }
    }
}

impl Drop for MockSerialPort {
    fn drop(&mut self) {
        if self.attached {
            self.state().closes += 1;
        }
    }
}

impl SerialPortAdapter for MockSerialPort {
    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, PortError> {
        let mut state = self.state();

        if state.should_timeout {
            state.should_timeout = false;
            return Err(PortError::timeout(state.timeout));
        }

        state.write_log.push(data.to_vec());

        match state.echo {
            EchoMode::Silent => {}
            EchoMode::Exact => state.read_queue.extend(data),
            EchoMode::Truncate(max) => {
                let n = max.min(data.len());
                state.read_queue.extend(&data[..n]);
            }
            EchoMode::Corrupt => {
                let mut altered = data.to_vec();
                if let Some(last) = altered.last_mut() {
                    *last ^= 0xFF;
                }
                state.read_queue.extend(altered);
            }
        }

        Ok(data.len())
    }

    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError> {
        let mut state = self.state();

        let mut bytes_read = 0;
        for byte in buffer.iter_mut() {
            match state.read_queue.pop_front() {
                Some(queued) => {
                    *byte = queued;
                    bytes_read += 1;
                }
                None => break,
            }
        }

        if bytes_read == 0 && !buffer.is_empty() {
            // Same kind serialport reports when the read timeout expires.
            Err(PortError::Io(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "Operation timed out",
            )))
        } else {
            Ok(bytes_read)
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_timeout(&mut self, timeout: Duration) -> Result<(), PortError> {
        self.state().timeout = timeout;
        Ok(())
    }

    fn clear_input(&mut self) -> Result<(), PortError> {
        let mut state = self.state();
        state.read_queue.clear();
        state.input_clears += 1;
        Ok(())
    }
}

impl std::fmt::Debug for MockSerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSerialPort")
            .field("name", &self.name)
            .field("attached", &self.attached)
            .field("available_bytes", &self.available_bytes())
            .finish()
    }
}

/// Path-addressed set of mock devices.
#[derive(Debug, Default, Clone)]
pub struct MockPortOpener {
    devices: HashMap<String, MockSerialPort>,
}

impl MockPortOpener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a device under its own name; returns a handle for inspection.
    pub fn add(&mut self, port: MockSerialPort) -> MockSerialPort {
        let handle = port.clone();
        self.devices.insert(port.name.clone(), port);
        handle
    }
}

impl PortOpener for MockPortOpener {
    fn open(
        &self,
        path: &str,
        settings: &PortSettings,
    ) -> Result<Box<dyn SerialPortAdapter>, PortError> {
        let device = self
            .devices
            .get(path)
            .ok_or_else(|| PortError::not_found(path))?;

        let mut state = device.state();
        if let Some(kind) = state.open_error {
            return Err(PortError::Io(std::io::Error::new(kind, "mock open refused")));
        }
        state.opens += 1;
        state.timeout = settings.timeout;
        drop(state);

        Ok(Box::new(device.attach()))
    }
}
