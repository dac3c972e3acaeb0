//! Core traits for the serial transport boundary.
//!
//! `SerialPortAdapter` lets the loopback trial drive real hardware and the
//! in-memory mock through the same code path. `PortOpener` is the seam the
//! tester uses to acquire a port by path.

use super::error::PortError;
use std::time::{Duration, Instant};

/// Baud rate every trial runs at.
pub const BAUD_RATE: u32 = 115_200;

/// Read/write timeout applied when a port is opened.
pub const PORT_TIMEOUT: Duration = Duration::from_millis(200);

/// Line settings used to open a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortSettings {
    /// Baud rate (bits per second).
    pub baud_rate: u32,

    /// Read/write timeout, and the window a bounded read waits for data.
    pub timeout: Duration,
}

impl Default for PortSettings {
    fn default() -> Self {
        Self {
            baud_rate: BAUD_RATE,
            timeout: PORT_TIMEOUT,
        }
    }
}

/// Trait for serial port I/O operations.
///
/// Implementations release the underlying device when dropped, so holding the
/// adapter in a local binding scopes the acquisition to that block.
pub trait SerialPortAdapter: Send + std::fmt::Debug {
    /// Write bytes to the serial port.
    ///
    /// Returns the number of bytes actually written.
    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, PortError>;

    /// Read bytes from the serial port into the provided buffer.
    ///
    /// Returns the number of bytes actually read.
    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError>;

    /// Get the name/path of this serial port.
    fn name(&self) -> &str;

    /// Set the read/write timeout for this port.
    fn set_timeout(&mut self, timeout: Duration) -> Result<(), PortError>;

    /// Discard any bytes already received but not yet read.
    fn clear_input(&mut self) -> Result<(), PortError>;

    /// Write the whole buffer.
    ///
    /// Returns once every byte has been accepted by the port; the output is
    /// not drained, so the only wait is the port's own write timeout.
    fn write_all_bytes(&mut self, mut data: &[u8]) -> Result<(), PortError> {
        while !data.is_empty() {
            match self.write_bytes(data)? {
                0 => {
                    return Err(PortError::Io(std::io::Error::new(
                        std::io::ErrorKind::WriteZero,
                        "port accepted no bytes",
                    )))
                }
                n => data = &data[n..],
            }
        }
        Ok(())
    }

    /// Read at most `limit` bytes, collecting whatever arrives within `window`.
    ///
    /// The result may be shorter than `limit`, including empty. It is never
    /// padded and the read is not retried once the window has closed.
    fn read_up_to(&mut self, limit: usize, window: Duration) -> Result<Vec<u8>, PortError> {
        let mut received = vec![0u8; limit];
        let mut filled = 0;
        let deadline = Instant::now() + window;

        while filled < limit {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            self.set_timeout(remaining)?;
            match self.read_bytes(&mut received[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.is_read_timeout() => break,
                Err(e) => return Err(e),
            }
        }

        received.truncate(filled);
        Ok(received)
    }
}

/// Opens ports by path.
pub trait PortOpener {
    /// Open `path` with the given settings.
    fn open(
        &self,
        path: &str,
        settings: &PortSettings,
    ) -> Result<Box<dyn SerialPortAdapter>, PortError>;
}
