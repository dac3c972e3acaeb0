//! Loopback trial: write the payload to each device and read back the echo.
//!
//! Devices are tested one at a time in discovery order. The first failure of
//! any kind ends the run.

use crate::error::AppError;
use crate::payload::Variant;
use crate::port::{PortOpener, PortSettings, SerialPortAdapter};
use std::io::Write;
use tracing::{debug, info, warn};

/// Number of input-buffer clears before each write.
const INPUT_CLEARS: usize = 2;

/// Result of one successful trial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialOutcome {
    pub device: String,
    pub sent: usize,
    pub received: Vec<u8>,
    /// Response equals the payload byte for byte.
    pub echoed: bool,
}

/// Drives loopback trials through a [`PortOpener`].
#[derive(Debug)]
pub struct LoopbackTester<O> {
    opener: O,
    settings: PortSettings,
    variant: Variant,
    payload: Vec<u8>,
}

impl<O: PortOpener> LoopbackTester<O> {
    pub fn new(opener: O, variant: Variant) -> Self {
        Self {
            opener,
            settings: PortSettings::default(),
            variant,
            payload: variant.payload(),
        }
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Run one trial against `device`, writing the report to `out`.
    ///
    /// The port is dropped, and so closed, before this returns on every path.
    pub fn test_device(&self, device: &str, out: &mut dyn Write) -> Result<TrialOutcome, AppError> {
        let received = {
            let mut port = self
                .opener
                .open(device, &self.settings)
                .map_err(|e| AppError::port(device, e))?;
            self.exchange(port.as_mut())
                .map_err(|e| AppError::port(device, e))?
        };

        let echoed = received == self.payload;
        let outcome = TrialOutcome {
            device: device.to_string(),
            sent: self.payload.len(),
            received,
            echoed,
        };

        if self.variant.verifies() {
            report_verify(out, &outcome, &self.payload).map_err(AppError::Output)?;
            if !outcome.echoed {
                return Err(AppError::Mismatch {
                    device: outcome.device,
                    sent: outcome.sent,
                    received: outcome.received.len(),
                    first_difference: first_difference(&self.payload, &outcome.received),
                });
            }
        } else {
            report_probe(out, &outcome).map_err(AppError::Output)?;
            if outcome.received.is_empty() {
                warn!(device, "no response within {:?}", self.settings.timeout);
            }
        }

        info!(
            device,
            sent = outcome.sent,
            received = outcome.received.len(),
            echoed = outcome.echoed,
            "trial finished"
        );
        Ok(outcome)
    }

    /// Test every device in order, stopping at the first error.
    ///
    /// An empty list performs no I/O.
    pub fn run<S: AsRef<str>>(
        &self,
        devices: &[S],
        out: &mut dyn Write,
    ) -> Result<Vec<TrialOutcome>, AppError> {
        devices
            .iter()
            .map(|device| self.test_device(device.as_ref(), out))
            .collect()
    }

    fn exchange(&self, port: &mut dyn SerialPortAdapter) -> Result<Vec<u8>, crate::port::PortError> {
        for _ in 0..INPUT_CLEARS {
            port.clear_input()?;
        }
        debug!(port = port.name(), bytes = self.payload.len(), "writing payload");
        port.write_all_bytes(&self.payload)?;

        let received = port.read_up_to(self.variant.read_limit(), self.settings.timeout)?;
        debug!(port = port.name(), bytes = received.len(), "read response");
        Ok(received)
    }
}

/// `<path>\r\n\t<response>`
fn report_probe(out: &mut dyn Write, outcome: &TrialOutcome) -> std::io::Result<()> {
    write!(out, "{}\r\n\t{}\n", outcome.device, format_bytes(&outcome.received))
}

fn report_verify(out: &mut dyn Write, outcome: &TrialOutcome, payload: &[u8]) -> std::io::Result<()> {
    write!(
        out,
        "{}\r\n\tsent {}\r\n\trecv {}\r\n\t{}\n",
        outcome.device,
        format_bytes(payload),
        format_bytes(&outcome.received),
        if outcome.echoed { "PASS" } else { "FAIL" }
    )
}

/// Render bytes as a Python-style bytes literal.
///
/// Single quotes unless the data holds a `'` and no `"`. Printable ASCII is
/// kept, `\t` `\n` `\r` use their short escapes and anything else is `\xNN`.
pub fn format_bytes(data: &[u8]) -> String {
    let quote = if data.contains(&b'\'') && !data.contains(&b'"') {
        '"'
    } else {
        '\''
    };

    let mut rendered = String::with_capacity(data.len() + 3);
    rendered.push('b');
    rendered.push(quote);
    for &byte in data {
        match byte {
            b'\\' => rendered.push_str("\\\\"),
            b'\t' => rendered.push_str("\\t"),
            b'\n' => rendered.push_str("\\n"),
            b'\r' => rendered.push_str("\\r"),
            _ if char::from(byte) == quote => {
                rendered.push('\\');
                rendered.push(quote);
            }
            0x20..=0x7e => rendered.push(char::from(byte)),
            _ => rendered.push_str(&format!("\\x{byte:02x}")),
        }
    }
    rendered.push(quote);
    rendered
}

fn first_difference(expected: &[u8], actual: &[u8]) -> usize {
    expected
        .iter()
        .zip(actual)
        .position(|(a, b)| a != b)
        .unwrap_or_else(|| expected.len().min(actual.len()))
}
