use crate::config::ConfigError;
use crate::discovery::DiscoveryError;
use crate::port::PortError;
use std::fmt;

/// Unified application error type.
///
/// Every variant ends the run; nothing is retried or skipped.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Discovery(DiscoveryError),
    /// Opening or talking to a device failed.
    Port { device: String, source: PortError },
    /// The device answered with something other than the payload.
    Mismatch {
        device: String,
        sent: usize,
        received: usize,
        first_difference: usize,
    },
    /// Writing the report to the console failed.
    Output(std::io::Error),
}

impl AppError {
    pub fn port(device: impl Into<String>, source: PortError) -> Self {
        Self::Port {
            device: device.into(),
            source,
        }
    }

    /// The device the error concerns, if any.
    pub fn device(&self) -> Option<&str> {
        match self {
            Self::Port { device, .. } | Self::Mismatch { device, .. } => Some(device.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "{e}"),
            Self::Discovery(e) => write!(f, "Device discovery failed: {e}"),
            // These already carry the path.
            Self::Port {
                source: source @ (PortError::NotFound(_) | PortError::Open { .. }),
                ..
            } => write!(f, "{source}"),
            Self::Port { device, source } => write!(f, "{device}: {source}"),
            Self::Mismatch {
                device,
                sent,
                received,
                first_difference,
            } => write!(
                f,
                "Loopback mismatch on {device}: sent {sent} bytes, received {received} bytes, first difference at byte {first_difference}"
            ),
            Self::Output(e) => write!(f, "Failed to write report: {e}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Discovery(e) => Some(e),
            Self::Port { source, .. } => Some(source),
            Self::Output(e) => Some(e),
            Self::Mismatch { .. } => None,
        }
    }
}

// `From` conversions so `?` works across module boundaries.
impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err)
    }
}

impl From<DiscoveryError> for AppError {
    fn from(err: DiscoveryError) -> Self {
        AppError::Discovery(err)
    }
}
