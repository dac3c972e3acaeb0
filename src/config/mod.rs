//! Configuration for cdc-check.
//!
//! TOML file with environment variable overrides. Every value has a default,
//! so running without any file behaves like the plain bench tool.
//!
//! # Configuration Resolution
//!
//! 1. `--config PATH` on the command line
//! 2. `CDC_CHECK_CONFIG` environment variable (explicit path)
//! 3. `./cdc-check.toml` (current directory)
//! 4. `<platform config dir>/cdc-check/config.toml`
//! 5. Built-in defaults (no file required)
//!
//! # Environment Overrides
//!
//! - `CDC_CHECK_VARIANT=verify`
//! - `CDC_CHECK_PATTERNS=/dev/ttyACM*,/dev/ttyUSB*`
//! - `CDC_CHECK_LOG_LEVEL=debug`
//!
//! # Example
//!
//! ```toml
//! [check]
//! variant = "verify"
//!
//! [discovery]
//! patterns = ["/dev/ttyACM*", "/dev/ttyUSB*"]
//!
//! [logging]
//! level = "info"
//! format = "compact"
//! ```

mod error;
mod loader;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{get_default_config_path, resolve_config_path, ConfigLoader};
pub use schema::{CheckConfig, Config, DiscoveryConfig, LogFormat, LoggingConfig};
