//! Device discovery by filesystem glob pattern.
//!
//! Each pattern is a directory plus a file-name pattern where `*` matches any
//! run of characters and `?` exactly one. Matches from one pattern are sorted;
//! results from several patterns are concatenated in pattern order.

use regex::Regex;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// CDC-ACM devices, then generic USB-serial adapters.
pub const DEFAULT_PATTERNS: [&str; 2] = ["/dev/ttyACM*", "/dev/ttyUSB*"];

#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Wildcards are only supported in the final path component.
    #[error("Unsupported device pattern '{0}': wildcards must be in the file name")]
    Pattern(String),

    #[error("Failed to list '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One compiled device pattern such as `/dev/ttyACM*`.
#[derive(Debug, Clone)]
pub struct DevicePattern {
    raw: String,
    dir: PathBuf,
    name: Regex,
}

impl DevicePattern {
    pub fn parse(pattern: &str) -> Result<Self, DiscoveryError> {
        let path = Path::new(pattern);
        let file = path
            .file_name()
            .and_then(|f| f.to_str())
            .ok_or_else(|| DiscoveryError::Pattern(pattern.to_string()))?;
        let dir = match path.parent() {
            Some(p) if p.as_os_str().is_empty() => PathBuf::from("."),
            Some(p) => p.to_path_buf(),
            None => return Err(DiscoveryError::Pattern(pattern.to_string())),
        };
        if dir.to_string_lossy().contains(&['*', '?'][..]) {
            return Err(DiscoveryError::Pattern(pattern.to_string()));
        }

        let mut expr = String::from("^");
        for c in file.chars() {
            match c {
                '*' => expr.push_str(".*"),
                '?' => expr.push('.'),
                c => expr.push_str(&regex::escape(c.encode_utf8(&mut [0u8; 4]))),
            }
        }
        expr.push('$');
        let name = Regex::new(&expr).map_err(|_| DiscoveryError::Pattern(pattern.to_string()))?;

        Ok(Self {
            raw: pattern.to_string(),
            dir,
            name,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn matches_name(&self, file_name: &str) -> bool {
        self.name.is_match(file_name)
    }

    /// List matching entries, sorted. A missing directory matches nothing.
    pub fn matches(&self) -> Result<Vec<String>, DiscoveryError> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(DiscoveryError::Io {
                    path: self.dir.clone(),
                    source: e,
                })
            }
        };

        let mut found = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| DiscoveryError::Io {
                path: self.dir.clone(),
                source: e,
            })?;
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if self.matches_name(file_name) {
                found.push(self.dir.join(file_name).to_string_lossy().into_owned());
            }
        }
        found.sort();
        Ok(found)
    }
}

/// Discover candidate devices for every pattern, in pattern order.
pub fn discover<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<String>, DiscoveryError> {
    let mut devices = Vec::new();
    for pattern in patterns {
        let pattern = DevicePattern::parse(pattern.as_ref())?;
        let found = pattern.matches()?;
        debug!(pattern = pattern.as_str(), count = found.len(), "discovered");
        devices.extend(found);
    }
    Ok(devices)
}
