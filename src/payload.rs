//! Test payload and the two run variants.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Text every payload token starts with.
pub const TOKEN_PREFIX: &str = "World";

/// Build `World0,World1,...,World{tokens-1}` as bytes.
///
/// Zero tokens gives an empty payload.
pub fn build_payload(tokens: usize) -> Vec<u8> {
    (0..tokens)
        .map(|i| format!("{TOKEN_PREFIX}{i}"))
        .collect::<Vec<_>>()
        .join(",")
        .into_bytes()
}

/// Which flavour of loopback run to perform.
///
/// `Probe` prints whatever comes back from each device. `Verify` sends a much
/// larger payload and fails the run unless it is echoed byte for byte.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    Probe,
    Verify,
}

impl Variant {
    /// Number of `WorldN` tokens in the payload.
    pub fn token_count(self) -> usize {
        match self {
            Self::Probe => 20,
            Self::Verify => 474,
        }
    }

    /// Upper bound for the single read after the write.
    pub fn read_limit(self) -> usize {
        match self {
            Self::Probe => 9_999,
            Self::Verify => 99_999,
        }
    }

    /// Whether the echo must match the payload exactly.
    pub fn verifies(self) -> bool {
        matches!(self, Self::Verify)
    }

    pub fn payload(self) -> Vec<u8> {
        build_payload(self.token_count())
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Probe => f.write_str("probe"),
            Self::Verify => f.write_str("verify"),
        }
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "probe" | "a" => Ok(Self::Probe),
            "verify" | "b" => Ok(Self::Verify),
            other => Err(format!("unknown variant '{other}', expected 'probe' or 'verify'")),
        }
    }
}
