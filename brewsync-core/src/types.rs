//! Domain newtypes shared by the sync engine and the CLI.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// ToolUrl
// ---------------------------------------------------------------------------

/// Raw download URL of the tool script the formula distributes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ToolUrl(pub String);

impl ToolUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToolUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ---------------------------------------------------------------------------
// Sha256Hex
// ---------------------------------------------------------------------------

/// Lowercase hex-encoded SHA-256 digest (always 64 characters).
///
/// Parsed from user input (`--hash`) via [`FromStr`], which trims and lowercases.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sha256Hex(String);

impl Sha256Hex {
    /// Number of hex characters in a SHA-256 digest.
    pub const LEN: usize = 64;

    /// Build from raw digest bytes.
    pub fn from_digest(bytes: &[u8; 32]) -> Self {
        Self(hex::encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Sha256Hex {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        if lowered.len() != Self::LEN || !lowered.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ConfigError::Invalid(format!(
                "'{s}' is not a 64-character hex SHA-256 digest"
            )));
        }
        Ok(Self(lowered))
    }
}

impl fmt::Display for Sha256Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY_SHA: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn parse_normalizes_case_and_whitespace() {
        let upper = format!("  {}\n", EMPTY_SHA.to_ascii_uppercase());
        let h: Sha256Hex = upper.parse().expect("parse");
        assert_eq!(h.as_str(), EMPTY_SHA);
    }

    #[test]
    fn parse_rejects_wrong_length_and_non_hex() {
        assert!("abc123".parse::<Sha256Hex>().is_err());
        let bad = format!("{}zz", &EMPTY_SHA[..62]);
        assert!(bad.parse::<Sha256Hex>().is_err());
    }

    #[test]
    fn from_digest_is_lowercase_hex() {
        let mut bytes = [0u8; 32];
        bytes[0] = 0xAB;
        bytes[31] = 0x01;
        let h = Sha256Hex::from_digest(&bytes);
        assert_eq!(h.as_str().len(), Sha256Hex::LEN);
        assert!(h.as_str().starts_with("ab00"));
        assert!(h.as_str().ends_with("01"));
    }

    #[test]
    fn tool_url_display() {
        let url = ToolUrl("https://example.com/x.py".to_string());
        assert_eq!(url.to_string(), "https://example.com/x.py");
    }
}
