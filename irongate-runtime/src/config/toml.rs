//! TOML graph records
//!
//! ```toml
//! version = 1
//!
//! [[nodes]]
//! id = "a"
//! category = "move"
//! value = 100
//! position = { x = 40, y = 60 }
//!
//! [[nodes]]
//! id = "b"
//! type = "turn"      # older records
//! val = "90"         # numeric strings are accepted
//!
//! [[edges]]
//! id = "conn-1"
//! from = "a"
//! to = "b"
//! ```

use core::fmt;
use core::str;

use irongate_core::config::{GraphConfig, CONFIG_VERSION};

/// TOML record errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Record is not UTF-8
    InvalidUtf8,
    /// Not valid TOML, or fields of the wrong shape
    Syntax,
    /// Record written for another format version
    VersionMismatch { found: u8 },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidUtf8 => f.write_str("record is not valid UTF-8"),
            ParseError::Syntax => f.write_str("malformed TOML record"),
            ParseError::VersionMismatch { found } => {
                write!(f, "record version {} (expected {})", found, CONFIG_VERSION)
            }
        }
    }
}

/// Parse a TOML graph record
pub fn parse_config(input: &str) -> Result<GraphConfig, ParseError> {
    let config: GraphConfig = ::toml::from_str(input).map_err(|e| {
        warn!("TOML parse error: {}", e.message());
        ParseError::Syntax
    })?;

    if !config.is_current() {
        return Err(ParseError::VersionMismatch {
            found: config.version,
        });
    }
    Ok(config)
}

/// Parse a TOML graph record from raw bytes
pub fn parse_bytes(bytes: &[u8]) -> Result<GraphConfig, ParseError> {
    let input = str::from_utf8(bytes).map_err(|_| ParseError::InvalidUtf8)?;
    parse_config(input)
}
