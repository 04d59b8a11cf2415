//! Validated ticker symbols and the seed file names derived from them.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Exchange ticker symbol (e.g. `AAPL`, `BRK-B`, `^GSPC`).
///
/// The symbol ends up inside an output file name, so construction rejects
/// anything that could escape the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TickerSymbol(String);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TickerError {
    #[error("ticker symbol is empty")]
    Empty,

    #[error("ticker symbol '{0}' contains whitespace")]
    Whitespace(String),

    #[error("ticker symbol '{0}' contains a path separator")]
    PathSeparator(String),

    #[error("ticker symbol '{0}' is a reserved path component")]
    Reserved(String),
}

impl TickerSymbol {
    pub fn new(symbol: impl Into<String>) -> Result<Self, TickerError> {
        let symbol = symbol.into();
        if symbol.is_empty() {
            return Err(TickerError::Empty);
        }
        if symbol.chars().any(char::is_whitespace) {
            return Err(TickerError::Whitespace(symbol));
        }
        if symbol.contains('/') || symbol.contains('\\') {
            return Err(TickerError::PathSeparator(symbol));
        }
        if symbol == "." || symbol == ".." {
            return Err(TickerError::Reserved(symbol));
        }
        Ok(Self(symbol))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name the series for this ticker is written to.
    pub fn seed_file_name(&self) -> String {
        format!("sample_{}.csv", self.0)
    }
}

impl TryFrom<String> for TickerSymbol {
    type Error = TickerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TickerSymbol> for String {
    fn from(value: TickerSymbol) -> Self {
        value.0
    }
}

impl std::str::FromStr for TickerSymbol {
    type Err = TickerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for TickerSymbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TickerSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_symbols() {
        for s in ["AAPL", "BRK-B", "BRK.B", "^GSPC", "ES=F"] {
            assert!(TickerSymbol::new(s).is_ok(), "{s} should be valid");
        }
    }

    #[test]
    fn rejects_path_like_symbols() {
        assert_eq!(TickerSymbol::new(""), Err(TickerError::Empty));
        assert!(matches!(
            TickerSymbol::new("../etc"),
            Err(TickerError::PathSeparator(_))
        ));
        assert!(matches!(
            TickerSymbol::new(".."),
            Err(TickerError::Reserved(_))
        ));
        assert!(matches!(
            TickerSymbol::new("AA PL"),
            Err(TickerError::Whitespace(_))
        ));
    }

    #[test]
    fn seed_file_name_uses_symbol_verbatim() {
        let t = TickerSymbol::new("MSFT").unwrap();
        assert_eq!(t.seed_file_name(), "sample_MSFT.csv");
    }

    #[test]
    fn deserialization_validates() {
        let ok: TickerSymbol = serde_json::from_str("\"TSLA\"").unwrap();
        assert_eq!(ok.as_str(), "TSLA");
        assert!(serde_json::from_str::<TickerSymbol>("\"a/b\"").is_err());
    }
}
