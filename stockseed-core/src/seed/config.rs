//! Seed run configuration.
//!
//! Every field has a default matching the stock seeding setup (five large-cap
//! tickers, one year back, current directory), so an empty TOML file or no
//! file at all is a valid configuration.

use crate::domain::{DateRange, TickerSymbol};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_TICKERS: [&str; 5] = ["AAPL", "MSFT", "TSLA", "AMZN", "GOOGL"];
pub const DEFAULT_LOOKBACK_DAYS: u32 = 365;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// What to do when fetching or writing a ticker fails.
///
/// Reshape failures always skip the ticker; this policy covers provider
/// and filesystem failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop the run at the first failure. Files already written stay.
    #[default]
    Abort,
    /// Record the failure and move on to the next ticker.
    Isolate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Tickers in processing order. Duplicates are processed twice.
    pub tickers: Vec<TickerSymbol>,

    /// Days back from `today` to request.
    pub lookback_days: u32,

    /// Directory receiving `sample_{TICKER}.csv` files.
    pub output_dir: PathBuf,

    /// Pinned "today"; `None` reads the local clock when the range is computed.
    pub today: Option<NaiveDate>,

    pub failure_policy: FailurePolicy,

    /// HTTP timeout per provider request.
    pub request_timeout_secs: u64,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            tickers: DEFAULT_TICKERS
                .iter()
                .filter_map(|t| TickerSymbol::new(*t).ok())
                .collect(),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            output_dir: PathBuf::from("."),
            today: None,
            failure_policy: FailurePolicy::default(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl SeedConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string. Missing keys take their defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lookback_days == 0 {
            return Err(ConfigError::Invalid("lookback_days must be at least 1".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be at least 1".into(),
            ));
        }
        self.date_range()?;
        Ok(())
    }

    /// `[today - lookback_days, today]`, reading the local clock if `today` is unset.
    pub fn date_range(&self) -> Result<DateRange, ConfigError> {
        let today = self
            .today
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        DateRange::trailing(today, self.lookback_days).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "lookback_days = {} reaches before the earliest supported date",
                self.lookback_days
            ))
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_seed_set() {
        let c = SeedConfig::default();
        let names: Vec<&str> = c.tickers.iter().map(|t| t.as_str()).collect();
        assert_eq!(names, DEFAULT_TICKERS);
        assert_eq!(c.lookback_days, 365);
        assert_eq!(c.output_dir, PathBuf::from("."));
        assert_eq!(c.failure_policy, FailurePolicy::Abort);
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(SeedConfig::from_toml("").unwrap(), SeedConfig::default());
    }

    #[test]
    fn partial_toml_overrides() {
        let c = SeedConfig::from_toml(
            r#"
tickers = ["SPY", "QQQ"]
lookback_days = 30
today = "2024-06-30"
failure_policy = "isolate"
"#,
        )
        .unwrap();
        assert_eq!(c.tickers.len(), 2);
        assert_eq!(c.failure_policy, FailurePolicy::Isolate);
        let r = c.date_range().unwrap();
        assert_eq!(r.end, NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
        assert_eq!(r.start, NaiveDate::from_ymd_opt(2024, 5, 31).unwrap());
        assert_eq!(c.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            SeedConfig::from_toml("lookback_days = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            SeedConfig::from_toml(r#"tickers = ["../x"]"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn rejects_lookback_beyond_calendar() {
        let err = SeedConfig::from_toml("lookback_days = 4000000000").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("4000000000"), "{err}");
    }

    #[test]
    fn toml_roundtrip() {
        let mut c = SeedConfig::default();
        c.today = NaiveDate::from_ymd_opt(2024, 1, 1);
        let parsed = SeedConfig::from_toml(&c.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, c);
    }
}
