//! Market data provider trait and structured error types.
//!
//! The MarketDataProvider trait abstracts over data sources so the seed run
//! can be driven by Yahoo Finance in production and by an in-memory fake in
//! tests.

use super::frame::RawFrame;
use crate::domain::TickerSymbol;
use chrono::NaiveDate;
use thiserror::Error;

/// Structured error types for provider operations.
///
/// "No data" is not an error: providers return an empty frame for that.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("data error: {0}")]
    Other(String),
}

/// Trait for market data providers.
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily OHLCV bars for a ticker with dates in `[start, end)`,
    /// ascending. Returns an empty frame when the provider has no data.
    fn fetch_daily_bars(
        &self,
        ticker: &TickerSymbol,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RawFrame, DataError>;
}
