//! Seed run — fetch, reshape and write every configured ticker in order.

use super::config::{ConfigError, FailurePolicy, SeedConfig};
use super::progress::SeedProgress;
use super::report::{RunReport, TickerOutcome, TickerReport};
use crate::data::canonicalize::{to_price_series, ShapeError};
use crate::data::provider::{DataError, MarketDataProvider};
use crate::data::sink::{SeriesSink, SinkError};
use crate::domain::{DateRange, TickerSymbol};
use thiserror::Error;

/// Failure of a seed run or of a single ticker within it.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("provider failure for {ticker}: {source}")]
    Provider {
        ticker: TickerSymbol,
        #[source]
        source: DataError,
    },

    #[error("unexpected data shape for {ticker}: {source}")]
    Shape {
        ticker: TickerSymbol,
        #[source]
        source: ShapeError,
    },

    #[error("could not write {ticker}: {source}")]
    Filesystem {
        ticker: TickerSymbol,
        #[source]
        source: SinkError,
    },
}

impl SeedError {
    /// The ticker being processed, if the error belongs to one.
    pub fn ticker(&self) -> Option<&TickerSymbol> {
        match self {
            SeedError::Config(_) => None,
            SeedError::Provider { ticker, .. }
            | SeedError::Shape { ticker, .. }
            | SeedError::Filesystem { ticker, .. } => Some(ticker),
        }
    }

    /// Whether this error stops the run under `policy`.
    pub fn is_fatal(&self, policy: FailurePolicy) -> bool {
        match self {
            SeedError::Config(_) => true,
            SeedError::Shape { .. } => false,
            SeedError::Provider { .. } | SeedError::Filesystem { .. } => {
                policy == FailurePolicy::Abort
            }
        }
    }
}

/// Run the seed over `config.tickers`, sequentially and in list order.
///
/// Tickers with no data are skipped without touching any existing file.
/// Reshape failures are always skipped. Provider and filesystem failures
/// follow `config.failure_policy`: under `Abort` the error is returned at
/// once and `on_complete` is never called.
pub fn run(
    config: &SeedConfig,
    provider: &dyn MarketDataProvider,
    sink: &dyn SeriesSink,
    progress: &dyn SeedProgress,
) -> Result<RunReport, SeedError> {
    let range = config.date_range()?;
    let total = config.tickers.len();
    let mut report = RunReport::new(range);

    log::debug!(
        "seeding {total} ticker(s) from {} over {range}",
        provider.name()
    );

    for (i, ticker) in config.tickers.iter().enumerate() {
        progress.on_start(ticker, i, total);

        let outcome = match seed_single(provider, sink, ticker, range) {
            Ok(Some((path, rows))) => {
                progress.on_saved(ticker, &path, rows);
                TickerOutcome::Written { path, rows }
            }
            Ok(None) => {
                progress.on_empty(ticker);
                TickerOutcome::Empty
            }
            Err(error) if error.is_fatal(config.failure_policy) => return Err(error),
            Err(error) => {
                log::warn!("{error}");
                progress.on_failed(ticker, &error);
                TickerOutcome::Failed { error }
            }
        };

        report.tickers.push(TickerReport {
            ticker: ticker.clone(),
            outcome,
        });
    }

    progress.on_complete(&report);
    Ok(report)
}

/// Seed a single ticker: fetch → reshape → write.
///
/// Returns `Ok(None)` when the provider had nothing for the window.
fn seed_single(
    provider: &dyn MarketDataProvider,
    sink: &dyn SeriesSink,
    ticker: &TickerSymbol,
    range: DateRange,
) -> Result<Option<(std::path::PathBuf, usize)>, SeedError> {
    let frame = provider
        .fetch_daily_bars(ticker, range.start, range.end)
        .map_err(|source| SeedError::Provider {
            ticker: ticker.clone(),
            source,
        })?;

    if frame.is_empty() {
        return Ok(None);
    }

    let series = to_price_series(ticker, frame).map_err(|source| SeedError::Shape {
        ticker: ticker.clone(),
        source,
    })?;
    if series.is_empty() {
        return Ok(None);
    }

    let path = sink.write(&series).map_err(|source| SeedError::Filesystem {
        ticker: ticker.clone(),
        source,
    })?;

    Ok(Some((path, series.len())))
}
