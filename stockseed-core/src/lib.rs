//! stockseed core — fetch trailing daily price bars and write seed CSV files.
//!
//! This crate contains:
//! - Domain types (ticker symbols, date windows, price bars and series)
//! - The market data provider trait and a Yahoo Finance implementation
//! - Reshaping of provider frames into the canonical six columns
//! - CSV sinks and a lenient reader for the written files
//! - The sequential seed run with per-ticker progress notices

pub mod data;
pub mod domain;
pub mod seed;

pub use seed::{run, SeedConfig};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: core types are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::TickerSymbol>();
        require_sync::<domain::TickerSymbol>();
        require_send::<domain::PriceBar>();
        require_sync::<domain::PriceBar>();
        require_send::<domain::PriceSeries>();
        require_sync::<domain::PriceSeries>();
        require_send::<data::RawFrame>();
        require_sync::<data::RawFrame>();
        require_send::<data::YahooProvider>();
        require_sync::<data::YahooProvider>();
        require_send::<data::MemorySink>();
        require_sync::<data::MemorySink>();
        require_send::<seed::SeedConfig>();
        require_sync::<seed::SeedConfig>();
        require_send::<seed::RunReport>();
        require_sync::<seed::RunReport>();
    }
}
