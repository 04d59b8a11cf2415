//! Progress notices for a seed run.

use super::report::RunReport;
use super::runner::SeedError;
use crate::domain::TickerSymbol;
use std::path::Path;

/// Listener for per-ticker progress.
pub trait SeedProgress {
    /// Called before a ticker is fetched.
    fn on_start(&self, ticker: &TickerSymbol, index: usize, total: usize);

    /// Called when the provider had no bars for a ticker.
    fn on_empty(&self, ticker: &TickerSymbol);

    /// Called after a ticker's file has been written.
    fn on_saved(&self, ticker: &TickerSymbol, path: &Path, rows: usize);

    /// Called when a ticker is skipped because of an error.
    fn on_failed(&self, ticker: &TickerSymbol, error: &SeedError);

    /// Called once after every ticker has been processed.
    fn on_complete(&self, report: &RunReport);
}

/// Prints notices to stdout.
pub struct ConsoleProgress;

impl SeedProgress for ConsoleProgress {
    fn on_start(&self, ticker: &TickerSymbol, index: usize, total: usize) {
        println!("[{}/{}] Fetching {ticker} data...", index + 1, total);
    }

    fn on_empty(&self, ticker: &TickerSymbol) {
        println!("  No data for {ticker}");
    }

    fn on_saved(&self, _ticker: &TickerSymbol, path: &Path, rows: usize) {
        println!("  Saved {} ({rows} rows)", path.display());
    }

    fn on_failed(&self, ticker: &TickerSymbol, error: &SeedError) {
        println!("  FAIL: {ticker}: {error}");
    }

    fn on_complete(&self, report: &RunReport) {
        if report.failed() == 0 {
            println!("\nAll stock data fetched successfully!");
        } else {
            println!("\nSeed run finished with {} failure(s)", report.failed());
        }
        println!(
            "{}/{} written, {} empty, {} failed ({})",
            report.written(),
            report.total(),
            report.empty(),
            report.failed(),
            report.range,
        );
    }
}
