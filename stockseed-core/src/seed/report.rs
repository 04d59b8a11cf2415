//! Outcome of a seed run: one entry per processed ticker, with counts.

use crate::domain::{DateRange, TickerSymbol};
use std::path::PathBuf;

use super::runner::SeedError;

/// What happened to one ticker.
#[derive(Debug)]
pub enum TickerOutcome {
    Written { path: PathBuf, rows: usize },
    Empty,
    Failed { error: SeedError },
}

#[derive(Debug)]
pub struct TickerReport {
    pub ticker: TickerSymbol,
    pub outcome: TickerOutcome,
}

/// Per-ticker outcomes of a completed run, in processing order.
#[derive(Debug)]
pub struct RunReport {
    pub range: DateRange,
    pub tickers: Vec<TickerReport>,
}

impl RunReport {
    pub fn new(range: DateRange) -> Self {
        Self {
            range,
            tickers: Vec::new(),
        }
    }

    pub fn written(&self) -> usize {
        self.count(|o| matches!(o, TickerOutcome::Written { .. }))
    }

    pub fn empty(&self) -> usize {
        self.count(|o| matches!(o, TickerOutcome::Empty))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, TickerOutcome::Failed { .. }))
    }

    pub fn total(&self) -> usize {
        self.tickers.len()
    }

    pub fn outcome(&self, ticker: &str) -> Option<&TickerOutcome> {
        self.tickers
            .iter()
            .find(|t| t.ticker.as_str() == ticker)
            .map(|t| &t.outcome)
    }

    fn count(&self, pred: impl Fn(&TickerOutcome) -> bool) -> usize {
        self.tickers.iter().filter(|t| pred(&t.outcome)).count()
    }
}
