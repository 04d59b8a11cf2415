//! PriceBar and PriceSeries — the canonical shape written to seed files.

use super::ticker::TickerSymbol;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day of OHLCV data for a single ticker.
///
/// Values are taken as the provider reports them; a value the provider left
/// blank is NaN. No range checks are applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Bars for one ticker, in the order the provider returned them.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    pub ticker: TickerSymbol,
    pub bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(ticker: TickerSymbol, bars: Vec<PriceBar>) -> Self {
        Self { ticker, bars }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar() -> PriceBar {
        PriceBar {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            open: 187.15,
            high: 188.44,
            low: 183.89,
            close: 185.64,
            volume: 82_488_700.0,
        }
    }

    #[test]
    fn series_reports_date_bounds() {
        let mut later = sample_bar();
        later.date = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let series = PriceSeries::new(
            TickerSymbol::new("AAPL").unwrap(),
            vec![sample_bar(), later],
        );
        assert_eq!(series.len(), 2);
        assert_eq!(series.first_date(), NaiveDate::from_ymd_opt(2024, 1, 2));
        assert_eq!(series.last_date(), NaiveDate::from_ymd_opt(2024, 1, 3));

        let empty = PriceSeries::new(TickerSymbol::new("AAPL").unwrap(), vec![]);
        assert!(empty.is_empty());
        assert_eq!(empty.first_date(), None);
    }
}
