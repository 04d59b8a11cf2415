//! Reshape a provider frame into the canonical `PriceSeries`.
//!
//! The date index becomes a regular field, the six canonical columns are
//! picked out by name and everything else (adjusted close, dividends, ...)
//! is dropped. Row order is preserved exactly.

use super::frame::{Cell, RawColumn, RawFrame};
use super::schema::{SeedColumn, SEED_DATE_FORMAT};
use crate::domain::{PriceBar, PriceSeries, TickerSymbol};
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ShapeError {
    #[error("missing column '{column}' (provider returned: {available})")]
    MissingColumn { column: &'static str, available: String },

    #[error("column '{column}' has {actual} rows, expected {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("column '{column}' row {row}: cannot read {found} as a {expected}")]
    BadCell {
        column: String,
        row: usize,
        found: String,
        expected: &'static str,
    },
}

/// Project `frame` onto the canonical columns for `ticker`.
pub fn to_price_series(ticker: &TickerSymbol, frame: RawFrame) -> Result<PriceSeries, ShapeError> {
    let frame = frame.reset_index();

    let [date, open, high, low, close, volume] = SeedColumn::ALL.map(|c| find(&frame, c));
    let (date, open, high, low, close, volume) = (date?, open?, high?, low?, close?, volume?);

    // One row per date; columns that get dropped do not count.
    let rows = date.len();

    let kept = [date, open, high, low, close, volume];
    for col in kept {
        if col.len() != rows {
            return Err(ShapeError::RaggedColumn {
                column: col.name.clone(),
                expected: rows,
                actual: col.len(),
            });
        }
    }

    let dropped: Vec<&str> = frame
        .columns
        .iter()
        .filter(|c| !kept.iter().any(|k| std::ptr::eq(*k, *c)))
        .map(|c| c.name.as_str())
        .collect();
    if !dropped.is_empty() {
        log::debug!("{ticker}: dropping provider columns {dropped:?}");
    }

    let mut bars = Vec::with_capacity(rows);
    for row in 0..rows {
        bars.push(PriceBar {
            date: date_cell(date, row)?,
            open: number_cell(open, row)?,
            high: number_cell(high, row)?,
            low: number_cell(low, row)?,
            close: number_cell(close, row)?,
            volume: number_cell(volume, row)?,
        });
    }

    Ok(PriceSeries::new(ticker.clone(), bars))
}

fn find(frame: &RawFrame, column: SeedColumn) -> Result<&RawColumn, ShapeError> {
    frame
        .column(column.name())
        .ok_or_else(|| ShapeError::MissingColumn {
            column: column.name(),
            available: frame.column_names().join(", "),
        })
}

fn bad_cell(col: &RawColumn, row: usize, expected: &'static str) -> ShapeError {
    ShapeError::BadCell {
        column: col.name.clone(),
        row,
        found: col.values[row].to_string(),
        expected,
    }
}

fn date_cell(col: &RawColumn, row: usize) -> Result<NaiveDate, ShapeError> {
    match &col.values[row] {
        Cell::Date(d) => Ok(*d),
        // Accept "2024-01-02" as well as "2024-01-02 00:00:00" / "2024-01-02T00:00:00Z"
        Cell::Text(s) => s
            .get(..10)
            .and_then(|prefix| NaiveDate::parse_from_str(prefix, SEED_DATE_FORMAT).ok())
            .ok_or_else(|| bad_cell(col, row, "date")),
        _ => Err(bad_cell(col, row, "date")),
    }
}

fn number_cell(col: &RawColumn, row: usize) -> Result<f64, ShapeError> {
    match &col.values[row] {
        Cell::Float(v) => Ok(*v),
        Cell::Int(v) => Ok(*v as f64),
        Cell::Null => Ok(f64::NAN),
        Cell::Text(s) if s.trim().is_empty() => Ok(f64::NAN),
        Cell::Text(s) => s.trim().parse().map_err(|_| bad_cell(col, row, "number")),
        Cell::Date(_) => Err(bad_cell(col, row, "number")),
    }
}
