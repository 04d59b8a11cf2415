//! Read seed CSV files back.
//!
//! Seed files are sometimes hand-edited or produced by other tools, so the
//! reader is lenient: dates in a few common layouts are accepted and rows it
//! cannot use are skipped with a reason instead of failing the whole file.

use super::schema::SEED_DATE_FORMAT;
use crate::domain::{PriceBar, PriceSeries, TickerSymbol};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("cannot read {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path} has no '{column}' column")]
    MissingColumn { path: PathBuf, column: &'static str },
}

/// Why a row was left out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    InvalidDate,
    InvalidClose,
    Malformed,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::InvalidDate => write!(f, "invalid date"),
            SkipReason::InvalidClose => write!(f, "invalid close"),
            SkipReason::Malformed => write!(f, "malformed row"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// 1-based data row number (header excluded).
    pub row: usize,
    pub reason: SkipReason,
    pub raw: String,
}

/// Parsed contents of one seed file.
#[derive(Debug, Clone)]
pub struct SeedFileReport {
    pub path: PathBuf,
    /// Rows that parsed, in file order.
    pub series: PriceSeries,
    pub skipped: Vec<SkippedRow>,
}

/// Load `{dir}/sample_{ticker}.csv`. Returns `Ok(None)` if the file does not exist.
pub fn load_seed_file(dir: &Path, ticker: &TickerSymbol) -> Result<Option<SeedFileReport>, ReaderError> {
    let path = dir.join(ticker.seed_file_name());
    if !path.exists() {
        return Ok(None);
    }
    read_seed_file(&path, ticker).map(Some)
}

/// Parse a seed CSV file at `path`.
pub fn read_seed_file(path: &Path, ticker: &TickerSymbol) -> Result<SeedFileReport, ReaderError> {
    let csv_err = |source| ReaderError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_err)?;

    let headers: HashMap<String, usize> = rdr
        .headers()
        .map_err(csv_err)?
        .iter()
        .enumerate()
        .map(|(i, h)| (strip_noise(h).to_lowercase(), i))
        .collect();

    let col = |name: &'static str| {
        headers.get(name).copied().ok_or_else(|| ReaderError::MissingColumn {
            path: path.to_path_buf(),
            column: name,
        })
    };
    let date_ix = col("date")?;
    let close_ix = col("close")?;
    let open_ix = headers.get("open").copied();
    let high_ix = headers.get("high").copied();
    let low_ix = headers.get("low").copied();
    let volume_ix = headers.get("volume").copied();

    let mut bars = Vec::new();
    let mut skipped = Vec::new();

    for (i, record) in rdr.records().enumerate() {
        let row = i + 1;
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                skipped.push(SkippedRow {
                    row,
                    reason: SkipReason::Malformed,
                    raw: e.to_string(),
                });
                continue;
            }
        };
        let field = |ix: Option<usize>| ix.and_then(|ix| record.get(ix)).unwrap_or("");

        let raw_date = field(Some(date_ix));
        let Some(date) = parse_date_lenient(raw_date) else {
            skipped.push(SkippedRow {
                row,
                reason: SkipReason::InvalidDate,
                raw: raw_date.to_string(),
            });
            continue;
        };

        let raw_close = field(Some(close_ix));
        let close = match parse_optional_number(raw_close) {
            Some(Some(v)) if !v.is_nan() => v,
            _ => {
                skipped.push(SkippedRow {
                    row,
                    reason: SkipReason::InvalidClose,
                    raw: raw_close.to_string(),
                });
                continue;
            }
        };

        let price = |ix| parse_optional_number(field(ix)).flatten().unwrap_or(f64::NAN);
        bars.push(PriceBar {
            date,
            open: price(open_ix),
            high: price(high_ix),
            low: price(low_ix),
            close,
            volume: parse_optional_number(field(volume_ix))
                .flatten()
                .unwrap_or(0.0),
        });
    }

    if !skipped.is_empty() {
        log::warn!("{}: skipped {} row(s)", path.display(), skipped.len());
    }

    Ok(SeedFileReport {
        path: path.to_path_buf(),
        series: PriceSeries::new(ticker.clone(), bars),
        skipped,
    })
}

/// `Some(None)` for an empty field, `None` for garbage.
fn parse_optional_number(raw: &str) -> Option<Option<f64>> {
    let s = strip_noise(raw);
    if s.is_empty() {
        return Some(None);
    }
    s.parse().ok().map(Some)
}

/// Trim, drop a leading BOM and surrounding quotes.
fn strip_noise(raw: &str) -> &str {
    let s = raw.trim().trim_start_matches('\u{feff}');
    let s = s.strip_prefix('"').unwrap_or(s);
    s.strip_suffix('"').unwrap_or(s).trim()
}

/// Accepts `YYYY-MM-DD`, an ISO datetime with that prefix, or
/// `dd-mm-yyyy` / `mm-dd-yyyy` (with `-` or `/`). The day-first reading is
/// only chosen when the first part cannot be a month.
pub fn parse_date_lenient(raw: &str) -> Option<NaiveDate> {
    let s = strip_noise(raw);
    if s.is_empty() {
        return None;
    }

    if let Ok(d) = NaiveDate::parse_from_str(s, SEED_DATE_FORMAT) {
        return Some(d);
    }
    if let Some(d) = s
        .get(..10)
        .filter(|_| matches!(s.as_bytes().get(10), Some(b'T' | b' ')))
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, SEED_DATE_FORMAT).ok())
    {
        return Some(d);
    }

    let parts: Vec<&str> = s.split(['-', '/']).collect();
    if let [p1, p2, p3] = parts.as_slice() {
        if p3.len() != 4 || p1.len() > 2 || p2.len() > 2 {
            return None;
        }
        let (a, b, year): (u32, u32, i32) = (p1.parse().ok()?, p2.parse().ok()?, p3.parse().ok()?);
        return if a > 12 {
            NaiveDate::from_ymd_opt(year, b, a)
        } else {
            NaiveDate::from_ymd_opt(year, a, b)
        };
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn lenient_dates() {
        assert_eq!(parse_date_lenient("2024-01-02"), Some(d(2024, 1, 2)));
        assert_eq!(parse_date_lenient("\u{feff}\"2024-01-02\""), Some(d(2024, 1, 2)));
        assert_eq!(parse_date_lenient("2024-01-02 00:00:00-05:00"), Some(d(2024, 1, 2)));
        assert_eq!(parse_date_lenient("2024-01-02T00:00:00.000Z"), Some(d(2024, 1, 2)));
        assert_eq!(parse_date_lenient("25-12-2023"), Some(d(2023, 12, 25)));
        assert_eq!(parse_date_lenient("12/05/2023"), Some(d(2023, 12, 5)));
        assert_eq!(parse_date_lenient("not a date"), None);
        assert_eq!(parse_date_lenient(""), None);
        assert_eq!(parse_date_lenient("13/13/2023"), None);
    }

    #[test]
    fn reads_written_file_and_skips_bad_rows() {
        let dir = tempfile::tempdir().unwrap();
        let ticker = TickerSymbol::new("MSFT").unwrap();
        std::fs::write(
            dir.path().join("sample_MSFT.csv"),
            "date,open,high,low,close,volume\n\
             2024-01-02,370.87,376.68,366.5,370.87,25258600\n\
             garbage,1,2,3,4,5\n\
             2024-01-04,,,,,\n\
             2024-01-05,368.97,372.06,366.5,367.75,\n",
        )
        .unwrap();

        let report = load_seed_file(dir.path(), &ticker).unwrap().unwrap();
        assert_eq!(report.series.len(), 2);
        assert_eq!(report.series.ticker, ticker);
        assert_eq!(report.skipped.len(), 2);
        assert_eq!(report.skipped[0].row, 2);
        assert_eq!(report.skipped[0].reason, SkipReason::InvalidDate);
        assert_eq!(report.skipped[1].reason, SkipReason::InvalidClose);
        assert_eq!(report.series.bars[1].volume, 0.0);
        assert_eq!(report.series.first_date(), Some(d(2024, 1, 2)));
        assert_eq!(report.series.last_date(), Some(d(2024, 1, 5)));
    }

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let ticker = TickerSymbol::new("GOOGL").unwrap();
        assert!(load_seed_file(dir.path(), &ticker).unwrap().is_none());
    }

    #[test]
    fn missing_close_column_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let ticker = TickerSymbol::new("TSLA").unwrap();
        std::fs::write(dir.path().join("sample_TSLA.csv"), "date,open\n2024-01-02,1\n").unwrap();
        assert!(matches!(
            load_seed_file(dir.path(), &ticker),
            Err(ReaderError::MissingColumn { column: "close", .. })
        ));
    }
}
