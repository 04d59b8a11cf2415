//! Output sinks for reshaped series.
//!
//! `CsvDirSink` writes `sample_{TICKER}.csv` files into a directory,
//! truncating any file already there. `MemorySink` keeps the same bytes in
//! memory so the seed run can be exercised without touching disk.

use super::schema::{SEED_DATE_FORMAT, SEED_HEADER};
use crate::domain::PriceSeries;
use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("CSV encoding failed for {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Destination for reshaped series.
pub trait SeriesSink: Send + Sync {
    /// Persist `series`, replacing any earlier output for the same ticker.
    /// Returns the location written to.
    fn write(&self, series: &PriceSeries) -> Result<PathBuf, SinkError>;
}

/// Encode `series` as seed CSV into `writer`.
///
/// Columns: date, open, high, low, close, volume. NaN values are written as
/// empty fields.
pub fn write_series_csv<W: io::Write>(writer: W, series: &PriceSeries) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(SEED_HEADER)?;

    for bar in &series.bars {
        wtr.write_record([
            bar.date.format(SEED_DATE_FORMAT).to_string(),
            format_number(bar.open),
            format_number(bar.high),
            format_number(bar.low),
            format_number(bar.close),
            format_number(bar.volume),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Shortest round-trip decimal text; whole numbers carry no fraction.
fn format_number(v: f64) -> String {
    if v.is_nan() {
        String::new()
    } else {
        v.to_string()
    }
}

/// Writes one CSV file per ticker into a directory.
#[derive(Debug, Clone)]
pub struct CsvDirSink {
    dir: PathBuf,
}

impl CsvDirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, series: &PriceSeries) -> PathBuf {
        self.dir.join(series.ticker.seed_file_name())
    }
}

impl SeriesSink for CsvDirSink {
    fn write(&self, series: &PriceSeries) -> Result<PathBuf, SinkError> {
        let path = self.path_for(series);
        std::fs::create_dir_all(&self.dir).map_err(|source| SinkError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let file = std::fs::File::create(&path).map_err(|source| SinkError::Io {
            path: path.clone(),
            source,
        })?;
        write_series_csv(io::BufWriter::new(file), series).map_err(|source| SinkError::Csv {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }
}

/// Keeps encoded CSV per file name in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    files: Mutex<BTreeMap<String, String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents written for `file_name`, if any.
    pub fn get(&self, file_name: &str) -> Option<String> {
        self.files
            .lock()
            .ok()
            .and_then(|files| files.get(file_name).cloned())
    }

    /// File names written so far, sorted.
    pub fn file_names(&self) -> Vec<String> {
        self.files
            .lock()
            .map(|files| files.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl SeriesSink for MemorySink {
    fn write(&self, series: &PriceSeries) -> Result<PathBuf, SinkError> {
        let name = series.ticker.seed_file_name();
        let path = PathBuf::from(&name);

        let mut buf = Vec::new();
        write_series_csv(&mut buf, series).map_err(|source| SinkError::Csv {
            path: path.clone(),
            source,
        })?;
        let text = String::from_utf8(buf).map_err(|e| SinkError::Io {
            path: path.clone(),
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })?;

        let mut files = self.files.lock().map_err(|_| SinkError::Io {
            path: path.clone(),
            source: io::Error::new(io::ErrorKind::Other, "memory sink lock poisoned"),
        })?;
        files.insert(name, text);
        Ok(path)
    }
}
