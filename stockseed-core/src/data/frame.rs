//! Provider-shaped table, before any reshaping.
//!
//! Providers hand back whatever columns they have, in whatever order, and
//! usually keep the date as a row index rather than a regular column. A
//! `RawFrame` carries that shape as-is so the reshape step can own the
//! projection to the canonical columns.

use chrono::NaiveDate;
use std::fmt;

/// A loosely-typed value as reported by a provider.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Date(NaiveDate),
    Float(f64),
    Int(i64),
    Text(String),
    Null,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Date(d) => write!(f, "{d}"),
            Cell::Float(v) => write!(f, "{v}"),
            Cell::Int(v) => write!(f, "{v}"),
            Cell::Text(s) => write!(f, "{s:?}"),
            Cell::Null => write!(f, "null"),
        }
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Float(v)
    }
}

impl From<i64> for Cell {
    fn from(v: i64) -> Self {
        Cell::Int(v)
    }
}

impl From<NaiveDate> for Cell {
    fn from(v: NaiveDate) -> Self {
        Cell::Date(v)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(v: Option<T>) -> Self {
        v.map_or(Cell::Null, Into::into)
    }
}

/// A named column of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct RawColumn {
    pub name: String,
    pub values: Vec<Cell>,
}

impl RawColumn {
    pub fn new(name: impl Into<String>, values: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Columnar table with an optional row index.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawFrame {
    pub index: Option<RawColumn>,
    pub columns: Vec<RawColumn>,
}

impl RawFrame {
    pub fn new(index: Option<RawColumn>, columns: Vec<RawColumn>) -> Self {
        Self { index, columns }
    }

    /// A frame with no rows and no columns ("no data").
    pub fn empty() -> Self {
        Self::default()
    }

    /// Length of the longest column, index included. Columns may disagree;
    /// the reshape step decides which one counts.
    pub fn len(&self) -> usize {
        self.index
            .iter()
            .chain(self.columns.iter())
            .map(RawColumn::len)
            .max()
            .unwrap_or(0)
    }

    /// True when no column (index included) holds a single value.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Column names in frame order, index first if present.
    pub fn column_names(&self) -> Vec<&str> {
        self.index
            .iter()
            .chain(self.columns.iter())
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Turn the index into the first regular column.
    pub fn reset_index(mut self) -> Self {
        if let Some(index) = self.index.take() {
            self.columns.insert(0, index);
        }
        self
    }

    /// Look a column up by name, ignoring case, spaces, underscores and dashes.
    pub fn column(&self, name: &str) -> Option<&RawColumn> {
        let wanted = normalize_name(name);
        self.columns
            .iter()
            .find(|c| normalize_name(&c.name) == wanted)
    }
}

/// `"Adj Close"`, `"adj_close"` and `"ADJ-CLOSE"` all normalize to `"adjclose"`.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}
