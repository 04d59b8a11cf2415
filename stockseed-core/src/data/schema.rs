//! Canonical seed file columns.

/// Canonical fields, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedColumn {
    Date,
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl SeedColumn {
    pub const ALL: [SeedColumn; 6] = [
        SeedColumn::Date,
        SeedColumn::Open,
        SeedColumn::High,
        SeedColumn::Low,
        SeedColumn::Close,
        SeedColumn::Volume,
    ];

    /// Name in the written CSV header.
    pub fn name(self) -> &'static str {
        match self {
            SeedColumn::Date => "date",
            SeedColumn::Open => "open",
            SeedColumn::High => "high",
            SeedColumn::Low => "low",
            SeedColumn::Close => "close",
            SeedColumn::Volume => "volume",
        }
    }
}

/// Header row of every seed file.
pub const SEED_HEADER: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];

/// Date format used in seed files.
pub const SEED_DATE_FORMAT: &str = "%Y-%m-%d";
