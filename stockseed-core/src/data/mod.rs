//! Market data: provider trait, Yahoo provider, reshape, CSV sink and read-back

pub mod canonicalize;
pub mod frame;
pub mod provider;
pub mod reader;
pub mod schema;
pub mod sink;
pub mod yahoo;

pub use canonicalize::{to_price_series, ShapeError};
pub use frame::{Cell, RawColumn, RawFrame};
pub use provider::{DataError, MarketDataProvider};
pub use reader::{load_seed_file, read_seed_file, ReaderError, SeedFileReport, SkipReason, SkippedRow};
pub use schema::{SeedColumn, SEED_HEADER};
pub use sink::{write_series_csv, CsvDirSink, MemorySink, SeriesSink, SinkError};
pub use yahoo::YahooProvider;
