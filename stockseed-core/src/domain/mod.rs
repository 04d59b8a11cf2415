//! Domain types for stockseed

pub mod bar;
pub mod range;
pub mod ticker;

pub use bar::{PriceBar, PriceSeries};
pub use range::DateRange;
pub use ticker::{TickerError, TickerSymbol};
