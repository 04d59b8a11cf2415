//! Seed run orchestration: configuration, progress notices and the run loop.

pub mod config;
pub mod progress;
pub mod report;
pub mod runner;

pub use config::{ConfigError, FailurePolicy, SeedConfig};
pub use progress::{ConsoleProgress, SeedProgress};
pub use report::{RunReport, TickerOutcome, TickerReport};
pub use runner::{run, SeedError};
