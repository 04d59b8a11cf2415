//! stockseed CLI — fetch and inspect seed CSV files.
//!
//! Commands:
//! - `fetch` — download the trailing year of daily bars for each ticker and
//!   write `sample_{TICKER}.csv` files (the default when no command is given)
//! - `inspect` — read written seed files back and report row counts and
//!   rows that would be rejected by an importer

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use stockseed_core::data::{load_seed_file, CsvDirSink, YahooProvider};
use stockseed_core::domain::TickerSymbol;
use stockseed_core::seed::{self, ConsoleProgress, FailurePolicy, SeedConfig};

/// Skipped rows listed per ticker by `inspect`.
const MAX_SKIPPED_SHOWN: usize = 10;

#[derive(Parser)]
#[command(
    name = "stockseed",
    about = "stockseed — fetch trailing daily price bars into seed CSV files"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch daily bars from Yahoo Finance and write one CSV per ticker.
    Fetch {
        #[command(flatten)]
        common: CommonArgs,

        /// Days back from today to request. Defaults to 365.
        #[arg(long)]
        lookback_days: Option<u32>,

        /// Directory for sample_{TICKER}.csv files. Defaults to the current directory.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Pin "today" (YYYY-MM-DD) instead of reading the clock.
        #[arg(long)]
        today: Option<String>,

        /// Keep going past provider and write failures instead of aborting.
        #[arg(long, default_value_t = false)]
        keep_going: bool,

        /// HTTP timeout per request, in seconds. Defaults to 30.
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
    /// Read seed files back and report what an importer would see.
    Inspect {
        #[command(flatten)]
        common: CommonArgs,

        /// Directory holding the seed files. Defaults to the configured output directory.
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

#[derive(Args, Default)]
struct CommonArgs {
    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Tickers to process, in order (e.g. AAPL MSFT). Overrides the config.
    #[arg(long, num_args = 1..)]
    tickers: Vec<String>,
}

impl CommonArgs {
    fn load(&self) -> Result<SeedConfig> {
        let mut config = match &self.config {
            Some(path) => SeedConfig::from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => SeedConfig::default(),
        };
        if !self.tickers.is_empty() {
            config.tickers = self
                .tickers
                .iter()
                .map(|t| TickerSymbol::new(t.as_str()))
                .collect::<Result<_, _>>()?;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Fetch {
        common: CommonArgs::default(),
        lookback_days: None,
        output_dir: None,
        today: None,
        keep_going: false,
        timeout_secs: None,
    }) {
        Commands::Fetch {
            common,
            lookback_days,
            output_dir,
            today,
            keep_going,
            timeout_secs,
        } => {
            let mut config = common.load()?;
            if let Some(days) = lookback_days {
                config.lookback_days = days;
            }
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            if let Some(today) = today {
                config.today = Some(
                    NaiveDate::parse_from_str(&today, "%Y-%m-%d")
                        .with_context(|| format!("invalid --today '{today}'"))?,
                );
            }
            if keep_going {
                config.failure_policy = FailurePolicy::Isolate;
            }
            if let Some(secs) = timeout_secs {
                config.request_timeout_secs = secs;
            }
            config.validate()?;
            run_fetch(&config)
        }
        Commands::Inspect { common, dir } => {
            let config = common.load()?;
            let dir = dir.unwrap_or_else(|| config.output_dir.clone());
            run_inspect(&config.tickers, &dir)
        }
    }
}

fn run_fetch(config: &SeedConfig) -> Result<()> {
    let provider = YahooProvider::new(config.request_timeout())?;
    let sink = CsvDirSink::new(&config.output_dir);

    let report = seed::run(config, &provider, &sink, &ConsoleProgress)
        .context("seed run aborted")?;

    log::info!(
        "seed run finished: {} written, {} empty, {} failed",
        report.written(),
        report.empty(),
        report.failed()
    );
    Ok(())
}

fn run_inspect(tickers: &[TickerSymbol], dir: &std::path::Path) -> Result<()> {
    for ticker in tickers {
        let Some(report) = load_seed_file(dir, ticker)? else {
            println!(
                "File not found: {}, skipping {ticker}",
                dir.join(ticker.seed_file_name()).display()
            );
            continue;
        };

        let series = &report.series;
        let range = match (series.first_date(), series.last_date()) {
            (Some(first), Some(last)) => format!(" {first} to {last}"),
            _ => String::new(),
        };
        println!(
            "Read {} rows for {ticker}{range} (skipped {})",
            series.len(),
            report.skipped.len()
        );

        if !report.skipped.is_empty() {
            println!(" Skipped rows for {ticker}:");
            for row in report.skipped.iter().take(MAX_SKIPPED_SHOWN) {
                println!("   row {}: {} ({:?})", row.row, row.reason, row.raw);
            }
            if report.skipped.len() > MAX_SKIPPED_SHOWN {
                println!(
                    " ...and {} more",
                    report.skipped.len() - MAX_SKIPPED_SHOWN
                );
            }
        }
    }

    println!("All done");
    Ok(())
}
