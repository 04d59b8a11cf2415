//! Yahoo Finance data provider.
//!
//! Fetches daily OHLCV bars from Yahoo's v8 chart API and hands them back in
//! the shape Yahoo's own download tools produce: a `Date` index plus
//! `Open, High, Low, Close, Adj Close, Volume` columns.
//!
//! One request per ticker, no retries. Yahoo has no official API and is
//! subject to unannounced format changes; those surface as
//! `DataError::ResponseFormatChanged`.

use super::frame::{Cell, RawColumn, RawFrame};
use super::provider::{DataError, MarketDataProvider};
use crate::domain::{DateRange, TickerSymbol};
use chrono::NaiveDate;
use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<i64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    adjclose: Vec<Option<f64>>,
}

/// Yahoo Finance data provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    base_url: Url,
}

impl YahooProvider {
    pub const DEFAULT_BASE_URL: &'static str = "https://query2.finance.yahoo.com";

    pub fn new(timeout: Duration) -> Result<Self, DataError> {
        Self::with_base_url(Self::DEFAULT_BASE_URL, timeout)
    }

    /// Point the provider at a different host (mirrors, local fixtures).
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, DataError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| DataError::Other(format!("invalid base URL '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(DataError::Other(format!(
                "base URL '{base_url}' cannot carry a path"
            )));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    /// Build the chart API URL for a ticker and `[start, end)` window.
    ///
    /// The ticker goes in as a single percent-encoded path segment.
    fn chart_url(
        &self,
        ticker: &TickerSymbol,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Url, DataError> {
        let start_ts = start.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();
        let end_ts = end.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                DataError::Other(format!("base URL '{}' cannot carry a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", ticker.as_str()]);
        url.query_pairs_mut()
            .append_pair("period1", &start_ts.to_string())
            .append_pair("period2", &end_ts.to_string())
            .append_pair("interval", "1d")
            .append_pair("includeAdjustedClose", "true")
            .append_pair("events", "div,splits");
        Ok(url)
    }

    /// Parse the chart API response into a provider-shaped frame.
    fn parse_response(
        ticker: &TickerSymbol,
        range: DateRange,
        resp: ChartResponse,
    ) -> Result<RawFrame, DataError> {
        let Some(result) = resp.chart.result else {
            return match resp.chart.error {
                Some(err) if err.code == "Not Found" => {
                    log::warn!("{ticker}: Yahoo reports symbol not found");
                    Ok(RawFrame::empty())
                }
                Some(err) => Err(DataError::ResponseFormatChanged(format!(
                    "{}: {}",
                    err.code, err.description
                ))),
                None => Err(DataError::ResponseFormatChanged(
                    "empty result with no error".into(),
                )),
            };
        };

        let Some(data) = result.into_iter().next() else {
            return Ok(RawFrame::empty());
        };

        // No timestamps means no trading days in the window.
        let timestamps = match data.timestamp {
            Some(ts) if !ts.is_empty() => ts,
            _ => return Ok(RawFrame::empty()),
        };

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

        let adj_closes = data
            .indicators
            .adjclose
            .and_then(|v| v.into_iter().next())
            .map(|a| a.adjclose)
            .unwrap_or_default();

        let gmtoffset = data.meta.and_then(|m| m.gmtoffset).unwrap_or(0);

        let n = timestamps.len();
        let mut dates = Vec::with_capacity(n);
        let mut open = Vec::with_capacity(n);
        let mut high = Vec::with_capacity(n);
        let mut low = Vec::with_capacity(n);
        let mut close = Vec::with_capacity(n);
        let mut adj_close = Vec::with_capacity(n);
        let mut volume = Vec::with_capacity(n);

        for (i, &ts) in timestamps.iter().enumerate() {
            let date = chrono::DateTime::from_timestamp(ts + gmtoffset, 0)
                .map(|dt| dt.date_naive())
                .ok_or_else(|| {
                    DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
                })?;

            let o = quote.open.get(i).copied().flatten();
            let h = quote.high.get(i).copied().flatten();
            let l = quote.low.get(i).copied().flatten();
            let c = quote.close.get(i).copied().flatten();
            let v = quote.volume.get(i).copied().flatten();

            // Skip bars where all OHLCV are None (holidays/non-trading days)
            if o.is_none() && h.is_none() && l.is_none() && c.is_none() && v.is_none() {
                continue;
            }

            // Yahoo occasionally appends today's live bar past period2.
            if !range.contains(date) {
                log::debug!("{ticker}: dropping bar {date} outside {range}");
                continue;
            }

            dates.push(Cell::Date(date));
            open.push(Cell::from(o));
            high.push(Cell::from(h));
            low.push(Cell::from(l));
            close.push(Cell::from(c));
            adj_close.push(Cell::from(adj_closes.get(i).copied().flatten()));
            volume.push(Cell::from(v));
        }

        if dates.is_empty() {
            return Ok(RawFrame::empty());
        }

        Ok(RawFrame::new(
            Some(RawColumn::new("Date", dates)),
            vec![
                RawColumn::new("Open", open),
                RawColumn::new("High", high),
                RawColumn::new("Low", low),
                RawColumn::new("Close", close),
                RawColumn::new("Adj Close", adj_close),
                RawColumn::new("Volume", volume),
            ],
        ))
    }
}

impl MarketDataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch_daily_bars(
        &self,
        ticker: &TickerSymbol,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RawFrame, DataError> {
        let url = self.chart_url(ticker, start, end)?;
        log::debug!("GET {url}");

        let resp = self.client.get(url).send().map_err(|e| {
            if e.is_timeout() {
                DataError::NetworkUnreachable(format!("request for {ticker} timed out: {e}"))
            } else {
                DataError::NetworkUnreachable(e.to_string())
            }
        })?;

        let status = resp.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            log::warn!("{ticker}: Yahoo returned 404, treating as no data");
            return Ok(RawFrame::empty());
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(DataError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(DataError::AuthenticationRequired(
                "Yahoo Finance requires authentication".into(),
            ));
        }

        if !status.is_success() {
            return Err(DataError::Other(format!("HTTP {status} for {ticker}")));
        }

        let chart: ChartResponse = resp.json().map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse response for {ticker}: {e}"))
        })?;

        Self::parse_response(ticker, DateRange { start, end }, chart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aapl() -> TickerSymbol {
        TickerSymbol::new("AAPL").unwrap()
    }

    fn range() -> DateRange {
        DateRange {
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
        }
    }

    fn parse(json: &str) -> Result<RawFrame, DataError> {
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        YahooProvider::parse_response(&aapl(), range(), resp)
    }

    // 2024-01-02, 2024-01-03, 2024-01-04 at 14:30 UTC (09:30 New York)
    const CHART: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"gmtoffset": -18000},
                "timestamp": [1704205800, 1704292200, 1704378600],
                "indicators": {
                    "quote": [{
                        "open":   [187.15, null, 182.15],
                        "high":   [188.44, null, 183.09],
                        "low":    [183.89, null, 180.88],
                        "close":  [185.64, null, 181.91],
                        "volume": [82488700, null, 71983600]
                    }],
                    "adjclose": [{"adjclose": [184.94, null, 181.22]}]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn parses_chart_into_indexed_frame() {
        let frame = parse(CHART).unwrap();
        assert_eq!(
            frame.column_names(),
            vec!["Date", "Open", "High", "Low", "Close", "Adj Close", "Volume"]
        );
        // the all-null holiday row is skipped
        assert_eq!(frame.len(), 2);
        let index = frame.index.as_ref().unwrap();
        assert_eq!(
            index.values[0],
            Cell::Date(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap())
        );
        assert_eq!(frame.column("volume").unwrap().values[1], Cell::Int(71983600));
    }

    #[test]
    fn drops_bars_outside_window() {
        let mut narrow = range();
        narrow.end = NaiveDate::from_ymd_opt(2024, 1, 4).unwrap();
        let resp: ChartResponse = serde_json::from_str(CHART).unwrap();
        let frame = YahooProvider::parse_response(&aapl(), narrow, resp).unwrap();
        assert_eq!(frame.len(), 1);
    }

    #[test]
    fn not_found_is_empty() {
        let json = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        assert!(parse(json).unwrap().is_empty());
    }

    #[test]
    fn missing_timestamps_is_empty() {
        let json = r#"{"chart":{"result":[{"meta":{},"indicators":{"quote":[{}]}}],"error":null}}"#;
        assert!(parse(json).unwrap().is_empty());
    }

    #[test]
    fn other_chart_error_is_format_change() {
        let json = r#"{"chart":{"result":null,"error":{"code":"Bad Request","description":"Invalid input"}}}"#;
        assert!(matches!(parse(json), Err(DataError::ResponseFormatChanged(_))));
    }

    #[test]
    fn url_uses_exclusive_midnight_bounds() {
        let provider = YahooProvider::with_base_url("http://localhost:9/", Duration::from_secs(1)).unwrap();
        let url = provider
            .chart_url(&aapl(), range().start, range().end)
            .unwrap()
            .to_string();
        assert!(url.starts_with("http://localhost:9/v8/finance/chart/AAPL?"));
        assert!(url.contains("period1=1704067200"));
        assert!(url.contains("period2=1704412800"));
        assert!(url.contains("interval=1d"));
        assert!(url.contains("events=div%2Csplits"));
    }

    #[test]
    fn url_escapes_ticker_as_one_path_segment() {
        let provider = YahooProvider::with_base_url("http://localhost:9/proxy/", Duration::from_secs(1)).unwrap();
        let ticker = TickerSymbol::new("A?B#C&D").unwrap();
        let url = provider.chart_url(&ticker, range().start, range().end).unwrap();
        assert_eq!(url.path(), "/proxy/v8/finance/chart/A%3FB%23C&D");
        assert_eq!(url.fragment(), None);
        assert_eq!(
            url.query_pairs().find(|(k, _)| k == "period1").map(|(_, v)| v.into_owned()),
            Some("1704067200".to_string())
        );
    }

    #[test]
    fn rejects_unusable_base_url() {
        assert!(YahooProvider::with_base_url("not a url", Duration::from_secs(1)).is_err());
        assert!(YahooProvider::with_base_url("mailto:someone@example.com", Duration::from_secs(1)).is_err());
    }
}
