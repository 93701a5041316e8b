use super::{ClosePoint, PriceSource};
use crate::error::ProviderError;
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{error, trace, warn};

pub const BASE_URL: &str = "https://query1.finance.yahoo.com";

///////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Daily closes from Yahoo Finance, per symbol
//
///////////////////////////////////////////////////////////////////////////////////////////////////////

/// Client for the Yahoo Finance v8 chart endpoint.
#[derive(Debug, Clone)]
pub struct YahooFinance {
    client: Client,
    base_url: String,
}

impl YahooFinance {
    pub fn new(client: Client) -> Self {
        YahooFinance {
            client,
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn url(&self, symbol: &str, lookback_days: u32) -> String {
        let tckr = symbol.to_uppercase();
        format!(
            "{}/v8/finance/chart/{tckr}?symbol={tckr}&interval=1d&range={lookback_days}d",
            self.base_url
        )
    }
}

#[async_trait]
impl PriceSource for YahooFinance {
    async fn fetch(
        &self,
        symbol: &str,
        lookback_days: u32,
    ) -> Result<Vec<ClosePoint>, ProviderError> {
        let url = self.url(symbol, lookback_days);
        trace!("Fetching price data for [{symbol}] from Yahoo Finance");

        let network = |e: reqwest::Error| {
            error!("[{symbol}] price fetching error: {e}\nURL: {url}");
            ProviderError::Network {
                symbol: symbol.to_string(),
                source: e,
            }
        };

        let response = self.client.get(&url).send().await.map_err(network)?;
        match response.status() {
            s if s.is_success() => {}
            StatusCode::NOT_FOUND => {
                error!("[{symbol}] unknown to provider\nURL: {url}");
                return Err(ProviderError::SymbolNotFound(symbol.to_string()));
            }
            StatusCode::TOO_MANY_REQUESTS => {
                error!("[{symbol}] rate limited\nURL: {url}");
                return Err(ProviderError::RateLimited(symbol.to_string()));
            }
            s => {
                error!("[{symbol}] unexpected status {s}\nURL: {url}");
                return Err(ProviderError::Status {
                    symbol: symbol.to_string(),
                    status: s.as_u16(),
                });
            }
        }
        let bytes = response.bytes().await.map_err(|e| {
            error!("[{symbol}] byte transformation error: {e}\nURL: {url}");
            ProviderError::Network {
                symbol: symbol.to_string(),
                source: e,
            }
        })?;

        trace!("Deserializing price data for [{symbol}]");
        let closes = parse_chart(symbol, &bytes).map_err(|e| {
            error!("{e}\nURL: {url}");
            e
        })?;
        trace!("[{symbol}] {} closes fetched", closes.len());
        Ok(closes)
    }
}

/// Turn a raw chart payload into dated closes.
///
/// Timestamps are shifted by the exchange's GMT offset before the calendar
/// date is taken, so a Tokyo session is dated in Tokyo. A repeated date keeps
/// the later point.
pub fn parse_chart(symbol: &str, bytes: &[u8]) -> Result<Vec<ClosePoint>, ProviderError> {
    let malformed = |message: String| ProviderError::Malformed {
        symbol: symbol.to_string(),
        message,
    };

    let de: PriceHistory =
        serde_json::from_slice(bytes).map_err(|e| malformed(format!("deserialization: {e}")))?;

    if let Some(err) = de.chart.error {
        return Err(if err.code == "Not Found" {
            ProviderError::SymbolNotFound(symbol.to_string())
        } else {
            malformed(format!("{}: {}", err.code, err.description))
        });
    }

    let base = de
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| malformed("contained no \"chart.result\" object".to_string()))?;

    let offset = base.meta.gmtoffset;
    let closes = base
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close)
        .unwrap_or_default();

    if base.timestamp.is_empty() {
        warn!("[{symbol}] provider returned no sessions for the requested range");
        return Ok(vec![]);
    }
    if closes.len() != base.timestamp.len() {
        return Err(malformed(format!(
            "{} timestamps but {} closes",
            base.timestamp.len(),
            closes.len()
        )));
    }

    let mut points: Vec<ClosePoint> = Vec::with_capacity(closes.len());
    for (timestamp, close) in base.timestamp.iter().zip(closes) {
        let date = timestamp
            .checked_add(offset)
            .and_then(|local| DateTime::from_timestamp(local, 0))
            .ok_or_else(|| malformed(format!("invalid timestamp {timestamp}")))?
            .date_naive();
        match points.last_mut() {
            Some(last) if last.date == date => {
                warn!("[{symbol}] duplicate session {date}; keeping the later close");
                last.close = close;
            }
            _ => points.push(ClosePoint::new(date, close)),
        }
    }
    Ok(points)
}

///////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Deserialization
//
///////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Deserialize, Debug)]
struct PriceHistory {
    chart: PriceResponse,
}

#[derive(Deserialize, Debug)]
struct PriceResponse {
    result: Option<Vec<PriceCategories>>,
    error: Option<ChartError>,
}

#[derive(Deserialize, Debug)]
struct ChartError {
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Deserialize, Debug)]
struct PriceCategories {
    #[serde(default)]
    meta: Meta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Deserialize, Debug, Default)]
struct Meta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Deserialize, Debug)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Deserialize, Debug)]
struct Quote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}
