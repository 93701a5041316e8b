use crate::error::ProviderError;
use async_trait::async_trait;
use chrono::NaiveDate;

pub mod yahoo;

pub use yahoo::YahooFinance;

/// One daily observation: the session date and its closing price.
///
/// `close` is `None` when the provider reported the day but no close.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosePoint {
    pub date: NaiveDate,
    pub close: Option<f64>,
}

impl ClosePoint {
    pub fn new(date: NaiveDate, close: Option<f64>) -> Self {
        ClosePoint { date, close }
    }
}

/// Anything that can hand back a daily close series for a symbol.
///
/// Implementations perform I/O and do no caching; memoization is the
/// caller's concern (see [`AggregateCache`](crate::cache::AggregateCache)).
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Closing prices for the last `lookback_days` trading days, oldest first.
    async fn fetch(&self, symbol: &str, lookback_days: u32)
        -> Result<Vec<ClosePoint>, ProviderError>;
}
