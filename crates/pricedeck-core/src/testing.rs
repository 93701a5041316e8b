//! In-memory price source for unit tests.

use crate::error::ProviderError;
use crate::market::{ClosePoint, PriceSource};
use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Serves `lookback` weekday closes ending on Friday 2024-03-29.
///
/// Prices are `100 + 10 * symbol.len() + session index`, so they are
/// stable across calls and distinct across most symbols.
#[derive(Default)]
pub(crate) struct StubSource {
    calls: AtomicUsize,
    fetched: Mutex<Vec<String>>,
    failing: HashSet<String>,
    gaps: HashMap<String, usize>,
}

impl StubSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing(mut self, symbol: &str) -> Self {
        self.failing.insert(symbol.to_string());
        self
    }

    /// Drop the session at `index` (oldest first) from `symbol`'s series.
    pub(crate) fn with_gap(mut self, symbol: &str, index: usize) -> Self {
        self.gaps.insert(symbol.to_string(), index);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

pub(crate) fn sessions(lookback_days: u32) -> Vec<NaiveDate> {
    let mut day = NaiveDate::from_ymd_opt(2024, 3, 29).unwrap();
    let mut out = Vec::new();
    while out.len() < lookback_days as usize {
        if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            out.push(day);
        }
        day -= Duration::days(1);
    }
    out.reverse();
    out
}

#[async_trait]
impl PriceSource for StubSource {
    async fn fetch(
        &self,
        symbol: &str,
        lookback_days: u32,
    ) -> Result<Vec<ClosePoint>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.fetched.lock().unwrap().push(symbol.to_string());
        if self.failing.contains(symbol) {
            return Err(ProviderError::SymbolNotFound(symbol.to_string()));
        }

        let base = 100.0 + 10.0 * symbol.len() as f64;
        Ok(sessions(lookback_days)
            .into_iter()
            .enumerate()
            .filter(|(i, _)| self.gaps.get(symbol) != Some(i))
            .map(|(i, date)| ClosePoint::new(date, Some(base + i as f64)))
            .collect())
    }
}
