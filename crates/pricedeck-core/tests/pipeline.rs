use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use pricedeck_core::filter::filter;
use pricedeck_core::long::{to_long, to_wide};
use pricedeck_core::{
    ClosePoint, GroupKind, Lookback, PriceSource, ProviderError, RenderParams, Selection, Session,
    TickerGroup,
};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Weekday sessions up to 2024-06-28; MSFT is far above the default US
/// range and GOOGL skips one session.
struct Market {
    calls: AtomicUsize,
}

impl Market {
    fn new() -> Self {
        Market {
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PriceSource for Market {
    async fn fetch(
        &self,
        symbol: &str,
        lookback_days: u32,
    ) -> Result<Vec<ClosePoint>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let mut day = NaiveDate::from_ymd_opt(2024, 6, 28).unwrap();
        let mut dates = Vec::new();
        while dates.len() < lookback_days as usize {
            if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
                dates.push(day);
            }
            day -= Duration::days(1);
        }
        dates.reverse();

        let level = match symbol {
            "MSFT" => 450.0,
            "AAPL" => 210.0,
            _ => 150.0,
        };
        Ok(dates
            .into_iter()
            .enumerate()
            .filter(|(i, _)| !(symbol == "GOOGL" && *i == 3))
            .map(|(i, date)| ClosePoint::new(date, Some(level + i as f64 * 0.5)))
            .collect())
    }
}

#[tokio::test]
async fn us_default_selection_end_to_end() {
    let mut session = Session::new(Market::new());
    let lookback = Lookback::new(25).unwrap();

    let wide = session.wide_table(GroupKind::Us, lookback).await.unwrap();
    assert_eq!(wide.n_rows(), 5);
    assert!(wide.n_cols() <= 25);
    let group = TickerGroup::us_equities();
    assert_eq!(
        wide.labels().collect::<Vec<_>>(),
        group.labels().collect::<Vec<_>>()
    );

    // google's skipped session is an explicit gap, not a dropped column
    let google = wide.row("google").unwrap();
    assert_eq!(google.values.len(), wide.n_cols());
    assert_eq!(google.values.iter().filter(|v| v.is_none()).count(), 1);

    let picked = filter(&wide, &["apple", "amazon"]).unwrap();
    assert_eq!(picked.labels().collect::<Vec<_>>(), vec!["amazon", "apple"]);

    let long = to_long(&picked, "US Stock Price");
    assert_eq!(long.len(), 2 * picked.n_cols());
    assert_eq!(long.value_column, "US Stock Price");
    assert_eq!(to_wide(&long).unwrap(), picked);

    let with_gap = to_long(&wide, "US Stock Price");
    assert_eq!(to_wide(&with_gap).unwrap(), wide);
}

#[tokio::test]
async fn range_is_bound_unchanged_and_data_is_not_clipped() {
    let mut session = Session::new(Market::new());
    let group = TickerGroup::us_equities();
    let selection = Selection::new(&group, vec!["microsoft".into(), "apple".into()], (80, 280))
        .unwrap();

    let view = session
        .render_group(GroupKind::Us, Lookback::default(), &selection)
        .await
        .unwrap();
    let spec: serde_json::Value = serde_json::from_str(&view.chart).unwrap();

    assert_eq!(spec["encoding"]["y"]["scale"]["domain"], serde_json::json!([80, 280]));
    let values = spec["data"]["values"].as_array().unwrap();
    assert_eq!(values.len(), view.long.len());
    assert!(values
        .iter()
        .any(|v| v["Name"] == "microsoft" && v["US Stock Price"].as_f64().unwrap() > 280.0));
}

#[tokio::test]
async fn lookback_change_refetches_and_same_lookback_does_not() {
    let mut session = Session::new(Market::new());
    let mut params = RenderParams::default();

    let first = session.render(&params).await;
    assert!(first.iter().all(|(_, slot)| slot.is_ok()));
    assert_eq!(session.source().calls(), 13);

    // selection-only change: served from the cache
    params
        .selections
        .get_mut(&GroupKind::Us)
        .unwrap()
        .labels
        .retain(|l| l == "apple");
    let second = session.render(&params).await;
    assert_eq!(session.source().calls(), 13);
    assert_eq!(second[0].1.as_ref().unwrap().table.n_rows(), 1);
    assert_eq!(
        second[1].1.as_ref().unwrap().table,
        first[1].1.as_ref().unwrap().table
    );

    params.lookback = Lookback::new(10).unwrap();
    let third = session.render(&params).await;
    assert_eq!(session.source().calls(), 26);
    assert_eq!(third[1].1.as_ref().unwrap().table.n_cols(), 10);
}
