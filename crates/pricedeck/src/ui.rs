use async_trait::async_trait;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use pricedeck_core::table::display_date;
use pricedeck_core::{
    ClosePoint, GroupKind, GroupSlot, PriceSource, ProviderError, TickerGroup, WideTable,
};
use std::sync::Mutex;

pub const APP_TITLE: &str = "USA・Japan Stock Price、Exchange Rate View App.";

pub fn single_pb(length: u64) -> ProgressBar {
    let pb = ProgressBar::new(length);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [ {bar:50} ] {pos}/{len} {msg} {spinner}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#|-"),
    );
    pb
}

///////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Progress reporting around provider fetches
//
///////////////////////////////////////////////////////////////////////////////////////////////////////

/// Wraps a [`PriceSource`] and ticks a progress bar once per fetch.
///
/// The bar only grows when a fetch actually happens, so renders served
/// from the cache draw nothing.
pub struct ProgressSource<S> {
    inner: S,
    bar: Mutex<ProgressBar>,
}

impl<S> ProgressSource<S> {
    pub fn new(inner: S) -> Self {
        ProgressSource {
            inner,
            bar: Mutex::new(single_pb(0)),
        }
    }

    /// Start a fresh bar for the next render.
    pub fn begin(&self) {
        if let Ok(mut bar) = self.bar.lock() {
            *bar = single_pb(0);
        }
    }

    pub fn finish(&self) {
        if let Ok(bar) = self.bar.lock() {
            bar.finish_and_clear();
        }
    }

    fn bar(&self) -> Option<ProgressBar> {
        self.bar.lock().ok().map(|bar| bar.clone())
    }
}

#[async_trait]
impl<S: PriceSource> PriceSource for ProgressSource<S> {
    async fn fetch(
        &self,
        symbol: &str,
        lookback_days: u32,
    ) -> Result<Vec<ClosePoint>, ProviderError> {
        let bar = self.bar();
        if let Some(bar) = &bar {
            bar.inc_length(1);
            bar.set_message(symbol.to_string());
        }
        let result = self.inner.fetch(symbol, lookback_days).await;
        if let Some(bar) = &bar {
            bar.inc(1);
        }
        result
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Terminal rendering
//
///////////////////////////////////////////////////////////////////////////////////////////////////////

pub fn print_title(days: u32) {
    println!("{}", APP_TITLE.bold());
    println!("Last {days} days.\n");
}

/// Dates down the side, labels across the top; missing closes show as `-`.
pub fn format_table(table: &WideTable) -> String {
    let width = table
        .labels()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .max(10);

    let mut out = String::new();
    out.push_str(&format!("{:<17}", "Date"));
    for label in table.labels() {
        let pad = width.saturating_sub(label.chars().count());
        out.push_str(&format!(" {}{label}", " ".repeat(pad)));
    }
    out.push('\n');

    for (col, date) in table.dates().iter().enumerate() {
        out.push_str(&format!("{:<17}", display_date(date)));
        for row in table.rows() {
            let cell = match row.values[col] {
                Some(v) => format!(" {v:>width$.2}"),
                None => format!(" {:>width$}", "-"),
            };
            out.push_str(&cell);
        }
        out.push('\n');
    }
    out
}

pub fn print_slot(group: &TickerGroup, slot: &GroupSlot, days: u32, chart: bool) {
    println!("{}", format!("# {} last {days} days.", group.heading).bold());
    match slot {
        Ok(view) => {
            println!("{}", format!("### {} ###", view.heading).cyan());
            print!("{}", format_table(&view.table));
            println!(
                "chart: {} rows, y domain [{}, {}]",
                view.long.len(),
                view.range.min,
                view.range.max
            );
            if chart {
                println!("{}", view.chart);
            }
        }
        Err(e) if e.is_empty_selection() => println!("{}", e.user_message().yellow()),
        Err(e) => println!("{}", e.user_message().red()),
    }
    println!();
}

pub fn print_groups(groups: &[TickerGroup]) {
    for group in groups {
        println!("{} ({})", group.heading.bold(), group.kind.key());
        for (label, symbol) in &group.tickers {
            let default = if group.default_selection.iter().any(|s| *s == label.as_str()) {
                "*"
            } else {
                " "
            };
            println!("  {default} {label:<12} {symbol}");
        }
        let (lower, upper) = group.bounds;
        let (min, max) = group.default_range;
        println!("    range {min}..{max} (bounds {lower}..{upper})\n");
    }
}

pub fn group_names() -> String {
    GroupKind::ALL
        .iter()
        .map(|k| k.key())
        .collect::<Vec<_>>()
        .join("|")
}
