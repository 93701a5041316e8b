use clap::{Args, Parser, Subcommand, ValueEnum};
use pricedeck_core::market::yahoo::BASE_URL;
use pricedeck_core::selection::{DEFAULT_LOOKBACK, MAX_LOOKBACK, MIN_LOOKBACK};
use pricedeck_core::{GroupKind, Lookback, RenderParams, Selection, SelectionError};

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Sets the level of tracing
    #[arg(long, default_value = "info", ignore_case = true, global = true)]
    pub trace: TraceLevel,

    /// User agent sent to the quote provider.
    #[arg(long, env = "USER_AGENT", default_value = DEFAULT_USER_AGENT, global = true)]
    pub user_agent: String,

    /// Base URL of the Yahoo Finance chart API.
    #[arg(long, env = "PRICEDECK_YAHOO_URL", default_value = BASE_URL, global = true)]
    pub base_url: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the US, Japan and exchange-rate groups once.
    View(ViewArgs),

    /// Keep a session open and re-render on every parameter change.
    Session(ViewArgs),

    /// List the ticker groups with their labels and symbols.
    Groups,
}

/// Dashboard parameters. Omitted selections and ranges use each group's defaults;
/// a selection flag given with no labels selects nothing.
#[derive(Args, Debug, Clone)]
pub struct ViewArgs {
    /// Number of most recent trading days to show.
    #[arg(
        long,
        default_value_t = DEFAULT_LOOKBACK,
        value_parser = clap::value_parser!(u32).range(MIN_LOOKBACK as i64..=MAX_LOOKBACK as i64)
    )]
    pub days: u32,

    /// US companies to show, comma separated.
    #[arg(long, value_delimiter = ',', num_args = 0..)]
    pub us: Option<Vec<String>>,

    /// Japan companies to show, comma separated.
    #[arg(long, value_delimiter = ',', num_args = 0..)]
    pub japan: Option<Vec<String>>,

    /// Currencies to show, comma separated.
    #[arg(long, value_delimiter = ',', num_args = 0..)]
    pub exchange: Option<Vec<String>>,

    /// US price axis as MIN,MAX (bounds 0..300).
    #[arg(long, value_parser = parse_range)]
    pub us_range: Option<(i64, i64)>,

    /// Japan price axis as MIN,MAX (bounds 0..50000).
    #[arg(long, value_parser = parse_range)]
    pub japan_range: Option<(i64, i64)>,

    /// Exchange rate axis as MIN,MAX (bounds 0..200).
    #[arg(long, value_parser = parse_range)]
    pub exchange_range: Option<(i64, i64)>,

    /// Print each group's Vega-Lite chart after its table.
    #[arg(long)]
    pub chart: bool,
}

impl ViewArgs {
    fn overrides(&self, kind: GroupKind) -> (Option<&Vec<String>>, Option<(i64, i64)>) {
        match kind {
            GroupKind::Us => (self.us.as_ref(), self.us_range),
            GroupKind::Japan => (self.japan.as_ref(), self.japan_range),
            GroupKind::Exchange => (self.exchange.as_ref(), self.exchange_range),
        }
    }

    pub fn params(&self) -> Result<RenderParams, SelectionError> {
        let mut params = RenderParams {
            lookback: Lookback::new(self.days)?,
            ..RenderParams::default()
        };

        for kind in GroupKind::ALL {
            let group = kind.group();
            let defaults = Selection::defaults(&group);
            let (labels, range) = self.overrides(kind);
            let labels = match labels {
                Some(labels) => labels
                    .iter()
                    .map(|l| l.trim())
                    .filter(|l| !l.is_empty())
                    .map(str::to_string)
                    .collect(),
                None => defaults.labels,
            };
            let range = range.unwrap_or((defaults.range.min, defaults.range.max));
            params
                .selections
                .insert(kind, Selection::new(&group, labels, range)?);
        }
        Ok(params)
    }
}

pub fn parse_range(s: &str) -> Result<(i64, i64), String> {
    let (min, max) = s
        .split_once(',')
        .ok_or_else(|| format!("expected MIN,MAX but got \"{s}\""))?;
    let min = min.trim().parse::<i64>().map_err(|e| format!("MIN: {e}"))?;
    let max = max.trim().parse::<i64>().map_err(|e| format!("MAX: {e}"))?;
    Ok((min, max))
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum TraceLevel {
    DEBUG,
    INFO,
    WARN,
    ERROR,
}
