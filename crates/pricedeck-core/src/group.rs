///////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Ticker groups: the three fixed instrument sets of the dashboard
//
///////////////////////////////////////////////////////////////////////////////////////////////////////

/// Which of the dashboard's groups a table or selection belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupKind {
    Us,
    Japan,
    Exchange,
}

impl GroupKind {
    pub const ALL: [GroupKind; 3] = [GroupKind::Us, GroupKind::Japan, GroupKind::Exchange];

    pub fn key(&self) -> &'static str {
        match self {
            GroupKind::Us => "us",
            GroupKind::Japan => "japan",
            GroupKind::Exchange => "exchange",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.key().eq_ignore_ascii_case(key))
    }

    /// The immutable group definition for this kind.
    pub fn group(&self) -> TickerGroup {
        match self {
            GroupKind::Us => TickerGroup::us_equities(),
            GroupKind::Japan => TickerGroup::japan_equities(),
            GroupKind::Exchange => TickerGroup::exchange_rates(),
        }
    }
}

/// Ordered `label -> symbol` pairs plus the presentation metadata of a group.
///
/// Labels are unique within a group; insertion order is the fetch order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerGroup {
    pub kind: GroupKind,
    /// e.g. "USA Stock Price"
    pub heading: &'static str,
    /// Name of the value column in long form, and the chart's y field.
    pub value_column: &'static str,
    /// Shown instead of the table when nothing is selected.
    pub empty_prompt: &'static str,
    /// Declared (lower, upper) bounds of the value-axis slider.
    pub bounds: (i64, i64),
    pub default_range: (i64, i64),
    pub default_selection: &'static [&'static str],
    pub tickers: Vec<(String, String)>,
}

impl TickerGroup {
    #[allow(clippy::too_many_arguments)]
    fn new(
        kind: GroupKind,
        heading: &'static str,
        value_column: &'static str,
        empty_prompt: &'static str,
        bounds: (i64, i64),
        default_range: (i64, i64),
        default_selection: &'static [&'static str],
        tickers: &[(&str, &str)],
    ) -> Self {
        TickerGroup {
            kind,
            heading,
            value_column,
            empty_prompt,
            bounds,
            default_range,
            default_selection,
            tickers: tickers
                .iter()
                .map(|(label, symbol)| (label.to_string(), symbol.to_string()))
                .collect(),
        }
    }

    pub fn us_equities() -> Self {
        Self::new(
            GroupKind::Us,
            "USA Stock Price",
            "US Stock Price",
            "Choose some companies!",
            (0, 300),
            (80, 280),
            &["apple", "facebook", "amazon", "google", "microsoft"],
            &[
                ("apple", "AAPL"),
                ("facebook", "META"),
                ("amazon", "AMZN"),
                ("google", "GOOGL"),
                ("microsoft", "MSFT"),
            ],
        )
    }

    pub fn japan_equities() -> Self {
        Self::new(
            GroupKind::Japan,
            "Japan Stock Price",
            "Japan Stock Price",
            "Choose some companies!",
            (0, 50000),
            (500, 6000),
            &["toyota", "softbank", "ufjbank", "keyence"],
            &[
                ("toyota", "7203.T"),
                ("softbank", "9984.T"),
                ("ufjbank", "8306.T"),
                ("keyence", "6861.T"),
            ],
        )
    }

    pub fn exchange_rates() -> Self {
        Self::new(
            GroupKind::Exchange,
            "Exchange Price",
            "Exchange Price",
            "Choose some currency!",
            (0, 200),
            (140, 170),
            &["ドル", "ポンド"],
            &[
                ("ドル", "USDJPY=X"),
                ("ポンド", "GBPJPY=X"),
                ("元", "CNYJPY=X"),
                ("ペソ", "PHPJPY=X"),
            ],
        )
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.tickers.iter().map(|(label, _)| label.as_str())
    }

    pub fn symbol(&self, label: &str) -> Option<&str> {
        self.tickers
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, symbol)| symbol.as_str())
    }

    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }
}
