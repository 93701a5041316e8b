use crate::error::SelectionError;
use crate::group::TickerGroup;

pub const MIN_LOOKBACK: u32 = 1;
pub const MAX_LOOKBACK: u32 = 50;
pub const DEFAULT_LOOKBACK: u32 = 25;

/// Number of most recent trading days to fetch, 1 through 50.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Lookback(u32);

impl Lookback {
    pub fn new(days: u32) -> Result<Self, SelectionError> {
        if (MIN_LOOKBACK..=MAX_LOOKBACK).contains(&days) {
            Ok(Lookback(days))
        } else {
            Err(SelectionError::Lookback(days))
        }
    }

    pub fn days(&self) -> u32 {
        self.0
    }
}

impl Default for Lookback {
    fn default() -> Self {
        Lookback(DEFAULT_LOOKBACK)
    }
}

/// Inclusive `[min, max]` domain of a chart's value axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueRange {
    pub min: i64,
    pub max: i64,
}

impl ValueRange {
    /// Validate against a group's declared slider bounds.
    pub fn within(min: i64, max: i64, bounds: (i64, i64)) -> Result<Self, SelectionError> {
        let (lower, upper) = bounds;
        if lower <= min && min <= max && max <= upper {
            Ok(ValueRange { min, max })
        } else {
            Err(SelectionError::InvalidRange {
                min,
                max,
                lower,
                upper,
            })
        }
    }

    pub fn domain(&self) -> [i64; 2] {
        [self.min, self.max]
    }
}

/// What the user picked for one group on this render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub labels: Vec<String>,
    pub range: ValueRange,
}

impl Selection {
    pub fn new(
        group: &TickerGroup,
        labels: Vec<String>,
        range: (i64, i64),
    ) -> Result<Self, SelectionError> {
        let range = ValueRange::within(range.0, range.1, group.bounds)?;
        Ok(Selection { labels, range })
    }

    /// The group's default labels and range.
    pub fn defaults(group: &TickerGroup) -> Self {
        let (min, max) = group.default_range;
        Selection {
            labels: group
                .default_selection
                .iter()
                .map(|s| s.to_string())
                .collect(),
            range: ValueRange { min, max },
        }
    }

    /// The empty-selection gate that runs before filtering.
    pub fn require_labels(&self, group: &TickerGroup) -> Result<&[String], SelectionError> {
        if self.labels.is_empty() {
            Err(SelectionError::Empty {
                prompt: group.empty_prompt,
            })
        } else {
            Ok(&self.labels)
        }
    }
}
