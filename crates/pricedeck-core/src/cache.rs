use crate::group::{GroupKind, TickerGroup};
use crate::selection::Lookback;
use crate::table::WideTable;
use std::collections::HashMap;
use tracing::debug;

/// Aggregated tables of one session, keyed by (group, lookback).
///
/// Only one lookback window is held at a time: asking for a different one
/// drops every cached table. An entry is also ignored when the group
/// definition it was built from differs from the one requested.
#[derive(Debug, Default)]
pub struct AggregateCache {
    lookback: Option<Lookback>,
    tables: HashMap<GroupKind, (TickerGroup, WideTable)>,
}

impl AggregateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, group: &TickerGroup, lookback: Lookback) -> Option<&WideTable> {
        if self.lookback != Some(lookback) {
            return None;
        }
        self.tables
            .get(&group.kind)
            .filter(|(cached, _)| cached == group)
            .map(|(_, table)| table)
    }

    pub fn insert(&mut self, group: &TickerGroup, lookback: Lookback, table: WideTable) {
        if self.lookback != Some(lookback) {
            self.invalidate();
            self.lookback = Some(lookback);
        }
        self.tables.insert(group.kind, (group.clone(), table));
    }

    /// Drop every entry if `lookback` differs from the cached window.
    pub fn sync(&mut self, lookback: Lookback) {
        if self.lookback.is_some() && self.lookback != Some(lookback) {
            debug!(
                "Lookback changed to {} days; dropping {} cached tables",
                lookback.days(),
                self.tables.len()
            );
            self.invalidate();
        }
    }

    pub fn invalidate(&mut self) {
        self.tables.clear();
        self.lookback = None;
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
