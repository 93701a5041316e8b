use crate::aggregate::aggregate;
use crate::cache::AggregateCache;
use crate::chart::LineChart;
use crate::error::PipelineError;
use crate::filter::filter;
use crate::group::{GroupKind, TickerGroup};
use crate::long::to_long;
use crate::market::PriceSource;
use crate::selection::{Lookback, Selection, ValueRange};
use crate::table::{LongTable, WideTable};
use std::collections::BTreeMap;
use tracing::{debug, error, trace};

///////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Render pipeline: aggregate -> filter -> long form -> chart, once per group
//
///////////////////////////////////////////////////////////////////////////////////////////////////////

/// Everything the presentation layer needs to draw one group.
#[derive(Debug, Clone)]
pub struct GroupView {
    pub kind: GroupKind,
    pub heading: &'static str,
    /// Filtered wide table, rows sorted by label.
    pub table: WideTable,
    pub long: LongTable,
    pub range: ValueRange,
    /// Vega-Lite specification, pretty-printed.
    pub chart: String,
}

/// One group's outcome; each group succeeds or fails on its own.
pub type GroupSlot = Result<GroupView, PipelineError>;

/// User parameters of one render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderParams {
    pub lookback: Lookback,
    pub selections: BTreeMap<GroupKind, Selection>,
}

impl RenderParams {
    pub fn selection(&self, kind: GroupKind) -> Option<&Selection> {
        self.selections.get(&kind)
    }
}

impl Default for RenderParams {
    fn default() -> Self {
        RenderParams {
            lookback: Lookback::default(),
            selections: GroupKind::ALL
                .into_iter()
                .map(|kind| (kind, Selection::defaults(&kind.group())))
                .collect(),
        }
    }
}

/// A single user's dashboard: the price source, the group definitions and
/// the memoized wide tables.
pub struct Session<S> {
    source: S,
    groups: Vec<TickerGroup>,
    cache: AggregateCache,
}

impl<S: PriceSource> Session<S> {
    pub fn new(source: S) -> Self {
        Self::with_groups(
            source,
            GroupKind::ALL.into_iter().map(|kind| kind.group()).collect(),
        )
    }

    pub fn with_groups(source: S, groups: Vec<TickerGroup>) -> Self {
        Session {
            source,
            groups,
            cache: AggregateCache::new(),
        }
    }

    pub fn group(&self, kind: GroupKind) -> Option<&TickerGroup> {
        self.groups.iter().find(|g| g.kind == kind)
    }

    pub fn cache(&self) -> &AggregateCache {
        &self.cache
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Aggregated table for `kind`, fetched only on a cache miss.
    pub async fn wide_table(
        &mut self,
        kind: GroupKind,
        lookback: Lookback,
    ) -> Result<WideTable, PipelineError> {
        let group = self
            .group(kind)
            .cloned()
            .ok_or_else(|| PipelineError::Unhandled(format!("no group defined for {kind:?}")))?;

        self.cache.sync(lookback);
        if let Some(table) = self.cache.get(&group, lookback) {
            debug!("{} served from cache ({} days)", group.heading, lookback.days());
            return Ok(table.clone());
        }

        debug!("{} cache miss ({} days)", group.heading, lookback.days());
        let table = aggregate(&self.source, &group, lookback).await?;
        self.cache.insert(&group, lookback, table.clone());
        Ok(table)
    }

    /// Run the full pipeline for one group.
    pub async fn render_group(
        &mut self,
        kind: GroupKind,
        lookback: Lookback,
        selection: &Selection,
    ) -> GroupSlot {
        let wide = self.wide_table(kind, lookback).await?;
        let group = self
            .group(kind)
            .ok_or_else(|| PipelineError::Unhandled(format!("no group defined for {kind:?}")))?;

        let labels = selection.require_labels(group)?;
        trace!("{} filtering to {labels:?}", group.heading);
        let table = filter(&wide, labels)?;
        let long = to_long(&table, group.value_column);
        let chart = LineChart::bind(&long, selection.range)
            .title(group.heading)
            .to_json()?;

        Ok(GroupView {
            kind,
            heading: group.heading,
            table,
            long,
            range: selection.range,
            chart,
        })
    }

    /// Render every group in definition order. Groups without a selection in
    /// `params` use their defaults. A failing group is logged and reported in
    /// its own slot; the others still render.
    pub async fn render(&mut self, params: &RenderParams) -> Vec<(GroupKind, GroupSlot)> {
        let kinds: Vec<GroupKind> = self.groups.iter().map(|g| g.kind).collect();
        let mut slots = Vec::with_capacity(kinds.len());

        for kind in kinds {
            let selection = match params.selection(kind) {
                Some(selection) => selection.clone(),
                None => match self.group(kind) {
                    Some(group) => Selection::defaults(group),
                    None => continue,
                },
            };

            let slot = self.render_group(kind, params.lookback, &selection).await;
            if let Err(e) = &slot {
                if !e.is_empty_selection() {
                    error!("{kind:?} group failed to render: {e}");
                }
            }
            slots.push((kind, slot));
        }
        slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ProviderError, GENERIC_MESSAGE};
    use crate::testing::StubSource;

    #[tokio::test]
    async fn default_render_fills_every_slot() {
        let mut session = Session::new(StubSource::new());
        let slots = session.render(&RenderParams::default()).await;

        assert_eq!(
            slots.iter().map(|(k, _)| *k).collect::<Vec<_>>(),
            GroupKind::ALL.to_vec()
        );
        let exchange = slots[2].1.as_ref().unwrap();
        assert_eq!(
            exchange.table.labels().collect::<Vec<_>>(),
            vec!["ドル", "ポンド"]
        );
        assert_eq!(exchange.long.value_column, "Exchange Price");
        assert_eq!(exchange.range.domain(), [140, 170]);
    }

    #[tokio::test]
    async fn one_failing_group_does_not_blank_the_others() {
        let mut session = Session::new(StubSource::new().failing("9984.T"));
        let slots = session.render(&RenderParams::default()).await;

        assert!(slots[0].1.is_ok());
        let japan = slots[1].1.as_ref().unwrap_err();
        assert!(matches!(japan, PipelineError::Provider(ProviderError::SymbolNotFound(_))));
        assert_eq!(japan.user_message(), GENERIC_MESSAGE);
        assert!(slots[2].1.is_ok());
    }

    #[tokio::test]
    async fn empty_selection_shows_group_prompt() {
        let mut session = Session::new(StubSource::new());
        let mut params = RenderParams::default();
        params
            .selections
            .get_mut(&GroupKind::Japan)
            .unwrap()
            .labels
            .clear();
        params
            .selections
            .get_mut(&GroupKind::Exchange)
            .unwrap()
            .labels
            .clear();

        let slots = session.render(&params).await;
        assert_eq!(
            slots[1].1.as_ref().unwrap_err().user_message(),
            "Choose some companies!"
        );
        assert_eq!(
            slots[2].1.as_ref().unwrap_err().user_message(),
            "Choose some currency!"
        );
    }

    #[tokio::test]
    async fn unknown_label_is_a_generic_failure() {
        let mut session = Session::new(StubSource::new());
        let group = TickerGroup::us_equities();
        let selection = Selection::new(&group, vec!["tesla".to_string()], (0, 300)).unwrap();
        let err = session
            .render_group(GroupKind::Us, Lookback::default(), &selection)
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), GENERIC_MESSAGE);
        assert_eq!(err.to_string(), "labels not found: tesla");
    }

    #[tokio::test]
    async fn selection_changes_reuse_the_cache() {
        let mut session = Session::new(StubSource::new());
        let lookback = Lookback::new(10).unwrap();
        let group = TickerGroup::us_equities();

        let all = Selection::defaults(&group);
        let first = session.render_group(GroupKind::Us, lookback, &all).await.unwrap();
        assert_eq!(session.source().calls(), 5);

        let two = Selection::new(&group, vec!["apple".into(), "amazon".into()], (80, 280)).unwrap();
        let second = session.render_group(GroupKind::Us, lookback, &two).await.unwrap();
        assert_eq!(session.source().calls(), 5);
        assert_eq!(second.table.n_cols(), first.table.n_cols());

        session
            .render_group(GroupKind::Us, Lookback::new(11).unwrap(), &two)
            .await
            .unwrap();
        assert_eq!(session.source().calls(), 10);
    }

    #[tokio::test]
    async fn failed_aggregation_is_not_cached() {
        let mut session = Session::new(StubSource::new().failing("AAPL"));
        let lookback = Lookback::default();
        assert!(session.wide_table(GroupKind::Us, lookback).await.is_err());
        assert!(session.cache().is_empty());
        assert!(session.wide_table(GroupKind::Us, lookback).await.is_err());
        assert_eq!(session.source().fetched(), vec!["AAPL", "AAPL"]);
    }
}
