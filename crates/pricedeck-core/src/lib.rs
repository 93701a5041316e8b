//! Price retrieval and reshaping for the pricedeck dashboard.
//!
//! Per render, each ticker group goes through
//! [`aggregate`](aggregate::aggregate) → [`filter`](filter::filter) →
//! [`to_long`](long::to_long) → [`LineChart`](chart::LineChart), with the
//! aggregated tables memoized per session in [`AggregateCache`](cache::AggregateCache).

pub mod aggregate;
pub mod cache;
pub mod chart;
pub mod error;
pub mod filter;
pub mod group;
pub mod long;
pub mod market;
pub mod pipeline;
pub mod selection;
pub mod table;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{PipelineError, ProviderError, SelectionError, GENERIC_MESSAGE};
pub use group::{GroupKind, TickerGroup};
pub use market::{ClosePoint, PriceSource, YahooFinance};
pub use pipeline::{GroupSlot, GroupView, RenderParams, Session};
pub use selection::{Lookback, Selection, ValueRange};
pub use table::{LongTable, WideTable};
