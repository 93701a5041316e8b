use crate::error::ProviderError;
use crate::group::TickerGroup;
use crate::market::PriceSource;
use crate::selection::Lookback;
use crate::table::WideTable;
use tracing::{debug, trace};

/// Fetch every symbol of `group` and stitch the closes into one wide table.
///
/// Fetches run one after another in the group's insertion order, which is
/// also the row order of the result. The first provider failure aborts the
/// whole aggregation; no partial table is returned.
pub async fn aggregate<S>(
    source: &S,
    group: &TickerGroup,
    lookback: Lookback,
) -> Result<WideTable, ProviderError>
where
    S: PriceSource + ?Sized,
{
    let time = std::time::Instant::now();
    let mut table = WideTable::new();

    for (label, symbol) in &group.tickers {
        trace!("[{symbol}] {label} fetching {} days", lookback.days());
        let points = source.fetch(symbol, lookback.days()).await?;
        table.insert_series(label, &points);
    }

    debug!(
        "{} aggregated: {} rows x {} dates. Elapsed time: {} ms",
        group.heading,
        table.n_rows(),
        table.n_cols(),
        time.elapsed().as_millis()
    );
    Ok(table)
}
