use crate::error::SelectionError;
use crate::table::WideTable;
use std::collections::HashSet;

/// Restrict `table` to `labels`, rows sorted ascending by label.
///
/// Columns are untouched. Every label must be a row of `table`; repeated
/// labels collapse to one row. Applying the same filter twice is a no-op.
pub fn filter<S: AsRef<str>>(table: &WideTable, labels: &[S]) -> Result<WideTable, SelectionError> {
    if labels.is_empty() {
        return Err(SelectionError::Empty {
            prompt: "labels must not be empty",
        });
    }

    let mut missing: Vec<String> = labels
        .iter()
        .map(AsRef::as_ref)
        .filter(|l| table.row(l).is_none())
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        let mut seen = HashSet::new();
        missing.retain(|l| seen.insert(l.clone()));
        return Err(SelectionError::UnknownLabels(missing));
    }

    let mut wanted: Vec<&str> = labels.iter().map(AsRef::as_ref).collect();
    wanted.sort_unstable();
    wanted.dedup();

    let rows = wanted
        .into_iter()
        .filter_map(|label| table.row(label).cloned())
        .collect();
    Ok(WideTable::from_parts(table.dates().to_vec(), rows))
}
