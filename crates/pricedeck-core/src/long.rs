use crate::error::PipelineError;
use crate::table::{LongRow, LongTable, Row, WideTable};
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

/// Melt a wide table into one row per (label, date) cell.
///
/// Output is label-major in the table's row order, then chronological.
/// Missing cells are carried through as `None`.
pub fn to_long(table: &WideTable, value_column: &str) -> LongTable {
    let rows = table
        .rows()
        .iter()
        .flat_map(|row| {
            table
                .dates()
                .iter()
                .zip(row.values.iter())
                .map(move |(date, value)| LongRow {
                    label: row.label.clone(),
                    date: *date,
                    value: *value,
                })
        })
        .collect();

    LongTable {
        value_column: value_column.to_string(),
        labels: table.labels().map(str::to_string).collect(),
        rows,
    }
}

/// Pivot a long table back to wide form.
///
/// Labels follow `long.labels`, then any others in order of first
/// appearance; dates are sorted. Fails if
/// a (label, date) pair repeats or if some label lacks some date.
pub fn to_wide(long: &LongTable) -> Result<WideTable, PipelineError> {
    let dates: Vec<NaiveDate> = long
        .rows
        .iter()
        .map(|r| r.date)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let column: HashMap<NaiveDate, usize> =
        dates.iter().enumerate().map(|(i, d)| (*d, i)).collect();

    let mut order: Vec<&str> = Vec::new();
    let mut cells: HashMap<&str, Vec<Option<Option<f64>>>> = HashMap::new();
    for label in &long.labels {
        cells.entry(label.as_str()).or_insert_with(|| {
            order.push(label.as_str());
            vec![None; dates.len()]
        });
    }
    for row in &long.rows {
        let slots = cells.entry(row.label.as_str()).or_insert_with(|| {
            order.push(row.label.as_str());
            vec![None; dates.len()]
        });
        let slot = &mut slots[column[&row.date]];
        if slot.is_some() {
            return Err(PipelineError::Unhandled(format!(
                "duplicate cell ({}, {})",
                row.label, row.date
            )));
        }
        *slot = Some(row.value);
    }

    let mut rows = Vec::with_capacity(order.len());
    for label in order {
        let values = cells
            .remove(label)
            .unwrap_or_default()
            .into_iter()
            .zip(dates.iter())
            .map(|(cell, date)| {
                cell.ok_or_else(|| {
                    PipelineError::Unhandled(format!("missing cell ({label}, {date})"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(Row {
            label: label.to_string(),
            values,
        });
    }

    Ok(WideTable::from_parts(dates, rows))
}
