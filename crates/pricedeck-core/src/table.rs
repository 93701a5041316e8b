use crate::market::ClosePoint;
use chrono::NaiveDate;
use serde_json::{json, Map, Value};
use std::collections::{BTreeSet, HashMap};

/// Column header format, e.g. `05 March 2024`.
pub const DATE_FORMAT: &str = "%d %B %Y";

/// Field names shared by the long table's records and the chart encoding.
pub const LABEL_FIELD: &str = "Name";
pub const DATE_FIELD: &str = "Date";

pub fn display_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

///////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Wide form: one row per label, one column per date
//
///////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub label: String,
    /// Aligned with [`WideTable::dates`]; `None` marks a missing close.
    pub values: Vec<Option<f64>>,
}

/// Closing prices keyed by label and date.
///
/// Every row has exactly one value slot per column; columns are unique and
/// kept in chronological order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WideTable {
    dates: Vec<NaiveDate>,
    rows: Vec<Row>,
}

impl WideTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build directly from aligned parts. Callers guarantee the alignment.
    pub(crate) fn from_parts(dates: Vec<NaiveDate>, rows: Vec<Row>) -> Self {
        debug_assert!(rows.iter().all(|r| r.values.len() == dates.len()));
        WideTable { dates, rows }
    }

    /// Append a labelled series, widening the column set to the union of
    /// dates. Earlier rows are back-filled with `None` for new dates; the new
    /// row gets `None` wherever it has no point. An existing row with the
    /// same label is replaced in place.
    pub fn insert_series(&mut self, label: &str, points: &[ClosePoint]) {
        let union: BTreeSet<NaiveDate> = self
            .dates
            .iter()
            .copied()
            .chain(points.iter().map(|p| p.date))
            .collect();

        if union.len() != self.dates.len() {
            let dates: Vec<NaiveDate> = union.into_iter().collect();
            let old: HashMap<NaiveDate, usize> =
                self.dates.iter().enumerate().map(|(i, d)| (*d, i)).collect();
            for row in self.rows.iter_mut() {
                row.values = dates
                    .iter()
                    .map(|d| old.get(d).and_then(|&i| row.values[i]))
                    .collect();
            }
            self.dates = dates;
        }

        let lookup: HashMap<NaiveDate, Option<f64>> =
            points.iter().map(|p| (p.date, p.close)).collect();
        let values = self
            .dates
            .iter()
            .map(|d| lookup.get(d).copied().flatten())
            .collect();

        match self.rows.iter_mut().find(|r| r.label == label) {
            Some(row) => row.values = values,
            None => self.rows.push(Row {
                label: label.to_string(),
                values,
            }),
        }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.label.as_str())
    }

    pub fn row(&self, label: &str) -> Option<&Row> {
        self.rows.iter().find(|r| r.label == label)
    }

    pub fn get(&self, label: &str, date: &NaiveDate) -> Option<f64> {
        let col = self.dates.binary_search(date).ok()?;
        self.row(label)?.values[col]
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Long form: one row per (label, date) observation
//
///////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, PartialEq)]
pub struct LongRow {
    pub label: String,
    pub date: NaiveDate,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LongTable {
    pub value_column: String,
    /// Row labels of the source table, in order. Kept so labels without any
    /// dated cell survive a pivot back to wide form.
    pub labels: Vec<String>,
    pub rows: Vec<LongRow>,
}

impl LongTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Chart-ready records: `{"Name": .., "Date": "05 March 2024", <value_column>: ..}`.
    /// Missing values serialize as `null`.
    pub fn records(&self) -> Vec<Value> {
        self.rows
            .iter()
            .map(|row| {
                let mut record = Map::new();
                record.insert(LABEL_FIELD.to_string(), Value::from(row.label.clone()));
                record.insert(DATE_FIELD.to_string(), Value::from(display_date(&row.date)));
                record.insert(self.value_column.clone(), json!(row.value));
                Value::Object(record)
            })
            .collect()
    }
}
