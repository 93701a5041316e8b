use crate::selection::ValueRange;
use crate::table::{LongTable, DATE_FIELD, DATE_FORMAT, LABEL_FIELD};
use serde_json::{json, Value};

pub const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

/// Line chart binding for a long table: date on x, the value column on y
/// over a fixed domain, one colour per label.
///
/// The y domain is taken from the user's range as-is; points outside it
/// stay in the data and are clipped by the renderer.
#[derive(Debug, Clone)]
pub struct LineChart<'a> {
    data: &'a LongTable,
    range: ValueRange,
    opacity: f64,
    title: Option<String>,
}

impl<'a> LineChart<'a> {
    pub fn bind(data: &'a LongTable, range: ValueRange) -> Self {
        LineChart {
            data,
            range,
            opacity: 0.8,
            title: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Vega-Lite v5 specification with the data inlined.
    pub fn spec(&self) -> Value {
        let mut spec = json!({
            "$schema": VEGA_LITE_SCHEMA,
            "width": "container",
            "data": {
                "values": self.data.records(),
                "format": { "parse": { (DATE_FIELD): format!("date:'{DATE_FORMAT}'") } }
            },
            "mark": { "type": "line", "opacity": self.opacity, "clip": true },
            "encoding": {
                "x": { "field": DATE_FIELD, "type": "temporal" },
                "y": {
                    "field": self.data.value_column,
                    "type": "quantitative",
                    "scale": { "domain": self.range.domain() }
                },
                "color": { "field": LABEL_FIELD, "type": "nominal" }
            }
        });
        if let Some(title) = &self.title {
            spec["title"] = json!(title);
        }
        spec
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.spec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::LongRow;
    use chrono::NaiveDate;

    fn long() -> LongTable {
        let d = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        LongTable {
            value_column: "US Stock Price".to_string(),
            labels: vec!["apple".to_string(), "microsoft".to_string()],
            rows: vec![
                LongRow {
                    label: "apple".to_string(),
                    date: d,
                    value: Some(175.0),
                },
                LongRow {
                    label: "microsoft".to_string(),
                    date: d,
                    value: Some(410.0),
                },
            ],
        }
    }

    #[test]
    fn domain_is_the_user_range_not_the_data_range() {
        let data = long();
        let spec = LineChart::bind(&data, ValueRange { min: 80, max: 280 }).spec();

        assert_eq!(spec["encoding"]["y"]["scale"]["domain"], json!([80, 280]));
        assert_eq!(spec["encoding"]["y"]["field"], "US Stock Price");
        assert_eq!(spec["mark"]["clip"], true);
        // 410 lies outside the domain but is still charted data
        assert_eq!(spec["data"]["values"].as_array().unwrap().len(), 2);
        assert_eq!(spec["data"]["values"][1]["US Stock Price"], 410.0);
    }

    #[test]
    fn encodes_date_and_label_fields() {
        let data = long();
        let spec = LineChart::bind(&data, ValueRange { min: 0, max: 300 })
            .title("USA Stock Price")
            .spec();

        assert_eq!(spec["$schema"], VEGA_LITE_SCHEMA);
        assert_eq!(spec["encoding"]["x"], json!({"field": "Date", "type": "temporal"}));
        assert_eq!(spec["encoding"]["color"]["field"], "Name");
        assert_eq!(spec["mark"]["opacity"], 0.8);
        assert_eq!(spec["data"]["format"]["parse"]["Date"], "date:'%d %B %Y'");
        assert_eq!(spec["title"], "USA Stock Price");
    }
}
