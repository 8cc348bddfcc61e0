//! Declarative payload handed to the charting library.
//!
//! The library draws; it never buckets, pivots or filters. Every `GraphSpec`
//! therefore carries rows that are already reshaped and banded, a column-role
//! mapping, and the presentation settings.

use crate::constants::{BOUNDARY_CUTOFF_YEAR, COLOR_MAP, MAP_NO_DATA_COLOR};
use crate::reshape::wide_groups;
use crate::types::{Bucket, Cell, IndicatorRow, LongRow, PivotedRow, WideRow};
use serde::Serialize;
use serde_json::{json, Value};

pub type Record = serde_json::Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GraphType {
    HeatMap,
    BarChart,
    ChoroplethMap,
    MultiLineAltChart,
    DataTable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnRole {
    pub column_id: String,
    pub chart_config_id: &'static str,
}

pub fn role(column_id: impl Into<String>, chart_config_id: &'static str) -> ColumnRole {
    ColumnRole {
        column_id: column_id.into(),
        chart_config_id,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefValue {
    pub value: f64,
    pub text: String,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableColumn {
    pub column_title: String,
    pub column_id: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub sortable: bool,
    /// Column carrying the band used to colour this cell's chip.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chip_column_id: Option<String>,
}

impl TableColumn {
    pub fn new(title: impl Into<String>, id: impl Into<String>) -> Self {
        TableColumn {
            column_title: title.into(),
            column_id: id.into(),
            sortable: false,
            chip_column_id: None,
        }
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn chip(mut self, column_id: impl Into<String>) -> Self {
        self.chip_column_id = Some(column_id.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Boundary {
    Current,
    BeforeCutoff,
}

impl Boundary {
    /// Geometry matching the administrative layout of `year`.
    pub fn for_year(year: i32) -> Self {
        if year < BOUNDARY_CUTOFF_YEAR {
            Boundary::BeforeCutoff
        } else {
            Boundary::Current
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapSettings {
    pub boundary: Boundary,
    pub map_property: &'static str,
    pub no_data_color: &'static str,
}

impl MapSettings {
    pub fn new(boundary: Boundary) -> Self {
        MapSettings {
            boundary,
            map_property: "State_Name",
            no_data_color: MAP_NO_DATA_COLOR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ScaleType {
    Categorical,
    Linear,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSettings {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub color_domain: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_type: Option<ScaleType>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ref_values: Vec<RefValue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub label_order: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub highlighted_lines: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub column_data: Vec<TableColumn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foot_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map: Option<MapSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub horizontal: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub sort_descending: bool,
}

impl GraphSettings {
    /// Settings preloaded with the shared band colour scale.
    pub fn categorical() -> Self {
        GraphSettings {
            colors: COLOR_MAP.iter().map(|(_, c)| c.to_string()).collect(),
            color_domain: COLOR_MAP.iter().map(|(b, _)| b.label().to_string()).collect(),
            scale_type: Some(ScaleType::Categorical),
            ..GraphSettings::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSpec {
    pub graph_id: String,
    pub graph_type: GraphType,
    pub title: String,
    pub data: Vec<Record>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub data_configuration: Vec<ColumnRole>,
    pub settings: GraphSettings,
}

impl GraphSpec {
    /// Column ids in display order: table columns if any, else the keys of
    /// the first row.
    pub fn keys(&self) -> Vec<String> {
        if !self.settings.column_data.is_empty() {
            return self
                .settings
                .column_data
                .iter()
                .map(|c| c.column_id.clone())
                .collect();
        }
        self.data
            .first()
            .map(|r| r.keys().cloned().collect())
            .unwrap_or_default()
    }
}

/// What a slide shows for its current state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum Rendered {
    Graph(GraphSpec),
    NoData { message: String },
    Loading,
    Failed { message: String },
}

impl Rendered {
    pub fn no_data(what: &str, when: &str) -> Self {
        Rendered::NoData {
            message: format!("No data available for {} for {}", what, when),
        }
    }

    pub fn graph(&self) -> Option<&GraphSpec> {
        match self {
            Rendered::Graph(spec) => Some(spec),
            _ => None,
        }
    }
}

pub fn tooltip(header: &str, label: &str, value: &str) -> String {
    format!(
        "{}{}</div><div class=\"p-2 flex justify-between\"><div>{}</div><div>{}</div></div>",
        crate::constants::TOOLTIP_HEADER,
        header,
        label,
        value
    )
}

fn num(v: Option<f64>) -> Value {
    v.map(|v| json!(v)).unwrap_or(Value::Null)
}

fn bucket(b: Bucket) -> Value {
    Value::String(b.label().to_string())
}

pub fn long_record(row: &LongRow) -> Record {
    match serde_json::to_value(row) {
        Ok(Value::Object(map)) => map,
        _ => Record::new(),
    }
}

/// Wide row with an `<indicator> Group` band column next to each score.
pub fn wide_record(row: &WideRow, indicators: &[String]) -> Record {
    let mut rec = Record::new();
    rec.insert("area".into(), json!(row.region));
    rec.insert("year".into(), json!(row.year_label));
    rec.insert("yearFormatted".into(), json!(row.year));
    for ind in indicators {
        rec.insert(ind.clone(), num(row.value(ind)));
    }
    for (key, b) in wide_groups(row, indicators) {
        rec.insert(key, bucket(b));
    }
    rec
}

/// `{area, sdg, <year>: value, group<year>: band, ...}`; years without a
/// value are absent.
pub fn pivoted_record(row: &PivotedRow) -> Record {
    let mut rec = Record::new();
    rec.insert("area".into(), json!(row.region));
    rec.insert("sdg".into(), json!(row.indicator));
    for cell in row.years.values() {
        rec.insert(cell.label.clone(), json!(cell.value));
        rec.insert(format!("group{}", cell.label), bucket(cell.bucket));
    }
    rec
}

pub fn indicator_record(row: &IndicatorRow) -> Record {
    let mut rec = Record::new();
    rec.insert("STATEs/UTs".into(), json!(row.region));
    rec.insert("year".into(), json!(row.year_label));
    rec.insert("yearFormatted".into(), json!(row.year));
    for (key, cell) in &row.cells {
        let v = match cell {
            Some(Cell::Number(v)) => json!(v),
            Some(Cell::Text(t)) => json!(t),
            None => Value::Null,
        };
        rec.insert(key.clone(), v);
    }
    rec
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::YearCell;
    use std::collections::BTreeMap;

    #[test]
    fn pivoted_record_is_sparse() {
        let mut years = BTreeMap::new();
        years.insert(
            2018,
            YearCell {
                label: "2018".into(),
                value: 48.0,
                bucket: Bucket::Aspirant,
            },
        );
        let rec = pivoted_record(&PivotedRow {
            region: "Goa".into(),
            indicator: "SDG 4".into(),
            years,
        });
        assert_eq!(rec["2018"], json!(48.0));
        assert_eq!(rec["group2018"], json!("Aspirant (0–49)"));
        assert!(!rec.contains_key("2023–24"));
    }

    #[test]
    fn boundary_switches_at_cutoff() {
        assert_eq!(Boundary::for_year(2019), Boundary::BeforeCutoff);
        assert_eq!(Boundary::for_year(2020), Boundary::Current);
    }

    #[test]
    fn rendered_serialises_with_state_tag() {
        let v = serde_json::to_value(Rendered::no_data("Goa", "2018")).unwrap();
        assert_eq!(v["state"], json!("noData"));
        assert_eq!(v["message"], json!("No data available for Goa for 2018"));
    }
}
