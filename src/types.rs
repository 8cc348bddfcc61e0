use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tabled::Tabled;

/// Ordinal performance band derived from a 0–100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Bucket {
    #[serde(rename = "Aspirant (0–49)")]
    Aspirant,
    #[serde(rename = "Performer (50–64)")]
    Performer,
    #[serde(rename = "Front Runner (65–99)")]
    FrontRunner,
    #[serde(rename = "Achiever (100)")]
    Achiever,
    #[serde(rename = "NA")]
    NotAvailable,
}

impl Bucket {
    pub const RANKED: [Bucket; 4] = [
        Bucket::Aspirant,
        Bucket::Performer,
        Bucket::FrontRunner,
        Bucket::Achiever,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Bucket::Aspirant => "Aspirant (0–49)",
            Bucket::Performer => "Performer (50–64)",
            Bucket::FrontRunner => "Front Runner (65–99)",
            Bucket::Achiever => "Achiever (100)",
            Bucket::NotAvailable => "NA",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One region/year row of the score table, one cell per indicator column.
#[derive(Debug, Clone, PartialEq)]
pub struct WideRow {
    pub region: String,
    pub year: i32,
    pub year_label: String,
    pub values: BTreeMap<String, Option<f64>>,
}

impl WideRow {
    pub fn value(&self, indicator: &str) -> Option<f64> {
        self.values.get(indicator).copied().flatten()
    }
}

/// Loaded score file: rows plus the indicator columns in header order.
#[derive(Debug, Clone, Default)]
pub struct ScoreTable {
    pub indicators: Vec<String>,
    pub rows: Vec<WideRow>,
}

/// One region/year/indicator triple.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongRow {
    #[serde(rename = "area")]
    pub region: String,
    #[serde(rename = "yearFormatted")]
    pub year: i32,
    #[serde(rename = "year")]
    pub year_label: String,
    #[serde(rename = "sdg")]
    pub indicator: String,
    pub value: Option<f64>,
    #[serde(rename = "group")]
    pub bucket: Bucket,
    /// Band of the same region/indicator in the latest year, if that row exists.
    #[serde(rename = "groupLatest")]
    pub latest_bucket: Option<Bucket>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct YearCell {
    pub label: String,
    pub value: f64,
    pub bucket: Bucket,
}

/// One region/indicator row with a sparse cell per year.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotedRow {
    pub region: String,
    pub indicator: String,
    pub years: BTreeMap<i32, YearCell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Tabled)]
pub struct OptionItem {
    #[tabled(rename = "Label")]
    pub label: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl OptionItem {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        OptionItem {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// A labelled set of options, e.g. the indicators of one goal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionGroup {
    pub label: String,
    pub options: Vec<OptionItem>,
}

/// One row of the indicator metadata file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MetaRow {
    pub sdg: String,
    /// Goal title.
    pub label: String,
    pub indicator: String,
    pub year: String,
    #[serde(rename = "yearFormatted")]
    pub year_formatted: Option<i32>,
    #[serde(default)]
    pub interpretation: String,
}

impl MetaRow {
    /// True when a higher reading means worse performance.
    pub fn lower_is_better(&self) -> bool {
        self.interpretation.contains("lower performance")
    }
}

/// Cell of an indicator table: raw measurement or annotated target text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRow {
    pub region: String,
    pub year: i32,
    pub year_label: String,
    pub cells: BTreeMap<String, Option<Cell>>,
}

impl IndicatorRow {
    pub fn number(&self, indicator: &str) -> Option<f64> {
        match self.cells.get(indicator) {
            Some(Some(Cell::Number(v))) => Some(*v),
            _ => None,
        }
    }
}

/// Indicator-level detail for one goal, loaded on demand.
#[derive(Debug, Clone, Default)]
pub struct IndicatorTable {
    pub sdg: String,
    pub indicators: Vec<String>,
    pub rows: Vec<IndicatorRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
    pub geometry: serde_json::Value,
}

impl FeatureCollection {
    /// Region names carried under `property`, in file order.
    pub fn region_names(&self, property: &str) -> Vec<String> {
        self.features
            .iter()
            .filter_map(|f| f.properties.get(property))
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect()
    }
}

/// Current and pre-cutoff geometries.
#[derive(Debug, Clone)]
pub struct Boundaries {
    pub current: FeatureCollection,
    pub before_cutoff: FeatureCollection,
}
