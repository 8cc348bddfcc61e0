use crate::constants::TARGET;
use crate::error::{DashboardError, Result};
use crate::types::{
    Cell, FeatureCollection, IndicatorRow, IndicatorTable, MetaRow, ScoreTable, WideRow,
};
use crate::util::{parse_f64_safe, parse_i32_safe, parse_year_label};
use csv::{ReaderBuilder, StringRecord};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

pub const REGION_COLUMN: &str = "area";
pub const INDICATOR_REGION_COLUMN: &str = "STATEs/UTs";
pub const YEAR_COLUMN: &str = "year";
pub const YEAR_FORMATTED_COLUMN: &str = "yearFormatted";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub skipped_rows: usize,
    pub missing_cells: usize,
}

/// Header-keyed view of a CSV: column positions plus the non-key columns in
/// header order.
struct Layout {
    region: usize,
    year: usize,
    year_formatted: Option<usize>,
    values: Vec<(usize, String)>,
}

impl Layout {
    fn new(path: &str, headers: &StringRecord, region_column: &str) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let missing = |column: &str| DashboardError::MissingColumn {
            path: path.to_string(),
            column: column.to_string(),
        };
        let region = find(region_column).ok_or_else(|| missing(region_column))?;
        let year = find(YEAR_COLUMN).ok_or_else(|| missing(YEAR_COLUMN))?;
        let year_formatted = find(YEAR_FORMATTED_COLUMN);
        let values = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != region && *i != year && Some(*i) != year_formatted)
            .map(|(i, h)| (i, h.trim().to_string()))
            .filter(|(_, h)| !h.is_empty())
            .collect();
        Ok(Layout {
            region,
            year,
            year_formatted,
            values,
        })
    }

    /// Region, numeric year and display year of a record; `None` when the
    /// row cannot be keyed.
    fn key(&self, rec: &StringRecord) -> Option<(String, i32, String)> {
        let region = rec.get(self.region)?.trim();
        if region.is_empty() {
            return None;
        }
        let label = rec.get(self.year)?.trim().to_string();
        let year = self
            .year_formatted
            .and_then(|i| parse_i32_safe(rec.get(i)))
            .or_else(|| parse_year_label(&label))?;
        let label = if label.is_empty() { year.to_string() } else { label };
        Some((region.to_string(), year, label))
    }
}

fn open(path: &Path) -> Result<csv::Reader<fs::File>> {
    Ok(ReaderBuilder::new().flexible(true).trim(csv::Trim::Headers).from_path(path)?)
}

/// Load the wide score table: one row per region and year, one column per
/// goal plus the composite. Blank or non-numeric cells load as missing.
pub fn load_scores(path: &Path) -> Result<(ScoreTable, LoadReport)> {
    let source = path.display().to_string();
    let mut rdr = open(path)?;
    let headers = rdr.headers()?.clone();
    let layout = Layout::new(&source, &headers, REGION_COLUMN)?;

    let mut report = LoadReport::default();
    let mut rows = Vec::new();
    for result in rdr.records() {
        report.total_rows += 1;
        let rec = result?;
        let Some((region, year, year_label)) = layout.key(&rec) else {
            report.skipped_rows += 1;
            continue;
        };
        let mut values = BTreeMap::new();
        for (i, name) in &layout.values {
            let v = parse_f64_safe(rec.get(*i));
            if v.is_none() {
                report.missing_cells += 1;
            }
            values.insert(name.clone(), v);
        }
        rows.push(WideRow {
            region,
            year,
            year_label,
            values,
        });
    }
    if rows.is_empty() {
        return Err(DashboardError::EmptyFile(source));
    }
    report.loaded_rows = rows.len();
    info!(
        path = %source,
        rows = report.loaded_rows,
        skipped = report.skipped_rows,
        missing_cells = report.missing_cells,
        "loaded score table"
    );
    let indicators = layout.values.into_iter().map(|(_, name)| name).collect();
    Ok((ScoreTable { indicators, rows }, report))
}

/// Indicator metadata sorted by goal number, latest year first within a goal.
pub fn load_metadata(path: &Path) -> Result<Vec<MetaRow>> {
    let mut rdr = open(path)?;
    let mut rows: Vec<MetaRow> = Vec::new();
    for result in rdr.deserialize::<MetaRow>() {
        let mut row = result?;
        if row.year_formatted.is_none() {
            row.year_formatted = parse_year_label(&row.year);
        }
        rows.push(row);
    }
    if rows.is_empty() {
        return Err(DashboardError::EmptyFile(path.display().to_string()));
    }
    rows.sort_by(|a, b| b.year_formatted.cmp(&a.year_formatted));
    rows.sort_by_key(|r| crate::util::sdg_number(&r.sdg));
    info!(path = %path.display(), rows = rows.len(), "loaded indicator metadata");
    Ok(rows)
}

/// Load the indicator detail table of one goal. The `Target` row keeps its
/// raw numbers here; annotation happens in [`crate::indicator`].
pub fn load_indicator_table(path: &Path, sdg: &str) -> Result<IndicatorTable> {
    let source = path.display().to_string();
    let mut rdr = open(path)?;
    let headers = rdr.headers()?.clone();
    let layout = Layout::new(&source, &headers, INDICATOR_REGION_COLUMN)?;

    let mut rows = Vec::new();
    for result in rdr.records() {
        let rec = result?;
        let Some((region, year, year_label)) = layout.key(&rec) else {
            debug!(path = %source, "skipping unkeyed indicator row");
            continue;
        };
        let cells = layout
            .values
            .iter()
            .map(|(i, name)| (name.clone(), parse_f64_safe(rec.get(*i)).map(Cell::Number)))
            .collect();
        rows.push(IndicatorRow {
            region,
            year,
            year_label,
            cells,
        });
    }
    if rows.is_empty() {
        return Err(DashboardError::EmptyFile(source));
    }
    info!(
        path = %source,
        rows = rows.len(),
        has_target = rows.iter().any(|r| r.region == TARGET),
        "loaded indicator table"
    );
    Ok(IndicatorTable {
        sdg: sdg.to_string(),
        indicators: layout.values.into_iter().map(|(_, name)| name).collect(),
        rows,
    })
}

pub fn load_boundaries(path: &Path) -> Result<FeatureCollection> {
    let text = fs::read_to_string(path)?;
    let fc: FeatureCollection = serde_json::from_str(&text)?;
    info!(path = %path.display(), features = fc.features.len(), "loaded boundaries");
    Ok(fc)
}

/// Per-goal table notes (`sdg,note`). The file is optional.
pub fn load_footnotes(path: &Path) -> Result<Vec<(String, String)>> {
    if !path.exists() {
        debug!(path = %path.display(), "no footnotes file");
        return Ok(Vec::new());
    }
    let mut rdr = open(path)?;
    let mut notes = Vec::new();
    for result in rdr.deserialize::<(String, String)>() {
        let (sdg, note) = result?;
        if !note.trim().is_empty() {
            notes.push((sdg.trim().to_string(), note.trim().to_string()));
        }
    }
    Ok(notes)
}
