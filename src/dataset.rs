use crate::config::Config;
use crate::constants::NATIONAL;
use crate::loader;
use crate::options::{region_options, sdg_options, year_options};
use crate::render::Record;
use crate::reshape::{wide_to_long, with_latest_buckets};
use crate::error::Result;
use crate::types::{
    Boundaries, FeatureCollection, LongRow, MetaRow, OptionItem, ScoreTable, WideRow,
};
use std::collections::HashSet;
use tracing::{info, warn};

/// The score table plus everything derived from it once per load.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub indicators: Vec<String>,
    pub wide: Vec<WideRow>,
    pub long: Vec<LongRow>,
    pub latest_year: i32,
    pub year_options: Vec<OptionItem>,
    pub region_options: Vec<OptionItem>,
    pub sdg_options: Vec<OptionItem>,
}

impl Dataset {
    pub fn from_scores(table: ScoreTable) -> Self {
        let latest_year = table.rows.iter().map(|r| r.year).max().unwrap_or_default();
        let long = with_latest_buckets(wide_to_long(&table.rows, &table.indicators), latest_year);
        Dataset {
            year_options: year_options(&table.rows),
            region_options: region_options(&table.rows),
            sdg_options: sdg_options(),
            indicators: table.indicators,
            wide: table.rows,
            long,
            latest_year,
        }
    }

    pub fn latest_year_option(&self) -> Option<&OptionItem> {
        self.year_options.first()
    }

    /// First region that is not the national aggregate, for slides that
    /// open on a single state.
    pub fn first_state(&self) -> Option<&OptionItem> {
        self.region_options
            .iter()
            .find(|o| o.value != NATIONAL)
            .or_else(|| self.region_options.first())
    }
}

/// Everything the story reads: configuration, scores and indicator metadata.
#[derive(Debug, Clone)]
pub struct Assets {
    pub config: Config,
    pub data: Dataset,
    pub meta: Vec<MetaRow>,
    pub notes: Vec<(String, String)>,
}

impl Assets {
    /// Load scores, metadata and notes from `config.data_dir`.
    pub fn load(config: Config) -> Result<(Self, loader::LoadReport)> {
        let (table, report) = loader::load_scores(&config.scores_path())?;
        let meta = loader::load_metadata(&config.metadata_path())?;
        let notes = loader::load_footnotes(&config.footnotes_path())?;
        info!(
            indicators = table.indicators.len(),
            metadata = meta.len(),
            notes = notes.len(),
            "assets ready"
        );
        Ok((
            Assets {
                config,
                data: Dataset::from_scores(table),
                meta,
                notes,
            },
            report,
        ))
    }
}

pub fn load_boundaries(config: &Config) -> Result<Boundaries> {
    Ok(Boundaries {
        current: loader::load_boundaries(&config.boundary_path(false))?,
        before_cutoff: loader::load_boundaries(&config.boundary_path(true))?,
    })
}

/// Regions in `records[column]` that have no polygon in `geometry`.
pub fn unmatched_regions(
    records: &[Record],
    column: &str,
    geometry: &FeatureCollection,
    property: &str,
) -> Vec<String> {
    let known: HashSet<String> = geometry.region_names(property).into_iter().collect();
    let mut seen = HashSet::new();
    let missing: Vec<String> = records
        .iter()
        .filter_map(|r| r.get(column).and_then(|v| v.as_str()))
        .filter(|name| !known.contains(*name) && seen.insert(*name))
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        warn!(count = missing.len(), "regions without geometry");
    }
    missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Bucket;
    use std::collections::BTreeMap;

    fn wide(region: &str, year: i32, v: Option<f64>) -> WideRow {
        WideRow {
            region: region.into(),
            year,
            year_label: year.to_string(),
            values: BTreeMap::from([("SDG 1".to_string(), v)]),
        }
    }

    #[test]
    fn derives_options_and_latest_buckets() {
        let ds = Dataset::from_scores(ScoreTable {
            indicators: vec!["SDG 1".into()],
            rows: vec![
                wide("India", 2018, Some(54.0)),
                wide("India", 2024, Some(72.0)),
                wide("Target", 2024, Some(100.0)),
                wide("Goa", 2024, Some(48.0)),
            ],
        });
        assert_eq!(ds.latest_year, 2024);
        assert_eq!(ds.long.len(), 4);
        assert_eq!(ds.latest_year_option().map(|o| o.value.as_str()), Some("2024"));
        assert_eq!(ds.first_state().map(|o| o.value.as_str()), Some("Goa"));
        let india_2018 = ds.long.iter().find(|r| r.region == "India" && r.year == 2018).unwrap();
        assert_eq!(india_2018.bucket, Bucket::Performer);
        assert_eq!(india_2018.latest_bucket, Some(Bucket::FrontRunner));
    }

    #[test]
    fn reports_regions_without_geometry() {
        let fc: FeatureCollection = serde_json::from_str(
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{"State_Name":"Goa"},"geometry":null}
            ]}"#,
        )
        .unwrap();
        let mut a = Record::new();
        a.insert("area".into(), "Goa".into());
        let mut b = Record::new();
        b.insert("area".into(), "Ladakh".into());
        assert_eq!(unmatched_regions(&[a, b], "area", &fc, "State_Name"), vec!["Ladakh"]);
    }
}
