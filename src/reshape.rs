//! Pure transforms between the wide score table, its long expansion and
//! the year-pivoted view used by multi-year tables.
//!
//! None of these functions drop or duplicate a (region, year, indicator)
//! triple. Missing cells stay missing; they are never read as zero.

use crate::types::{Bucket, LongRow, PivotedRow, WideRow, YearCell};
use crate::util::average;
use std::collections::{BTreeMap, HashMap};

/// Band for a score. Thresholds are inclusive on the lower edge: 50 is a
/// Performer, 65 a Front Runner, 100 an Achiever.
pub fn bucket_of(value: Option<f64>) -> Bucket {
    match value {
        None => Bucket::NotAvailable,
        Some(v) if v.is_nan() => Bucket::NotAvailable,
        Some(v) if v < 50.0 => Bucket::Aspirant,
        Some(v) if v < 65.0 => Bucket::Performer,
        Some(v) if v < 100.0 => Bucket::FrontRunner,
        Some(_) => Bucket::Achiever,
    }
}

/// One long row per wide row and indicator column, in input order.
pub fn wide_to_long(rows: &[WideRow], indicators: &[String]) -> Vec<LongRow> {
    rows.iter()
        .flat_map(|row| {
            indicators.iter().map(move |indicator| {
                let value = row.value(indicator).filter(|v| !v.is_nan());
                LongRow {
                    region: row.region.clone(),
                    year: row.year,
                    year_label: row.year_label.clone(),
                    indicator: indicator.clone(),
                    value,
                    bucket: bucket_of(value),
                    latest_bucket: None,
                }
            })
        })
        .collect()
}

/// `<indicator> Group` band labels for a wide row, as shown next to the
/// scores in the wide table.
pub fn wide_groups(row: &WideRow, indicators: &[String]) -> BTreeMap<String, Bucket> {
    indicators
        .iter()
        .map(|ind| (format!("{} Group", ind), bucket_of(row.value(ind))))
        .collect()
}

/// Group by (region, indicator) keeping first-seen order; one sparse cell
/// per year that has a value.
pub fn pivot_by_year(rows: &[LongRow]) -> Vec<PivotedRow> {
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();
    let mut out: Vec<PivotedRow> = Vec::new();
    for r in rows {
        let key = (r.region.as_str(), r.indicator.as_str());
        let slot = *index.entry(key).or_insert_with(|| {
            out.push(PivotedRow {
                region: r.region.clone(),
                indicator: r.indicator.clone(),
                years: BTreeMap::new(),
            });
            out.len() - 1
        });
        if let Some(value) = r.value {
            out[slot].years.insert(
                r.year,
                YearCell {
                    label: r.year_label.clone(),
                    value,
                    bucket: bucket_of(Some(value)),
                },
            );
        }
    }
    out
}

/// Expand pivoted rows back into long rows, one per present year cell.
pub fn unpivot(rows: &[PivotedRow]) -> Vec<LongRow> {
    rows.iter()
        .flat_map(|row| {
            row.years.iter().map(move |(year, cell)| LongRow {
                region: row.region.clone(),
                year: *year,
                year_label: cell.label.clone(),
                indicator: row.indicator.clone(),
                value: Some(cell.value),
                bucket: bucket_of(Some(cell.value)),
                latest_bucket: None,
            })
        })
        .collect()
}

/// Band of `(region, indicator)` in `latest_year`, or `None` when that row
/// does not exist. Callers leave such series out of categorical colouring.
pub fn latest_value_for(
    rows: &[LongRow],
    region: &str,
    indicator: &str,
    latest_year: i32,
) -> Option<Bucket> {
    rows.iter()
        .find(|r| r.region == region && r.indicator == indicator && r.year == latest_year)
        .map(|r| bucket_of(r.value))
}

/// Fill `latest_bucket` on every row via [`latest_value_for`], so trend
/// lines keep one colour across all the years they span. Each series is
/// looked up once.
pub fn with_latest_buckets(mut rows: Vec<LongRow>, latest_year: i32) -> Vec<LongRow> {
    let mut seen: HashMap<(&str, &str), Option<Bucket>> = HashMap::new();
    let latest: Vec<Option<Bucket>> = rows
        .iter()
        .map(|r| {
            *seen
                .entry((r.region.as_str(), r.indicator.as_str()))
                .or_insert_with(|| latest_value_for(&rows, &r.region, &r.indicator, latest_year))
        })
        .collect();
    for (r, b) in rows.iter_mut().zip(latest) {
        r.latest_bucket = b;
    }
    rows
}

/// Mean of an indicator over every region in a year, skipping missing cells.
pub fn average_value(rows: &[LongRow], indicator: &str, year: i32) -> Option<f64> {
    average(
        rows.iter()
            .filter(|r| r.indicator == indicator && r.year == year)
            .map(|r| r.value),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wide(region: &str, year: i32, cells: &[(&str, Option<f64>)]) -> WideRow {
        WideRow {
            region: region.to_string(),
            year,
            year_label: year.to_string(),
            values: cells.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    fn indicators(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bucket_boundaries() {
        assert_eq!(bucket_of(Some(0.0)), Bucket::Aspirant);
        assert_eq!(bucket_of(Some(49.98)), Bucket::Aspirant);
        assert_eq!(bucket_of(Some(49.999)), Bucket::Aspirant);
        assert_eq!(bucket_of(Some(50.0)), Bucket::Performer);
        assert_eq!(bucket_of(Some(64.99)), Bucket::Performer);
        assert_eq!(bucket_of(Some(65.0)), Bucket::FrontRunner);
        assert_eq!(bucket_of(Some(99.99)), Bucket::FrontRunner);
        assert_eq!(bucket_of(Some(100.0)), Bucket::Achiever);
        assert_eq!(bucket_of(None), Bucket::NotAvailable);
        assert_eq!(bucket_of(Some(f64::NAN)), Bucket::NotAvailable);
    }

    #[test]
    fn bucket_labels_match_legend() {
        assert_eq!(Bucket::Aspirant.label(), "Aspirant (0–49)");
        assert_eq!(Bucket::FrontRunner.to_string(), "Front Runner (65–99)");
        assert_eq!(
            serde_json::to_string(&Bucket::NotAvailable).unwrap(),
            "\"NA\""
        );
    }

    #[test]
    fn long_expansion_is_complete() {
        let ind = indicators(&["SDG 1", "SDG 2", "Comp. Score"]);
        let rows = vec![
            wide("India", 2024, &[("SDG 1", Some(72.0)), ("SDG 2", Some(52.0)), ("Comp. Score", Some(71.0))]),
            wide("Goa", 2024, &[("SDG 1", Some(90.0)), ("SDG 2", None), ("Comp. Score", Some(77.0))]),
            wide("Goa", 2018, &[("SDG 1", Some(49.0))]),
        ];
        let long = wide_to_long(&rows, &ind);
        assert_eq!(long.len(), rows.len() * ind.len());

        let mut regrouped: HashMap<(String, i32), BTreeMap<String, f64>> = HashMap::new();
        for r in &long {
            if let Some(v) = r.value {
                regrouped
                    .entry((r.region.clone(), r.year))
                    .or_default()
                    .insert(r.indicator.clone(), v);
            }
        }
        for w in &rows {
            let recovered = regrouped.get(&(w.region.clone(), w.year)).cloned().unwrap_or_default();
            let original: BTreeMap<String, f64> = w
                .values
                .iter()
                .filter_map(|(k, v)| v.map(|v| (k.clone(), v)))
                .collect();
            assert_eq!(recovered, original);
        }
    }

    #[test]
    fn missing_cell_becomes_na_and_skips_average() {
        let ind = indicators(&["SDG 2"]);
        let rows = vec![
            wide("Goa", 2024, &[("SDG 2", None)]),
            wide("Kerala", 2024, &[("SDG 2", Some(80.0))]),
            wide("Bihar", 2024, &[("SDG 2", Some(40.0))]),
        ];
        let long = wide_to_long(&rows, &ind);
        assert_eq!(long[0].value, None);
        assert_eq!(long[0].bucket, Bucket::NotAvailable);
        assert_eq!(average_value(&long, "SDG 2", 2024), Some(60.0));
    }

    #[test]
    fn pivot_is_sparse_and_carries_groups() {
        let ind = indicators(&["SDG 1"]);
        let rows = vec![
            wide("Goa", 2018, &[("SDG 1", Some(64.99))]),
            wide("Goa", 2020, &[("SDG 1", None)]),
            wide("Goa", 2024, &[("SDG 1", Some(100.0))]),
        ];
        let pivoted = pivot_by_year(&wide_to_long(&rows, &ind));
        assert_eq!(pivoted.len(), 1);
        let goa = &pivoted[0];
        assert_eq!(goa.years.len(), 2);
        assert!(!goa.years.contains_key(&2020));
        assert_eq!(goa.years[&2018].bucket, Bucket::Performer);
        assert_eq!(goa.years[&2024].bucket, Bucket::Achiever);
    }

    #[test]
    fn pivot_survives_round_trip() {
        let ind = indicators(&["SDG 1", "SDG 5"]);
        let rows = vec![
            wide("India", 2018, &[("SDG 1", Some(54.0)), ("SDG 5", Some(36.0))]),
            wide("India", 2024, &[("SDG 1", Some(72.0)), ("SDG 5", None)]),
            wide("Goa", 2024, &[("SDG 1", Some(65.0)), ("SDG 5", Some(50.0))]),
        ];
        let pivoted = pivot_by_year(&wide_to_long(&rows, &ind));
        let again = pivot_by_year(&unpivot(&pivoted));
        assert_eq!(again, pivoted);
    }

    #[test]
    fn latest_bucket_lookup() {
        let ind = indicators(&["SDG 3"]);
        let rows = vec![
            wide("Goa", 2018, &[("SDG 3", Some(40.0))]),
            wide("Goa", 2024, &[("SDG 3", Some(70.0))]),
            wide("Ladakh", 2018, &[("SDG 3", Some(55.0))]),
        ];
        let long = wide_to_long(&rows, &ind);
        assert_eq!(latest_value_for(&long, "Goa", "SDG 3", 2024), Some(Bucket::FrontRunner));
        assert_eq!(latest_value_for(&long, "Ladakh", "SDG 3", 2024), None);

        let tagged = with_latest_buckets(long, 2024);
        assert!(tagged
            .iter()
            .filter(|r| r.region == "Goa")
            .all(|r| r.latest_bucket == Some(Bucket::FrontRunner)));
        assert!(tagged
            .iter()
            .filter(|r| r.region == "Ladakh")
            .all(|r| r.latest_bucket.is_none()));
    }

    #[test]
    fn latest_buckets_match_single_lookups() {
        let ind = indicators(&["SDG 1", "SDG 3"]);
        let rows = vec![
            wide("India", 2018, &[("SDG 1", Some(54.0)), ("SDG 3", Some(52.0))]),
            wide("India", 2024, &[("SDG 1", Some(72.0)), ("SDG 3", None)]),
            wide("Goa", 2018, &[("SDG 1", Some(49.0)), ("SDG 3", Some(65.0))]),
        ];
        let long = wide_to_long(&rows, &ind);
        let tagged = with_latest_buckets(long.clone(), 2024);
        for r in &tagged {
            assert_eq!(r.latest_bucket, latest_value_for(&long, &r.region, &r.indicator, 2024));
        }
        let india_sdg3 = tagged
            .iter()
            .find(|r| r.region == "India" && r.indicator == "SDG 3" && r.year == 2018)
            .unwrap();
        assert_eq!(india_sdg3.latest_bucket, Some(Bucket::NotAvailable));
    }

    #[test]
    fn wide_group_columns() {
        let ind = indicators(&["SDG 1", "SDG 2"]);
        let row = wide("Goa", 2024, &[("SDG 1", Some(65.0))]);
        let groups = wide_groups(&row, &ind);
        assert_eq!(groups["SDG 1 Group"], Bucket::FrontRunner);
        assert_eq!(groups["SDG 2 Group"], Bucket::NotAvailable);
    }
}
