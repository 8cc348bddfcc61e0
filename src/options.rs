//! Selector contents derived from whatever the loaded data actually covers.

use crate::constants::{NATIONAL, SDG_OPTIONS, TARGET};
use crate::types::{LongRow, MetaRow, OptionGroup, OptionItem, WideRow};
use crate::util::sdg_number;
use std::cmp::Ordering;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Region,
    Year,
    Indicator,
}

/// Rows that can feed a selector.
pub trait Keyed {
    fn region(&self) -> &str;
    fn year(&self) -> i32;
    fn year_label(&self) -> &str;
    fn indicator(&self) -> Option<&str> {
        None
    }
}

impl Keyed for WideRow {
    fn region(&self) -> &str {
        &self.region
    }
    fn year(&self) -> i32 {
        self.year
    }
    fn year_label(&self) -> &str {
        &self.year_label
    }
}

impl Keyed for LongRow {
    fn region(&self) -> &str {
        &self.region
    }
    fn year(&self) -> i32 {
        self.year
    }
    fn year_label(&self) -> &str {
        &self.year_label
    }
    fn indicator(&self) -> Option<&str> {
        Some(&self.indicator)
    }
}

/// Distinct values of `column`, ordered by that column's policy:
///
/// * regions: national aggregate first, then alphabetical; the target row
///   is never offered.
/// * years: latest first, labelled with the display year.
/// * indicators: goal number, composite last.
pub fn distinct_options<R: Keyed>(rows: &[R], column: Column) -> Vec<OptionItem> {
    match column {
        Column::Region => region_options(rows),
        Column::Year => year_options(rows),
        Column::Indicator => {
            let mut seen = HashSet::new();
            let mut ids: Vec<&str> = rows
                .iter()
                .filter_map(|r| r.indicator())
                .filter(|id| seen.insert(*id))
                .collect();
            ids.sort_by(|a, b| sdg_number(a).cmp(&sdg_number(b)).then_with(|| a.cmp(b)));
            ids.into_iter().map(|id| OptionItem::new(id, id)).collect()
        }
    }
}

/// Order used wherever regions are listed: national first, then A–Z.
pub fn region_order(a: &str, b: &str) -> Ordering {
    match (a == NATIONAL, b == NATIONAL) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.cmp(b),
    }
}

pub fn region_options<R: Keyed>(rows: &[R]) -> Vec<OptionItem> {
    let mut seen = HashSet::new();
    let mut regions: Vec<&str> = rows
        .iter()
        .map(|r| r.region())
        .filter(|r| *r != TARGET)
        .filter(|r| seen.insert(*r))
        .collect();
    regions.sort_by(|a, b| region_order(a, b));
    regions.into_iter().map(|r| OptionItem::new(r, r)).collect()
}

/// Label is the display year (`2023–24`), value the numeric year.
pub fn year_options<R: Keyed>(rows: &[R]) -> Vec<OptionItem> {
    let mut seen = HashSet::new();
    let mut years: Vec<(i32, &str)> = rows
        .iter()
        .filter(|r| seen.insert(r.year()))
        .map(|r| (r.year(), r.year_label()))
        .collect();
    years.sort_by(|a, b| b.0.cmp(&a.0));
    years
        .into_iter()
        .map(|(y, label)| OptionItem::new(label, y.to_string()))
        .collect()
}

pub fn sdg_options() -> Vec<OptionItem> {
    SDG_OPTIONS.clone()
}

/// Separator between goal id and indicator name in indicator option values.
pub const INDICATOR_SEPARATOR: char = '~';

/// Indicator selector grouped by goal. `meta` is expected in the order
/// [`crate::loader::load_metadata`] returns (goal, then latest year first).
pub fn indicator_options(meta: &[MetaRow]) -> Vec<OptionGroup> {
    let mut groups: Vec<OptionGroup> = Vec::new();
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    for m in meta {
        if !seen.insert((m.sdg.as_str(), m.indicator.as_str())) {
            continue;
        }
        let option = OptionItem::new(
            m.indicator.clone(),
            format!("{}{}{}", m.sdg, INDICATOR_SEPARATOR, m.indicator),
        );
        let label = format!("{} - {}", m.sdg, m.label);
        match groups.iter_mut().find(|g| g.label == label) {
            Some(g) => g.options.push(option),
            None => groups.push(OptionGroup {
                label,
                options: vec![option],
            }),
        }
    }
    groups
}

/// Split an indicator option value into goal id and indicator name.
pub fn split_indicator_value(value: &str) -> (&str, &str) {
    value
        .split_once(INDICATOR_SEPARATOR)
        .unwrap_or((value, value))
}
