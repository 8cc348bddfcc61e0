//! Indicator-level tables behind each goal score.

use crate::constants::{GENERAL_NOTE, NATIONAL, REF_LINE_COLOR, TARGET, TARGET_VALUE};
use crate::render::RefValue;
use crate::types::{Cell, IndicatorRow, IndicatorTable, MetaRow};
use crate::util::format_score;

/// Comparison prefix shown in front of a target: `=` for the scale ends,
/// otherwise the direction in which the indicator improves.
pub fn target_text(value: f64, lower_is_better: bool) -> String {
    let v = format_score(value);
    if value == 0.0 || value == 100.0 {
        format!("={}", v)
    } else if lower_is_better {
        format!("≤{}", v)
    } else {
        format!("≥{}", v)
    }
}

fn lower_is_better(meta: &[MetaRow], indicator: &str) -> bool {
    meta.iter()
        .find(|m| m.indicator == indicator)
        .map(MetaRow::lower_is_better)
        .unwrap_or(false)
}

/// Add a `Target value` row with annotated text for every `Target` row and
/// order the table as target value, national, then everything else.
pub fn prepare(mut table: IndicatorTable, meta: &[MetaRow]) -> IndicatorTable {
    let annotated: Vec<IndicatorRow> = table
        .rows
        .iter()
        .filter(|r| r.region == TARGET)
        .map(|r| IndicatorRow {
            region: TARGET_VALUE.to_string(),
            year: r.year,
            year_label: r.year_label.clone(),
            cells: r
                .cells
                .iter()
                .map(|(name, cell)| {
                    let text = match cell {
                        Some(Cell::Number(v)) => {
                            Some(Cell::Text(target_text(*v, lower_is_better(meta, name))))
                        }
                        other => other.clone(),
                    };
                    (name.clone(), text)
                })
                .collect(),
        })
        .collect();
    table.rows.extend(annotated);

    let rank = |r: &IndicatorRow| match r.region.as_str() {
        TARGET_VALUE => 0,
        NATIONAL => 1,
        _ => 2,
    };
    table.rows.sort_by_key(rank);
    table
}

/// True when some real region has a value for `indicator` in `year`.
pub fn has_values(table: &IndicatorTable, indicator: &str, year: i32) -> bool {
    table
        .rows
        .iter()
        .any(|r| r.year == year && r.region != TARGET && r.number(indicator).is_some())
}

/// Rows with a value for the map: every region including the national
/// aggregate, but no target or annotated rows.
pub fn mapped_rows<'a>(
    table: &'a IndicatorTable,
    indicator: &'a str,
    year: i32,
) -> impl Iterator<Item = &'a IndicatorRow> + 'a {
    table.rows.iter().filter(move |r| {
        r.year == year
            && r.region != TARGET
            && r.region != TARGET_VALUE
            && r.number(indicator).is_some()
    })
}

/// Bars: as [`mapped_rows`], minus the national row, which is drawn as a
/// reference line instead.
pub fn plotted_rows<'a>(
    table: &'a IndicatorTable,
    indicator: &'a str,
    year: i32,
) -> impl Iterator<Item = &'a IndicatorRow> + 'a {
    mapped_rows(table, indicator, year).filter(|r| r.region != NATIONAL)
}

fn find<'a>(table: &'a IndicatorTable, region: &str, year: i32) -> Option<&'a IndicatorRow> {
    table.rows.iter().find(|r| r.region == region && r.year == year)
}

/// National average and target lines, each omitted when missing.
pub fn ref_values(table: &IndicatorTable, indicator: &str, year: i32) -> Vec<RefValue> {
    let mut out = Vec::new();
    if let Some(v) = find(table, NATIONAL, year).and_then(|r| r.number(indicator)) {
        out.push(RefValue {
            value: v,
            text: format!("India Average {}", format_score(v)),
            color: REF_LINE_COLOR,
        });
    }
    if let Some(v) = find(table, TARGET, year).and_then(|r| r.number(indicator)) {
        let label = find(table, TARGET_VALUE, year)
            .and_then(|r| match r.cells.get(indicator) {
                Some(Some(Cell::Text(t))) => Some(t.clone()),
                _ => None,
            })
            .unwrap_or_else(|| format_score(v));
        out.push(RefValue {
            value: v,
            text: format!("Target {}", label),
            color: REF_LINE_COLOR,
        });
    }
    out
}

/// Indicators that metadata lists for a goal in a given year, in file order.
pub fn table_indicators(meta: &[MetaRow], sdg: &str, year: i32) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for m in meta {
        if m.sdg == sdg && m.year_formatted == Some(year) && !out.contains(&m.indicator) {
            out.push(m.indicator.clone());
        }
    }
    out
}

/// Goal-specific notes followed by the general note.
pub fn foot_note(sdg: &str, notes: &[(String, String)]) -> String {
    let mut all: Vec<&str> = notes
        .iter()
        .filter(|(id, _)| id == sdg)
        .map(|(_, n)| n.as_str())
        .collect();
    all.push(GENERAL_NOTE);
    if all.len() == 1 {
        format!("Note: {}", all[0])
    } else {
        format!("Notes:\n{}", all.join("\n"))
    }
}
