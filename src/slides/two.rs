use super::{check_view, no_control, pick, year_of, Command, Slide, View};
use crate::constants::{sdg_ids, COMPOSITE, REF_LINE_COLOR};
use crate::dataset::Assets;
use crate::error::Result;
use crate::gate::LoadRequest;
use crate::render::{
    long_record, pivoted_record, role, tooltip, GraphSettings, GraphSpec, GraphType, RefValue,
    Rendered, TableColumn,
};
use crate::reshape::pivot_by_year;
use crate::types::{LongRow, OptionItem};
use crate::util::format_score;
use std::collections::BTreeMap;

const VIEWS: &[View] = &[View::Chart, View::Table];

/// One region's goal scores: a year's bars or every year side by side.
#[derive(Debug, Clone)]
pub struct ProfileSlide {
    region: OptionItem,
    year: OptionItem,
    view: View,
}

impl ProfileSlide {
    pub fn new(assets: &Assets) -> Self {
        let blank = || OptionItem::new("", "");
        ProfileSlide {
            region: assets.data.first_state().cloned().unwrap_or_else(blank),
            year: assets.data.latest_year_option().cloned().unwrap_or_else(blank),
            view: View::Chart,
        }
    }

    fn region_rows<'a>(&'a self, assets: &'a Assets) -> impl Iterator<Item = &'a LongRow> + 'a {
        let goals = sdg_ids();
        assets
            .data
            .long
            .iter()
            .filter(move |r| r.region == self.region.value && goals.contains(&r.indicator))
    }

    fn bars(&self, assets: &Assets) -> Rendered {
        let year = year_of(&self.year);
        let rows: Vec<&LongRow> = self.region_rows(assets).filter(|r| r.year == year).collect();
        if rows.is_empty() {
            return Rendered::no_data(&self.region.label, &self.year.label);
        }
        let composite = rows
            .iter()
            .find(|r| r.indicator == COMPOSITE)
            .and_then(|r| r.value);
        let ref_values = composite
            .map(|v| RefValue {
                value: v,
                text: format!("Composite Score ({})", format_score(v)),
                color: REF_LINE_COLOR,
            })
            .into_iter()
            .collect();
        Rendered::Graph(GraphSpec {
            graph_id: "slide-2-chart".into(),
            graph_type: GraphType::BarChart,
            title: format!("{} ({})", self.region.label, self.year.label),
            data: rows
                .into_iter()
                .filter(|r| r.indicator != COMPOSITE)
                .map(long_record)
                .collect(),
            data_configuration: vec![role("sdg", "label"), role("value", "size"), role("group", "color")],
            settings: GraphSettings {
                ref_values,
                label_order: sdg_ids().into_iter().filter(|id| id != COMPOSITE).collect(),
                max_value: Some(100.0),
                tooltip: Some(tooltip("{{data.area}} ({{data.year}})", "{{data.sdg}}", "{{size}}")),
                ..GraphSettings::categorical()
            },
        })
    }

    fn table(&self, assets: &Assets) -> Rendered {
        let rows: Vec<LongRow> = self.region_rows(assets).cloned().collect();
        let pivoted = pivot_by_year(&rows);
        if pivoted.iter().all(|p| p.years.is_empty()) {
            return Rendered::no_data(&self.region.label, "any year");
        }
        // every year present for this region, oldest first
        let years: BTreeMap<i32, String> = rows
            .iter()
            .filter(|r| r.value.is_some())
            .map(|r| (r.year, r.year_label.clone()))
            .collect();
        let mut columns = vec![TableColumn::new("SDGs", "sdg")];
        columns.extend(
            years
                .values()
                .map(|label| TableColumn::new(label.clone(), label.clone()).chip(format!("group{}", label))),
        );
        Rendered::Graph(GraphSpec {
            graph_id: "slide-2-table".into(),
            graph_type: GraphType::DataTable,
            title: format!("{}: SDG scores by year", self.region.label),
            data: pivoted.iter().map(pivoted_record).collect(),
            data_configuration: Vec::new(),
            settings: GraphSettings {
                column_data: columns,
                ..GraphSettings::categorical()
            },
        })
    }
}

impl Slide for ProfileSlide {
    fn index(&self) -> usize {
        2
    }

    fn views(&self) -> &'static [View] {
        VIEWS
    }

    fn view(&self) -> View {
        self.view
    }

    fn describe(&self) -> String {
        format!(
            "region {} | year {} | view {}",
            self.region.label, self.year.label, self.view
        )
    }

    fn apply(&mut self, cmd: Command, assets: &Assets) -> Result<Option<LoadRequest>> {
        match cmd {
            Command::View(v) => self.view = check_view(2, VIEWS, v)?,
            Command::Year(y) => self.year = pick(&assets.data.year_options, &y, "year")?,
            Command::Regions(list) => {
                let first = list.first().map(String::as_str).unwrap_or_default();
                self.region = pick(&assets.data.region_options, first, "region")?;
            }
            Command::Sdg(_) => return Err(no_control(2, "SDG")),
            Command::Indicator(_) => return Err(no_control(2, "indicator")),
        }
        Ok(None)
    }

    fn render(&self, assets: &Assets) -> Rendered {
        match self.view {
            View::Table => self.table(assets),
            _ => self.bars(assets),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slides::fixtures;
    use serde_json::json;

    #[test]
    fn opens_on_first_state_with_composite_reference() {
        let assets = fixtures::assets();
        let slide = ProfileSlide::new(&assets);
        assert!(slide.describe().starts_with("region Bihar"));
        let rendered = slide.render(&assets);
        let spec = rendered.graph().expect("graph");
        assert_eq!(spec.data.len(), 2);
        assert!(spec.data.iter().all(|r| r["sdg"] != json!(COMPOSITE)));
        assert_eq!(spec.settings.ref_values[0].value, 57.0);
        assert_eq!(spec.settings.ref_values[0].text, "Composite Score (57)");
        // Bihar SDG 3 is missing in 2024: kept, banded NA, never zero
        let sdg3 = spec.data.iter().find(|r| r["sdg"] == json!("SDG 3")).unwrap();
        assert_eq!(sdg3["value"], serde_json::Value::Null);
        assert_eq!(sdg3["group"], json!("NA"));
    }

    #[test]
    fn empty_selection_reports_no_data() {
        let assets = fixtures::assets();
        let mut slide = ProfileSlide::new(&assets);
        slide.apply(Command::Regions(vec!["Kerala".into()]), &assets).unwrap();
        slide.apply(Command::Year("2018".into()), &assets).unwrap();
        assert_eq!(
            slide.render(&assets),
            Rendered::NoData {
                message: "No data available for Kerala for 2018".into()
            }
        );
    }

    #[test]
    fn table_pivots_by_year() {
        let assets = fixtures::assets();
        let mut slide = ProfileSlide::new(&assets);
        slide.apply(Command::Regions(vec!["goa".into()]), &assets).unwrap();
        slide.apply(Command::View(View::Table), &assets).unwrap();
        let rendered = slide.render(&assets);
        let spec = rendered.graph().expect("graph");
        assert_eq!(spec.keys(), vec!["sdg", "2018", "2023–24"]);
        let sdg1 = &spec.data[0];
        assert_eq!(sdg1["2018"], json!(49.0));
        assert_eq!(sdg1["group2018"], json!("Aspirant (0–49)"));
        assert_eq!(sdg1["group2023–24"], json!("Achiever (100)"));
    }

    #[test]
    fn target_is_not_selectable() {
        let assets = fixtures::assets();
        let mut slide = ProfileSlide::new(&assets);
        assert!(slide.apply(Command::Regions(vec!["Target".into()]), &assets).is_err());
    }
}
