use super::{check_view, no_control, pick, year_of, Command, Slide, View};
use crate::constants::{COMPOSITE, NATIONAL, REF_LINE_COLOR, TRENDS_NOTE};
use crate::dataset::Assets;
use crate::error::Result;
use crate::gate::LoadRequest;
use crate::options::region_order;
use crate::render::{
    long_record, pivoted_record, role, tooltip, Boundary, GraphSettings, GraphSpec, GraphType,
    MapSettings, RefValue, Rendered, TableColumn,
};
use crate::reshape::pivot_by_year;
use crate::types::{LongRow, OptionItem};
use crate::util::format_score;
use std::collections::BTreeMap;

const VIEWS: &[View] = &[View::Chart, View::Map, View::Trends, View::Table];

/// Every region on a single goal: map, ranked bars, trend lines or a table.
#[derive(Debug, Clone)]
pub struct GoalSlide {
    sdg: OptionItem,
    year: OptionItem,
    highlighted: Vec<String>,
    view: View,
}

impl GoalSlide {
    pub fn new(assets: &Assets) -> Self {
        let blank = || OptionItem::new("", "");
        GoalSlide {
            sdg: assets.data.sdg_options.first().cloned().unwrap_or_else(blank),
            year: assets.data.latest_year_option().cloned().unwrap_or_else(blank),
            highlighted: vec![NATIONAL.to_string()],
            view: View::Map,
        }
    }

    fn goal_name(&self) -> String {
        if self.sdg.value == COMPOSITE {
            "Composite Index Score".to_string()
        } else {
            self.sdg.label.clone()
        }
    }

    fn title(&self) -> String {
        format!("Performance of States/UTs on {} ({})", self.goal_name(), self.year.label)
    }

    fn goal_rows<'a>(&'a self, assets: &'a Assets) -> impl Iterator<Item = &'a LongRow> + 'a {
        assets.data.long.iter().filter(move |r| r.indicator == self.sdg.value)
    }

    /// Rows drawn for the selected year. The national aggregate becomes the
    /// reference line; the target stays in as a bar and map entry.
    fn state_rows(&self, assets: &Assets) -> Vec<LongRow> {
        let year = year_of(&self.year);
        self.goal_rows(assets)
            .filter(|r| r.year == year && r.region != NATIONAL)
            .cloned()
            .collect()
    }

    fn map(&self, assets: &Assets) -> Rendered {
        let rows = self.state_rows(assets);
        if rows.is_empty() {
            return Rendered::no_data(&self.sdg.label, &self.year.label);
        }
        Rendered::Graph(GraphSpec {
            graph_id: "slide-3-map".into(),
            graph_type: GraphType::ChoroplethMap,
            title: self.title(),
            data: rows.iter().map(long_record).collect(),
            data_configuration: vec![role("area", "id"), role("group", "x")],
            settings: GraphSettings {
                map: Some(MapSettings::new(Boundary::for_year(year_of(&self.year)))),
                tooltip: Some(tooltip("{{id}} ({{data.year}})", "{{data.sdg}}", "{{data.value}}")),
                ..GraphSettings::categorical()
            },
        })
    }

    fn bars(&self, assets: &Assets) -> Rendered {
        let rows = self.state_rows(assets);
        if rows.is_empty() {
            return Rendered::no_data(&self.sdg.label, &self.year.label);
        }
        let year = year_of(&self.year);
        let national = self
            .goal_rows(assets)
            .find(|r| r.region == NATIONAL && r.year == year)
            .and_then(|r| r.value);
        let ref_values = national
            .map(|v| RefValue {
                value: v,
                text: if self.sdg.value == COMPOSITE {
                    format!("India Composite Index Score ({})", format_score(v))
                } else {
                    format!("India {} Index Score ({})", self.sdg.value, format_score(v))
                },
                color: REF_LINE_COLOR,
            })
            .into_iter()
            .collect();
        Rendered::Graph(GraphSpec {
            graph_id: "slide-3-chart".into(),
            graph_type: GraphType::BarChart,
            title: self.title(),
            data: rows.iter().map(long_record).collect(),
            data_configuration: vec![role("area", "label"), role("value", "size"), role("group", "color")],
            settings: GraphSettings {
                ref_values,
                horizontal: true,
                sort_descending: true,
                tooltip: Some(tooltip("{{label}} ({{data.year}})", "{{data.sdg}}", "{{size}}")),
                ..GraphSettings::categorical()
            },
        })
    }

    /// Lines are coloured by the latest band; series with no latest-year
    /// row are left out rather than drawn uncoloured.
    fn trends(&self, assets: &Assets) -> Rendered {
        let data: Vec<_> = self
            .goal_rows(assets)
            .filter(|r| r.latest_bucket.is_some() && r.value.is_some())
            .map(long_record)
            .collect();
        if data.is_empty() {
            return Rendered::no_data(&self.sdg.label, "any year");
        }
        Rendered::Graph(GraphSpec {
            graph_id: "slide-3-trends".into(),
            graph_type: GraphType::MultiLineAltChart,
            title: format!("{} over time", self.goal_name()),
            data,
            data_configuration: vec![
                role("yearFormatted", "date"),
                role("area", "label"),
                role("value", "y"),
                role("groupLatest", "color"),
            ],
            settings: GraphSettings {
                highlighted_lines: self.highlighted.clone(),
                foot_note: Some(TRENDS_NOTE.to_string()),
                ..GraphSettings::categorical()
            },
        })
    }

    fn table(&self, assets: &Assets) -> Rendered {
        let rows: Vec<LongRow> = self.goal_rows(assets).cloned().collect();
        let mut pivoted = pivot_by_year(&rows);
        pivoted.retain(|p| !p.years.is_empty());
        if pivoted.is_empty() {
            return Rendered::no_data(&self.sdg.label, "any year");
        }
        pivoted.sort_by(|a, b| region_order(&a.region, &b.region));
        let years: BTreeMap<i32, String> = rows
            .iter()
            .filter(|r| r.value.is_some())
            .map(|r| (r.year, r.year_label.clone()))
            .collect();
        let mut columns = vec![TableColumn::new("States/UTs", "area").sortable()];
        columns.extend(years.values().map(|label| {
            TableColumn::new(label.clone(), label.clone())
                .sortable()
                .chip(format!("group{}", label))
        }));
        Rendered::Graph(GraphSpec {
            graph_id: "slide-3-table".into(),
            graph_type: GraphType::DataTable,
            title: format!("{} by year", self.goal_name()),
            data: pivoted.iter().map(pivoted_record).collect(),
            data_configuration: Vec::new(),
            settings: GraphSettings {
                column_data: columns,
                ..GraphSettings::categorical()
            },
        })
    }
}

impl Slide for GoalSlide {
    fn index(&self) -> usize {
        3
    }

    fn views(&self) -> &'static [View] {
        VIEWS
    }

    fn view(&self) -> View {
        self.view
    }

    fn describe(&self) -> String {
        format!(
            "goal {} | year {} | highlight [{}] | view {}",
            self.sdg.value,
            self.year.label,
            self.highlighted.join(", "),
            self.view
        )
    }

    fn apply(&mut self, cmd: Command, assets: &Assets) -> Result<Option<LoadRequest>> {
        match cmd {
            Command::View(v) => self.view = check_view(3, VIEWS, v)?,
            Command::Year(y) => self.year = pick(&assets.data.year_options, &y, "year")?,
            Command::Sdg(s) => self.sdg = pick(&assets.data.sdg_options, &s, "SDG")?,
            Command::Regions(list) => {
                // highlights only exist on the trends view
                if self.view != View::Trends {
                    return Err(no_control(3, "region"));
                }
                let picked = list
                    .iter()
                    .map(|r| pick(&assets.data.region_options, r, "region").map(|o| o.value))
                    .collect::<Result<Vec<_>>>()?;
                self.highlighted = picked;
            }
            Command::Indicator(_) => return Err(no_control(3, "indicator")),
        }
        Ok(None)
    }

    fn render(&self, assets: &Assets) -> Rendered {
        match self.view {
            View::Map => self.map(assets),
            View::Chart => self.bars(assets),
            View::Trends => self.trends(assets),
            View::Table => self.table(assets),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slides::fixtures;
    use serde_json::json;

    fn on_goal(sdg: &str, view: View) -> (GoalSlide, Assets) {
        let assets = fixtures::assets();
        let mut slide = GoalSlide::new(&assets);
        slide.apply(Command::Sdg(sdg.into()), &assets).unwrap();
        slide.apply(Command::View(view), &assets).unwrap();
        (slide, assets)
    }

    #[test]
    fn map_excludes_national_row_and_picks_boundary() {
        let (mut slide, assets) = on_goal("SDG 1", View::Map);
        let rendered = slide.render(&assets);
        let spec = rendered.graph().expect("graph");
        let regions: Vec<&str> = spec.data.iter().filter_map(|r| r["area"].as_str()).collect();
        assert_eq!(regions, vec!["Target", "Goa", "Bihar", "Kerala"]);
        assert_eq!(spec.settings.map.as_ref().unwrap().boundary, Boundary::Current);

        slide.apply(Command::Year("2018".into()), &assets).unwrap();
        let rendered = slide.render(&assets);
        let spec = rendered.graph().expect("graph");
        assert_eq!(spec.settings.map.as_ref().unwrap().boundary, Boundary::BeforeCutoff);
    }

    #[test]
    fn bars_use_national_reference() {
        let (slide, assets) = on_goal("SDG 3", View::Chart);
        let rendered = slide.render(&assets);
        let spec = rendered.graph().expect("graph");
        assert_eq!(spec.settings.ref_values.len(), 1);
        assert_eq!(spec.settings.ref_values[0].value, 77.0);
        assert_eq!(spec.settings.ref_values[0].text, "India SDG 3 Index Score (77)");
    }

    #[test]
    fn bars_keep_target_alongside_states() {
        let (slide, assets) = on_goal("SDG 1", View::Chart);
        let rendered = slide.render(&assets);
        let spec = rendered.graph().expect("graph");
        let target = spec.data.iter().find(|r| r["area"] == json!("Target")).expect("target bar");
        assert_eq!(target["value"], json!(100.0));
        assert_eq!(target["group"], json!("Achiever (100)"));
        assert!(spec.data.iter().all(|r| r["area"] != json!("India")));
        assert_eq!(spec.settings.ref_values[0].text, "India SDG 1 Index Score (72)");
    }

    #[test]
    fn trends_drop_series_without_latest_band() {
        let (mut slide, assets) = on_goal("SDG 3", View::Trends);
        slide
            .apply(Command::Regions(vec!["Goa".into(), "Kerala".into()]), &assets)
            .unwrap();
        let rendered = slide.render(&assets);
        let spec = rendered.graph().expect("graph");
        // Bihar keeps its 2018 point; the missing 2024 point is not plotted
        assert!(spec.data.iter().all(|r| r["value"] != serde_json::Value::Null));
        let goa: Vec<_> = spec.data.iter().filter(|r| r["area"] == json!("Goa")).collect();
        assert_eq!(goa.len(), 2);
        assert!(goa.iter().all(|r| r["groupLatest"] == json!("Front Runner (65–99)")));
        assert_eq!(spec.settings.highlighted_lines, vec!["Goa", "Kerala"]);
    }

    #[test]
    fn highlights_need_trends_view() {
        let (mut slide, assets) = on_goal("SDG 1", View::Map);
        assert!(slide.apply(Command::Regions(vec!["Goa".into()]), &assets).is_err());
    }

    #[test]
    fn table_lists_national_first() {
        let (slide, assets) = on_goal("Comp. Score", View::Table);
        let rendered = slide.render(&assets);
        let spec = rendered.graph().expect("graph");
        assert_eq!(spec.data[0]["area"], json!("India"));
        assert_eq!(spec.keys(), vec!["area", "2018", "2023–24"]);
    }
}
