use super::{check_view, no_control, pick, year_of, Command, Slide, View};
use crate::constants::{GENERAL_NOTE, TARGET};
use crate::dataset::Assets;
use crate::error::{DashboardError, Result};
use crate::gate::{LoadGate, LoadRequest, Ticket};
use crate::indicator::{
    foot_note, has_values, mapped_rows, plotted_rows, prepare, ref_values, table_indicators,
};
use crate::options::{indicator_options, split_indicator_value};
use crate::render::{
    indicator_record, role, tooltip, Boundary, GraphSettings, GraphSpec, GraphType, MapSettings,
    Rendered, ScaleType, TableColumn,
};
use crate::types::{IndicatorTable, OptionItem};
use tracing::{error, info, warn};

const VIEWS: &[View] = &[View::Chart, View::Map, View::Table];
const REGION: &str = "STATEs/UTs";

#[derive(Debug, Clone)]
enum Status {
    Loading,
    Ready(IndicatorTable),
    Failed(String),
}

/// Indicator-level drill-down. Each goal's indicators live in their own
/// file, fetched whenever the goal behind the selection changes.
#[derive(Debug)]
pub struct IndicatorSlide {
    indicator: OptionItem,
    sdg: OptionItem,
    year: OptionItem,
    view: View,
    status: Status,
    /// Goal whose file is loaded or being loaded.
    requested: Option<String>,
    gate: LoadGate,
}

impl IndicatorSlide {
    pub fn new(assets: &Assets) -> Self {
        let blank = || OptionItem::new("", "");
        let indicator = indicator_options(&assets.meta)
            .into_iter()
            .flat_map(|g| g.options)
            .next()
            .unwrap_or_else(blank);
        IndicatorSlide {
            indicator,
            sdg: assets.data.sdg_options.first().cloned().unwrap_or_else(blank),
            year: assets.data.latest_year_option().cloned().unwrap_or_else(blank),
            view: View::Chart,
            status: Status::Loading,
            requested: None,
            gate: LoadGate::default(),
        }
    }

    fn indicator_name(&self) -> &str {
        split_indicator_value(&self.indicator.value).1
    }

    /// Goal file the current view reads: the table browses a whole goal,
    /// the chart and map follow the selected indicator.
    fn wanted_goal(&self) -> String {
        if self.view == View::Table {
            self.sdg.value.clone()
        } else {
            split_indicator_value(&self.indicator.value).0.to_string()
        }
    }

    fn request_if_needed(&mut self, assets: &Assets) -> Option<LoadRequest> {
        let goal = self.wanted_goal();
        if self.requested.as_deref() == Some(goal.as_str()) {
            return None;
        }
        self.requested = Some(goal.clone());
        self.status = Status::Loading;
        let path = assets.config.indicator_path(&goal);
        info!(goal = %goal, path = %path.display(), "requesting indicator table");
        Some(self.gate.issue(goal, path))
    }

    fn title(&self) -> String {
        format!("{}, {}", self.indicator_name(), self.year.label)
    }

    fn no_indicator_data(&self) -> Rendered {
        Rendered::no_data(self.indicator_name(), &self.year.label)
    }

    fn bars(&self, table: &IndicatorTable) -> Rendered {
        let year = year_of(&self.year);
        let name = self.indicator_name();
        if !has_values(table, name, year) {
            return self.no_indicator_data();
        }
        Rendered::Graph(GraphSpec {
            graph_id: "slide-4-chart".into(),
            graph_type: GraphType::BarChart,
            title: self.title(),
            data: plotted_rows(table, name, year).map(indicator_record).collect(),
            data_configuration: vec![role(REGION, "label"), role(name, "size")],
            settings: GraphSettings {
                ref_values: ref_values(table, name, year),
                horizontal: true,
                sort_descending: true,
                foot_note: Some(format!("Note: {}", GENERAL_NOTE)),
                tooltip: Some(tooltip(
                    &format!("{{{{label}}}} ({})", self.year.label),
                    name,
                    "<b>{{size}}</b>",
                )),
                ..GraphSettings::default()
            },
        })
    }

    fn map(&self, table: &IndicatorTable) -> Rendered {
        let year = year_of(&self.year);
        let name = self.indicator_name();
        if !has_values(table, name, year) {
            return self.no_indicator_data();
        }
        Rendered::Graph(GraphSpec {
            graph_id: "slide-4-map".into(),
            graph_type: GraphType::ChoroplethMap,
            title: self.title(),
            data: mapped_rows(table, name, year).map(indicator_record).collect(),
            data_configuration: vec![role(REGION, "id"), role(name, "x")],
            settings: GraphSettings {
                scale_type: Some(ScaleType::Linear),
                map: Some(MapSettings::new(Boundary::for_year(year))),
                foot_note: Some(format!("Note: {}", GENERAL_NOTE)),
                tooltip: Some(tooltip(
                    &format!("{{{{id}}}} ({})", self.year.label),
                    name,
                    "<b>{{x}}</b>",
                )),
                ..GraphSettings::default()
            },
        })
    }

    fn table(&self, table: &IndicatorTable, assets: &Assets) -> Rendered {
        let year = year_of(&self.year);
        let indicators = table_indicators(&assets.meta, &self.sdg.value, year);
        if indicators.is_empty() {
            return Rendered::NoData {
                message: format!(
                    "Indicators are not available for {} for {}",
                    self.sdg.value, self.year.label
                ),
            };
        }
        let mut columns = vec![TableColumn::new("States/UTs", REGION).sortable()];
        columns.extend(
            indicators
                .iter()
                .map(|ind| TableColumn::new(ind.clone(), ind.clone()).sortable()),
        );
        Rendered::Graph(GraphSpec {
            graph_id: "slide-4-table".into(),
            graph_type: GraphType::DataTable,
            title: format!("Indicators behind the {} Index Score", self.sdg.value),
            data: table
                .rows
                .iter()
                .filter(|r| r.year == year && r.region != TARGET)
                .map(indicator_record)
                .collect(),
            data_configuration: Vec::new(),
            settings: GraphSettings {
                column_data: columns,
                foot_note: Some(foot_note(&self.sdg.value, &assets.notes)),
                ..GraphSettings::default()
            },
        })
    }
}

impl Slide for IndicatorSlide {
    fn index(&self) -> usize {
        4
    }

    fn views(&self) -> &'static [View] {
        VIEWS
    }

    fn view(&self) -> View {
        self.view
    }

    fn describe(&self) -> String {
        let subject = if self.view == View::Table {
            format!("goal {}", self.sdg.value)
        } else {
            format!("indicator {}", self.indicator_name())
        };
        format!("{} | year {} | view {}", subject, self.year.label, self.view)
    }

    fn apply(&mut self, cmd: Command, assets: &Assets) -> Result<Option<LoadRequest>> {
        match cmd {
            Command::View(v) => self.view = check_view(4, VIEWS, v)?,
            Command::Year(y) => self.year = pick(&assets.data.year_options, &y, "year")?,
            Command::Sdg(s) => self.sdg = pick(&assets.data.sdg_options, &s, "SDG")?,
            Command::Indicator(i) => {
                let options: Vec<OptionItem> = indicator_options(&assets.meta)
                    .into_iter()
                    .flat_map(|g| g.options)
                    .collect();
                self.indicator = pick(&options, &i, "indicator")?;
            }
            Command::Regions(_) => return Err(no_control(4, "region")),
        }
        Ok(self.request_if_needed(assets))
    }

    fn initial_load(&mut self, assets: &Assets) -> Option<LoadRequest> {
        self.request_if_needed(assets)
    }

    fn complete_load(
        &mut self,
        ticket: Ticket,
        result: Result<IndicatorTable>,
        assets: &Assets,
    ) -> bool {
        if !self.gate.accept(ticket) {
            warn!("dropping indicator table for a superseded selection");
            return false;
        }
        self.status = match result {
            Ok(table) => Status::Ready(prepare(table, &assets.meta)),
            Err(e) => {
                error!(error = %e, "failed to load indicator table");
                Status::Failed(failure_message(&e))
            }
        };
        true
    }

    fn render(&self, assets: &Assets) -> Rendered {
        let table = match &self.status {
            Status::Loading => return Rendered::Loading,
            Status::Failed(message) => {
                return Rendered::Failed {
                    message: message.clone(),
                }
            }
            Status::Ready(table) => table,
        };
        if table.rows.is_empty() {
            return self.no_indicator_data();
        }
        match self.view {
            View::Table => self.table(table, assets),
            View::Map => self.map(table),
            _ => self.bars(table),
        }
    }
}

fn failure_message(e: &DashboardError) -> String {
    format!("Could not load indicator data: {}", e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slides::fixtures;
    use crate::types::{Cell, IndicatorRow};
    use std::collections::BTreeMap;

    fn row(region: &str, mmr: Option<f64>) -> IndicatorRow {
        let mut cells = BTreeMap::new();
        cells.insert("MMR".to_string(), mmr.map(Cell::Number));
        cells.insert("Immunisation".to_string(), Some(Cell::Number(90.0)));
        IndicatorRow {
            region: region.into(),
            year: 2024,
            year_label: "2023–24".into(),
            cells,
        }
    }

    fn sdg3() -> IndicatorTable {
        IndicatorTable {
            sdg: "SDG 3".into(),
            indicators: vec!["MMR".into(), "Immunisation".into()],
            rows: vec![
                row("Goa", Some(20.0)),
                row("India", Some(97.0)),
                row("Target", Some(70.0)),
                row("Bihar", None),
            ],
        }
    }

    fn mounted() -> (IndicatorSlide, Assets, LoadRequest) {
        let assets = fixtures::assets();
        let mut slide = IndicatorSlide::new(&assets);
        let req = slide.initial_load(&assets).expect("initial load");
        (slide, assets, req)
    }

    #[test]
    fn loading_until_the_table_arrives() {
        let (mut slide, assets, req) = mounted();
        assert_eq!(req.key, "SDG 1");
        assert_eq!(slide.render(&assets), Rendered::Loading);

        let again = slide.apply(Command::Indicator("MMR".into()), &assets).unwrap().unwrap();
        assert_eq!(again.key, "SDG 3");
        assert!(again.path.ends_with("SDG/SDG 3.csv"));
        assert!(slide.complete_load(again.ticket, Ok(sdg3()), &assets));

        let rendered = slide.render(&assets);
        let spec = rendered.graph().expect("graph");
        assert_eq!(spec.data.len(), 1);
        assert_eq!(spec.data[0]["STATEs/UTs"], "Goa");
        let texts: Vec<&str> = spec.settings.ref_values.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["India Average 97", "Target ≥70"]);
    }

    #[test]
    fn superseded_result_is_dropped() {
        let (mut slide, assets, first) = mounted();
        let second = slide.apply(Command::Indicator("SDG 3~MMR".into()), &assets).unwrap().unwrap();
        assert!(!slide.complete_load(first.ticket, Ok(IndicatorTable::default()), &assets));
        assert_eq!(slide.render(&assets), Rendered::Loading);
        assert!(slide.complete_load(second.ticket, Ok(sdg3()), &assets));
        assert!(slide.render(&assets).graph().is_some());
    }

    #[test]
    fn same_goal_does_not_refetch() {
        let (mut slide, assets, _) = mounted();
        let req = slide.apply(Command::Indicator("MMR".into()), &assets).unwrap().unwrap();
        slide.complete_load(req.ticket, Ok(sdg3()), &assets);
        assert!(slide.apply(Command::Indicator("Immunisation".into()), &assets).unwrap().is_none());
        assert!(slide.apply(Command::Year("2023–24".into()), &assets).unwrap().is_none());
    }

    #[test]
    fn map_keeps_national_row_but_not_target() {
        let (mut slide, assets, _) = mounted();
        let req = slide.apply(Command::Indicator("MMR".into()), &assets).unwrap().unwrap();
        slide.complete_load(req.ticket, Ok(sdg3()), &assets);
        slide.apply(Command::View(View::Map), &assets).unwrap();
        let rendered = slide.render(&assets);
        let spec = rendered.graph().expect("graph");
        let regions: Vec<&str> = spec.data.iter().filter_map(|r| r["STATEs/UTs"].as_str()).collect();
        assert_eq!(regions, vec!["India", "Goa"]);
    }

    #[test]
    fn failure_is_visible() {
        let (mut slide, assets, req) = mounted();
        let err = DashboardError::EmptyFile("SDG 1.csv".into());
        assert!(slide.complete_load(req.ticket, Err(err), &assets));
        match slide.render(&assets) {
            Rendered::Failed { message } => assert!(message.contains("SDG 1.csv")),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn missing_year_shows_message() {
        let (mut slide, assets, _) = mounted();
        let req = slide.apply(Command::Indicator("MMR".into()), &assets).unwrap().unwrap();
        slide.complete_load(req.ticket, Ok(sdg3()), &assets);
        slide.apply(Command::Year("2018".into()), &assets).unwrap();
        assert_eq!(
            slide.render(&assets),
            Rendered::NoData {
                message: "No data available for MMR for 2018".into()
            }
        );
    }

    #[test]
    fn table_view_follows_goal_selector() {
        let (mut slide, assets, _) = mounted();
        slide.apply(Command::Sdg("SDG 3".into()), &assets).unwrap();
        let req = slide.apply(Command::View(View::Table), &assets).unwrap().unwrap();
        assert_eq!(req.key, "SDG 3");
        slide.complete_load(req.ticket, Ok(sdg3()), &assets);
        let rendered = slide.render(&assets);
        let spec = rendered.graph().expect("graph");
        let regions: Vec<&str> = spec.data.iter().filter_map(|r| r["STATEs/UTs"].as_str()).collect();
        assert_eq!(regions, vec!["Target value", "India", "Goa", "Bihar"]);
        assert_eq!(spec.keys(), vec!["STATEs/UTs", "MMR", "Immunisation"]);
    }
}
