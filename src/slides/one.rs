use super::{check_view, no_control, pick, year_of, Command, Slide, View};
use crate::constants::{sdg_ids, GENERAL_NOTE};
use crate::dataset::Assets;
use crate::error::Result;
use crate::gate::LoadRequest;
use crate::render::{
    long_record, role, tooltip, wide_record, GraphSettings, GraphSpec, GraphType, Rendered,
    TableColumn,
};
use crate::types::OptionItem;

const VIEWS: &[View] = &[View::Chart, View::Table];

/// Every region against every goal for one year.
#[derive(Debug, Clone)]
pub struct OverviewSlide {
    year: OptionItem,
    view: View,
}

impl OverviewSlide {
    pub fn new(assets: &Assets) -> Self {
        OverviewSlide {
            year: assets.data.latest_year_option().cloned().unwrap_or_else(|| OptionItem::new("", "0")),
            view: View::Chart,
        }
    }

    fn title(&self) -> String {
        format!("Performance of States and UTs on SDGs ({})", self.year.label)
    }

    fn heat_map(&self, assets: &Assets) -> Rendered {
        let year = year_of(&self.year);
        let goals = sdg_ids();
        let data: Vec<_> = assets
            .data
            .long
            .iter()
            .filter(|r| r.year == year && goals.contains(&r.indicator))
            .map(long_record)
            .collect();
        if data.is_empty() {
            return Rendered::no_data("SDG scores", &self.year.label);
        }
        Rendered::Graph(GraphSpec {
            graph_id: "slide-1-chart".into(),
            graph_type: GraphType::HeatMap,
            title: self.title(),
            data,
            data_configuration: vec![role("area", "row"), role("group", "value"), role("sdg", "column")],
            settings: GraphSettings {
                foot_note: Some(format!("Note: {}", GENERAL_NOTE)),
                tooltip: Some(tooltip("{{row}} ({{data.year}})", "{{column}}", "{{data.value}}")),
                ..GraphSettings::categorical()
            },
        })
    }

    fn table(&self, assets: &Assets) -> Rendered {
        let year = year_of(&self.year);
        let data: Vec<_> = assets
            .data
            .wide
            .iter()
            .filter(|r| r.year == year)
            .map(|r| wide_record(r, &assets.data.indicators))
            .collect();
        if data.is_empty() {
            return Rendered::no_data("SDG scores", &self.year.label);
        }
        let mut columns = vec![TableColumn::new("States/UTs", "area")];
        columns.extend(
            sdg_ids()
                .into_iter()
                .filter(|id| assets.data.indicators.contains(id))
                .map(|id| TableColumn::new(id.clone(), id).sortable()),
        );
        Rendered::Graph(GraphSpec {
            graph_id: "slide-1-table".into(),
            graph_type: GraphType::DataTable,
            title: self.title(),
            data,
            data_configuration: Vec::new(),
            settings: GraphSettings {
                column_data: columns,
                ..GraphSettings::default()
            },
        })
    }
}

impl Slide for OverviewSlide {
    fn index(&self) -> usize {
        1
    }

    fn views(&self) -> &'static [View] {
        VIEWS
    }

    fn view(&self) -> View {
        self.view
    }

    fn describe(&self) -> String {
        format!("year {} | view {}", self.year.label, self.view)
    }

    fn apply(&mut self, cmd: Command, assets: &Assets) -> Result<Option<LoadRequest>> {
        match cmd {
            Command::View(v) => self.view = check_view(1, VIEWS, v)?,
            Command::Year(y) => self.year = pick(&assets.data.year_options, &y, "year")?,
            Command::Regions(_) => return Err(no_control(1, "region")),
            Command::Sdg(_) => return Err(no_control(1, "SDG")),
            Command::Indicator(_) => return Err(no_control(1, "indicator")),
        }
        Ok(None)
    }

    fn render(&self, assets: &Assets) -> Rendered {
        match self.view {
            View::Table => self.table(assets),
            _ => self.heat_map(assets),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slides::fixtures;

    #[test]
    fn opens_on_latest_year_heat_map() {
        let assets = fixtures::assets();
        let slide = OverviewSlide::new(&assets);
        let spec = slide.render(&assets);
        let spec = spec.graph().expect("graph");
        assert_eq!(spec.graph_type, GraphType::HeatMap);
        // five regions in 2024, three indicators each
        assert_eq!(spec.data.len(), 15);
        assert!(spec.data.iter().all(|r| r["yearFormatted"] == 2024));
        assert_eq!(spec.settings.color_domain[0], "Aspirant (0–49)");
    }

    #[test]
    fn table_carries_group_columns() {
        let assets = fixtures::assets();
        let mut slide = OverviewSlide::new(&assets);
        slide.apply(Command::View(View::Table), &assets).unwrap();
        slide.apply(Command::Year("2018".into()), &assets).unwrap();
        let rendered = slide.render(&assets);
        let spec = rendered.graph().expect("graph");
        assert_eq!(spec.data.len(), 3);
        assert_eq!(spec.data[1]["SDG 1 Group"], "Aspirant (0–49)");
        assert_eq!(spec.keys(), vec!["area", "SDG 1", "SDG 3", "Comp. Score"]);
    }

    #[test]
    fn rejects_unavailable_view_and_keeps_state() {
        let assets = fixtures::assets();
        let mut slide = OverviewSlide::new(&assets);
        assert!(slide.apply(Command::View(View::Map), &assets).is_err());
        assert!(slide.apply(Command::Regions(vec![]), &assets).is_err());
        assert_eq!(slide.view(), View::Chart);
    }
}
