//! Per-slide state machines.
//!
//! Each slide keeps its own selection state and derives its view from the
//! shared, already-loaded [`Assets`] on every render. Nothing is shared
//! between slides.

mod four;
mod one;
mod three;
mod two;

pub use four::IndicatorSlide;
pub use one::OverviewSlide;
pub use three::GoalSlide;
pub use two::ProfileSlide;

use crate::dataset::Assets;
use crate::error::{DashboardError, Result};
use crate::gate::{LoadRequest, Ticket};
use crate::render::Rendered;
use crate::types::{IndicatorTable, OptionItem};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Chart,
    Table,
    Map,
    Trends,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Chart => "chart",
            View::Table => "table",
            View::Map => "map",
            View::Trends => "trends",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chart" => Ok(View::Chart),
            "table" => Ok(View::Table),
            "map" => Ok(View::Map),
            "trends" => Ok(View::Trends),
            other => Err(DashboardError::UnknownOption {
                field: "view",
                value: other.to_string(),
            }),
        }
    }
}

/// A user interaction with a slide's controls.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    View(View),
    Year(String),
    Regions(Vec<String>),
    Sdg(String),
    Indicator(String),
}

pub trait Slide {
    fn index(&self) -> usize;
    fn views(&self) -> &'static [View];
    fn view(&self) -> View;
    /// One-line summary of the current selection.
    fn describe(&self) -> String;

    /// Apply a control change. On error the state is unchanged. Slides that
    /// load data on demand return the load the new state needs.
    fn apply(&mut self, cmd: Command, assets: &Assets) -> Result<Option<LoadRequest>>;

    fn render(&self, assets: &Assets) -> Rendered;

    /// Load needed right after mount, if any.
    fn initial_load(&mut self, _assets: &Assets) -> Option<LoadRequest> {
        None
    }

    /// Deliver the outcome of a [`LoadRequest`]. Returns false when the
    /// result was for a superseded request and got dropped.
    fn complete_load(
        &mut self,
        _ticket: Ticket,
        _result: Result<IndicatorTable>,
        _assets: &Assets,
    ) -> bool {
        false
    }
}

/// Check `view` against the slide's segmented control.
pub(crate) fn check_view(slide: usize, views: &[View], view: View) -> Result<View> {
    if views.contains(&view) {
        Ok(view)
    } else {
        Err(DashboardError::ViewUnavailable {
            slide,
            view: view.to_string(),
        })
    }
}

/// Find an option by value or label, ignoring case.
pub(crate) fn pick(options: &[OptionItem], input: &str, field: &'static str) -> Result<OptionItem> {
    let needle = input.trim();
    options
        .iter()
        .find(|o| o.value.eq_ignore_ascii_case(needle) || o.label.eq_ignore_ascii_case(needle))
        .cloned()
        .ok_or_else(|| DashboardError::UnknownOption {
            field,
            value: needle.to_string(),
        })
}

pub(crate) fn no_control(slide: usize, control: &'static str) -> DashboardError {
    DashboardError::NoSuchControl { slide, control }
}

pub(crate) fn year_of(option: &OptionItem) -> i32 {
    option.value.parse().unwrap_or_default()
}
