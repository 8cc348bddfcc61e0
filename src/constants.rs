use crate::types::{Bucket, OptionItem};
use once_cell::sync::Lazy;

/// Column holding the overall index score.
pub const COMPOSITE: &str = "Comp. Score";
/// National aggregate; pinned first in region lists.
pub const NATIONAL: &str = "India";
/// Reference scenario row. Shown in data, never offered as a selection.
pub const TARGET: &str = "Target";
/// Display name of the annotated target row in indicator tables.
pub const TARGET_VALUE: &str = "Target value";

/// Years strictly before this use the pre-reorganisation boundary file.
pub const BOUNDARY_CUTOFF_YEAR: i32 = 2020;

pub const MAP_NO_DATA_COLOR: &str = "#D4D6D8";
pub const REF_LINE_COLOR: &str = "#000000";

pub const GENERAL_NOTE: &str =
    "From 2020, Dadra and Nagar Haveli and Daman and Diu were merged into one Union Territory.";

pub const TRENDS_NOTE: &str =
    "Colors are assigned based on the latest available SDG Index data.";

pub const TOOLTIP_HEADER: &str =
    "<div class=\"font-bold p-2 bg-primary-gray-300 uppercase text-xs\">";

/// Goal selector entries in display order, composite last.
pub static SDG_OPTIONS: Lazy<Vec<OptionItem>> = Lazy::new(|| {
    [
        ("SDG 1", "No Poverty"),
        ("SDG 2", "Zero Hunger"),
        ("SDG 3", "Good Health and Well-being"),
        ("SDG 4", "Quality Education"),
        ("SDG 5", "Gender Equality"),
        ("SDG 6", "Clean Water and Sanitation"),
        ("SDG 7", "Affordable and Clean Energy"),
        ("SDG 8", "Decent Work and Economic Growth"),
        ("SDG 9", "Industry, Innovation and Infrastructure"),
        ("SDG 10", "Reduced Inequalities"),
        ("SDG 11", "Sustainable Cities and Communities"),
        ("SDG 12", "Responsible Consumption and Production"),
        ("SDG 13", "Climate Action"),
        ("SDG 14", "Life Below Water"),
        ("SDG 15", "Life on Land"),
        ("SDG 16", "Peace, Justice and Strong Institutions"),
        ("SDG 17", "Partnerships for the Goals"),
    ]
    .iter()
    .map(|(id, title)| OptionItem::new(format!("{} – {}", id, title), *id))
    .chain(std::iter::once(OptionItem::new("Composite Score", COMPOSITE)))
    .collect()
});

/// Ordered colour scale shared by every categorical view, lowest band first.
pub static COLOR_MAP: Lazy<Vec<(Bucket, &'static str)>> = Lazy::new(|| {
    Bucket::RANKED
        .into_iter()
        .zip(["#CB364B", "#F6C646", "#479E85", "#4EABE9"])
        .collect()
});

pub fn sdg_ids() -> Vec<String> {
    SDG_OPTIONS.iter().map(|o| o.value.clone()).collect()
}
