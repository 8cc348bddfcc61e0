//! Data layer and slide state for the SDG Index story.
//!
//! Loads the score table, indicator metadata and per-goal indicator files,
//! reshapes them, and turns each slide's selection into a [`render::Rendered`]
//! graph spec for a charting library to draw.

pub mod config;
pub mod constants;
pub mod dataset;
pub mod error;
pub mod gate;
pub mod indicator;
pub mod loader;
pub mod options;
pub mod output;
pub mod render;
pub mod reshape;
pub mod slides;
pub mod story;
pub mod types;
pub mod util;

pub use error::{DashboardError, Result};
