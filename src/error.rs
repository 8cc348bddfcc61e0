use thiserror::Error;

/// Everything that can go wrong while loading assets or driving a slide.
///
/// Missing cells inside a table are not errors; they travel as `None`.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{path}: missing required column `{column}`")]
    MissingColumn { path: String, column: String },

    #[error("{0}: file contains no data rows")]
    EmptyFile(String),

    #[error("unknown {field} `{value}`")]
    UnknownOption { field: &'static str, value: String },

    #[error("slide {slide} has no {control} selector")]
    NoSuchControl { slide: usize, control: &'static str },

    #[error("view `{view}` is not available on slide {slide}")]
    ViewUnavailable { slide: usize, view: String },
}

pub type Result<T> = std::result::Result<T, DashboardError>;
