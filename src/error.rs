//! Error types for chart rendering.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can stop a render.
///
/// Missing optional data (lyrics, jacket, skill markers) is never an error;
/// the corresponding feature is simply left out of the document.
#[derive(Debug, Error)]
pub enum ChartError {
    /// The score has no notes, so there is no last bar to lay out against.
    #[error("chart has no notes")]
    EmptyChart,

    /// Notes must be stored in ascending bar order.
    #[error("note {index} at bar {bar} comes before the previous note")]
    NotesOutOfOrder { index: usize, bar: String },

    /// A slide chain is missing its START/END anchor or is not bar-ordered.
    #[error("slide chain {chain} is malformed: {reason}")]
    MalformedSlide { chain: usize, reason: String },

    /// The inverse-bezier solver was handed a curve that doubles back
    /// vertically. Indicates a ribbon-construction bug, not bad input.
    #[error("curve is not monotonic around y = {y:.2}")]
    CurveNotMonotonic { y: f64 },

    /// A tempo or bar-length event that would stop or reverse time.
    #[error("event at bar {bar} is invalid: {reason}")]
    InvalidEvent { bar: String, reason: String },

    /// A bar range with `stop <= start`.
    #[error("invalid bar range {start}..{stop}")]
    InvalidRange { start: i64, stop: i64 },

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading an input file failed.
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for chart operations
pub type Result<T> = std::result::Result<T, ChartError>;
