//! chartlib — rhythm-game chart layout and SVG rendering library.
//!
//! Takes a fully-resolved chart (notes on rational bar positions, slide
//! chains, tempo/section events, optional lyrics) and lays it out as a
//! printable SVG: the chart is cut into short vertical sentences placed side
//! by side above a title footer.
//!
//! # Example
//! ```no_run
//! use chartlib::{parse_file, render_chart_to_svg, RenderOptions};
//!
//! let score = parse_file("path/to/chart.json").unwrap();
//! let svg = render_chart_to_svg(&score, None, &RenderOptions::default()).unwrap();
//! println!("{} bytes", svg.len());
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod renderer;
pub mod timemap;

use std::path::Path;

pub use config::{Geometry, RenderOptions, SkillWindows};
pub use error::{ChartError, Result};
pub use model::*;
pub use parser::{parse_lyric_json, parse_score_json};
pub use renderer::{render_bars_to_svg, render_chart_to_svg, render_chart_with_time_model};
pub use timemap::{TimeModel, Timeline};

fn read_to_string(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| ChartError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a chart from a JSON file.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Score> {
    parse_score_json(&read_to_string(path.as_ref())?)
}

/// Load lyrics from a JSON file.
pub fn parse_lyric_file<P: AsRef<Path>>(path: P) -> Result<Lyric> {
    parse_lyric_json(&read_to_string(path.as_ref())?)
}

/// Convert a score to a JSON string.
pub fn score_to_json(score: &Score) -> Result<String> {
    Ok(serde_json::to_string_pretty(score)?)
}

/// Load a chart (and optionally its lyrics) from disk and render it to SVG.
/// Convenience function combining loading and rendering.
pub fn render_file_to_svg<P: AsRef<Path>>(
    path: P,
    lyric_path: Option<P>,
    options: &RenderOptions,
) -> Result<String> {
    let score = parse_file(path)?;
    let lyric = lyric_path.map(parse_lyric_file).transpose()?;
    render_chart_to_svg(&score, lyric.as_ref(), options)
}
