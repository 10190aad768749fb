//! Render options.
//!
//! Every value has a default taken from `renderer::constants`, so an empty
//! JSON object (or `RenderOptions::default()`) renders a standard chart.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::renderer::constants::*;

/// Knobs for one render run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Base URI of the note sprites (`notes_0.png`, `notes_flick_arrow_01.png`, …)
    pub note_host: String,
    /// Extra CSS appended after the embedded stylesheet
    pub style_sheet: String,
    /// Draw skill activation windows
    pub skill: bool,
    /// Event text marking a skill activation
    pub skill_marker: String,
    pub skill_windows: SkillWindows,
    /// Image shown when the score has no jacket
    pub jacket_placeholder: String,
    /// Trailing credit on the subtitle line
    pub credit: String,
    /// Small right-aligned line in the footer band; empty leaves it out
    pub theme_hint: String,
    pub geometry: Geometry,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            note_host: DEFAULT_NOTE_HOST.to_string(),
            style_sheet: String::new(),
            skill: false,
            skill_marker: DEFAULT_SKILL_MARKER.to_string(),
            skill_windows: SkillWindows::default(),
            jacket_placeholder: DEFAULT_JACKET_PLACEHOLDER.to_string(),
            credit: DEFAULT_CREDIT.to_string(),
            theme_hint: String::new(),
            geometry: Geometry::default(),
        }
    }
}

impl RenderOptions {
    /// Parse options from JSON; missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Wall-clock offsets (seconds, relative to the marker) of the three skill overlays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillWindows {
    pub great: (f64, f64),
    pub perfect: (f64, f64),
    pub duration: (f64, f64),
}

impl Default for SkillWindows {
    fn default() -> Self {
        Self {
            great: (-5.0 / 60.0, SKILL_DURATION + 5.0 / 60.0),
            perfect: (-2.5 / 60.0, SKILL_DURATION + 2.5 / 60.0),
            duration: (0.0, SKILL_DURATION),
        }
    }
}

/// Lane and time geometry, in SVG user units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Geometry {
    pub n_lanes: i32,
    pub lane_width: f64,
    /// Pixels per second of chart time
    pub time_height: f64,
    pub note_size: f64,
    pub flick_height: f64,
    pub lane_padding: f64,
    pub time_padding: f64,
    /// Lateral inset of judged ribbons (negative pulls the rails inward)
    pub slide_path_padding: f64,
    pub meta_size: f64,
    pub tick_length: f64,
    pub tick_2_length: f64,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            n_lanes: N_LANES,
            lane_width: LANE_WIDTH,
            time_height: TIME_HEIGHT,
            note_size: NOTE_SIZE,
            flick_height: FLICK_HEIGHT,
            lane_padding: LANE_PADDING,
            time_padding: TIME_PADDING,
            slide_path_padding: SLIDE_PATH_PADDING,
            meta_size: META_SIZE,
            tick_length: TICK_LENGTH,
            tick_2_length: TICK_2_LENGTH,
        }
    }
}

impl Geometry {
    /// Width of one segment including both lane paddings.
    pub fn segment_width(&self) -> f64 {
        self.lane_width * self.n_lanes as f64 + self.lane_padding * 2.0
    }

    /// Left edge of lane `lane` (playfield lanes are numbered from `LANE_OFFSET`).
    pub fn lane_x(&self, lane: f64) -> f64 {
        self.lane_width * (lane - LANE_OFFSET) + self.lane_padding
    }
}
