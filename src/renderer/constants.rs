//! Shared constants for the chart renderer (all in SVG user units).

// ── Lanes ───────────────────────────────────────────────────────────
pub const N_LANES: i32 = 12;
pub const LANE_WIDTH: f64 = 16.0;
/// Lane number of the playfield's left edge
pub const LANE_OFFSET: f64 = 2.0;

// ── Time axis ───────────────────────────────────────────────────────
pub const TIME_HEIGHT: f64 = 360.0; // pixels per second

// ── Note dimensions ─────────────────────────────────────────────────
pub const NOTE_SIZE: f64 = 16.0;
pub const FLICK_HEIGHT: f64 = 24.0;
pub const FLICK_MAX_WIDTH: i32 = 6;
pub const FLICK_SIZE_EXPONENT: f64 = 0.75;

// ── Paddings ────────────────────────────────────────────────────────
pub const LANE_PADDING: f64 = 40.0;
pub const TIME_PADDING: f64 = 32.0;
pub const SLIDE_PATH_PADDING: f64 = -1.0;
pub const META_SIZE: f64 = 192.0;

// ── Tick column ─────────────────────────────────────────────────────
pub const TICK_LENGTH: f64 = 24.0;
pub const TICK_2_LENGTH: f64 = 8.0;
pub const TICK_MAX_DENOMINATOR: i64 = 100;

// ── Note sprite sheet ───────────────────────────────────────────────
pub(crate) const NOTE_SPRITE_COUNT: u8 = 7;
pub(crate) const NOTE_SPRITE_WIDTH: f64 = 112.0;
pub(crate) const NOTE_SPRITE_HEIGHT: f64 = 56.0;
pub(crate) const NOTE_SPRITE_BLEED: f64 = 3.0;
/// Horizontal stretch of the middle slice symbol
pub(crate) const NOTE_MIDDLE_RATIO: f64 = 1200.0;

// ── Skill overlays ──────────────────────────────────────────────────
pub const SKILL_DURATION: f64 = 5.0; // seconds
pub const DEFAULT_SKILL_MARKER: &str = "SKILL";

// ── Assets & credits ────────────────────────────────────────────────
pub const DEFAULT_NOTE_HOST: &str = "https://asset3.pjsekai.moe/live/note/custom01";
pub const DEFAULT_JACKET_PLACEHOLDER: &str =
    "https://storage.sekai.best/sekai-jp-assets/thumbnail/chara_rip/res009_no021_normal.png";
pub const DEFAULT_CREDIT: &str = "Chart rendered by chartlib";
