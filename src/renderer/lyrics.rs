//! Lyric captions, written vertically along the right edge of the lanes.

use super::segment::SegmentContext;
use super::svg_builder::SvgBuilder;

// ── Lyrics constants ────────────────────────────────────────────────

/// Offset of the caption baseline from its bar line.
const LYRICS_OFFSET_Y: f64 = 16.0;

pub(crate) fn render_lyrics(svg: &mut SvgBuilder, ctx: &SegmentContext) {
    let Some(lyric) = ctx.lyric else {
        return;
    };
    let g = &ctx.options.geometry;
    let x = g.lane_width * g.n_lanes as f64 + g.lane_padding;

    for word in lyric.words.iter().filter(|w| ctx.in_window(w.bar)) {
        let y = ctx.y(word.bar);
        svg.vertical_text(x, y + LYRICS_OFFSET_Y, x, y, &word.text, "lyric-text");
    }
}
