//! Chart renderer — converts a Score into a paginated SVG document.
//!
//! The chart is cut into sentences (segments) of a few bars each. Every
//! segment is rendered as an independent sub-document, and the segments are
//! then laid out left to right above a footer carrying the jacket and title.

pub mod constants;
mod bezier;
mod covers;
mod defs;
mod lyrics;
mod notes;
mod pagination;
mod segment;
mod slides;
mod svg_builder;
mod ticks;

use log::info;

use crate::config::RenderOptions;
use crate::error::{ChartError, Result};
use crate::model::*;
use crate::timemap::{TimeModel, Timeline};
use defs::add_defs;
use segment::{render_segment, SegmentContext};
use svg_builder::SvgBuilder;

pub use bezier::{CubicBezier, Point};
pub use covers::{clip_cover, skill_covers};
pub use notes::{flick_arrow, flick_size, glyph_family, FlickArrow, NoteFamily};
pub use pagination::{bar_events, segment_bars};
pub use slides::{Ribbon, Waypoint};
pub use ticks::{label_interval, TickLabel};

// ═══════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════

/// Render a whole chart into one SVG document, timed by the score's own events.
pub fn render_chart_to_svg(score: &Score, lyric: Option<&Lyric>, options: &RenderOptions) -> Result<String> {
    let timeline = Timeline::from_score(score);
    render_chart_with_time_model(score, lyric, options, &timeline)
}

/// Render a whole chart using a caller-supplied time model.
pub fn render_chart_with_time_model(
    score: &Score,
    lyric: Option<&Lyric>,
    options: &RenderOptions,
    timeline: &dyn TimeModel,
) -> Result<String> {
    score.validate()?;
    let last_bar = score.last_bar()?;

    let covers = if options.skill {
        skill_covers(score, timeline, options)
    } else {
        Vec::new()
    };

    // Segments are independent; results are collected in chart order.
    let segments = segment_bars(timeline, last_bar)
        .into_iter()
        .map(|range| {
            let ctx = SegmentContext {
                score,
                lyric,
                options,
                timeline,
                covers: &covers,
                start: range.start,
                stop: range.end,
            };
            render_segment(&ctx)
        })
        .collect::<Result<Vec<SvgBuilder>>>()?;

    let svg = compose(score, options, segments);
    info!("rendered {} bars into {} bytes of SVG", last_bar, svg.len());
    Ok(svg)
}

/// Render the bar range `[start, stop)` as a stand-alone segment document.
pub fn render_bars_to_svg(
    score: &Score,
    lyric: Option<&Lyric>,
    options: &RenderOptions,
    start: i64,
    stop: i64,
) -> Result<String> {
    if stop <= start {
        return Err(ChartError::InvalidRange { start, stop });
    }
    score.validate()?;

    let timeline = Timeline::from_score(score);
    let covers = if options.skill {
        skill_covers(score, &timeline, options)
    } else {
        Vec::new()
    };
    let ctx = SegmentContext {
        score,
        lyric,
        options,
        timeline: &timeline,
        covers: &covers,
        start,
        stop,
    };

    let body = render_segment(&ctx)?;
    let mut svg = SvgBuilder::new(body.width(), body.height());
    add_defs(&mut svg, options);
    svg.elements.extend(body.elements);
    Ok(svg.build())
}

// ═══════════════════════════════════════════════════════════════════════
// Composition
// ═══════════════════════════════════════════════════════════════════════

/// Lay the segments out side by side, bottom-aligned, above the footer band.
fn compose(score: &Score, options: &RenderOptions, segments: Vec<SvgBuilder>) -> String {
    let g = &options.geometry;
    let width: f64 = segments.iter().map(|s| s.width()).sum();
    let height = segments.iter().map(|s| s.height()).fold(0.0f64, f64::max);

    let doc_width = width + g.lane_padding * 2.0;
    let body_height = height + g.time_padding * 2.0;
    let doc_height = body_height + g.meta_size + g.time_padding * 2.0;

    let mut svg = SvgBuilder::new(doc_width, doc_height);
    add_defs(&mut svg, options);

    svg.rect(0.0, 0.0, doc_width, body_height, "background");
    svg.rect(0.0, body_height, doc_width, g.meta_size + g.time_padding * 2.0, "meta");
    svg.line(0.0, body_height, doc_width, body_height, "meta-line");

    render_footer(&mut svg, score, options, doc_width, height);

    let mut x = g.lane_padding;
    for segment in segments {
        let y = height - segment.height() + g.time_padding;
        let w = segment.width();
        svg.nest(segment, x, y);
        x += w;
    }

    svg.build()
}

fn render_footer(svg: &mut SvgBuilder, score: &Score, options: &RenderOptions, doc_width: f64, height: f64) {
    let g = &options.geometry;
    let meta = &score.meta;
    let top = height + g.time_padding * 3.0;
    let text_x = g.meta_size + g.lane_padding * 4.0;

    let jacket = meta
        .jacket
        .as_deref()
        .filter(|j| !j.is_empty())
        .unwrap_or(&options.jacket_placeholder);
    svg.image(jacket, g.lane_padding * 2.0, top, g.meta_size, g.meta_size);

    svg.text(text_x, top + g.meta_size - 16.0, &title_line(meta), "title");
    svg.text(text_x, top + g.meta_size / 3.0 - 8.0, &subtitle_line(meta, &options.credit), "subtitle");

    if !options.theme_hint.is_empty() {
        svg.text(doc_width - g.lane_padding, height + g.lane_padding * 4.2, &options.theme_hint, "themehint");
    }
}

/// `title - artist`, or `Untitled` when both are missing.
pub(crate) fn title_line(meta: &Meta) -> String {
    let parts: Vec<&str> = [meta.title.as_deref(), meta.artist.as_deref()]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect();
    if parts.is_empty() {
        "Untitled".to_string()
    } else {
        parts.join(" - ")
    }
}

/// `DIFFICULTY level credit`, skipping missing parts.
pub(crate) fn subtitle_line(meta: &Meta, credit: &str) -> String {
    let difficulty = meta.difficulty.as_deref().map(str::to_uppercase);
    [difficulty.as_deref(), meta.playlevel.as_deref(), Some(credit)]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
