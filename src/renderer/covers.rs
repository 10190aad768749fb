//! Skill overlays: derived cover intervals and their per-segment clipping.

use log::{debug, warn};

use super::segment::SegmentContext;
use super::svg_builder::SvgBuilder;
use crate::config::RenderOptions;
use crate::model::{Bar, CoverRect, Score};
use crate::timemap::TimeModel;

/// How far (in bars) a cover may bleed past the segment edges.
const COVER_MARGIN: (i64, i64) = (1, 5);

/// Three overlays per skill marker: great, perfect and active windows.
pub fn skill_covers(score: &Score, timeline: &dyn TimeModel, options: &RenderOptions) -> Vec<CoverRect> {
    let windows = &options.skill_windows;
    let mut covers = Vec::new();

    for event in score.events.iter().filter(|e| e.text.as_deref() == Some(options.skill_marker.as_str())) {
        let at = |offset: f64| {
            if offset == 0.0 {
                event.bar
            } else {
                timeline.bar_at_elapsed_time(event.bar, offset)
            }
        };
        for (window, class) in [
            (windows.great, "skill-great"),
            (windows.perfect, "skill-perfect"),
            (windows.duration, "skill-duration"),
        ] {
            covers.push(CoverRect {
                bar_from: at(window.0),
                bar_to: at(window.1),
                class: class.to_string(),
            });
        }
        debug!("skill marker at bar {}", event.bar);
    }

    if covers.is_empty() {
        warn!("skill overlays requested but no '{}' marker found", options.skill_marker);
    }
    covers
}

/// Clip `cover` to the segment `[start, stop)` widened by the cover margin.
/// Returns `None` when nothing is left.
pub fn clip_cover(cover: &CoverRect, start: i64, stop: i64) -> Option<(Bar, Bar)> {
    let margin = Bar::new(COVER_MARGIN.0, COVER_MARGIN.1);
    let from = cover.bar_from.max(Bar::from_integer(start) - margin);
    let to = cover.bar_to.min(Bar::from_integer(stop) + margin);
    (from < to).then_some((from, to))
}

pub(crate) fn render_covers(svg: &mut SvgBuilder, ctx: &SegmentContext) {
    let g = &ctx.options.geometry;
    let time_height = g.time_height;
    for cover in ctx.covers {
        let Some((from, to)) = clip_cover(cover, ctx.start, ctx.stop) else {
            continue;
        };
        svg.rect(
            g.lane_padding,
            ctx.y(to),
            g.lane_width * g.n_lanes as f64,
            time_height * ctx.timeline.elapsed_time(from, to),
            &cover.class,
        );
    }
}
