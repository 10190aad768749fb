//! Slide ribbons: a filled double-bezier shape per slide chain.
//!
//! Each pair of consecutive path anchors contributes one cubic to the left
//! rail and one to the right rail. The outline runs down the left rail,
//! across to the end of the right rail and back up it.

use super::bezier::{CubicBezier, Point};
use super::segment::{Layers, SegmentContext};
use crate::error::Result;
use crate::model::*;

/// A relay glyph placed on the ribbon's midline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub x: f64,
    pub y: f64,
    pub critical: bool,
}

/// Geometry of one slide chain within a segment.
#[derive(Debug, Clone)]
pub struct Ribbon {
    pub left: Vec<CubicBezier>,
    pub right: Vec<CubicBezier>,
    pub waypoints: Vec<Waypoint>,
    pub class: &'static str,
}

impl Ribbon {
    /// SVG path data: left rail forward, right rail backward, closed.
    pub fn path_data(&self) -> String {
        let mut d = String::new();
        if let Some(first) = self.left.first() {
            d.push_str(&format!("M{:.1},{:.1}", first.p0.x, first.p0.y));
        }
        for c in &self.left {
            d.push_str(&format!(
                " C{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}",
                c.p1.x, c.p1.y, c.p2.x, c.p2.y, c.p3.x, c.p3.y
            ));
        }
        if let Some(last) = self.right.last() {
            d.push_str(&format!(" L{:.1},{:.1}", last.p3.x, last.p3.y));
        }
        for c in self.right.iter().rev() {
            d.push_str(&format!(
                " C{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}",
                c.p2.x, c.p2.y, c.p1.x, c.p1.y, c.p0.x, c.p0.y
            ));
        }
        d.push_str(" Z");
        d
    }
}

fn ribbon_class(start: &Note, decoration: bool) -> &'static str {
    match (decoration, start.critical) {
        (true, true) => "decoration-critical",
        (true, false) => "decoration",
        (false, true) => "slide-critical",
        (false, false) => "slide",
    }
}

/// Build the ribbon for `chain`. Each relay closes a span and is also drawn
/// as a waypoint on the midline; invisible anchors are skipped.
pub(crate) fn build_ribbon(ctx: &SegmentContext, chain: &SlideChain) -> Result<Ribbon> {
    let notes = &ctx.score.notes;
    let members: Vec<&Note> = chain.members.iter().filter_map(|&i| notes.get(i)).collect();

    let Some((&start, rest)) = members.split_first() else {
        return Ok(Ribbon { left: Vec::new(), right: Vec::new(), waypoints: Vec::new(), class: "slide" });
    };
    let decoration = start.slide().is_some_and(|s| s.decoration);
    let padding = if decoration { 0.0 } else { ctx.options.geometry.slide_path_padding };

    let mut ribbon = Ribbon {
        left: Vec::new(),
        right: Vec::new(),
        waypoints: Vec::new(),
        class: ribbon_class(start, decoration),
    };

    let mut from = start;
    let mut relays: Vec<&Note> = Vec::new();
    for &note in rest {
        if note.slide().is_some_and(|s| s.role == SlideRole::Relay) {
            relays.push(note);
        }
        if !note.is_path() {
            continue;
        }

        let (left, right) = rails(ctx, from, note, padding);
        for relay in relays.drain(..) {
            let y = ctx.y(relay.bar);
            let x = (left.solve_x(y)? + right.solve_x(y)?) / 2.0;
            ribbon.waypoints.push(Waypoint { x, y, critical: relay.critical });
        }
        ribbon.left.push(left);
        ribbon.right.push(right);

        from = note;
        if note.slide().is_some_and(|s| s.role == SlideRole::End) {
            break;
        }
    }

    Ok(ribbon)
}

/// Left and right rails between two path anchors. The ease of the span is
/// set by the first anchor's directional hint.
fn rails(ctx: &SegmentContext, from: &Note, to: &Note, padding: f64) -> (CubicBezier, CubicBezier) {
    let g = &ctx.options.geometry;
    let y0 = ctx.y(from.bar);
    let y1 = ctx.y(to.bar);
    let mid = (y0 + y1) / 2.0;

    let hint = from.slide().and_then(|s| s.directional);
    let ease_in = hint == Some(Direction::Down);
    let ease_out = matches!(hint, Some(Direction::LowerLeft | Direction::LowerRight));
    let c1y = if ease_in { mid } else { y0 };
    let c2y = if ease_out { mid } else { y1 };

    let rail = |x0: f64, x1: f64| CubicBezier {
        p0: Point::new(x0, y0),
        p1: Point::new(x0, c1y),
        p2: Point::new(x1, c2y),
        p3: Point::new(x1, y1),
    };

    let left = rail(
        g.lane_x(from.lane as f64) - padding,
        g.lane_x(to.lane as f64) - padding,
    );
    let right = rail(
        g.lane_x((from.lane + from.width) as f64) + padding,
        g.lane_x((to.lane + to.width) as f64) + padding,
    );
    (left, right)
}

pub(crate) fn render_ribbon(layers: &mut Layers, ctx: &SegmentContext, ribbon: &Ribbon) {
    layers.slides.path(&ribbon.path_data(), ribbon.class);

    let size = ctx.options.geometry.lane_width;
    for waypoint in &ribbon.waypoints {
        let href = format!(
            "{}/notes_long_among{}.png",
            ctx.options.note_host,
            if waypoint.critical { "_crtcl" } else { "" }
        );
        layers.among.image(&href, waypoint.x - size / 2.0, waypoint.y - size / 2.0, size, size);
    }
}
