//! Note glyphs: family selection, note bodies, friction marks and flick arrows.

use super::constants::*;
use super::defs::note_symbol_id;
use super::segment::{Layers, SegmentContext};
use crate::model::*;

/// Visual family of a note body. Each maps to one sprite of the note sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteFamily {
    Critical,
    SlideBody,
    Plain,
    FlickEnd,
    TracePlain,
    TraceCritical,
    TraceFlick,
}

impl NoteFamily {
    pub fn sprite(self) -> u8 {
        match self {
            NoteFamily::Critical => 0,
            NoteFamily::SlideBody => 1,
            NoteFamily::Plain => 2,
            NoteFamily::FlickEnd => 3,
            NoteFamily::TracePlain => 4,
            NoteFamily::TraceCritical => 5,
            NoteFamily::TraceFlick => 6,
        }
    }
}

/// Pick the body glyph; first matching rule wins. Hidden notes have none.
pub fn glyph_family(note: &Note) -> Option<NoteFamily> {
    let family = match &note.kind {
        NoteKind::Hidden => return None,
        _ if note.trace && note.critical => NoteFamily::TraceCritical,
        NoteKind::Directional { .. } if note.trace => NoteFamily::TraceFlick,
        _ if note.trace => NoteFamily::TracePlain,
        _ if note.critical => NoteFamily::Critical,
        NoteKind::Directional { .. } => NoteFamily::FlickEnd,
        NoteKind::Slide(anchor) if anchor.role == SlideRole::End && anchor.directional.is_some() => {
            NoteFamily::FlickEnd
        }
        NoteKind::Slide(_) => NoteFamily::SlideBody,
        NoteKind::Tap => NoteFamily::Plain,
    };
    Some(family)
}

/// Arrow orientation of a flick glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlickArrow {
    Up,
    UpperLeft,
    UpperRight,
}

/// Arrow for a flick note or a slide anchor carrying a flick.
///
/// Flick notes always get an arrow (non-diagonal directions read as up);
/// slide anchors only when their attached directional points upward.
pub fn flick_arrow(note: &Note) -> Option<FlickArrow> {
    match &note.kind {
        NoteKind::Directional { direction } => Some(match direction {
            Direction::UpperLeft => FlickArrow::UpperLeft,
            Direction::UpperRight => FlickArrow::UpperRight,
            _ => FlickArrow::Up,
        }),
        NoteKind::Slide(anchor) => match anchor.directional? {
            Direction::Up => Some(FlickArrow::Up),
            Direction::UpperLeft => Some(FlickArrow::UpperLeft),
            Direction::UpperRight => Some(FlickArrow::UpperRight),
            _ => None,
        },
        _ => None,
    }
}

/// Arrow sprite size `(width, height)` for a note `width` lanes wide.
pub fn flick_size(width: i32, flick_height: f64) -> (f64, f64) {
    let w = width.min(FLICK_MAX_WIDTH) as f64;
    let h = flick_height * ((w + 3.0) / 3.0).powf(FLICK_SIZE_EXPONENT);
    let arrow_w = flick_height * 1.5 * ((w + 0.5) / 3.0).powf(FLICK_SIZE_EXPONENT);
    (arrow_w, h)
}

pub(crate) fn render_note_image(layers: &mut Layers, ctx: &SegmentContext, note: &Note) {
    let Some(family) = glyph_family(note) else {
        return;
    };
    if note.trace {
        render_friction_mark(layers, ctx, note);
    }

    let g = &ctx.options.geometry;
    let y = ctx.y(note.bar);
    let x = g.lane_x(note.lane as f64 - 0.5);
    let w = g.lane_width * (note.width + 1) as f64;
    let h = g.lane_width / 64.0 * 56.0 * 2.0;

    let id = note_symbol_id(family.sprite(), note.width, g.n_lanes);
    layers.notes.use_symbol(&id, x, y - h / 2.0, w, h);
}

/// Small diamond marking the contact point of a trace note.
fn render_friction_mark(layers: &mut Layers, ctx: &SegmentContext, note: &Note) {
    let g = &ctx.options.geometry;
    let y = ctx.y(note.bar);
    let x = g.lane_x(note.lane as f64 + note.width as f64 / 2.0);
    let size = g.lane_width * 0.75;

    let variant = if note.critical {
        "_crtcl"
    } else if note.is_flick() {
        "_flick"
    } else {
        "_long"
    };
    let href = format!("{}/notes_friction_among{}.png", ctx.options.note_host, variant);
    layers.among.image(&href, x - size / 2.0, y - size / 2.0, size, size);
}

pub(crate) fn render_flick(layers: &mut Layers, ctx: &SegmentContext, note: &Note) {
    let Some(arrow) = flick_arrow(note) else {
        return;
    };
    let g = &ctx.options.geometry;
    let y = ctx.y(note.bar);
    let width = note.width.min(FLICK_MAX_WIDTH);
    let (w, h) = flick_size(note.width, g.flick_height);
    let x = g.lane_x(note.lane as f64 + note.width as f64 / 2.0);

    let bias = match arrow {
        FlickArrow::UpperLeft => -g.note_size / 4.0,
        FlickArrow::UpperRight => g.note_size / 4.0,
        FlickArrow::Up => 0.0,
    };
    let href = format!(
        "{}/notes_flick_arrow{}_0{}{}.png",
        ctx.options.note_host,
        if note.critical { "_crtcl" } else { "" },
        width,
        if arrow == FlickArrow::Up { "" } else { "_diagonal" },
    );

    let left = x - w / 2.0 + bias;
    let top = y + g.note_size / 4.0 - h;
    if arrow == FlickArrow::UpperRight {
        // One diagonal sprite serves both sides.
        layers.flicks.mirrored_image(&href, left, top, w, h, x + bias);
    } else {
        layers.flicks.image(&href, left, top, w, h);
    }
}
