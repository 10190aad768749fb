//! Segment ("sentence") rendering: one bounded bar range as a sub-document.
//!
//! Time runs upward: the segment's last bar sits near the top edge and
//! earlier bars lie further down.

use log::debug;

use super::covers::render_covers;
use super::lyrics::render_lyrics;
use super::notes::{render_flick, render_note_image};
use super::slides::{build_ribbon, render_ribbon};
use super::svg_builder::{format_number, SvgBuilder};
use super::ticks::render_tick;
use crate::config::RenderOptions;
use crate::error::Result;
use crate::model::*;
use crate::timemap::TimeModel;

/// Events closer than this (in bars) share one annotation.
const EVENT_MERGE_DISTANCE: (i64, i64) = (1, 16);

/// Everything a segment needs, borrowed from the run.
pub(crate) struct SegmentContext<'a> {
    pub(crate) score: &'a Score,
    pub(crate) lyric: Option<&'a Lyric>,
    pub(crate) options: &'a RenderOptions,
    pub(crate) timeline: &'a dyn TimeModel,
    pub(crate) covers: &'a [CoverRect],
    pub(crate) start: i64,
    pub(crate) stop: i64,
}

impl SegmentContext<'_> {
    pub(crate) fn start_bar(&self) -> Bar {
        Bar::from_integer(self.start)
    }

    pub(crate) fn stop_bar(&self) -> Bar {
        Bar::from_integer(self.stop)
    }

    /// Vertical coordinate of `bar`.
    pub(crate) fn y(&self, bar: Bar) -> f64 {
        let g = &self.options.geometry;
        g.time_height * self.timeline.elapsed_time(bar, self.stop_bar()) + g.time_padding
    }

    /// Height of the bar range itself, without paddings.
    pub(crate) fn content_height(&self) -> f64 {
        self.options.geometry.time_height * self.timeline.elapsed_time(self.start_bar(), self.stop_bar())
    }

    /// The lookahead window `[start - 1, stop + 1)`.
    pub(crate) fn in_window(&self, bar: Bar) -> bool {
        let one = Bar::from_integer(1);
        self.start_bar() - one <= bar && bar < self.stop_bar() + one
    }

    /// A chain is drawn when one of its path anchors falls in the window, or
    /// when it starts before the window and continues past it.
    pub(crate) fn chain_in_window(&self, chain: &SlideChain) -> bool {
        let one = Bar::from_integer(1);
        let mut before = false;
        for note in chain.members.iter().filter_map(|&i| self.score.notes.get(i)) {
            if !note.is_path() {
                continue;
            }
            if self.in_window(note.bar) {
                return true;
            } else if note.bar < self.start_bar() - one {
                before = true;
            } else if before && self.stop_bar() + one < note.bar {
                return true;
            }
        }
        false
    }
}

/// Glyph layers, painted in this order after the backdrop.
pub(crate) struct Layers {
    pub(crate) slides: SvgBuilder,
    pub(crate) notes: SvgBuilder,
    pub(crate) among: SvgBuilder,
    pub(crate) flicks: SvgBuilder,
    pub(crate) ticks: SvgBuilder,
}

impl Layers {
    pub(crate) fn new() -> Self {
        Self {
            slides: SvgBuilder::new(0.0, 0.0),
            notes: SvgBuilder::new(0.0, 0.0),
            among: SvgBuilder::new(0.0, 0.0),
            flicks: SvgBuilder::new(0.0, 0.0),
            ticks: SvgBuilder::new(0.0, 0.0),
        }
    }
}

/// Render one segment `[ctx.start, ctx.stop)`.
pub(crate) fn render_segment(ctx: &SegmentContext) -> Result<SvgBuilder> {
    let g = &ctx.options.geometry;
    let height = ctx.content_height();
    let lanes_width = g.lane_width * g.n_lanes as f64;

    let layers = collect_note_layers(ctx)?;

    let mut svg = SvgBuilder::new(g.segment_width(), height + g.time_padding * 2.0);
    let full_height = svg.height();

    svg.rect(0.0, 0.0, g.segment_width(), full_height, "background");
    svg.rect(g.lane_padding, 0.0, lanes_width, full_height, "lane");

    render_covers(&mut svg, ctx);

    for lane in (0..=g.n_lanes).step_by(2) {
        let x = g.lane_width * lane as f64 + g.lane_padding;
        svg.line(x, 0.0, x, full_height, "lane-line");
    }

    render_grid(&mut svg, ctx);
    render_events(&mut svg, ctx);
    render_lyrics(&mut svg, ctx);

    svg.elements.extend(layers.slides.elements);
    svg.elements.extend(layers.notes.elements);
    svg.elements.extend(layers.among.elements);
    // Earlier flicks on top of later ones
    svg.elements.extend(layers.flicks.elements.into_iter().rev());
    svg.elements.extend(layers.ticks.elements);

    Ok(svg)
}

/// Walk the notes once, dispatching each to the glyph layers.
fn collect_note_layers(ctx: &SegmentContext) -> Result<Layers> {
    let notes = &ctx.score.notes;
    let mut layers = Layers::new();
    let mut drawn = 0usize;

    for (i, note) in notes.iter().enumerate() {
        let included = match ctx.score.chain_of(note) {
            Some(chain) => ctx.chain_in_window(chain),
            None => ctx.in_window(note.bar),
        };
        if !included {
            continue;
        }
        drawn += 1;

        render_tick(&mut layers.ticks, ctx, notes, i);

        match &note.kind {
            NoteKind::Tap => render_note_image(&mut layers, ctx, note),
            NoteKind::Hidden => {}
            NoteKind::Directional { .. } => {
                render_flick(&mut layers, ctx, note);
                render_note_image(&mut layers, ctx, note);
            }
            NoteKind::Slide(anchor) => {
                if anchor.role == SlideRole::Start {
                    if let Some(chain) = ctx.score.chains.get(anchor.chain) {
                        let ribbon = build_ribbon(ctx, chain)?;
                        render_ribbon(&mut layers, ctx, &ribbon);
                    }
                }

                if anchor.decoration {
                    if let Some(tap) = anchor.tap {
                        let tap_note = Note {
                            critical: tap.critical,
                            trace: tap.trace,
                            kind: NoteKind::Tap,
                            ..note.clone()
                        };
                        render_note_image(&mut layers, ctx, &tap_note);
                        if anchor.directional.is_some() {
                            render_flick(&mut layers, ctx, note);
                        }
                    }
                } else {
                    match anchor.role {
                        SlideRole::Start => render_note_image(&mut layers, ctx, note),
                        SlideRole::End => {
                            if anchor.directional.is_some() {
                                render_flick(&mut layers, ctx, note);
                            }
                            render_note_image(&mut layers, ctx, note);
                        }
                        // Relays are drawn on the ribbon; invisible anchors are never drawn.
                        SlideRole::Relay | SlideRole::Invisible => {}
                    }
                }
            }
        }
    }

    debug!("segment {}..{}: {} notes in window", ctx.start, ctx.stop, drawn);
    Ok(layers)
}

/// Bar lines and the beat lines implied by each bar's length.
fn render_grid(svg: &mut SvgBuilder, ctx: &SegmentContext) {
    let g = &ctx.options.geometry;
    let left = g.lane_padding;
    let right = g.lane_width * g.n_lanes as f64 + g.lane_padding;

    for bar in ctx.start..=ctx.stop {
        let bar = Bar::from_integer(bar);
        let y = ctx.y(bar);
        svg.line(left, y, right, y, "bar-line");

        let bar_length = ctx.timeline.active_event(bar).bar_length_or_default();
        if bar_length <= Bar::from_integer(0) {
            continue;
        }
        let beats = bar_length.ceil().to_integer();
        for i in 1..beats {
            let y = ctx.y(bar + Bar::from_integer(i) / bar_length);
            svg.line(left, y, right, y, "beat-line");
        }
    }
}

/// Speed markers, event flags and the merged event annotations.
fn render_events(svg: &mut SvgBuilder, ctx: &SegmentContext) {
    let g = &ctx.options.geometry;
    let left = g.lane_padding;
    let right = g.lane_width * g.n_lanes as f64 + g.lane_padding;
    let merge_distance = Bar::new(EVENT_MERGE_DISTANCE.0, EVENT_MERGE_DISTANCE.1);

    let mut events: Vec<Event> = (ctx.start..=ctx.stop).map(|i| Event::at(Bar::from_integer(i))).collect();
    events.extend(ctx.score.events.iter().filter(|e| ctx.in_window(e.bar)).cloned());
    events.sort_by(|a, b| a.bar.cmp(&b.bar));

    let mut print_events: Vec<Event> = Vec::new();
    for event in events {
        let y = ctx.y(event.bar);

        if let Some(speed) = event.speed {
            svg.line(left, y, right, y, "speed-line");
            svg.text(right - 2.0, y - 2.0, &format!("{}x", format_number(speed)), "speed-text");
            continue;
        }

        let class = if event.is_special() { "event-flag" } else { "bar-count-flag" };
        svg.line(0.0, y, g.lane_padding, y, class);

        match print_events.last_mut() {
            Some(last) if event.bar - last.bar <= merge_distance => {
                // The group stays anchored at its first member.
                let bar = last.bar;
                *last = Event { bar, ..std::mem::take(last).merge(&event) };
            }
            _ => print_events.push(event),
        }
    }

    for event in print_events.iter().filter(|e| ctx.in_window(e.bar)) {
        let text = event_label(event);
        if text.is_empty() {
            continue;
        }
        let y = ctx.y(event.bar);
        let class = if event.is_special() { "event-text" } else { "bar-count-text" };
        svg.vertical_text(g.lane_padding + 8.0, y - g.lane_width * 1.5, g.lane_padding, y, &text, class);
    }
}

/// `#bar, N BPM, L/4, section, text` with empty parts left out.
pub(crate) fn event_label(event: &Event) -> String {
    let mut parts: Vec<String> = Vec::new();
    if event.bar.is_integer() {
        parts.push(format!("#{}", event.bar.to_integer()));
    }
    if let Some(bpm) = event.bpm {
        parts.push(format!("{} BPM", format_number(bpm)));
    }
    if let Some(bar_length) = event.bar_length {
        parts.push(format!("{}/4", format_number(bar_f64(bar_length))));
    }
    parts.extend(event.section.iter().filter(|s| !s.is_empty()).cloned());
    parts.extend(event.text.iter().filter(|s| !s.is_empty()).cloned());
    parts.join(", ")
}
