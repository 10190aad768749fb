//! Tick column: subdivision labels between consecutive timed notes.

use super::constants::TICK_MAX_DENOMINATOR;
use super::segment::SegmentContext;
use super::svg_builder::SvgBuilder;
use crate::model::{limit_denominator, Bar, Note, TickClass};

/// A reduced subdivision between a note and its successor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickLabel {
    pub interval: Bar,
    pub text: String,
}

/// Label for the gap from `bar` to `next_bar`, in quarter-note units of a bar
/// `bar_length` quarters long.
///
/// Sparse successors (more than a bar away, or more than half a bar away
/// across a bar line) are measured to the next bar line instead. Returns
/// `None` for a zero interval.
pub fn label_interval(bar: Bar, next_bar: Bar, bar_length: Bar) -> Option<TickLabel> {
    let one = Bar::from_integer(1);
    let gap = next_bar - bar;
    let crosses_bar_line = next_bar.floor() != bar.floor();

    let raw = if gap <= Bar::from_integer(0) || gap > one || (gap > Bar::new(1, 2) && crosses_bar_line) {
        (bar + one).floor() - bar
    } else {
        gap
    };

    let interval = limit_denominator(raw * bar_length / Bar::from_integer(4), TICK_MAX_DENOMINATOR);
    if interval == Bar::from_integer(0) {
        return None;
    }

    let text = if *interval.numer() == 1 {
        format!("/{}", interval.denom())
    } else {
        format!("{}/{}", interval.numer(), interval.denom())
    };
    Some(TickLabel { interval, text })
}

/// First timed note strictly after `notes[index]`.
pub(crate) fn next_timed(notes: &[Note], index: usize) -> Option<&Note> {
    let bar = notes[index].bar;
    notes[index..]
        .iter()
        .find(|n| n.tick_class() == Some(TickClass::Timed) && n.bar > bar)
}

/// Draw the tick for `notes[index]`: a short mark for untimed notes and the
/// last timed note, a long mark plus label otherwise.
pub(crate) fn render_tick(svg: &mut SvgBuilder, ctx: &SegmentContext, notes: &[Note], index: usize) {
    let note = &notes[index];
    let Some(class) = note.tick_class() else {
        return;
    };
    let g = &ctx.options.geometry;
    let y = ctx.y(note.bar);

    let next = match class {
        TickClass::Timed => next_timed(notes, index),
        TickClass::Untimed => None,
    };

    let Some(next) = next else {
        svg.line(g.lane_padding - g.tick_2_length, y, g.lane_padding, y, "tick-line");
        return;
    };

    let bar_length = ctx.timeline.active_event(note.bar).bar_length_or_default();
    let Some(label) = label_interval(note.bar, next.bar, bar_length) else {
        return;
    };

    svg.line(g.lane_padding - g.tick_length, y, g.lane_padding, y, "tick-line");
    svg.text(g.lane_padding - 4.0, y - 2.0, &label.text, "tick-text");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NoteKind;

    fn b(n: i64, d: i64) -> Bar {
        Bar::new(n, d)
    }

    fn four() -> Bar {
        Bar::from_integer(4)
    }

    #[test]
    fn triplet_gap_abbreviates_numerator() {
        let label = label_interval(b(0, 1), b(1, 3), four()).unwrap();
        assert_eq!(label.text, "/3");
    }

    #[test]
    fn distant_successor_falls_back_to_next_bar() {
        let label = label_interval(b(0, 1), b(2, 1), four()).unwrap();
        assert_eq!(label.interval, b(1, 1));
        assert_eq!(label.text, "/1");

        let label = label_interval(b(1, 4), b(2, 1), four()).unwrap();
        assert_eq!(label.text, "3/4");
    }

    #[test]
    fn half_bar_across_bar_line_uses_bar_line() {
        // 3/4 → 1 + 3/8 crosses a bar line with a gap over one half
        let label = label_interval(b(3, 4), b(11, 8), four()).unwrap();
        assert_eq!(label.text, "/4");
        // but a short hop across the line keeps the real gap
        let label = label_interval(b(7, 8), b(9, 8), four()).unwrap();
        assert_eq!(label.text, "/4");
    }

    #[test]
    fn bar_length_scales_to_quarters() {
        let label = label_interval(b(0, 1), b(1, 2), b(3, 1)).unwrap();
        assert_eq!(label.text, "3/8");
    }

    #[test]
    fn large_denominators_are_reduced() {
        let label = label_interval(b(0, 1), b(1, 101), four()).unwrap();
        assert_eq!(label.text, "/100");
    }

    #[test]
    fn next_timed_skips_same_bar_and_untimed() {
        let tap = |bar| Note { bar, lane: 2, width: 1, critical: false, trace: false, kind: NoteKind::Tap };
        let hidden = Note { kind: NoteKind::Hidden, ..tap(b(1, 4)) };
        let notes = vec![tap(b(0, 1)), tap(b(0, 1)), hidden, tap(b(1, 2))];
        assert_eq!(next_timed(&notes, 0).map(|n| n.bar), Some(b(1, 2)));
        assert!(next_timed(&notes, 3).is_none());
    }
}
