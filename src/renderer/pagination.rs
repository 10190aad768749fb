//! Pagination: split the chart into sentences of bounded length.

use std::ops::Range;

use crate::model::{Bar, Event};
use crate::timemap::TimeModel;

/// The active event at every bar line `0..=last_bar`.
pub fn bar_events(timeline: &dyn TimeModel, last_bar: i64) -> Vec<(i64, Event)> {
    (0..=last_bar)
        .map(|bar| (bar, timeline.active_event(Bar::from_integer(bar))))
        .collect()
}

/// Partition `[0, last_bar]` into consecutive segments.
///
/// A segment closes at a bar line where the section or sentence length
/// changes, where it has reached its sentence length, or at the end of the
/// chart. The ranges are contiguous and cover every bar exactly once.
pub fn segment_bars(timeline: &dyn TimeModel, last_bar: i64) -> Vec<Range<i64>> {
    let (ranges, _, _) = bar_events(timeline, last_bar).into_iter().fold(
        (Vec::new(), 0i64, Event::origin()),
        |(mut ranges, start, merged), (bar, event)| {
            let closes = bar != start
                && (event.section != merged.section
                    || event.sentence_length != merged.sentence_length
                    || bar == start + merged.sentence_length_or_default()
                    || bar == last_bar);
            let start = if closes {
                ranges.push(start..bar);
                bar
            } else {
                start
            };
            (ranges, start, merged.merge(&event))
        },
    );
    ranges
}
