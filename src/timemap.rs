//! Bar ↔ wall-clock conversion.
//!
//! Answers "how many seconds lie between two bars?" for the vertical axis
//! and, for the skill overlays, "which bar is N seconds after this one?".

use crate::model::{bar_f64, bar_from_f64, Bar, Event, Score};

/// Timing capabilities the renderer consumes.
pub trait TimeModel {
    /// The fully merged event in effect at `bar`.
    fn active_event(&self, bar: Bar) -> Event;

    /// Seconds from `from` to `to` (negative when `to` is earlier).
    fn elapsed_time(&self, from: Bar, to: Bar) -> f64;

    /// The bar lying `offset` seconds after `reference`.
    fn bar_at_elapsed_time(&self, reference: Bar, offset: f64) -> Bar;
}

/// One stretch of constant tempo and bar length.
#[derive(Debug, Clone, Copy)]
struct TempoSegment {
    /// First bar of the stretch
    bar: Bar,
    /// Cumulative seconds at `bar`
    seconds: f64,
    /// Seconds per whole bar inside the stretch
    seconds_per_bar: f64,
}

/// Piecewise-linear timeline built from a score's tempo and bar-length events.
#[derive(Debug, Clone)]
pub struct Timeline {
    events: Vec<Event>,
    segments: Vec<TempoSegment>,
}

impl Timeline {
    /// Pre-compute tempo stretches by walking the events in bar order.
    pub fn new(events: &[Event]) -> Self {
        let mut events = events.to_vec();
        events.sort_by(|a, b| a.bar.cmp(&b.bar));

        let mut change_bars: Vec<Bar> = vec![Bar::from_integer(0)];
        change_bars.extend(
            events
                .iter()
                .filter(|e| e.bpm.is_some() || e.bar_length.is_some())
                .map(|e| e.bar)
                .filter(|bar| *bar > Bar::from_integer(0)),
        );
        change_bars.dedup();

        let mut segments: Vec<TempoSegment> = Vec::with_capacity(change_bars.len());
        for bar in change_bars {
            let state = merged_until(&events, bar);
            let seconds = match segments.last() {
                Some(prev) => prev.seconds + bar_f64(bar - prev.bar) * prev.seconds_per_bar,
                None => 0.0,
            };
            segments.push(TempoSegment {
                bar,
                seconds,
                seconds_per_bar: seconds_per_bar(&state),
            });
        }

        Self { events, segments }
    }

    pub fn from_score(score: &Score) -> Self {
        Self::new(&score.events)
    }

    /// Seconds from bar 0 to `bar`. Bars before 0 extrapolate the first stretch.
    pub fn time_at(&self, bar: Bar) -> f64 {
        let seg = self
            .segments
            .iter()
            .rev()
            .find(|s| s.bar <= bar)
            .unwrap_or(&self.segments[0]);
        seg.seconds + bar_f64(bar - seg.bar) * seg.seconds_per_bar
    }

    /// Inverse of `time_at`.
    pub fn bar_at(&self, seconds: f64) -> Bar {
        let seg = self
            .segments
            .iter()
            .rev()
            .find(|s| s.seconds <= seconds)
            .unwrap_or(&self.segments[0]);
        let offset = if seg.seconds_per_bar > 0.0 {
            (seconds - seg.seconds) / seg.seconds_per_bar
        } else {
            0.0
        };
        seg.bar + bar_from_f64(offset)
    }
}

impl TimeModel for Timeline {
    fn active_event(&self, bar: Bar) -> Event {
        let mut event = merged_until(&self.events, bar);
        event.bar = bar;
        event
    }

    fn elapsed_time(&self, from: Bar, to: Bar) -> f64 {
        self.time_at(to) - self.time_at(from)
    }

    fn bar_at_elapsed_time(&self, reference: Bar, offset: f64) -> Bar {
        self.bar_at(self.time_at(reference) + offset)
    }
}

/// Fold every event at or before `bar` onto the timeline origin.
fn merged_until(events: &[Event], bar: Bar) -> Event {
    events
        .iter()
        .take_while(|e| e.bar <= bar)
        .fold(Event::origin(), |acc, e| acc.merge(e))
}

fn seconds_per_bar(event: &Event) -> f64 {
    let bpm = event.bpm.filter(|b| *b > 0.0).unwrap_or(crate::model::DEFAULT_BPM);
    bar_f64(event.bar_length_or_default()) * 60.0 / bpm
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(n: i64, d: i64) -> Bar {
        Bar::new(n, d)
    }

    #[test]
    fn constant_tempo_is_linear() {
        let timeline = Timeline::new(&[]);
        // 120 BPM, 4 beats per bar → 2 seconds per bar
        assert!((timeline.elapsed_time(b(0, 1), b(1, 1)) - 2.0).abs() < 1e-9);
        assert!((timeline.elapsed_time(b(1, 1), b(0, 1)) + 2.0).abs() < 1e-9);
        assert!((timeline.time_at(b(-1, 2)) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn tempo_change_splits_the_timeline() {
        let events = vec![Event { bpm: Some(240.0), ..Event::at(b(2, 1)) }];
        let timeline = Timeline::new(&events);
        assert!((timeline.time_at(b(2, 1)) - 4.0).abs() < 1e-9);
        assert!((timeline.time_at(b(3, 1)) - 5.0).abs() < 1e-9);
        assert_eq!(timeline.bar_at(4.5), b(5, 2));
    }

    #[test]
    fn bar_length_change_scales_bar_duration() {
        let events = vec![Event { bar_length: Some(b(3, 1)), ..Event::at(b(1, 1)) }];
        let timeline = Timeline::new(&events);
        assert!((timeline.elapsed_time(b(1, 1), b(2, 1)) - 1.5).abs() < 1e-9);
    }

    #[test]
    fn inverse_mapping_round_trips() {
        let events = vec![
            Event { bpm: Some(150.0), ..Event::at(b(0, 1)) },
            Event { bpm: Some(90.0), ..Event::at(b(4, 1)) },
        ];
        let timeline = Timeline::new(&events);
        let bar = timeline.bar_at_elapsed_time(b(3, 1), 5.0);
        assert!((timeline.elapsed_time(b(3, 1), bar) - 5.0).abs() < 1e-4);
    }

    #[test]
    fn active_event_merges_everything_before() {
        let events = vec![
            Event { section: Some("Intro".into()), ..Event::at(b(0, 1)) },
            Event { bpm: Some(180.0), ..Event::at(b(2, 1)) },
        ];
        let timeline = Timeline::new(&events);
        let active = timeline.active_event(b(3, 1));
        assert_eq!(active.section.as_deref(), Some("Intro"));
        assert_eq!(active.bpm, Some(180.0));
        assert_eq!(active.sentence_length, Some(4));
        assert_eq!(timeline.active_event(b(1, 1)).bpm, Some(120.0));
    }
}
