//! Data model for a fully-resolved rhythm-game chart.
//!
//! Notes, events and lyrics are read-only during a render. Slide chains are
//! stored as an arena: every anchor names its chain by index and the chain
//! lists its members in order, so there are no back-references.

use num_rational::Rational64;
use num_traits::Signed;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, Result};

/// A position on the chart timeline, in whole bars.
pub type Bar = Rational64;

/// Resolution used when a wall-clock computation has to come back to a bar.
const BAR_FROM_F64_RESOLUTION: i64 = 1_000_000;

/// Convert a bar position to floating point (for pixel math only).
pub fn bar_f64(bar: Bar) -> f64 {
    *bar.numer() as f64 / *bar.denom() as f64
}

/// Convert a floating-point bar back to a rational at a fixed resolution.
pub fn bar_from_f64(value: f64) -> Bar {
    Bar::new(
        (value * BAR_FROM_F64_RESOLUTION as f64).round() as i64,
        BAR_FROM_F64_RESOLUTION,
    )
}

/// Closest rational to `value` whose denominator is at most `max_denominator`.
///
/// Walks the continued-fraction expansion and picks between the last
/// convergent and the best semiconvergent, so ties resolve the same way
/// every time.
pub fn limit_denominator(value: Bar, max_denominator: i64) -> Bar {
    let max_denominator = max_denominator.max(1);
    if *value.denom() <= max_denominator {
        return value;
    }

    let (mut p0, mut q0, mut p1, mut q1) = (0i64, 1i64, 1i64, 0i64);
    let (mut n, mut d) = (*value.numer(), *value.denom());
    loop {
        let a = n.div_euclid(d);
        let q2 = q0 + a * q1;
        if q2 > max_denominator {
            break;
        }
        let p2 = p0 + a * p1;
        p0 = p1;
        q0 = q1;
        p1 = p2;
        q1 = q2;
        let r = n - a * d;
        n = d;
        d = r;
        if d == 0 {
            break;
        }
    }

    let k = (max_denominator - q0) / q1;
    let bound1 = Bar::new(p0 + k * p1, q0 + k * q1);
    let bound2 = Bar::new(p1, q1);
    if (bound2 - value).abs() <= (bound1 - value).abs() {
        bound2
    } else {
        bound1
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Score
// ═══════════════════════════════════════════════════════════════════════

/// A complete chart ready for rendering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Score {
    #[serde(default)]
    pub meta: Meta,
    /// Notes in ascending bar order
    pub notes: Vec<Note>,
    /// Timeline events in ascending bar order
    #[serde(default)]
    pub events: Vec<Event>,
    /// Slide chains, indexed by `SlideAnchor::chain`
    #[serde(default)]
    pub chains: Vec<SlideChain>,
}

/// Title block shown in the footer band.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Meta {
    pub title: Option<String>,
    pub artist: Option<String>,
    /// Difficulty name, e.g. "master"
    pub difficulty: Option<String>,
    /// Play level, e.g. "30"
    pub playlevel: Option<String>,
    /// Jacket image URI (may be a `data:` URI)
    pub jacket: Option<String>,
    pub song_id: Option<String>,
}

impl Meta {
    /// Credit line from separate composer and arranger names, collapsing
    /// duplicates and `-` placeholders.
    pub fn artist_from_credits(composer: &str, arranger: &str) -> String {
        if composer == arranger {
            composer.to_string()
        } else if composer == "-" || arranger.contains(composer) {
            arranger.to_string()
        } else if arranger == "-" || composer.contains(arranger) {
            composer.to_string()
        } else {
            format!("{} / {}", composer, arranger)
        }
    }
}

/// One slide gesture: note indices in chain order, START first, END last.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlideChain {
    pub members: Vec<usize>,
}

impl Score {
    /// Last bar of the render range: the ceiling of the latest note, at least 1.
    pub fn last_bar(&self) -> Result<i64> {
        let latest = self
            .notes
            .iter()
            .map(|n| n.bar)
            .max()
            .ok_or(ChartError::EmptyChart)?;
        Ok(latest.ceil().to_integer().max(1))
    }

    /// Members of the chain an anchor belongs to.
    pub fn chain_of(&self, note: &Note) -> Option<&SlideChain> {
        note.slide().and_then(|s| self.chains.get(s.chain))
    }

    /// Reject input the layout cannot handle before any geometry is computed.
    pub fn validate(&self) -> Result<()> {
        if self.notes.is_empty() {
            return Err(ChartError::EmptyChart);
        }

        for (i, pair) in self.notes.windows(2).enumerate() {
            if pair[1].bar < pair[0].bar {
                return Err(ChartError::NotesOutOfOrder {
                    index: i + 1,
                    bar: pair[1].bar.to_string(),
                });
            }
        }

        for (chain_id, chain) in self.chains.iter().enumerate() {
            self.validate_chain(chain_id, chain)?;
        }

        for (i, note) in self.notes.iter().enumerate() {
            let Some(anchor) = note.slide() else {
                continue;
            };
            let chain = self.chains.get(anchor.chain).ok_or_else(|| ChartError::MalformedSlide {
                chain: anchor.chain,
                reason: "anchor names a chain that does not exist".into(),
            })?;
            if !chain.members.contains(&i) {
                return Err(ChartError::MalformedSlide {
                    chain: anchor.chain,
                    reason: format!("note {i} is not listed among the chain's members"),
                });
            }
        }

        for event in &self.events {
            event.validate()?;
        }

        Ok(())
    }

    fn validate_chain(&self, chain_id: usize, chain: &SlideChain) -> Result<()> {
        let malformed = |reason: &str| ChartError::MalformedSlide {
            chain: chain_id,
            reason: reason.to_string(),
        };

        if chain.members.len() < 2 {
            return Err(malformed("a chain needs at least a START and an END"));
        }

        let mut anchors = Vec::with_capacity(chain.members.len());
        for &idx in &chain.members {
            let note = self
                .notes
                .get(idx)
                .ok_or_else(|| malformed(&format!("member {idx} is out of range")))?;
            let anchor = note
                .slide()
                .ok_or_else(|| malformed(&format!("member {idx} is not a slide anchor")))?;
            if anchor.chain != chain_id {
                return Err(malformed(&format!("member {idx} belongs to chain {}", anchor.chain)));
            }
            anchors.push((note.bar, anchor.role));
        }

        let starts = anchors.iter().filter(|(_, r)| *r == SlideRole::Start).count();
        let ends = anchors.iter().filter(|(_, r)| *r == SlideRole::End).count();
        if starts != 1 || anchors[0].1 != SlideRole::Start {
            return Err(malformed("chain must open with exactly one START"));
        }
        if ends != 1 || anchors[anchors.len() - 1].1 != SlideRole::End {
            return Err(malformed("chain must close with exactly one END"));
        }
        if anchors.windows(2).any(|w| w[1].0 < w[0].0) {
            return Err(malformed("anchor bars must be non-decreasing"));
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Notes
// ═══════════════════════════════════════════════════════════════════════

/// A single note on the playfield.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub bar: Bar,
    /// Leftmost lane (playfield lanes start at 2)
    pub lane: i32,
    /// Number of lanes covered, at least 1
    pub width: i32,
    #[serde(default)]
    pub critical: bool,
    /// Trace ("friction") notes are judged on contact, not on tap
    #[serde(default)]
    pub trace: bool,
    pub kind: NoteKind,
}

/// Closed set of note variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NoteKind {
    Tap,
    /// A placeholder tap that is never drawn nor judged
    Hidden,
    Directional { direction: Direction },
    Slide(SlideAnchor),
}

/// Flick or ease direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    UpperLeft,
    UpperRight,
    Down,
    LowerLeft,
    LowerRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideRole {
    Start,
    Relay,
    End,
    Invisible,
}

/// A point on a slide chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideAnchor {
    pub role: SlideRole,
    /// Cosmetic (unjudged) ribbon
    #[serde(default)]
    pub decoration: bool,
    /// Index into `Score::chains`
    pub chain: usize,
    /// Attached directional: a flick on END anchors, an ease hint elsewhere
    #[serde(default)]
    pub directional: Option<Direction>,
    /// Attached tap drawn on decoration anchors
    #[serde(default)]
    pub tap: Option<AttachedTap>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttachedTap {
    #[serde(default)]
    pub critical: bool,
    #[serde(default)]
    pub trace: bool,
}

/// How a note participates in the tick column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickClass {
    /// Labelled with the interval to the next timed note
    Timed,
    /// Short unlabelled mark
    Untimed,
}

impl Note {
    pub fn slide(&self) -> Option<&SlideAnchor> {
        match &self.kind {
            NoteKind::Slide(anchor) => Some(anchor),
            _ => None,
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.kind == NoteKind::Hidden
    }

    pub fn is_flick(&self) -> bool {
        matches!(self.kind, NoteKind::Directional { .. })
    }

    /// Anchors that bend the ribbon. INVISIBLE anchors are skipped.
    pub fn is_path(&self) -> bool {
        self.slide().is_some_and(|s| s.role != SlideRole::Invisible)
    }

    /// The note's own flick direction, or the attached directional of a slide anchor.
    pub fn direction(&self) -> Option<Direction> {
        match &self.kind {
            NoteKind::Directional { direction } => Some(*direction),
            NoteKind::Slide(anchor) => anchor.directional,
            _ => None,
        }
    }

    pub fn tick_class(&self) -> Option<TickClass> {
        match &self.kind {
            NoteKind::Tap | NoteKind::Directional { .. } => Some(TickClass::Timed),
            NoteKind::Hidden => None,
            NoteKind::Slide(anchor) if anchor.decoration => {
                anchor.tap.map(|_| TickClass::Timed)
            }
            NoteKind::Slide(anchor) => match anchor.role {
                SlideRole::Start | SlideRole::End => Some(TickClass::Timed),
                SlideRole::Relay => Some(TickClass::Untimed),
                SlideRole::Invisible => None,
            },
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Events
// ═══════════════════════════════════════════════════════════════════════

/// Sparse per-bar metadata. Unset fields inherit through `merge`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub bar: Bar,
    #[serde(default)]
    pub bpm: Option<f64>,
    /// Time-signature numerator over 4
    #[serde(default)]
    pub bar_length: Option<Bar>,
    /// Scroll-speed multiplier
    #[serde(default)]
    pub speed: Option<f64>,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    /// Page-break period in bars
    #[serde(default)]
    pub sentence_length: Option<i64>,
}

pub const DEFAULT_BPM: f64 = 120.0;
pub const DEFAULT_BAR_LENGTH: i64 = 4;
pub const DEFAULT_SENTENCE_LENGTH: i64 = 4;

impl Event {
    /// An event carrying only a bar position.
    pub fn at(bar: Bar) -> Self {
        Self { bar, ..Self::default() }
    }

    /// The timeline origin: every field the layout needs, at its default.
    pub fn origin() -> Self {
        Self {
            bar: Bar::from_integer(0),
            bpm: Some(DEFAULT_BPM),
            bar_length: Some(Bar::from_integer(DEFAULT_BAR_LENGTH)),
            sentence_length: Some(DEFAULT_SENTENCE_LENGTH),
            ..Self::default()
        }
    }

    /// Monoid merge: `later`'s set fields win, unset ones fall back to `self`.
    pub fn merge(self, later: &Event) -> Event {
        Event {
            bar: later.bar,
            bpm: later.bpm.or(self.bpm),
            bar_length: later.bar_length.or(self.bar_length),
            speed: later.speed.or(self.speed),
            section: later.section.clone().or(self.section),
            text: later.text.clone().or(self.text),
            sentence_length: later.sentence_length.or(self.sentence_length),
        }
    }

    /// True when the event carries anything besides its bar position.
    pub fn is_special(&self) -> bool {
        self.bpm.is_some()
            || self.bar_length.is_some()
            || self.speed.is_some()
            || self.section.is_some()
            || self.text.is_some()
    }

    /// Tempo and bar length must stay positive for time to move forward.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| ChartError::InvalidEvent {
            bar: self.bar.to_string(),
            reason,
        };
        if let Some(bpm) = self.bpm {
            if !(bpm.is_finite() && bpm > 0.0) {
                return Err(invalid(format!("bpm must be positive, got {bpm}")));
            }
        }
        if let Some(bar_length) = self.bar_length {
            if bar_length <= Bar::from_integer(0) {
                return Err(invalid(format!("bar length must be positive, got {bar_length}")));
            }
        }
        Ok(())
    }

    pub fn bar_length_or_default(&self) -> Bar {
        self.bar_length.unwrap_or_else(|| Bar::from_integer(DEFAULT_BAR_LENGTH))
    }

    pub fn sentence_length_or_default(&self) -> i64 {
        self.sentence_length.unwrap_or(DEFAULT_SENTENCE_LENGTH).max(1)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Lyrics
// ═══════════════════════════════════════════════════════════════════════

/// Lyric captions aligned to bars.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Lyric {
    pub words: Vec<LyricWord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LyricWord {
    pub bar: Bar,
    pub text: String,
}

// ═══════════════════════════════════════════════════════════════════════
// Cover intervals
// ═══════════════════════════════════════════════════════════════════════

/// A presentational overlay spanning `[bar_from, bar_to)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverRect {
    pub bar_from: Bar,
    pub bar_to: Bar,
    /// CSS class, e.g. `skill-great`
    pub class: String,
}
