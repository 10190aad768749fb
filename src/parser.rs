//! JSON loader — reads an already-resolved chart model.
//!
//! Chart formats themselves are parsed elsewhere; this module only accepts
//! the serialized `Score` / `Lyric` model and checks it before layout.

use crate::error::Result;
use crate::model::*;

/// Bring a deserialized bar to lowest terms; serde keeps `[n, d]` as written
/// (a zero denominator is already rejected there).
fn reduce(bar: &mut Bar) {
    *bar = Bar::new(*bar.numer(), *bar.denom());
}

fn reduce_score(score: &mut Score) {
    for note in &mut score.notes {
        reduce(&mut note.bar);
    }
    for event in &mut score.events {
        reduce(&mut event.bar);
        if let Some(bar_length) = event.bar_length.as_mut() {
            reduce(bar_length);
        }
    }
}

/// Parse a JSON string into a validated Score.
pub fn parse_score_json(json: &str) -> Result<Score> {
    let mut score: Score = serde_json::from_str(json)?;
    reduce_score(&mut score);
    // Events may be listed in any order; equal bars keep their listed order.
    score.events.sort_by(|a, b| a.bar.cmp(&b.bar));
    score.validate()?;
    Ok(score)
}

/// Parse a JSON string into a Lyric, ordering words by bar.
pub fn parse_lyric_json(json: &str) -> Result<Lyric> {
    let mut lyric: Lyric = serde_json::from_str(json)?;
    for word in &mut lyric.words {
        reduce(&mut word.bar);
    }
    lyric.words.sort_by(|a, b| a.bar.cmp(&b.bar));
    Ok(lyric)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChartError;

    #[test]
    fn parses_minimal_chart() {
        let json = r#"{
            "meta": {"title": "Test"},
            "notes": [
                {"bar": [0, 1], "lane": 2, "width": 3, "kind": {"type": "tap"}},
                {"bar": [1, 2], "lane": 6, "width": 2, "critical": true,
                 "kind": {"type": "directional", "direction": "upper_left"}}
            ],
            "events": [
                {"bar": [4, 1], "section": "B"},
                {"bar": [0, 1], "bpm": 160.0}
            ]
        }"#;
        let score = parse_score_json(json).unwrap();
        assert_eq!(score.notes.len(), 2);
        assert_eq!(score.notes[1].direction(), Some(Direction::UpperLeft));
        assert_eq!(score.events[0].bpm, Some(160.0));
        assert_eq!(score.meta.title.as_deref(), Some("Test"));
    }

    #[test]
    fn rejects_empty_chart() {
        assert!(matches!(parse_score_json(r#"{"notes": []}"#), Err(ChartError::EmptyChart)));
    }

    #[test]
    fn reports_bad_json() {
        assert!(matches!(parse_score_json("{"), Err(ChartError::Json(_))));
    }

    #[test]
    fn bars_are_reduced_to_lowest_terms() {
        let json = r#"{
            "notes": [{"bar": [8, 2], "lane": 2, "width": 2, "kind": {"type": "tap"}}],
            "events": [{"bar": [-6, -4], "bar_length": [6, 2]}]
        }"#;
        let score = parse_score_json(json).unwrap();
        assert!(score.notes[0].bar.is_integer());
        assert_eq!(score.notes[0].bar.to_string(), "4");
        assert_eq!(score.events[0].bar.to_string(), "3/2");
        assert_eq!(score.events[0].bar_length, Some(Bar::from_integer(3)));

        let lyric = parse_lyric_json(r#"{"words": [{"bar": [4, 4], "text": "a"}]}"#).unwrap();
        assert_eq!(lyric.words[0].bar.to_string(), "1");
    }

    #[test]
    fn zero_denominator_is_rejected() {
        let json = r#"{"notes": [{"bar": [1, 0], "lane": 2, "width": 2, "kind": {"type": "tap"}}]}"#;
        assert!(matches!(parse_score_json(json), Err(ChartError::Json(_))));
    }

    #[test]
    fn lyric_words_are_sorted() {
        let lyric = parse_lyric_json(r#"{"words": [{"bar": [2, 1], "text": "b"}, {"bar": [1, 1], "text": "a"}]}"#).unwrap();
        assert_eq!(lyric.words[0].text, "a");
    }
}
