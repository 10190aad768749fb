//! Rendering tests — parse the fixture charts and render them to SVG.

use chartlib::renderer::segment_bars;
use chartlib::{
    parse_file, parse_score_json, render_bars_to_svg, render_chart_to_svg, render_file_to_svg, ChartError,
    Event, RenderOptions, Score, Timeline,
};
use roxmltree::{Document, Node};
use std::path::PathBuf;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn output_dir() -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_output");
    std::fs::create_dir_all(&dir).ok();
    dir
}

fn sample_chart() -> Score {
    parse_file(fixtures_dir().join("sample_chart.json")).expect("Failed to parse sample chart")
}

fn number(node: Node, name: &str) -> f64 {
    node.attribute(name)
        .unwrap_or_else(|| panic!("missing attribute {name}"))
        .parse()
        .unwrap()
}

fn segments<'a, 'input>(doc: &'a Document<'input>) -> Vec<Node<'a, 'input>> {
    doc.root_element().children().filter(|n| n.has_tag_name("svg")).collect()
}

fn with_class<'a, 'input>(doc: &'a Document<'input>, tag: &str, class: &str) -> Vec<Node<'a, 'input>> {
    doc.descendants()
        .filter(|n| n.has_tag_name(tag) && n.attribute("class") == Some(class))
        .collect()
}

fn texts(doc: &Document, class: &str) -> Vec<String> {
    with_class(doc, "text", class)
        .iter()
        .filter_map(|n| n.text().map(str::to_string))
        .collect()
}

#[test]
fn render_sample_chart_svg() {
    let chart = fixtures_dir().join("sample_chart.json");
    let lyric = fixtures_dir().join("sample_lyric.json");
    let svg = render_file_to_svg(&chart, Some(&lyric), &RenderOptions::default())
        .expect("Failed to render sample chart");

    assert!(svg.starts_with("<svg"), "Output should be SVG");
    assert!(svg.contains("</svg>"), "SVG should be closed");
    assert!(svg.contains("Sample Song - Sample Artist"), "SVG should contain the title line");
    assert!(svg.contains("EXPERT 24"), "SVG should contain difficulty and level");
    assert!(svg.contains(">hello<"), "SVG should contain lyrics");

    let out = output_dir().join("sample_chart.svg");
    std::fs::write(&out, &svg).expect("Failed to write SVG");
    println!("✓ Rendered sample_chart.svg ({} bytes)", svg.len());
    println!("  Output: {}", out.display());
}

#[test]
fn document_is_well_formed_xml_with_expected_size() {
    let svg = render_chart_to_svg(&sample_chart(), None, &RenderOptions::default()).unwrap();
    let doc = Document::parse(&svg).expect("SVG should be well-formed XML");
    let root = doc.root_element();

    // Two segments of 272 units side by side, plus a lane padding either side.
    assert_eq!(number(root, "width"), 624.0);
    // Tallest segment (4 bars at 1.6 s) + paddings + footer band.
    assert_eq!(number(root, "height"), 2688.0);
    assert!(!with_class(&doc, "text", "title").is_empty());
}

#[test]
fn segments_are_laid_out_left_to_right_and_bottom_aligned() {
    let svg = render_chart_to_svg(&sample_chart(), None, &RenderOptions::default()).unwrap();
    let doc = Document::parse(&svg).unwrap();
    let segments = segments(&doc);
    assert_eq!(segments.len(), 2, "Intro and Verse sections");

    let xs: Vec<f64> = segments.iter().map(|s| number(*s, "x")).collect();
    assert_eq!(xs, vec![40.0, 312.0]);

    let bottoms: Vec<f64> = segments.iter().map(|s| number(*s, "y") + number(*s, "height")).collect();
    assert!(bottoms.windows(2).all(|w| (w[0] - w[1]).abs() < 0.1), "bottoms: {bottoms:?}");

    // The shorter Verse segment hangs lower.
    assert_eq!(number(segments[0], "y"), 32.0);
    assert!(number(segments[1], "y") > number(segments[0], "y"));
}

#[test]
fn slide_ribbons_and_waypoints_are_drawn() {
    let svg = render_chart_to_svg(&sample_chart(), None, &RenderOptions::default()).unwrap();
    let doc = Document::parse(&svg).unwrap();

    // Both chains touch both segments.
    assert_eq!(with_class(&doc, "path", "slide").len(), 2);
    assert_eq!(with_class(&doc, "path", "decoration-critical").len(), 2);

    for path in with_class(&doc, "path", "slide") {
        let d = path.attribute("d").unwrap();
        assert!(d.starts_with('M') && d.ends_with('Z'), "d = {d}");
        // START→RELAY and RELAY→END on each rail; the invisible anchor does not bend it.
        assert_eq!(d.matches(" C").count(), 4);
    }

    let relays = doc
        .descendants()
        .filter(|n| n.has_tag_name("image"))
        .filter(|n| n.attribute("href").is_some_and(|h| h.ends_with("notes_long_among.png")))
        .count();
    assert!(relays >= 1, "relay glyphs should be drawn on the ribbon");
}

fn bent_chart(middle_role: &str) -> Score {
    let json = format!(
        r#"{{
            "notes": [
                {{"bar": [0, 1], "lane": 3, "width": 2, "kind": {{"type": "slide", "role": "start", "chain": 0}}}},
                {{"bar": [1, 1], "lane": 9, "width": 2, "kind": {{"type": "slide", "role": "{middle_role}", "chain": 0}}}},
                {{"bar": [2, 1], "lane": 3, "width": 2, "kind": {{"type": "slide", "role": "end", "chain": 0}}}}
            ],
            "chains": [{{"members": [0, 1, 2]}}]
        }}"#
    );
    parse_score_json(&json).unwrap()
}

fn slide_curve_count(score: &Score) -> (usize, usize) {
    let svg = render_chart_to_svg(score, None, &RenderOptions::default()).unwrap();
    let doc = Document::parse(&svg).unwrap();
    let paths = with_class(&doc, "path", "slide");
    let curves = paths.iter().map(|p| p.attribute("d").unwrap().matches(" C").count()).sum();
    (paths.len(), curves)
}

#[test]
fn relay_bends_the_ribbon_but_invisible_does_not() {
    assert_eq!(slide_curve_count(&bent_chart("relay")), (1, 4));
    assert_eq!(slide_curve_count(&bent_chart("invisible")), (1, 2));
}

#[test]
fn flicks_and_trace_marks_are_drawn() {
    let svg = render_chart_to_svg(&sample_chart(), None, &RenderOptions::default()).unwrap();
    assert!(svg.contains("notes_flick_arrow_02.png"), "plain up flick");
    assert!(svg.contains("notes_flick_arrow_04_diagonal.png"), "diagonal trace flick");
    assert!(svg.contains("scale(-1, 1)"), "upper-right flick is mirrored");
    assert!(svg.contains("notes_friction_among_crtcl.png"), "critical trace mark");
}

#[test]
fn event_annotations_merge_per_bar() {
    let svg = render_chart_to_svg(&sample_chart(), None, &RenderOptions::default()).unwrap();
    let doc = Document::parse(&svg).unwrap();
    let events = texts(&doc, "event-text");

    assert!(events.contains(&"#0, 150 BPM, Intro".to_string()), "{events:?}");
    assert!(events.contains(&"#2, SKILL".to_string()), "{events:?}");
    assert!(events.contains(&"#6, 3/4".to_string()), "{events:?}");
    assert!(texts(&doc, "bar-count-text").contains(&"#1".to_string()));
    assert_eq!(texts(&doc, "speed-text"), vec!["1.5x".to_string(); 2]);
}

#[test]
fn tick_labels_show_subdivisions() {
    let json = r#"{
        "notes": [
            {"bar": [0, 1], "lane": 2, "width": 2, "kind": {"type": "tap"}},
            {"bar": [1, 3], "lane": 4, "width": 2, "kind": {"type": "tap"}},
            {"bar": [1, 2], "lane": 6, "width": 2, "kind": {"type": "hidden"}},
            {"bar": [1, 1], "lane": 8, "width": 2, "kind": {"type": "tap"}}
        ]
    }"#;
    let score = parse_score_json(json).unwrap();
    let svg = render_chart_to_svg(&score, None, &RenderOptions::default()).unwrap();
    let doc = Document::parse(&svg).unwrap();

    // 0 → 1/3 is a triplet; 1/3 → 1 skips the hidden note; the last note gets a bare tick.
    assert_eq!(texts(&doc, "tick-text"), vec!["/3".to_string(), "2/3".to_string()]);
    assert_eq!(with_class(&doc, "line", "tick-line").len(), 3);
}

#[test]
fn skill_overlays_follow_the_option() {
    let score = sample_chart();
    let plain = render_chart_to_svg(&score, None, &RenderOptions::default()).unwrap();
    assert!(!plain.contains(r#"class="skill-duration""#));

    let options = RenderOptions { skill: true, ..RenderOptions::default() };
    let svg = render_chart_to_svg(&score, None, &options).unwrap();
    let doc = Document::parse(&svg).unwrap();
    for class in ["skill-great", "skill-perfect", "skill-duration"] {
        assert!(!with_class(&doc, "rect", class).is_empty(), "missing {class}");
    }
    assert!(svg.contains(".skill-great"), "skill stylesheet should be embedded");
}

#[test]
fn theme_hint_is_optional() {
    let score = sample_chart();
    let plain = render_chart_to_svg(&score, None, &RenderOptions::default()).unwrap();
    assert!(!plain.contains(r#"class="themehint""#));

    let options = RenderOptions { theme_hint: "Layout & glyphs".into(), ..RenderOptions::default() };
    let svg = render_chart_to_svg(&score, None, &options).unwrap();
    let doc = Document::parse(&svg).unwrap();
    let hints = with_class(&doc, "text", "themehint");
    assert_eq!(hints.len(), 1);
    assert_eq!(hints[0].text(), Some("Layout & glyphs"));
    // Right-aligned inside the footer band, below the segments.
    assert_eq!(number(hints[0], "x"), 624.0 - 40.0);
    assert!(number(hints[0], "y") > 2432.0);
}

#[test]
fn bar_range_renders_a_single_segment() {
    let score = sample_chart();
    let options = RenderOptions::default();
    let svg = render_bars_to_svg(&score, None, &options, 0, 2).unwrap();
    let doc = Document::parse(&svg).unwrap();

    assert!(segments(&doc).is_empty());
    assert_eq!(number(doc.root_element(), "width"), options.geometry.segment_width());
    // 2 bars at 1.6 s each, plus top and bottom padding.
    assert!((number(doc.root_element(), "height") - (360.0 * 3.2 + 64.0)).abs() < 0.1);

    assert!(matches!(
        render_bars_to_svg(&score, None, &options, 3, 3),
        Err(ChartError::InvalidRange { start: 3, stop: 3 })
    ));
}

#[test]
fn empty_chart_is_rejected() {
    let result = render_chart_to_svg(&Score::default(), None, &RenderOptions::default());
    assert!(matches!(result, Err(ChartError::EmptyChart)));
}

#[test]
fn segments_partition_the_chart() {
    let cases: Vec<(Vec<Event>, i64)> = vec![
        (vec![], 1),
        (vec![], 13),
        (vec![Event { sentence_length: Some(3), ..Event::at(0.into()) }], 10),
        (
            vec![
                Event { section: Some("A".into()), ..Event::at(0.into()) },
                Event { section: Some("B".into()), ..Event::at(5.into()) },
                Event { sentence_length: Some(1), ..Event::at(7.into()) },
            ],
            11,
        ),
    ];

    for (events, last_bar) in cases {
        let ranges = segment_bars(&Timeline::new(&events), last_bar);
        assert_eq!(ranges.first().map(|r| r.start), Some(0));
        assert_eq!(ranges.last().map(|r| r.end), Some(last_bar));
        for pair in ranges.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert!(ranges.iter().all(|r| !r.is_empty()), "{ranges:?}");
    }
}
