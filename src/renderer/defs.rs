//! Shared `<defs>`: stylesheet, ribbon gradients and note-glyph symbols.
//!
//! A note glyph is assembled from three slices of one sprite (left cap,
//! stretched middle, right cap) so that a single PNG per note family serves
//! every width from 1 to `n_lanes`.

use super::constants::*;
use super::svg_builder::{escape_attr, SvgBuilder};
use crate::config::RenderOptions;

const DEFAULT_STYLE: &str = include_str!("../../assets/default.css");
const SKILL_STYLE: &str = include_str!("../../assets/skill.css");

/// Full stylesheet for a run: defaults, skill overlays when enabled, user CSS last.
pub(crate) fn style_sheet(options: &RenderOptions) -> String {
    let mut css = DEFAULT_STYLE.to_string();
    if options.skill {
        css.push('\n');
        css.push_str(SKILL_STYLE);
    }
    if !options.style_sheet.is_empty() {
        css.push('\n');
        css.push_str(&options.style_sheet);
    }
    css
}

/// Id of the note symbol for sprite `sprite` at `width` lanes.
pub(crate) fn note_symbol_id(sprite: u8, width: i32, n_lanes: i32) -> String {
    format!("notes-{}-{}", sprite, width.clamp(1, n_lanes.max(1)))
}

pub(crate) fn add_defs(svg: &mut SvgBuilder, options: &RenderOptions) {
    svg.style(&style_sheet(options));

    for id in ["decoration-gradient", "decoration-critical-gradient"] {
        svg.def(format!(
            r#"<linearGradient id="{}" x1="0" y1="1" x2="0" y2="0"><stop offset="0" stop-color="var(--color-start)"/><stop offset="1" stop-color="var(--color-stop)"/></linearGradient>"#,
            id
        ));
    }

    for sprite in 0..NOTE_SPRITE_COUNT {
        add_note_symbols(svg, options, sprite);
    }
}

fn add_note_symbols(svg: &mut SvgBuilder, options: &RenderOptions, sprite: u8) {
    let g = &options.geometry;
    let href = escape_attr(&format!("{}/notes_{}.png", options.note_host, sprite));
    let bleed_w = NOTE_SPRITE_WIDTH + NOTE_SPRITE_BLEED * 2.0;
    let bleed_h = NOTE_SPRITE_HEIGHT + NOTE_SPRITE_BLEED * 2.0;

    svg.def(format!(
        r#"<symbol id="notes-{s}" viewBox="0 0 {w} {h}"><image href="{href}" x="{b}" y="{b}" width="{bw}" height="{bh}"/></symbol>"#,
        s = sprite,
        w = NOTE_SPRITE_WIDTH,
        h = NOTE_SPRITE_HEIGHT,
        href = href,
        b = -NOTE_SPRITE_BLEED,
        bw = bleed_w,
        bh = bleed_h,
    ));

    // Middle slice: the sprite stretched so its centre column fills any width.
    let cap = NOTE_SPRITE_HEIGHT / 2.0;
    svg.def(format!(
        r#"<symbol id="notes-{s}-middle" viewBox="0 0 {w} {h}"><image href="{href}" x="{x}" y="{b}" width="{bw}" height="{bh}" preserveAspectRatio="none"/></symbol>"#,
        s = sprite,
        w = NOTE_SPRITE_WIDTH * NOTE_MIDDLE_RATIO,
        h = NOTE_SPRITE_HEIGHT,
        href = href,
        x = -(NOTE_SPRITE_BLEED + cap) * NOTE_MIDDLE_RATIO,
        b = -NOTE_SPRITE_BLEED,
        bw = bleed_w * NOTE_MIDDLE_RATIO,
        bh = bleed_h,
    ));

    for width in 1..=g.n_lanes {
        let note_height = g.note_size;
        let note_width = g.lane_width * (width + 1) as f64;
        let inner_width = g.lane_width * width as f64;

        let cap_width = note_height / NOTE_SPRITE_HEIGHT * 32.0;
        let middle_width = inner_width - cap_width - 2.0;
        let padding_x = (note_width - cap_width * 2.0 - middle_width) / 2.0;
        let right_clip_x = note_height / NOTE_SPRITE_HEIGHT * 80.0;
        let id = format!("notes-{}-{}", sprite, width);

        svg.def(format!(
            concat!(
                r#"<symbol id="{id}" viewBox="0 0 {nw:.2} {nh:.2}">"#,
                r#"<clipPath id="{id}-left"><rect x="0" y="0" width="{cw:.2}" height="{nh:.2}"/></clipPath>"#,
                r#"<clipPath id="{id}-middle"><rect x="0" y="0" width="{mw:.2}" height="{nh:.2}"/></clipPath>"#,
                r#"<clipPath id="{id}-right"><rect x="{rx:.2}" y="0" width="{cw:.2}" height="{nh:.2}"/></clipPath>"#,
                r##"<use href="#notes-{s}" x="{lx:.2}" y="0" width="{cap2:.2}" height="{nh:.2}" clip-path="url(#{id}-left)"/>"##,
                r##"<use href="#notes-{s}-middle" x="{mx:.2}" y="0" width="{mid:.2}" height="{nh:.2}" clip-path="url(#{id}-middle)"/>"##,
                r##"<use href="#notes-{s}" x="{ex:.2}" y="0" width="{cap2:.2}" height="{nh:.2}" clip-path="url(#{id}-right)"/>"##,
                "</symbol>"
            ),
            id = id,
            s = sprite,
            nw = note_width,
            nh = note_height,
            cw = cap_width,
            mw = middle_width,
            rx = right_clip_x,
            lx = padding_x,
            cap2 = note_height * 2.0,
            mx = padding_x + cap_width,
            mid = note_height * NOTE_MIDDLE_RATIO * 2.0,
            ex = padding_x + cap_width * 2.0 + middle_width - note_height * 2.0,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skill_css_only_when_enabled() {
        let mut options = RenderOptions::default();
        assert!(!style_sheet(&options).contains(".skill-great"));
        options.skill = true;
        options.style_sheet = ".title { fill: red; }".into();
        let css = style_sheet(&options);
        assert!(css.contains(".skill-great"));
        assert!(css.trim_end().ends_with(".title { fill: red; }"));
    }

    #[test]
    fn symbol_ids_clamp_width() {
        assert_eq!(note_symbol_id(2, 3, 12), "notes-2-3");
        assert_eq!(note_symbol_id(0, 20, 12), "notes-0-12");
        assert_eq!(note_symbol_id(1, 0, 12), "notes-1-1");
    }
}
