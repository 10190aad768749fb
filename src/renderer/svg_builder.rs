//! SVG builder — accumulates SVG elements and produces the final string.
//!
//! Styling is class-based: every shape carries a CSS class resolved by the
//! stylesheet embedded in the top-level document's `<defs>`.

// ═══════════════════════════════════════════════════════════════════════
// SvgBuilder
// ═══════════════════════════════════════════════════════════════════════

pub(crate) struct SvgBuilder {
    pub(crate) elements: Vec<String>,
    defs: Vec<String>,
    width: f64,
    height: f64,
}

impl SvgBuilder {
    pub(crate) fn new(width: f64, height: f64) -> Self {
        Self {
            elements: Vec::new(),
            defs: Vec::new(),
            width,
            height,
        }
    }

    pub(crate) fn width(&self) -> f64 {
        self.width
    }

    pub(crate) fn height(&self) -> f64 {
        self.height
    }

    /// Render as a stand-alone document.
    pub(crate) fn build(self) -> String {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" viewBox="0 0 {:.1} {:.1}" width="{:.1}" height="{:.1}">"#,
            self.width, self.height, self.width, self.height
        );
        svg.push('\n');
        self.push_body(&mut svg, "  ");
        svg.push_str("</svg>\n");
        svg
    }

    /// Render as a nested `<svg>` placed at `(x, y)` inside a parent document.
    pub(crate) fn build_nested(self, x: f64, y: f64) -> String {
        let mut svg = format!(
            r#"<svg x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}">"#,
            x, y, self.width, self.height
        );
        svg.push('\n');
        self.push_body(&mut svg, "    ");
        svg.push_str("  </svg>");
        svg
    }

    fn push_body(&self, svg: &mut String, indent: &str) {
        if !self.defs.is_empty() {
            svg.push_str(indent);
            svg.push_str("<defs>\n");
            for def in &self.defs {
                svg.push_str(indent);
                svg.push_str("  ");
                svg.push_str(def);
                svg.push('\n');
            }
            svg.push_str(indent);
            svg.push_str("</defs>\n");
        }
        for el in &self.elements {
            svg.push_str(indent);
            svg.push_str(el);
            svg.push('\n');
        }
    }

    // ── <defs> ──────────────────────────────────────────────────────

    pub(crate) fn style(&mut self, css: &str) {
        self.defs.push(format!("<style>{}</style>", escape_text(css)));
    }

    pub(crate) fn def(&mut self, raw: String) {
        self.defs.push(raw);
    }

    // ── Shapes ──────────────────────────────────────────────────────

    pub(crate) fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, class: &str) {
        self.elements.push(format!(
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" class="{}"/>"#,
            x1, y1, x2, y2, class
        ));
    }

    pub(crate) fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, class: &str) {
        self.elements.push(format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" class="{}"/>"#,
            x, y, w, h, class
        ));
    }

    pub(crate) fn text(&mut self, x: f64, y: f64, content: &str, class: &str) {
        self.elements.push(format!(
            r#"<text x="{:.1}" y="{:.1}" class="{}">{}</text>"#,
            x, y, class, escape_text(content)
        ));
    }

    /// Text rotated 90° counter-clockwise about `(cx, cy)`.
    pub(crate) fn vertical_text(&mut self, x: f64, y: f64, cx: f64, cy: f64, content: &str, class: &str) {
        self.elements.push(format!(
            r#"<text x="{:.1}" y="{:.1}" transform="rotate(-90, {:.1}, {:.1})" class="{}">{}</text>"#,
            x, y, cx, cy, class, escape_text(content)
        ));
    }

    pub(crate) fn path(&mut self, d: &str, class: &str) {
        self.elements.push(format!(r#"<path d="{}" class="{}"/>"#, d, class));
    }

    pub(crate) fn image(&mut self, href: &str, x: f64, y: f64, w: f64, h: f64) {
        self.elements.push(format!(
            r#"<image href="{}" x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}"/>"#,
            escape_attr(href), x, y, w, h
        ));
    }

    /// Image mirrored horizontally about the vertical line `x = axis_x`.
    pub(crate) fn mirrored_image(&mut self, href: &str, x: f64, y: f64, w: f64, h: f64, axis_x: f64) {
        self.elements.push(format!(
            r#"<image href="{}" x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" transform-origin="{:.1} 0" transform="scale(-1, 1)"/>"#,
            escape_attr(href), x, y, w, h, axis_x
        ));
    }

    /// Instance of a `<symbol>` from the document's defs.
    pub(crate) fn use_symbol(&mut self, id: &str, x: f64, y: f64, w: f64, h: f64) {
        self.elements.push(format!(
            r##"<use href="#{}" x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}"/>"##,
            id, x, y, w, h
        ));
    }

    /// Embed a child document at `(x, y)`.
    pub(crate) fn nest(&mut self, child: SvgBuilder, x: f64, y: f64) {
        self.elements.push(child.build_nested(x, y));
    }
}

pub(crate) fn escape_text(content: &str) -> String {
    content
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub(crate) fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

/// Format a number the way `%g` would for the magnitudes found in charts:
/// integers without a decimal point, everything else without trailing zeros.
pub(crate) fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    let s = format!("{:.6}", value);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
