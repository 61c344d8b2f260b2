use std::fmt::Write as FmtWrite;

use crate::att::{FillAtt, FontFace, LineAtt, TextAtt};
use crate::font::{FontHandle, SVG_FONT_FAMILY};
use crate::text::{TextMetrics, measure_styled};

/// An SVG element stored for deferred rendering.
#[derive(Debug, Clone)]
enum SvgElement {
    Rect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        fill: FillAtt,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        line: LineAtt,
    },
    Polyline {
        points: Vec<(f64, f64)>,
        line: LineAtt,
    },
    Text {
        x: f64,
        y: f64,
        content: String,
        text: TextAtt,
        rotate: Option<f64>,
    },
    Group {
        clip_id: String,
        children: Vec<SvgElement>,
    },
}

/// Immediate-mode SVG canvas. Coordinates in points (1pt = 1/72").
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    elements: Vec<SvgElement>,
    defs: Vec<String>,
    clip_stack: Vec<(String, Vec<SvgElement>)>,
    next_clip_id: usize,
    fonts: &'static FontHandle,
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self::with_fonts(width, height, FontHandle::shared())
    }

    pub fn with_fonts(width: f64, height: f64, fonts: &'static FontHandle) -> Self {
        Self {
            width,
            height,
            elements: Vec::new(),
            defs: Vec::new(),
            clip_stack: Vec::new(),
            next_clip_id: 0,
            fonts,
        }
    }

    // --- Drawing primitives ---

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: FillAtt) {
        self.push(SvgElement::Rect { x, y, w, h, fill });
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, line: LineAtt) {
        self.push(SvgElement::Line { x1, y1, x2, y2, line });
    }

    /// Open path through `points`; fewer than two points draw nothing.
    pub fn polyline(&mut self, points: &[(f64, f64)], line: LineAtt) {
        if points.len() < 2 {
            return;
        }
        self.push(SvgElement::Polyline { points: points.to_vec(), line });
    }

    pub fn text(&mut self, x: f64, y: f64, content: &str, text: TextAtt) {
        self.push(SvgElement::Text { x, y, content: content.to_string(), text, rotate: None });
    }

    /// Text turned by `angle` degrees around its anchor point.
    pub fn text_rotated(&mut self, x: f64, y: f64, content: &str, text: TextAtt, angle: f64) {
        self.push(SvgElement::Text { x, y, content: content.to_string(), text, rotate: Some(angle) });
    }

    /// Vertical error bar from `y_lo` to `y_hi`, with end caps when `cap_width > 0`.
    pub fn error_bar(&mut self, x: f64, y_lo: f64, y_hi: f64, cap_width: f64, line: LineAtt) {
        self.line(x, y_lo, x, y_hi, line);
        if cap_width > 0.0 {
            let half = cap_width / 2.0;
            self.line(x - half, y_lo, x + half, y_lo, line);
            self.line(x - half, y_hi, x + half, y_hi, line);
        }
    }

    // --- Clip paths ---

    /// Clip everything drawn until the matching [`pop_clip`](Self::pop_clip)
    /// to the given rectangle.
    pub fn push_clip(&mut self, x: f64, y: f64, w: f64, h: f64) -> String {
        let id = format!("clip{}", self.next_clip_id);
        self.next_clip_id += 1;
        self.defs.push(format!(
            r#"<clipPath id="{id}"><rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" /></clipPath>"#
        ));
        self.clip_stack.push((id.clone(), Vec::new()));
        id
    }

    pub fn pop_clip(&mut self) {
        if let Some((clip_id, children)) = self.clip_stack.pop() {
            self.push(SvgElement::Group { clip_id, children });
        }
    }

    // --- Text measurement ---

    pub fn measure_text(&self, content: &str, text: TextAtt) -> TextMetrics {
        measure_styled(self.fonts, content, text)
    }

    // --- SVG output ---

    fn push(&mut self, elem: SvgElement) {
        match self.clip_stack.last_mut() {
            Some((_, children)) => children.push(elem),
            None => self.elements.push(elem),
        }
    }

    /// Serialize the canvas. Clip regions still open are closed first.
    pub fn finish_svg(&self) -> String {
        let mut out = String::with_capacity(32 * 1024);
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height,
        );

        if !self.defs.is_empty() {
            out.push_str("<defs>\n");
            for d in &self.defs {
                out.push_str(d);
                out.push('\n');
            }
            out.push_str("</defs>\n");
        }

        let _ = writeln!(out, r#"<rect width="{}" height="{}" fill="white" />"#, self.width, self.height);

        for elem in &self.elements {
            render_element(&mut out, elem);
        }
        for (clip_id, children) in &self.clip_stack {
            render_element(&mut out, &SvgElement::Group { clip_id: clip_id.clone(), children: children.clone() });
        }

        out.push_str("</svg>\n");
        out
    }
}

fn render_element(out: &mut String, elem: &SvgElement) {
    match elem {
        SvgElement::Rect { x, y, w, h, fill } => {
            let _ = write!(out, r#"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}""#);
            let _ = write!(out, r#" fill="{}""#, fill.color);
            if let Some(border) = &fill.border {
                write_line_attrs(out, border);
            }
            out.push_str(" />\n");
        }
        SvgElement::Line { x1, y1, x2, y2, line } => {
            let _ = write!(out, r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}""#);
            write_line_attrs(out, line);
            out.push_str(" />\n");
        }
        SvgElement::Polyline { points, line } => {
            out.push_str(r#"<polyline points=""#);
            for (i, (x, y)) in points.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                let _ = write!(out, "{x:.2},{y:.2}");
            }
            out.push_str(r#"" fill="none""#);
            write_line_attrs(out, line);
            out.push_str(" />\n");
        }
        SvgElement::Text { x, y, content, text, rotate } => {
            let _ = write!(out, r#"<text x="{x:.2}" y="{y:.2}""#);
            let _ = write!(out, r#" font-family="{SVG_FONT_FAMILY}" font-size="{:.1}""#, text.size);
            let _ = write!(out, r#" fill="{}""#, text.color);
            let _ = write!(out, r#" text-anchor="{}""#, text.align.svg_anchor());
            let _ = write!(out, r#" dominant-baseline="{}""#, text.align.svg_baseline());
            match text.face {
                FontFace::Bold => out.push_str(r#" font-weight="bold""#),
                FontFace::Italic => out.push_str(r#" font-style="italic""#),
                FontFace::Regular => {}
            }
            if let Some(angle) = rotate {
                let _ = write!(out, r#" transform="rotate({angle:.1},{x:.2},{y:.2})""#);
            }
            out.push('>');
            push_escaped(out, content);
            out.push_str("</text>\n");
        }
        SvgElement::Group { clip_id, children } => {
            let _ = writeln!(out, r#"<g clip-path="url(#{clip_id})">"#);
            for child in children {
                render_element(out, child);
            }
            out.push_str("</g>\n");
        }
    }
}

fn push_escaped(out: &mut String, content: &str) {
    for ch in content.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

fn write_line_attrs(out: &mut String, line: &LineAtt) {
    let _ = write!(out, r#" stroke="{}" stroke-width="{:.2}""#, line.color, line.width);
    if let Some(dash) = line.kind.dash_array() {
        let _ = write!(out, r#" stroke-dasharray="{dash}""#);
    }
}
