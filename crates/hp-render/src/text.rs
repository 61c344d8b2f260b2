use ab_glyph::{Font, ScaleFont};

use crate::font::FontHandle;
use crate::att::{FontFace, TextAtt};

/// Average advance of a sans-serif glyph, in ems, when no face is loaded.
const FALLBACK_ADVANCE_EM: f64 = 0.55;
const FALLBACK_BOLD_ADVANCE_EM: f64 = 0.6;

#[derive(Debug, Clone, Copy)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub ascent: f64,
}

/// Measure text width and height in points using ab_glyph.
pub fn measure_text<F: Font>(font: &F, text: &str, size_pt: f64) -> TextMetrics {
    let scale = ab_glyph::PxScale::from(size_pt as f32);
    let scaled = font.as_scaled(scale);

    let mut width: f32 = 0.0;
    let mut prev_glyph_id = None;
    for ch in text.chars() {
        let glyph_id = scaled.glyph_id(ch);
        if let Some(prev) = prev_glyph_id {
            width += scaled.kern(prev, glyph_id);
        }
        width += scaled.h_advance(glyph_id);
        prev_glyph_id = Some(glyph_id);
    }

    let ascent = scaled.ascent();
    let descent = scaled.descent();

    TextMetrics {
        width: width as f64,
        height: (ascent - descent) as f64,
        ascent: ascent as f64,
    }
}

/// Width estimate for when no font face is available.
pub fn estimate_text(text: &str, style: TextAtt) -> TextMetrics {
    let em = match style.face {
        FontFace::Bold => FALLBACK_BOLD_ADVANCE_EM,
        FontFace::Regular | FontFace::Italic => FALLBACK_ADVANCE_EM,
    };
    TextMetrics {
        width: text.chars().count() as f64 * style.size * em,
        height: style.size * 1.2,
        ascent: style.size * 0.9,
    }
}

/// Measure text in the face `style` asks for.
pub fn measure_styled(fonts: &FontHandle, text: &str, style: TextAtt) -> TextMetrics {
    match fonts.select(style.face) {
        Some(font) => measure_text(font, text, style.size),
        None => estimate_text(text, style),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longer_text_is_wider() {
        let fonts = FontHandle::shared();
        let style = TextAtt::sized(12.0);
        let short = measure_styled(fonts, "Hi", style);
        let long = measure_styled(fonts, "Hello, histograms", style);
        assert!(long.width > short.width);
        assert!(long.height > 8.0);
        assert!(long.ascent > 0.0);
    }

    #[test]
    fn estimate_without_faces() {
        let style = TextAtt::sized(10.0);
        let m = measure_styled(&FontHandle::empty(), "abcd", style);
        approx::assert_abs_diff_eq!(m.width, 22.0, epsilon = 1e-9);
        assert!(estimate_text("abcd", style.face(FontFace::Bold)).width > m.width);
    }
}
