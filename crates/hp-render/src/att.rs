//! Drawing attributes after ROOT's `TAttLine`, `TAttFill` and `TAttText`.
//!
//! Text alignment uses ROOT's two-digit code: tens for horizontal
//! (1 left, 2 center, 3 right), units for vertical (1 bottom, 2 middle,
//! 3 top). `TextAtt::default().align(23)` is centered text hanging below
//! its anchor point.

use crate::color::Color;

/// ROOT line styles 1 to 3.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineKind {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl LineKind {
    /// `stroke-dasharray`, `None` for solid lines.
    pub fn dash_array(self) -> Option<&'static str> {
        match self {
            LineKind::Solid => None,
            LineKind::Dashed => Some("3 3"),
            LineKind::Dotted => Some("1 2"),
        }
    }
}

/// Stroke of lines, outlines and error bars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineAtt {
    pub color: Color,
    pub width: f64,
    pub kind: LineKind,
}

impl LineAtt {
    pub const fn new(color: Color, width: f64) -> Self {
        Self { color, width, kind: LineKind::Solid }
    }

    pub const fn kind(mut self, kind: LineKind) -> Self {
        self.kind = kind;
        self
    }
}

impl Default for LineAtt {
    fn default() -> Self {
        Self::new(Color::BLACK, 1.0)
    }
}

/// Solid area fill, optionally outlined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillAtt {
    pub color: Color,
    pub border: Option<LineAtt>,
}

impl FillAtt {
    pub const fn new(color: Color) -> Self {
        Self { color, border: None }
    }

    pub const fn border(mut self, line: LineAtt) -> Self {
        self.border = Some(line);
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FontFace {
    #[default]
    Regular,
    Bold,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Bottom,
    Middle,
    Top,
}

/// Where the anchor point sits on a text's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextAlign {
    pub h: HAlign,
    pub v: VAlign,
}

impl TextAlign {
    /// Decode a ROOT align code; digits out of range fall back to left/bottom.
    pub fn from_code(code: u8) -> Self {
        let h = match code / 10 {
            2 => HAlign::Center,
            3 => HAlign::Right,
            _ => HAlign::Left,
        };
        let v = match code % 10 {
            2 => VAlign::Middle,
            3 => VAlign::Top,
            _ => VAlign::Bottom,
        };
        Self { h, v }
    }

    pub fn code(self) -> u8 {
        let h = match self.h {
            HAlign::Left => 1,
            HAlign::Center => 2,
            HAlign::Right => 3,
        };
        let v = match self.v {
            VAlign::Bottom => 1,
            VAlign::Middle => 2,
            VAlign::Top => 3,
        };
        10 * h + v
    }

    pub fn svg_anchor(self) -> &'static str {
        match self.h {
            HAlign::Left => "start",
            HAlign::Center => "middle",
            HAlign::Right => "end",
        }
    }

    pub fn svg_baseline(self) -> &'static str {
        match self.v {
            VAlign::Bottom => "auto",
            VAlign::Middle => "central",
            VAlign::Top => "hanging",
        }
    }
}

impl Default for TextAlign {
    fn default() -> Self {
        Self::from_code(11)
    }
}

/// Size (points), color, face and alignment of a text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextAtt {
    pub size: f64,
    pub color: Color,
    pub face: FontFace,
    pub align: TextAlign,
}

impl Default for TextAtt {
    fn default() -> Self {
        Self { size: 10.0, color: Color::BLACK, face: FontFace::Regular, align: TextAlign::default() }
    }
}

impl TextAtt {
    pub fn sized(size: f64) -> Self {
        Self { size, ..Default::default() }
    }

    /// Same text with ROOT align code `code`.
    pub fn align(mut self, code: u8) -> Self {
        self.align = TextAlign::from_code(code);
        self
    }

    pub fn face(mut self, face: FontFace) -> Self {
        self.face = face;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_codes() {
        for code in [11, 12, 13, 21, 22, 23, 31, 32, 33] {
            assert_eq!(TextAlign::from_code(code).code(), code);
        }
        assert_eq!(TextAlign::from_code(0), TextAlign::default());
        let centered_top = TextAlign::from_code(23);
        assert_eq!((centered_top.svg_anchor(), centered_top.svg_baseline()), ("middle", "hanging"));
        let right_middle = TextAlign::from_code(32);
        assert_eq!((right_middle.svg_anchor(), right_middle.svg_baseline()), ("end", "central"));
    }

    #[test]
    fn builders() {
        let t = TextAtt::sized(14.0).align(31).face(FontFace::Bold);
        assert_eq!((t.size, t.align.h, t.face), (14.0, HAlign::Right, FontFace::Bold));
        assert_eq!(LineAtt::default().kind(LineKind::Dotted).kind.dash_array(), Some("1 2"));
        assert_eq!(FillAtt::new(Color::BLACK).border, None);
    }
}
