//! Colors, line palettes and the sequential map used for 2D cells.
//!
//! Colors appear in configs as `#rrggbb`, `#rrggbbaa` or as one of ROOT's
//! basic color names (`kRed`, `kBlue`, ...).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::RenderError;

/// An sRGB color with straight alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

/// ROOT's basic colors `kWhite` through `kCyan`, in color index order.
const ROOT_BASIC: [(&str, Color); 8] = [
    ("kWhite", Color::from_u32(0xffffff)),
    ("kBlack", Color::from_u32(0x000000)),
    ("kRed", Color::from_u32(0xff0000)),
    ("kGreen", Color::from_u32(0x00ff00)),
    ("kBlue", Color::from_u32(0x0000ff)),
    ("kYellow", Color::from_u32(0xffff00)),
    ("kMagenta", Color::from_u32(0xff00ff)),
    ("kCyan", Color::from_u32(0x00ffff)),
];

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Opaque color from `0xrrggbb`.
    pub const fn from_u32(rgb: u32) -> Self {
        Self::rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    pub const fn with_alpha(mut self, a: f64) -> Self {
        self.a = a;
        self
    }

    /// Blend towards `other`; `t` is clamped to `[0, 1]`.
    pub fn mix(self, other: Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        let channel = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
        Color {
            r: channel(self.r, other.r),
            g: channel(self.g, other.g),
            b: channel(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }

    fn is_opaque(&self) -> bool {
        (self.a - 1.0).abs() < 1e-6
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// SVG paint: `#rrggbb` when opaque, `rgba(...)` otherwise.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "rgba({},{},{},{:.3})", self.r, self.g, self.b, self.a)
        }
    }
}

impl FromStr for Color {
    type Err = RenderError;

    fn from_str(s: &str) -> crate::Result<Self> {
        let s = s.trim();
        if let Some(&(_, c)) = ROOT_BASIC.iter().find(|(name, _)| *name == s) {
            return Ok(c);
        }
        let invalid = || {
            RenderError::Config(format!("invalid color '{s}' (expected #rrggbb, #rrggbbaa or a name like kRed)"))
        };
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if !matches!(hex.len(), 6 | 8) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let value = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
        Ok(if hex.len() == 6 {
            Color::from_u32(value)
        } else {
            Color::from_u32(value >> 8).with_alpha(f64::from(value & 0xff) / 255.0)
        })
    }
}

impl TryFrom<String> for Color {
    type Error = RenderError;

    fn try_from(s: String) -> crate::Result<Self> {
        s.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        if c.is_opaque() {
            c.to_string()
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", c.r, c.g, c.b, (c.a * 255.0).round() as u8)
        }
    }
}

/// Line colors cycled through by overlaid histograms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Palette {
    /// ROOT-style black, red, green, blue, magenta, cyan.
    #[default]
    RootClassic,
    Tableau10,
    Hep2026,
}

impl Palette {
    pub fn colors(self) -> &'static [Color] {
        const ROOT_CLASSIC: [Color; 6] = [
            Color::from_u32(0x000000),
            Color::from_u32(0xff0000),
            Color::from_u32(0x00cc00),
            Color::from_u32(0x0000ff),
            Color::from_u32(0xff00ff),
            Color::from_u32(0x00cccc),
        ];
        const TABLEAU10: [Color; 10] = [
            Color::from_u32(0x4e79a7),
            Color::from_u32(0xf28e2b),
            Color::from_u32(0xe15759),
            Color::from_u32(0x76b7b2),
            Color::from_u32(0x59a14f),
            Color::from_u32(0xedc948),
            Color::from_u32(0xb07aa1),
            Color::from_u32(0xff9da7),
            Color::from_u32(0x9c755f),
            Color::from_u32(0xbab0ab),
        ];
        const HEP2026: [Color; 10] = [
            Color::from_u32(0x4c78a8),
            Color::from_u32(0xf58518),
            Color::from_u32(0x54a24b),
            Color::from_u32(0xe45756),
            Color::from_u32(0x72b7b2),
            Color::from_u32(0xeeca3b),
            Color::from_u32(0xb279a2),
            Color::from_u32(0xff9da6),
            Color::from_u32(0x9d755d),
            Color::from_u32(0xbab0ac),
        ];
        match self {
            Palette::RootClassic => &ROOT_CLASSIC,
            Palette::Tableau10 => &TABLEAU10,
            Palette::Hep2026 => &HEP2026,
        }
    }

    /// Color of the `index`-th overlaid histogram.
    pub fn cycle(self, index: usize) -> Color {
        let colors = self.colors();
        colors[index % colors.len()]
    }
}

/// Stops of ROOT's `kViridis` palette.
const VIRIDIS: [Color; 5] = [
    Color::from_u32(0x440154),
    Color::from_u32(0x3b528b),
    Color::from_u32(0x21918c),
    Color::from_u32(0x5ec962),
    Color::from_u32(0xfde725),
];

/// Sequential map for cell contents: 0 is dark purple, 1 is yellow.
pub fn viridis(t: f64) -> Color {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let pos = t * (VIRIDIS.len() - 1) as f64;
    let i = (pos.floor() as usize).min(VIRIDIS.len() - 2);
    VIRIDIS[i].mix(VIRIDIS[i + 1], pos - i as f64)
}
