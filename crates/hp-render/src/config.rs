use serde::{Deserialize, Serialize};
use serde_yaml_ng::Value;

use crate::color::{Color, Palette};
use crate::theme::BuiltinTheme;

/// Top-level rendering configuration (YAML or programmatic).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VizConfig {
    pub theme: String,
    pub figure: FigureConfig,
    pub font: FontConfig,
    pub axes: AxesConfig,
    pub grid: GridConfig,
    pub palette: Palette,
    pub histogram: HistogramConfig,
    pub output: OutputConfig,
}

impl Default for VizConfig {
    fn default() -> Self {
        BuiltinTheme::Default.base_config()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width: 576.0,  // 8" * 72
            height: 432.0, // 6" * 72
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub size: f64,
    pub label_size: f64,
    pub tick_size: f64,
    pub title_size: f64,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self { size: 10.0, label_size: 12.0, tick_size: 10.0, title_size: 14.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AxesConfig {
    pub tick_direction: String,
    pub show_top_ticks: bool,
    pub show_right_ticks: bool,
    pub tick_length: f64,
    pub minor_tick_length: f64,
    /// Approximate number of major ticks on linear axes.
    pub target_ticks: usize,
}

impl Default for AxesConfig {
    fn default() -> Self {
        Self {
            tick_direction: "in".into(),
            show_top_ticks: true,
            show_right_ticks: true,
            tick_length: 8.0,
            minor_tick_length: 4.0,
            target_ticks: 6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub show: bool,
    pub color: Color,
    pub alpha: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { show: false, color: Color::from_u32(0xcbd5e1), alpha: 0.55 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistogramConfig {
    pub line_width: f64,
    /// Draw error bars for histograms that store squared weights.
    pub error_bars: bool,
    /// Frame around the legend box.
    pub legend_frame: bool,
    /// Width of the z color bar next to 2D plots.
    pub colorbar_width: f64,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self { line_width: 1.5, error_bars: true, legend_frame: true, colorbar_width: 16.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dpi: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { dpi: 144 }
    }
}

/// Resolve a VizConfig from a theme name and optional YAML overrides.
///
/// Keys present in the YAML replace the theme's values; nested sections are
/// merged key by key, so `font: {size: 12}` keeps the theme's other font sizes.
pub fn resolve_config(theme: &str, user_yaml: Option<&str>) -> crate::Result<VizConfig> {
    let theme = BuiltinTheme::parse(theme).ok_or_else(|| {
        crate::RenderError::Config(format!(
            "unknown theme '{theme}' (available: {})",
            BuiltinTheme::NAMES.join(", ")
        ))
    })?;
    let base = theme.base_config();
    let Some(yaml) = user_yaml else {
        return Ok(base);
    };

    let overrides: Value =
        serde_yaml_ng::from_str(yaml).map_err(|e| crate::RenderError::Config(e.to_string()))?;
    if overrides.is_null() {
        return Ok(base);
    }
    if !overrides.is_mapping() {
        return Err(crate::RenderError::Config("style overrides must be a YAML mapping".into()));
    }

    let mut merged =
        serde_yaml_ng::to_value(&base).map_err(|e| crate::RenderError::Config(e.to_string()))?;
    merge(&mut merged, overrides);
    serde_yaml_ng::from_value(merged).map_err(|e| crate::RenderError::Config(e.to_string()))
}

fn merge(base: &mut Value, overrides: Value) {
    match (base, overrides) {
        (Value::Mapping(base), Value::Mapping(overrides)) => {
            for (key, value) in overrides {
                match base.get_mut(&key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_without_overrides() {
        let c = resolve_config("minimal", None).unwrap();
        assert_eq!(c.theme, "minimal");
        assert_eq!(c.axes.tick_direction, "out");
    }

    #[test]
    fn overrides_merge_into_theme() {
        let yaml = "font:\n  size: 13\nfigure:\n  width: 300\ngrid:\n  color: '#112233'\n";
        let c = resolve_config("default", Some(yaml)).unwrap();
        assert_eq!(c.font.size, 13.0);
        assert_eq!(c.font.label_size, FontConfig::default().label_size);
        assert_eq!(c.figure.width, 300.0);
        assert_eq!(c.figure.height, 432.0);
        assert_eq!(c.grid.color, Color::from_u32(0x112233));
    }

    #[test]
    fn empty_yaml_is_the_theme() {
        let c = resolve_config("default", Some("")).unwrap();
        assert_eq!(c.theme, "default");
    }

    #[test]
    fn unknown_theme_is_an_error() {
        assert!(matches!(resolve_config("neon", None), Err(crate::RenderError::Config(_))));
    }

    #[test]
    fn bad_yaml_is_an_error() {
        assert!(resolve_config("default", Some("font: [1, 2")).is_err());
        assert!(resolve_config("default", Some("- a list")).is_err());
    }

    #[test]
    fn palette_and_colors_are_checked() {
        let c = resolve_config("default", Some("palette: hep2026\ngrid:\n  color: kBlue\n")).unwrap();
        assert_eq!(c.palette, Palette::Hep2026);
        assert_eq!(c.grid.color, Color::rgb(0, 0, 255));
        assert!(resolve_config("default", Some("palette: rainbow")).is_err());
        assert!(resolve_config("default", Some("grid: {color: '#12'}")).is_err());
    }
}
