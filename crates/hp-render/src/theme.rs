use crate::color::{Color, Palette};
use crate::config::*;

/// Built-in theme presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinTheme {
    Default,
    Minimal,
}

impl BuiltinTheme {
    pub const NAMES: &'static [&'static str] = &["default", "minimal"];

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "default" => Some(Self::Default),
            "minimal" => Some(Self::Minimal),
            _ => None,
        }
    }

    pub fn base_config(self) -> VizConfig {
        match self {
            Self::Default => default_theme(),
            Self::Minimal => minimal(),
        }
    }
}

/// ROOT-like look: ticks inside on all four sides, classic line colors.
fn default_theme() -> VizConfig {
    VizConfig {
        theme: "default".into(),
        figure: FigureConfig::default(),
        font: FontConfig::default(),
        axes: AxesConfig::default(),
        grid: GridConfig::default(),
        palette: Palette::RootClassic,
        histogram: HistogramConfig::default(),
        output: OutputConfig::default(),
    }
}

fn minimal() -> VizConfig {
    VizConfig {
        theme: "minimal".into(),
        figure: FigureConfig { width: 432.0, height: 302.4 },
        font: FontConfig { size: 9.0, label_size: 10.0, tick_size: 8.0, title_size: 11.0 },
        axes: AxesConfig {
            tick_direction: "out".into(),
            show_top_ticks: false,
            show_right_ticks: false,
            tick_length: 4.0,
            minor_tick_length: 2.0,
            target_ticks: 5,
        },
        grid: GridConfig { show: true, color: Color::from_u32(0xcbd5e1), alpha: 0.55 },
        palette: Palette::Tableau10,
        histogram: HistogramConfig { legend_frame: false, ..HistogramConfig::default() },
        ..default_theme()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for name in BuiltinTheme::NAMES {
            let theme = BuiltinTheme::parse(name).unwrap();
            assert_eq!(theme.base_config().theme, *name);
        }
        assert_eq!(BuiltinTheme::parse("MINIMAL"), Some(BuiltinTheme::Minimal));
    }
}
