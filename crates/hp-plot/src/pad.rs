//! `Pad`: the drawing surface histograms are drawn onto.
//!
//! A pad records what was drawn and how the frame is set up (axis titles,
//! log flags, user ranges, legend, text). Nothing is laid out until
//! [`Pad::render_svg`], so hooks may change the frame after drawing, the way
//! a ROOT canvas is modified after `Draw`.

use std::path::Path;

use hp_render::att::{LineAtt, TextAtt};
use hp_render::canvas::Canvas;
use hp_render::color::{Color, viridis};
use hp_render::config::VizConfig;
use hp_render::frame::{color_bar_extent, draw_axes, draw_color_bar};
use hp_render::layout::axes::Axis;
use hp_render::layout::legend::{LegendEntry, LegendKind, draw_legend};
use hp_render::layout::margins::PlotArea;
use hp_render::output::OutputFormat;
use hp_render::plots::cells::{CellGrid, draw_cells};
use hp_render::plots::steps::{StepSeries, draw_steps};
use hp_root::Histogram;

use crate::error::{PlotError, Result};

/// Fallback lower bound of a log axis, relative to its upper bound.
const LOG_FLOOR_FRACTION: f64 = 1e-3;

/// Frame state of one axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PadAxis {
    /// Axis title; the first drawn histogram's title when empty.
    pub title: String,
    /// Visible range; derived from the drawn histograms when unset.
    pub range: Option<(f64, f64)>,
    /// Logarithmic scale.
    pub log: bool,
}

/// A histogram drawn onto the pad with its draw option.
#[derive(Debug, Clone)]
pub struct DrawnObject {
    /// Copy of the histogram at draw time.
    pub hist: Histogram,
    /// Draw option, e.g. `""` or `"same"`.
    pub option: String,
}

/// Range a histogram spans on axis `0..3` (x, y, z).
///
/// Axes beyond the histogram's dimension report its content range
/// ([`Histogram::minimum`] and [`Histogram::maximum`]), so for a 1D histogram
/// the y extent is the content range.
pub fn axis_extent(hist: &Histogram, axis: usize) -> (f64, f64) {
    match axis {
        0 => (hist.x_axis.min, hist.x_axis.max),
        1 if hist.dimension > 1 => (hist.y_axis.min, hist.y_axis.max),
        2 if hist.dimension > 2 => (hist.z_axis.min, hist.z_axis.max),
        _ => (hist.minimum(), hist.maximum()),
    }
}

/// Values a histogram places along axis `0..3`: bin edges for real axes,
/// in-range contents otherwise.
fn axis_values(hist: &Histogram, axis: usize) -> Vec<f64> {
    match axis {
        0 => hist.x_axis.bin_edges(),
        1 if hist.dimension > 1 => hist.y_axis.bin_edges(),
        2 if hist.dimension > 2 => hist.z_axis.bin_edges(),
        _ => hist.in_range_bins().into_iter().filter_map(|b| hist.contents.get(b).copied()).collect(),
    }
}

/// Replace a non-positive lower bound by the smallest positive value in
/// `values` below `hi`, else by `hi * 1e-3`.
fn positive_range(lo: f64, hi: f64, values: impl IntoIterator<Item = f64>) -> (f64, f64) {
    let hi = if hi > 0.0 { hi } else { 1.0 };
    if lo > 0.0 {
        return (lo, hi);
    }
    let smallest = values.into_iter().filter(|&v| v > 0.0 && v < hi).fold(f64::INFINITY, f64::min);
    let lo = if smallest.is_finite() { smallest } else { hi * LOG_FLOOR_FRACTION };
    (lo, hi)
}

/// Drawing surface for histograms.
#[derive(Debug, Clone)]
pub struct Pad {
    config: VizConfig,
    primitives: Vec<DrawnObject>,
    axes: [PadAxis; 3],
    legend: Vec<(usize, String)>,
    title: Option<String>,
    texts: Vec<String>,
}

impl Pad {
    /// Empty pad sized and styled by `config`.
    pub fn new(config: VizConfig) -> Self {
        Self {
            config,
            primitives: Vec::new(),
            axes: Default::default(),
            legend: Vec::new(),
            title: None,
            texts: Vec::new(),
        }
    }

    /// Render configuration.
    pub fn config(&self) -> &VizConfig {
        &self.config
    }

    /// Draw `hist`. Unless `option` contains `same`, the pad is cleared first.
    pub fn draw(&mut self, hist: &Histogram, option: &str) {
        if !option.to_ascii_lowercase().contains("same") {
            self.primitives.clear();
            self.legend.clear();
        }
        self.primitives.push(DrawnObject { hist: hist.clone(), option: option.to_string() });
    }

    /// Everything drawn, in draw order.
    pub fn primitives(&self) -> &[DrawnObject] {
        &self.primitives
    }

    /// Frame state of axis `0..3` (x, y, z).
    pub fn axis(&self, axis: usize) -> &PadAxis {
        &self.axes[axis.min(2)]
    }

    /// Mutable frame state of axis `0..3` (x, y, z).
    pub fn axis_mut(&mut self, axis: usize) -> &mut PadAxis {
        &mut self.axes[axis.min(2)]
    }

    /// Toggle the log scale of an axis.
    pub fn set_log(&mut self, axis: usize, on: bool) {
        self.axis_mut(axis).log = on;
    }

    /// Restrict the visible range of an axis.
    pub fn set_range_user(&mut self, axis: usize, lo: f64, hi: f64) {
        self.axis_mut(axis).range = Some((lo, hi));
    }

    /// Label the primitive drawn at `index` in the legend.
    pub fn add_legend_entry(&mut self, index: usize, label: impl Into<String>) {
        if index < self.primitives.len() {
            self.legend.push((index, label.into()));
        }
    }

    /// Legend labels added so far.
    pub fn legend_labels(&self) -> impl Iterator<Item = &str> {
        self.legend.iter().map(|(_, l)| l.as_str())
    }

    /// Title above the frame.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Free text line, stacked in the top-left corner of the frame.
    pub fn add_text(&mut self, text: impl Into<String>) {
        self.texts.push(text.into());
    }

    fn line_color(&self, index: usize) -> Color {
        self.config.palette.cycle(index)
    }

    /// User range of an axis, or the union of the primitives' extents.
    /// On a log axis `values` supplies candidates for a positive lower bound.
    fn resolved_range(&self, axis: usize, values: impl Fn(&Histogram) -> Vec<f64>) -> (f64, f64) {
        let state = self.axis(axis);
        let (lo, hi) = state.range.unwrap_or_else(|| {
            self.primitives.iter().map(|p| axis_extent(&p.hist, axis)).fold(
                (f64::MAX, -f64::MAX),
                |(lo, hi), (a, b)| (lo.min(a), hi.max(b)),
            )
        });
        if state.log {
            positive_range(lo, hi, self.primitives.iter().flat_map(|p| values(&p.hist)))
        } else {
            (lo, hi)
        }
    }

    fn build_axis(&self, axis: usize, (lo, hi): (f64, f64), fallback_title: &str) -> Axis {
        let state = self.axis(axis);
        let title = if state.title.is_empty() { fallback_title } else { &state.title };
        Axis::new(lo, hi, state.log, self.config.axes.target_ticks).with_label(title)
    }

    /// Lay out and draw everything into an SVG document.
    pub fn render_svg(&self) -> Result<String> {
        let first = &self.primitives.first().ok_or(PlotError::NothingToPlot)?.hist;
        let config = &self.config;
        let mut canvas = Canvas::new(config.figure.width, config.figure.height);

        let x_axis = self.build_axis(0, self.resolved_range(0, |h| axis_values(h, 0)), &first.x_axis.title);
        let y_axis = self.build_axis(1, self.resolved_range(1, |h| axis_values(h, 1)), &first.y_axis.title);

        // 3D histograms are shown as their x-y projection. Without a z range
        // set on the pad, the color scale spans the projected contents.
        let cell_plot = first.dimension >= 2;
        let z_axis = cell_plot.then(|| {
            let z_state = self.axis(2);
            let range = match z_state.range {
                None if first.dimension >= 3 => {
                    let projected: Vec<f64> = first.xy_projection().into_iter().flatten().collect();
                    let (lo, hi) =
                        projected.iter().fold((f64::MAX, -f64::MAX), |(lo, hi), &v| (lo.min(v), hi.max(v)));
                    if z_state.log { positive_range(lo, hi, projected) } else { (lo, hi) }
                }
                Some((lo, hi)) if first.dimension >= 3 && z_state.log => {
                    positive_range(lo, hi, first.xy_projection().into_iter().flatten())
                }
                _ => self.resolved_range(2, |h| axis_values(h, 2)),
            };
            self.build_axis(2, range, &first.z_axis.title)
        });

        let right_extra = z_axis.as_ref().map_or(0.0, |z| color_bar_extent(&canvas, z, config));
        let area = PlotArea::auto(&canvas, &y_axis, &x_axis, config, self.title.is_some(), right_extra);

        canvas.push_clip(area.left, area.top, area.width, area.height);
        for (i, drawn) in self.primitives.iter().enumerate() {
            let hist = &drawn.hist;
            if hist.dimension == 1 {
                let n = hist.x_axis.n_bins;
                let edges = hist.x_axis.bin_edges();
                let values: Vec<f64> = (1..=n).map(|ix| hist.bin_content(ix, 0, 0)).collect();
                let errors: Option<Vec<f64>> = (hist.sumw2.is_some() && config.histogram.error_bars)
                    .then(|| (1..=n).map(|ix| hist.bin_error(ix, 0, 0)).collect());
                let series = StepSeries { edges: &edges, values: &values, errors: errors.as_deref() };
                let line = LineAtt::new(self.line_color(i), config.histogram.line_width);
                draw_steps(&mut canvas, &area, &x_axis, &y_axis, &series, line);
            } else if let Some(z) = &z_axis {
                let x_edges = hist.x_axis.bin_edges();
                let y_edges = hist.y_axis.bin_edges();
                let values = hist.xy_projection();
                let grid = CellGrid { x_edges: &x_edges, y_edges: &y_edges, values: &values };
                draw_cells(&mut canvas, &area, &x_axis, &y_axis, z, &grid, viridis);
            }
        }
        canvas.pop_clip();

        draw_axes(&mut canvas, &area, &x_axis, &y_axis, config);
        if let Some(z) = &z_axis {
            draw_color_bar(&mut canvas, &area, z, viridis, config);
        }

        let entries: Vec<LegendEntry> = self
            .legend
            .iter()
            .map(|(i, label)| {
                let one_d = self.primitives.get(*i).is_some_and(|p| p.hist.dimension == 1);
                LegendEntry {
                    label: label.clone(),
                    color: if one_d { self.line_color(*i) } else { viridis(0.75) },
                    kind: if one_d { LegendKind::Line } else { LegendKind::FilledRect },
                }
            })
            .collect();
        draw_legend(&mut canvas, &area, &entries, config.font.size, config.histogram.legend_frame);

        if let Some(title) = &self.title {
            canvas.text(area.left, area.top - 10.0, title, TextAtt::sized(config.font.title_size));
        }
        // Top-left aligned, like TLatex with SetTextAlign(13).
        let free_text = TextAtt::sized(config.font.size).align(13);
        for (i, text) in self.texts.iter().enumerate() {
            let y = area.top + 8.0 + i as f64 * (config.font.size + 4.0);
            canvas.text(area.left + 8.0, y, text, free_text);
        }

        Ok(canvas.finish_svg())
    }

    /// Render and write the pad to `path`.
    pub fn save(&self, path: &Path, format: OutputFormat) -> Result<()> {
        let svg = self.render_svg()?;
        hp_render::render_to_file(&svg, format, path, &self.config)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hist(name: &str, contents: &[f64]) -> Histogram {
        let edges = (0..=contents.len()).map(|i| i as f64 * 10.0).collect();
        Histogram::from_bins_1d(name, edges, contents).unwrap()
    }

    #[test]
    fn draw_without_same_replaces_primitives() {
        let mut pad = Pad::new(VizConfig::default());
        pad.draw(&hist("a", &[1.0]), "");
        pad.draw(&hist("b", &[1.0]), "SAME");
        assert_eq!(pad.primitives().len(), 2);
        pad.draw(&hist("c", &[1.0]), "hist");
        assert_eq!(pad.primitives().len(), 1);
        assert_eq!(pad.primitives()[0].hist.name, "c");
    }

    #[test]
    fn empty_pad_has_nothing_to_render() {
        assert!(matches!(Pad::new(VizConfig::default()).render_svg(), Err(PlotError::NothingToPlot)));
    }

    #[test]
    fn extent_of_one_dimensional_histogram() {
        let h = hist("h", &[3.0, -1.0, 8.0]);
        assert_eq!(axis_extent(&h, 0), (0.0, 30.0));
        assert_eq!(axis_extent(&h, 1), (-1.0, 8.0));
        assert_eq!(axis_extent(&h, 2), (-1.0, 8.0));
    }

    #[test]
    fn log_lower_bound_uses_smallest_positive_value() {
        assert_eq!(positive_range(0.0, 100.0, [0.0, 5.0, 2.0, 300.0]), (2.0, 100.0));
        assert_eq!(positive_range(-4.0, 50.0, [0.0, -1.0]), (0.05, 50.0));
        assert_eq!(positive_range(1.0, 10.0, [0.5]), (1.0, 10.0));
    }

    #[test]
    fn rendered_svg_carries_titles_legend_and_text() {
        let mut pad = Pad::new(VizConfig::default());
        pad.draw(&hist("a", &[1.0, 4.0]), "");
        pad.draw(&hist("b", &[2.0, 3.0]), "same");
        pad.axis_mut(0).title = "m [GeV]".into();
        pad.set_range_user(1, 0.0, 5.0);
        pad.add_legend_entry(0, "signal");
        pad.add_legend_entry(1, "background");
        pad.add_legend_entry(7, "ignored");
        pad.set_title("Selection");
        pad.add_text("#sqrt{s} = 13 TeV");

        let svg = pad.render_svg().unwrap();
        for text in ["m [GeV]", "signal", "background", "Selection", "#sqrt{s} = 13 TeV"] {
            assert!(svg.contains(&format!(">{text}</text>")), "missing {text}");
        }
        assert!(!svg.contains("ignored"));
        assert_eq!(svg.matches("<polyline").count(), 2);
        assert!(svg.contains("clip-path"));
    }

    #[test]
    fn sumw2_adds_error_bars() {
        let mut h = hist("h", &[4.0, 9.0]);
        h.sumw2 = Some(vec![0.0, 4.0, 9.0, 0.0]);
        let mut pad = Pad::new(VizConfig::default());
        pad.draw(&h, "");
        pad.set_range_user(1, 0.0, 15.0);
        let with_errors = pad.render_svg().unwrap();

        let mut config = VizConfig::default();
        config.histogram.error_bars = false;
        let mut plain = Pad::new(config);
        plain.draw(&h, "");
        plain.set_range_user(1, 0.0, 15.0);
        let without = plain.render_svg().unwrap();

        assert!(with_errors.matches("<line").count() > without.matches("<line").count());
    }

    fn h3() -> Histogram {
        let mut h = hist("h3", &[1.0, 2.0]);
        h.dimension = 3;
        h.y_axis = hp_root::HistAxis::uniform(2, 0.0, 4.0);
        h.z_axis = hp_root::HistAxis::uniform(2, 0.0, 1.0);
        h.contents = (0..h.expected_cells()).map(|i| i as f64).collect();
        h
    }

    #[test]
    fn three_dimensional_color_scale_follows_z_range() {
        let mut pad = Pad::new(VizConfig::default());
        pad.draw(&h3(), "");
        let projected = pad.render_svg().unwrap();

        let mut limited = pad.clone();
        limited.set_range_user(2, 1000.0, 2000.0);
        let svg = limited.render_svg().unwrap();
        assert_ne!(projected, svg);
        // Projected contents all lie below 1000, so no cell is painted.
        assert_eq!(svg.matches("<rect x=").count(), projected.matches("<rect x=").count() - 4);
    }

    #[test]
    fn two_dimensional_histogram_gets_color_bar() {
        let mut h = hist("h2", &[1.0, 2.0]);
        h.dimension = 2;
        h.y_axis = hp_root::HistAxis::uniform(2, 0.0, 4.0);
        h.contents = (0..h.expected_cells()).map(|i| i as f64).collect();
        let mut pad = Pad::new(VizConfig::default());
        pad.draw(&h, "");
        pad.axis_mut(2).title = "weight".into();
        let svg = pad.render_svg().unwrap();
        assert!(svg.contains(">weight</text>"));
        assert!(svg.matches("<rect x=").count() >= 64);
    }
}
