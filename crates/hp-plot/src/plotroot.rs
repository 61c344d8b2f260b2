//! `RootPlot`: overlays every loaded histogram on a single pad.

use hp_render::config::VizConfig;

use crate::error::{PlotError, Result};
use crate::pad::{Pad, axis_extent};
use crate::plot_data::PlotData;
use crate::plotbase::PlotBase;
use crate::processor::Processor;

/// Running minimum and maximum of one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisExtent {
    /// Smallest value seen, `f64::MAX` before any.
    pub min: f64,
    /// Largest value seen, `-f64::MAX` before any.
    pub max: f64,
}

impl Default for AxisExtent {
    fn default() -> Self {
        Self { min: f64::MAX, max: -f64::MAX }
    }
}

impl AxisExtent {
    fn include(&mut self, (lo, hi): (f64, f64)) {
        if lo < self.min {
            self.min = lo;
        }
        if hi > self.max {
            self.max = hi;
        }
    }
}

/// Plot module drawing all `root_histos` on one pad, the first one defining
/// the frame and the others drawn with `same`.
#[derive(Debug, Clone, Default)]
pub struct RootPlot {
    config: VizConfig,
    pad: Option<Pad>,
    extents: [AxisExtent; 3],
}

impl RootPlot {
    /// Plot module with the default render configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Plot module with a resolved render configuration.
    pub fn with_config(config: VizConfig) -> Self {
        Self { config, ..Default::default() }
    }

    /// The pad, once `create_canvas` ran.
    pub fn pad(&self) -> Option<&Pad> {
        self.pad.as_ref()
    }

    /// Extent of axis `0..3` (x, y, z) found by `make_plots`.
    pub fn extent(&self, axis: usize) -> AxisExtent {
        self.extents[axis.min(2)]
    }

    fn pad_mut(&mut self, hook: &'static str) -> Result<&mut Pad> {
        self.pad.as_mut().ok_or(PlotError::NoCanvas(hook))
    }
}

impl Processor for RootPlot {
    fn name(&self) -> &str {
        "RootPlot"
    }

    fn prepare_args(&mut self, plot_data: &mut PlotData) -> Result<()> {
        self.prepare_plot_args(plot_data)
    }

    fn run(&mut self, plot_data: &mut PlotData) -> Result<()> {
        self.run_lifecycle(plot_data)
    }
}

impl PlotBase for RootPlot {
    fn create_canvas(&mut self, _plot_data: &mut PlotData) -> Result<()> {
        self.pad = Some(Pad::new(self.config.clone()));
        Ok(())
    }

    fn make_plots(&mut self, plot_data: &mut PlotData) -> Result<()> {
        if plot_data.root_histos.is_empty() {
            return Err(PlotError::NothingToPlot);
        }
        let mut extents = [AxisExtent::default(); 3];
        let pad = self.pad_mut("make_plots")?;

        for (index, (nick, hist)) in plot_data.root_histos.iter().enumerate() {
            let option = if index == 0 { "" } else { "same" };
            pad.draw(hist, option);
            for (axis, extent) in extents.iter_mut().enumerate() {
                extent.include(axis_extent(hist, axis));
            }
            tracing::debug!(nick = nick.as_str(), dimension = hist.dimension, option, "drew histogram");
        }
        self.extents = extents;
        Ok(())
    }

    fn modify_axes(&mut self, plot_data: &mut PlotData) -> Result<()> {
        let extents = self.extents;
        let pad = self.pad_mut("modify_axes")?;
        if pad.primitives().is_empty() {
            return Err(PlotError::NothingToPlot);
        }
        let dict = &plot_data.plotdict;
        for (axis, extent) in extents.iter().enumerate() {
            pad.axis_mut(axis).title = dict.label(axis).to_string();
            pad.set_log(axis, dict.log(axis));
            let [lo, hi] = dict.lims(axis).unwrap_or([extent.min, extent.max]);
            pad.set_range_user(axis, lo, hi);
        }
        Ok(())
    }

    fn add_labels(&mut self, plot_data: &mut PlotData) -> Result<()> {
        let labels = &plot_data.plotdict.labels;
        if plot_data.root_histos.len() < 2 && labels.is_empty() {
            return Ok(());
        }
        let pad = self.pad_mut("add_labels")?;
        for (index, (nick, hist)) in plot_data.root_histos.iter().enumerate() {
            let label = match labels.get(nick) {
                Some(label) => label.as_str(),
                None if !hist.title.is_empty() => hist.title.as_str(),
                None => nick.as_str(),
            };
            pad.add_legend_entry(index, label);
        }
        Ok(())
    }

    fn add_texts(&mut self, plot_data: &mut PlotData) -> Result<()> {
        let pad = self.pad_mut("add_texts")?;
        if let Some(title) = &plot_data.plotdict.title {
            pad.set_title(title.as_str());
        }
        for text in &plot_data.plotdict.texts {
            pad.add_text(text.as_str());
        }
        Ok(())
    }

    fn save_canvas(&mut self, plot_data: &mut PlotData) -> Result<()> {
        let pad = self.pad.as_ref().ok_or(PlotError::NoCanvas("save_canvas"))?;
        for &format in &plot_data.plotdict.formats {
            let path = plot_data.output_path(format);
            pad.save(&path, format)?;
            tracing::info!("Created plot \"{}\".", path.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use hp_root::{HistAxis, Histogram};

    use super::*;
    use crate::plot_data::PlotDict;

    fn h1(name: &str, edges: &[f64], contents: &[f64]) -> Histogram {
        Histogram::from_bins_1d(name, edges.to_vec(), contents).unwrap()
    }

    fn data(dict: PlotDict, hists: Vec<Histogram>) -> PlotData {
        let mut data = PlotData::new(dict);
        for h in hists {
            data.root_histos.insert(h.name.clone(), h);
        }
        data
    }

    fn drawn(plot: &mut RootPlot, data: &mut PlotData) {
        plot.create_canvas(data).unwrap();
        plot.make_plots(data).unwrap();
    }

    #[test]
    fn tracks_extents_over_all_histograms() {
        let mut d = data(
            PlotDict::default(),
            vec![h1("a", &[0.0, 5.0, 10.0], &[2.0, 6.0]), h1("b", &[-5.0, 0.0, 8.0], &[-1.0, 3.0])],
        );
        let mut plot = RootPlot::new();
        drawn(&mut plot, &mut d);

        assert_eq!(plot.extent(0), AxisExtent { min: -5.0, max: 10.0 });
        assert_eq!(plot.extent(1), AxisExtent { min: -1.0, max: 6.0 });
        assert_eq!(plot.extent(2), AxisExtent { min: -1.0, max: 6.0 });

        let options: Vec<_> =
            plot.pad().unwrap().primitives().iter().map(|p| p.option.as_str()).collect();
        assert_eq!(options, ["", "same"]);
    }

    #[test]
    fn two_dimensional_extents_come_from_axes() {
        let mut h = h1("h2", &[0.0, 1.0, 2.0], &[0.0, 0.0]);
        h.dimension = 2;
        h.y_axis = HistAxis::uniform(2, 10.0, 30.0);
        h.contents = (0..h.expected_cells()).map(|i| i as f64).collect();
        let mut d = data(PlotDict::default(), vec![h]);
        let mut plot = RootPlot::new();
        drawn(&mut plot, &mut d);

        assert_eq!(plot.extent(1), AxisExtent { min: 10.0, max: 30.0 });
        // In-range cells of a 2x2 grid with flows: 5, 6, 9, 10.
        assert_eq!(plot.extent(2), AxisExtent { min: 5.0, max: 10.0 });
    }

    #[test]
    fn user_limits_titles_and_logs_reach_the_pad() {
        let dict = PlotDict {
            x_label: "p_T".into(),
            x_lims: Some([1.0, 4.0]),
            y_log: true,
            ..Default::default()
        };
        let mut d = data(dict, vec![h1("a", &[0.0, 5.0, 10.0], &[2.0, 6.0])]);
        let mut plot = RootPlot::new();
        drawn(&mut plot, &mut d);
        plot.modify_axes(&mut d).unwrap();

        let pad = plot.pad().unwrap();
        assert_eq!(pad.axis(0).title, "p_T");
        assert_eq!(pad.axis(1).title, "Events");
        assert_eq!(pad.axis(0).range, Some((1.0, 4.0)));
        assert_eq!(pad.axis(1).range, Some((2.0, 6.0)));
        assert!(pad.axis(1).log && !pad.axis(0).log && !pad.axis(2).log);
    }

    #[test]
    fn legend_needs_two_histograms_or_a_label() {
        let mut single = data(PlotDict::default(), vec![h1("a", &[0.0, 1.0], &[1.0])]);
        let mut plot = RootPlot::new();
        drawn(&mut plot, &mut single);
        plot.add_labels(&mut single).unwrap();
        assert_eq!(plot.pad().unwrap().legend_labels().count(), 0);

        let mut dict = PlotDict::default();
        dict.labels.insert("b".into(), "Background".into());
        let mut pair = data(dict, vec![h1("a", &[0.0, 1.0], &[1.0]), h1("b", &[0.0, 1.0], &[2.0])]);
        let mut plot = RootPlot::new();
        drawn(&mut plot, &mut pair);
        plot.add_labels(&mut pair).unwrap();
        let labels: Vec<_> = plot.pad().unwrap().legend_labels().collect();
        assert_eq!(labels, ["a", "Background"]);
    }

    #[test]
    fn hooks_before_create_canvas_fail() {
        let mut d = data(PlotDict::default(), vec![h1("a", &[0.0, 1.0], &[1.0])]);
        let mut plot = RootPlot::new();
        assert!(matches!(plot.make_plots(&mut d), Err(PlotError::NoCanvas("make_plots"))));
        assert!(matches!(plot.save_canvas(&mut d), Err(PlotError::NoCanvas("save_canvas"))));
    }

    #[test]
    fn no_histograms_is_an_error() {
        let mut d = PlotData::default();
        let mut plot = RootPlot::new();
        plot.create_canvas(&mut d).unwrap();
        assert!(matches!(plot.make_plots(&mut d), Err(PlotError::NothingToPlot)));
    }
}
