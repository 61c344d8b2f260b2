//! The plot lifecycle shared by every plot module.

use crate::error::{PlotError, Result};
use crate::plot_data::PlotData;
use crate::processor::Processor;

const AXIS_NAMES: [&str; 3] = ["x", "y", "z"];

/// A processor that draws histograms and saves the picture.
///
/// [`run_lifecycle`](Self::run_lifecycle) calls the hooks in a fixed order:
///
/// ```text
/// create_canvas -> prepare_histograms -> make_plots -> modify_axes
///               -> add_labels -> add_texts -> save_canvas
/// ```
///
/// Implementors usually forward [`Processor::prepare_args`] to
/// [`prepare_plot_args`](Self::prepare_plot_args) and [`Processor::run`] to
/// `run_lifecycle`.
pub trait PlotBase: Processor {
    /// Create the drawing surface.
    fn create_canvas(&mut self, plot_data: &mut PlotData) -> Result<()>;

    /// Adjust histograms before drawing.
    fn prepare_histograms(&mut self, _plot_data: &mut PlotData) -> Result<()> {
        Ok(())
    }

    /// Draw every histogram onto the canvas.
    fn make_plots(&mut self, plot_data: &mut PlotData) -> Result<()>;

    /// Apply axis titles, log scales and ranges.
    fn modify_axes(&mut self, plot_data: &mut PlotData) -> Result<()>;

    /// Add the legend.
    fn add_labels(&mut self, _plot_data: &mut PlotData) -> Result<()> {
        Ok(())
    }

    /// Add title and free text.
    fn add_texts(&mut self, _plot_data: &mut PlotData) -> Result<()> {
        Ok(())
    }

    /// Write one file per requested format.
    fn save_canvas(&mut self, plot_data: &mut PlotData) -> Result<()>;

    /// Run all hooks in order, stopping at the first error.
    fn run_lifecycle(&mut self, plot_data: &mut PlotData) -> Result<()> {
        self.create_canvas(plot_data)?;
        self.prepare_histograms(plot_data)?;
        self.make_plots(plot_data)?;
        self.modify_axes(plot_data)?;
        self.add_labels(plot_data)?;
        self.add_texts(plot_data)?;
        self.save_canvas(plot_data)
    }

    /// Validate the options every plot module relies on and create the
    /// output directory. Duplicate formats are dropped.
    fn prepare_plot_args(&self, plot_data: &mut PlotData) -> Result<()> {
        let dict = &mut plot_data.plotdict;

        let mut formats = Vec::with_capacity(dict.formats.len());
        for f in dict.formats.drain(..) {
            if !formats.contains(&f) {
                formats.push(f);
            }
        }
        dict.formats = formats;
        if dict.formats.is_empty() {
            return Err(PlotError::InvalidArgs("no output format requested".into()));
        }

        if dict.filename.trim().is_empty() {
            return Err(PlotError::InvalidArgs("output filename is empty".into()));
        }

        for (axis, name) in AXIS_NAMES.iter().enumerate() {
            let Some([lo, hi]) = dict.lims(axis) else { continue };
            if !lo.is_finite() || !hi.is_finite() || lo >= hi {
                return Err(PlotError::InvalidArgs(format!(
                    "{name} limits [{lo}, {hi}] need finite values with lower < upper"
                )));
            }
            if dict.log(axis) && lo <= 0.0 {
                return Err(PlotError::InvalidArgs(format!(
                    "{name} axis is logarithmic, its lower limit {lo} must be positive"
                )));
            }
        }

        std::fs::create_dir_all(&dict.output_dir)
            .map_err(|source| PlotError::Io { path: dict.output_dir.clone(), source })
    }
}

#[cfg(test)]
mod tests {
    use hp_render::output::OutputFormat;

    use super::*;
    use crate::plot_data::PlotDict;

    #[derive(Default)]
    struct Recording {
        calls: Vec<&'static str>,
        fail_at: Option<&'static str>,
    }

    impl Recording {
        fn record(&mut self, hook: &'static str) -> Result<()> {
            self.calls.push(hook);
            match self.fail_at {
                Some(f) if f == hook => Err(PlotError::NothingToPlot),
                _ => Ok(()),
            }
        }
    }

    impl Processor for Recording {
        fn name(&self) -> &str {
            "Recording"
        }
    }

    impl PlotBase for Recording {
        fn create_canvas(&mut self, _: &mut PlotData) -> Result<()> {
            self.record("create_canvas")
        }
        fn prepare_histograms(&mut self, _: &mut PlotData) -> Result<()> {
            self.record("prepare_histograms")
        }
        fn make_plots(&mut self, _: &mut PlotData) -> Result<()> {
            self.record("make_plots")
        }
        fn modify_axes(&mut self, _: &mut PlotData) -> Result<()> {
            self.record("modify_axes")
        }
        fn add_labels(&mut self, _: &mut PlotData) -> Result<()> {
            self.record("add_labels")
        }
        fn add_texts(&mut self, _: &mut PlotData) -> Result<()> {
            self.record("add_texts")
        }
        fn save_canvas(&mut self, _: &mut PlotData) -> Result<()> {
            self.record("save_canvas")
        }
    }

    fn scratch_dir(tag: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("hp-plotbase-{tag}-{}", std::process::id()))
    }

    #[test]
    fn hooks_run_in_order() {
        let mut p = Recording::default();
        p.run_lifecycle(&mut PlotData::default()).unwrap();
        assert_eq!(
            p.calls,
            [
                "create_canvas",
                "prepare_histograms",
                "make_plots",
                "modify_axes",
                "add_labels",
                "add_texts",
                "save_canvas"
            ]
        );
    }

    #[test]
    fn failing_hook_stops_lifecycle() {
        let mut p = Recording { fail_at: Some("make_plots"), ..Default::default() };
        assert!(matches!(p.run_lifecycle(&mut PlotData::default()), Err(PlotError::NothingToPlot)));
        assert_eq!(p.calls.last(), Some(&"make_plots"));
        assert_eq!(p.calls.len(), 3);
    }

    #[test]
    fn validation_dedupes_formats_and_creates_dir() {
        let dir = scratch_dir("ok");
        let mut data = PlotData::new(PlotDict {
            output_dir: dir.join("nested"),
            formats: vec![OutputFormat::Svg, OutputFormat::Png, OutputFormat::Svg],
            x_lims: Some([0.0, 10.0]),
            ..Default::default()
        });
        Recording::default().prepare_plot_args(&mut data).unwrap();
        assert_eq!(data.plotdict.formats, [OutputFormat::Svg, OutputFormat::Png]);
        assert!(dir.join("nested").is_dir());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn validation_rejects_bad_options() {
        let dir = scratch_dir("bad");
        let base = PlotDict { output_dir: dir.clone(), ..Default::default() };
        let cases = [
            PlotDict { formats: vec![], ..base.clone() },
            PlotDict { filename: " ".into(), ..base.clone() },
            PlotDict { y_lims: Some([5.0, 1.0]), ..base.clone() },
            PlotDict { x_lims: Some([f64::NAN, 1.0]), ..base.clone() },
            PlotDict { z_log: true, z_lims: Some([0.0, 1.0]), ..base.clone() },
        ];
        for dict in cases {
            let mut data = PlotData::new(dict);
            let err = Recording::default().prepare_plot_args(&mut data).unwrap_err();
            assert!(matches!(err, PlotError::InvalidArgs(_)), "{err}");
        }
        let _ = std::fs::remove_dir_all(dir);
    }
}
