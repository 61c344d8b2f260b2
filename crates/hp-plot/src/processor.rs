//! The `Processor` trait and the pipeline that runs processors in order.

use crate::analysis::AnalysisBase;
use crate::error::Result;
use crate::plot_data::PlotData;
use crate::plotbase::PlotBase;

/// A step of a plot run.
///
/// Both hooks default to doing nothing, so a processor only implements the
/// phase it takes part in.
pub trait Processor {
    /// Name used in log messages.
    fn name(&self) -> &str;

    /// Validate and normalise options before anything runs.
    fn prepare_args(&mut self, _plot_data: &mut PlotData) -> Result<()> {
        Ok(())
    }

    /// Do the work.
    fn run(&mut self, _plot_data: &mut PlotData) -> Result<()> {
        Ok(())
    }
}

/// Ordered input, analysis and plot processors.
///
/// [`execute`](Self::execute) calls `prepare_args` on every processor, then
/// `run` on every processor, inputs first and plots last. The first error
/// aborts the run.
#[derive(Default)]
pub struct Pipeline {
    inputs: Vec<Box<dyn Processor>>,
    analyses: Vec<Box<dyn AnalysisBase>>,
    plots: Vec<Box<dyn PlotBase>>,
}

impl Pipeline {
    /// Empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an input module.
    pub fn add_input(&mut self, p: impl Processor + 'static) -> &mut Self {
        self.inputs.push(Box::new(p));
        self
    }

    /// Append an analysis module.
    pub fn add_analysis(&mut self, p: impl AnalysisBase + 'static) -> &mut Self {
        self.analyses.push(Box::new(p));
        self
    }

    /// Append a plot module.
    pub fn add_plot(&mut self, p: impl PlotBase + 'static) -> &mut Self {
        self.plots.push(Box::new(p));
        self
    }

    /// Number of processors.
    pub fn len(&self) -> usize {
        self.inputs.len() + self.analyses.len() + self.plots.len()
    }

    /// Whether no processor was added.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run every processor over `plot_data`.
    pub fn execute(&mut self, plot_data: &mut PlotData) -> Result<()> {
        for p in &mut self.inputs {
            tracing::debug!(processor = p.name(), "prepare_args");
            p.prepare_args(plot_data)?;
        }
        for p in &mut self.analyses {
            tracing::debug!(processor = p.name(), "prepare_args");
            p.prepare_args(plot_data)?;
        }
        for p in &mut self.plots {
            tracing::debug!(processor = p.name(), "prepare_args");
            p.prepare_args(plot_data)?;
        }

        for p in &mut self.inputs {
            tracing::debug!(processor = p.name(), "run");
            p.run(plot_data)?;
        }
        for p in &mut self.analyses {
            tracing::debug!(processor = p.name(), "run");
            p.run(plot_data)?;
        }
        for p in &mut self.plots {
            tracing::debug!(processor = p.name(), "run");
            p.run(plot_data)?;
        }
        Ok(())
    }
}
