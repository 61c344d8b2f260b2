//! Input module reading histograms from ROOT files.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::PathBuf;

use hp_root::RootFile;
use indexmap::IndexSet;

use crate::error::{PlotError, Result};
use crate::plot_data::PlotData;
use crate::processor::Processor;

/// Loads every [`InputSpec`](crate::InputSpec) into `root_histos`.
///
/// Each distinct file is opened once. Histograms keep the order of the
/// inputs; duplicate nicks are rejected by `prepare_args`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RootInput;

impl RootInput {
    /// New module.
    pub fn new() -> Self {
        Self
    }
}

impl Processor for RootInput {
    fn name(&self) -> &str {
        "RootInput"
    }

    fn prepare_args(&mut self, plot_data: &mut PlotData) -> Result<()> {
        let mut seen = IndexSet::new();
        for spec in &plot_data.plotdict.inputs {
            if !seen.insert(spec.nick()) {
                return Err(PlotError::InvalidArgs(format!("duplicate input nick '{}'", spec.nick())));
            }
        }
        Ok(())
    }

    fn run(&mut self, plot_data: &mut PlotData) -> Result<()> {
        let mut files: HashMap<PathBuf, RootFile> = HashMap::new();
        for spec in &plot_data.plotdict.inputs {
            let file = match files.entry(spec.file.clone()) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => entry.insert(RootFile::open(&spec.file)?),
            };
            let hist = file.get_histogram(&spec.object)?;
            tracing::debug!(
                nick = spec.nick(),
                file = %spec.file.display(),
                object = spec.object.as_str(),
                class = hist.class_name.as_str(),
                "loaded histogram"
            );
            plot_data.root_histos.insert(spec.nick().to_string(), hist);
        }
        Ok(())
    }
}
