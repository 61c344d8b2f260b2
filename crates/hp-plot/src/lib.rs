//! # hp-plot
//!
//! Processor pipeline that turns ROOT histograms into plot files.
//!
//! A run threads one [`PlotData`] through a sequence of processors: input
//! modules fill `root_histos`, analysis modules transform them, and plot
//! modules draw and save. Every processor first validates its options in
//! `prepare_args`; only then does any `run` happen.
//!
//! ```no_run
//! use hp_plot::{InputSpec, Pipeline, PlotData, PlotDict, RootInput, RootPlot};
//!
//! let mut dict = PlotDict::default();
//! dict.inputs.push("signal=histos.root:sr/m_ll".parse::<InputSpec>().unwrap());
//! dict.x_label = "m_{ll} [GeV]".into();
//!
//! let mut pipeline = Pipeline::new();
//! pipeline.add_input(RootInput::new());
//! pipeline.add_plot(RootPlot::new());
//! pipeline.execute(&mut PlotData::new(dict)).unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod error;
pub mod input;
pub mod pad;
pub mod plot_data;
pub mod plotbase;
pub mod plotroot;
pub mod processor;

pub use analysis::{AnalysisBase, NormalizeToUnity};
pub use error::{PlotError, Result};
pub use input::RootInput;
pub use pad::{Pad, PadAxis};
pub use plot_data::{InputSpec, PlotData, PlotDict};
pub use plotbase::PlotBase;
pub use plotroot::{AxisExtent, RootPlot};
pub use processor::{Pipeline, Processor};
