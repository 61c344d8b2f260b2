//! Error types for the plotting pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by processors.
#[derive(Error, Debug)]
pub enum PlotError {
    /// Reading an input file or object failed.
    #[error(transparent)]
    Root(#[from] hp_root::RootError),

    /// Rendering or writing an image failed.
    #[error(transparent)]
    Render(#[from] hp_render::RenderError),

    /// File system error on a known path.
    #[error("{path}: {source}")]
    Io {
        /// Path being read or created.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// A plot configuration file could not be parsed.
    #[error("config error in {path}: {message}")]
    Config {
        /// Config file.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// Plot options failed validation.
    #[error("invalid plot arguments: {0}")]
    InvalidArgs(String),

    /// No histograms were available to draw.
    #[error("nothing to plot: no histograms loaded")]
    NothingToPlot,

    /// A lifecycle hook ran before the canvas was created.
    #[error("no canvas: '{0}' called before create_canvas")]
    NoCanvas(&'static str),
}

/// Result alias for plotting operations.
pub type Result<T> = std::result::Result<T, PlotError>;
