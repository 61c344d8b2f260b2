//! Plot options and the histograms they act on.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use hp_render::output::OutputFormat;
use hp_root::Histogram;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{PlotError, Result};

/// One histogram to load: `object` inside ROOT file `file`, stored under `nick`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputSpec {
    /// Key in [`PlotData::root_histos`]; the object path when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nick: Option<String>,
    /// ROOT file path.
    pub file: PathBuf,
    /// Object path inside the file, e.g. `sr/m_ll`.
    pub object: String,
}

impl InputSpec {
    /// Effective nick.
    pub fn nick(&self) -> &str {
        self.nick.as_deref().unwrap_or(&self.object)
    }
}

impl fmt::Display for InputSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(nick) = &self.nick {
            write!(f, "{nick}=")?;
        }
        write!(f, "{}:{}", self.file.display(), self.object)
    }
}

/// Parses `[nick=]file.root:path/to/object`.
impl FromStr for InputSpec {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self> {
        // An `=` inside a directory name belongs to the file path.
        let (nick, rest) = match s.split_once('=') {
            Some((nick, rest)) if !nick.contains(['/', '\\', ':']) && rest.contains(':') => {
                (Some(nick.trim()), rest)
            }
            _ => (None, s),
        };
        let (file, object) = rest.rsplit_once(':').ok_or_else(|| {
            PlotError::InvalidArgs(format!("input '{s}' must look like [nick=]file.root:path/to/object"))
        })?;
        let object = object.trim().trim_matches('/');
        if file.trim().is_empty() || object.is_empty() {
            return Err(PlotError::InvalidArgs(format!("input '{s}' is missing a file or object path")));
        }
        if nick == Some("") {
            return Err(PlotError::InvalidArgs(format!("input '{s}' has an empty nick")));
        }
        Ok(Self {
            nick: nick.map(str::to_string),
            file: PathBuf::from(file.trim()),
            object: object.to_string(),
        })
    }
}

/// Options steering a plot run.
///
/// Every field has a default, so a config file only lists what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlotDict {
    /// Legend label per nick.
    pub labels: IndexMap<String, String>,
    /// Title drawn above the frame.
    pub title: Option<String>,
    /// Free text lines drawn in the top-left corner of the frame.
    pub texts: Vec<String>,
    /// X axis title.
    pub x_label: String,
    /// Y axis title.
    pub y_label: String,
    /// Z axis title (color bar of 2D plots).
    pub z_label: String,
    /// Logarithmic x axis.
    pub x_log: bool,
    /// Logarithmic y axis.
    pub y_log: bool,
    /// Logarithmic z axis.
    pub z_log: bool,
    /// User x range, overriding the range found from the histograms.
    pub x_lims: Option<[f64; 2]>,
    /// User y range.
    pub y_lims: Option<[f64; 2]>,
    /// User z range.
    pub z_lims: Option<[f64; 2]>,
    /// Directory plots are written to.
    pub output_dir: PathBuf,
    /// File name without extension.
    pub filename: String,
    /// One output file per format.
    pub formats: Vec<OutputFormat>,
    /// Scale every histogram to unit area before plotting.
    pub normalize: bool,
    /// Histograms to load.
    pub inputs: Vec<InputSpec>,
}

impl Default for PlotDict {
    fn default() -> Self {
        Self {
            labels: IndexMap::new(),
            title: None,
            texts: Vec::new(),
            x_label: String::new(),
            y_label: "Events".into(),
            z_label: String::new(),
            x_log: false,
            y_log: false,
            z_log: false,
            x_lims: None,
            y_lims: None,
            z_lims: None,
            output_dir: PathBuf::from("plots"),
            filename: "plot".into(),
            formats: vec![OutputFormat::Png],
            normalize: false,
            inputs: Vec::new(),
        }
    }
}

impl PlotDict {
    /// Parse a YAML document. JSON is accepted as well, being a YAML subset.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        serde_yaml_ng::from_str(text)
            .map_err(|e| PlotError::Config { path: PathBuf::from("<string>"), message: e.to_string() })
    }

    /// Load a plot config file; `.json` files go through `serde_json`, anything else is YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|source| PlotError::Io { path: path.to_path_buf(), source })?;
        let is_json = path.extension().is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let parsed: std::result::Result<Self, String> = if is_json {
            serde_json::from_str(&text).map_err(|e| e.to_string())
        } else {
            serde_yaml_ng::from_str(&text).map_err(|e| e.to_string())
        };
        parsed.map_err(|message| PlotError::Config { path: path.to_path_buf(), message })
    }

    /// Limits of axis `0..3` (x, y, z).
    pub fn lims(&self, axis: usize) -> Option<[f64; 2]> {
        match axis {
            0 => self.x_lims,
            1 => self.y_lims,
            _ => self.z_lims,
        }
    }

    /// Log flag of axis `0..3` (x, y, z).
    pub fn log(&self, axis: usize) -> bool {
        match axis {
            0 => self.x_log,
            1 => self.y_log,
            _ => self.z_log,
        }
    }

    /// Title of axis `0..3` (x, y, z).
    pub fn label(&self, axis: usize) -> &str {
        match axis {
            0 => &self.x_label,
            1 => &self.y_label,
            _ => &self.z_label,
        }
    }
}

/// State threaded through every processor of a run.
#[derive(Debug, Clone, Default)]
pub struct PlotData {
    /// Options.
    pub plotdict: PlotDict,
    /// Loaded histograms by nick, in input order.
    pub root_histos: IndexMap<String, Histogram>,
}

impl PlotData {
    /// Fresh run state with no histograms loaded.
    pub fn new(plotdict: PlotDict) -> Self {
        Self { plotdict, root_histos: IndexMap::new() }
    }

    /// `output_dir/filename.<ext>`.
    pub fn output_path(&self, format: OutputFormat) -> PathBuf {
        self.plotdict
            .output_dir
            .join(format!("{}.{}", self.plotdict.filename, format.extension()))
    }
}
