//! harry CLI

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use hp_plot::{InputSpec, NormalizeToUnity, Pipeline, PlotData, PlotDict, RootInput, RootPlot};
use hp_render::config::resolve_config;
use hp_render::output::OutputFormat;
use hp_root::RootFile;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "harry")]
#[command(about = "harry - inspect ROOT files and plot their histograms")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every object in a ROOT file as `path (class)`
    Ls {
        /// ROOT file to inspect
        root_file: PathBuf,
    },

    /// Draw histograms from ROOT files into image files
    Plot(PlotArgs),
}

#[derive(Args)]
struct PlotArgs {
    /// Plot config (YAML or JSON). Flags given on the command line win.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Histogram to plot, as `[nick=]file.root:path/to/hist`. Repeatable.
    #[arg(short, long = "input")]
    inputs: Vec<InputSpec>,

    /// X axis title
    #[arg(long)]
    x_label: Option<String>,

    /// Y axis title
    #[arg(long)]
    y_label: Option<String>,

    /// Z axis title
    #[arg(long)]
    z_label: Option<String>,

    /// Logarithmic x axis
    #[arg(long)]
    x_log: bool,

    /// Logarithmic y axis
    #[arg(long)]
    y_log: bool,

    /// Logarithmic z axis
    #[arg(long)]
    z_log: bool,

    /// X range
    #[arg(long, num_args = 2, value_names = ["LO", "HI"], allow_negative_numbers = true)]
    x_lims: Option<Vec<f64>>,

    /// Y range
    #[arg(long, num_args = 2, value_names = ["LO", "HI"], allow_negative_numbers = true)]
    y_lims: Option<Vec<f64>>,

    /// Z range
    #[arg(long, num_args = 2, value_names = ["LO", "HI"], allow_negative_numbers = true)]
    z_lims: Option<Vec<f64>>,

    /// Plot title
    #[arg(long)]
    title: Option<String>,

    /// Free text line drawn inside the frame. Repeatable.
    #[arg(long = "text")]
    texts: Vec<String>,

    /// Scale every histogram to unit area
    #[arg(long)]
    normalize: bool,

    /// Output directory
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Output file name without extension
    #[arg(long)]
    filename: Option<String>,

    /// Output formats, comma separated (svg, png, pdf)
    #[arg(long, value_delimiter = ',')]
    formats: Option<Vec<OutputFormat>>,

    /// Render theme (default, minimal)
    #[arg(long, default_value = "default")]
    theme: String,

    /// YAML file with render settings layered over the theme
    #[arg(long)]
    style: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt().with_max_level(cli.log_level).with_target(false).init();

    match cli.command {
        Commands::Ls { root_file } => cmd_ls(&root_file),
        Commands::Plot(args) => cmd_plot(args),
    }
}

fn cmd_ls(path: &Path) -> Result<()> {
    let file = RootFile::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let entries = file.walk().with_context(|| format!("failed to read directories of {}", path.display()))?;
    for entry in entries {
        tracing::info!("{} ({})", entry.path, entry.key.class_name);
    }
    Ok(())
}

fn lims(values: Option<Vec<f64>>) -> Option<[f64; 2]> {
    values.and_then(|v| <[f64; 2]>::try_from(v).ok())
}

/// Config file values, overridden by whatever was given on the command line.
fn build_plot_dict(args: &mut PlotArgs) -> Result<PlotDict> {
    let mut dict = match &args.config {
        Some(path) => PlotDict::from_file(path)
            .with_context(|| format!("failed to load plot config {}", path.display()))?,
        None => PlotDict::default(),
    };

    dict.inputs.append(&mut args.inputs);
    dict.texts.append(&mut args.texts);
    if let Some(v) = args.x_label.take() {
        dict.x_label = v;
    }
    if let Some(v) = args.y_label.take() {
        dict.y_label = v;
    }
    if let Some(v) = args.z_label.take() {
        dict.z_label = v;
    }
    dict.x_log |= args.x_log;
    dict.y_log |= args.y_log;
    dict.z_log |= args.z_log;
    if let Some(v) = lims(args.x_lims.take()) {
        dict.x_lims = Some(v);
    }
    if let Some(v) = lims(args.y_lims.take()) {
        dict.y_lims = Some(v);
    }
    if let Some(v) = lims(args.z_lims.take()) {
        dict.z_lims = Some(v);
    }
    if let Some(v) = args.title.take() {
        dict.title = Some(v);
    }
    dict.normalize |= args.normalize;
    if let Some(v) = args.output_dir.take() {
        dict.output_dir = v;
    }
    if let Some(v) = args.filename.take() {
        dict.filename = v;
    }
    if let Some(v) = args.formats.take() {
        dict.formats = v;
    }
    Ok(dict)
}

fn cmd_plot(mut args: PlotArgs) -> Result<()> {
    let plotdict = build_plot_dict(&mut args)?;
    if plotdict.inputs.is_empty() {
        anyhow::bail!("no inputs given: use -i nick=file.root:path/to/hist or list them in --config");
    }

    let style = args
        .style
        .as_ref()
        .map(|p| std::fs::read_to_string(p).with_context(|| format!("failed to read style {}", p.display())))
        .transpose()?;
    let config = resolve_config(&args.theme, style.as_deref()).context("invalid render settings")?;

    let mut pipeline = Pipeline::new();
    pipeline
        .add_input(RootInput::new())
        .add_analysis(NormalizeToUnity::new())
        .add_plot(RootPlot::with_config(config));

    let mut plot_data = PlotData::new(plotdict);
    pipeline.execute(&mut plot_data).context("plotting failed")?;
    Ok(())
}
