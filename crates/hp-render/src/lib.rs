pub mod att;
pub mod canvas;
pub mod color;
pub mod config;
pub mod font;
pub mod frame;
pub mod layout;
pub mod output;
pub mod plots;
pub mod text;
pub mod theme;

use config::VizConfig;
use output::OutputFormat;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unknown output format: {0}")]
    UnknownFormat(String),
    #[error("output format {0} is not enabled in this build")]
    FormatDisabled(OutputFormat),
    #[error("config error: {0}")]
    Config(String),
    #[error("layout error: {0}")]
    Layout(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "png")]
    #[error("PNG encoding error: {0}")]
    Png(String),
    #[cfg(feature = "pdf")]
    #[error("PDF conversion error: {0}")]
    Pdf(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// Convert a finished SVG document to bytes in the requested format.
pub fn render_to_bytes(svg: &str, format: OutputFormat, config: &VizConfig) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Svg => Ok(svg.as_bytes().to_vec()),
        #[cfg(feature = "png")]
        OutputFormat::Png => output::png::svg_to_png(svg, config.output.dpi),
        #[cfg(feature = "pdf")]
        OutputFormat::Pdf => output::pdf::svg_to_pdf(svg),
        #[allow(unreachable_patterns)]
        other => {
            let _ = config;
            Err(RenderError::FormatDisabled(other))
        }
    }
}

/// Write an SVG document to `path` in the requested format.
pub fn render_to_file(
    svg: &str,
    format: OutputFormat,
    path: &std::path::Path,
    config: &VizConfig,
) -> Result<()> {
    let bytes = render_to_bytes(svg, format, config)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="20" viewBox="0 0 40 20"><rect x="5" y="5" width="10" height="10" fill="#ff0000" /></svg>"##;

    #[test]
    fn svg_passes_through() {
        let bytes = render_to_bytes(SVG, OutputFormat::Svg, &VizConfig::default()).unwrap();
        assert_eq!(bytes, SVG.as_bytes());
    }

    #[cfg(feature = "png")]
    #[test]
    fn png_has_signature() {
        let bytes = render_to_bytes(SVG, OutputFormat::Png, &VizConfig::default()).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn pdf_has_header() {
        let bytes = render_to_bytes(SVG, OutputFormat::Pdf, &VizConfig::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
