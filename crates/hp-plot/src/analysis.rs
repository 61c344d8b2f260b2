//! Analysis modules: processors that transform loaded histograms.

use crate::error::Result;
use crate::plot_data::PlotData;
use crate::processor::Processor;

/// Marker for processors that run between input and plotting.
pub trait AnalysisBase: Processor {}

/// Scale every histogram to unit integral when `normalize` is set.
///
/// Histograms with a zero integral are left untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct NormalizeToUnity;

impl NormalizeToUnity {
    /// New module.
    pub fn new() -> Self {
        Self
    }
}

impl Processor for NormalizeToUnity {
    fn name(&self) -> &str {
        "NormalizeToUnity"
    }

    fn run(&mut self, plot_data: &mut PlotData) -> Result<()> {
        if !plot_data.plotdict.normalize {
            return Ok(());
        }
        for (nick, hist) in &mut plot_data.root_histos {
            let integral = hist.integral();
            if integral == 0.0 || !integral.is_finite() {
                tracing::warn!(nick = nick.as_str(), "cannot normalize histogram with integral {integral}");
                continue;
            }
            hist.scale(1.0 / integral);
            tracing::debug!(nick = nick.as_str(), integral, "normalized to unit area");
        }
        Ok(())
    }
}

impl AnalysisBase for NormalizeToUnity {}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use hp_root::Histogram;

    use super::*;
    use crate::plot_data::PlotDict;

    fn data(normalize: bool) -> PlotData {
        let mut data = PlotData::new(PlotDict { normalize, ..Default::default() });
        data.root_histos.insert(
            "a".into(),
            Histogram::from_bins_1d("a", vec![0.0, 1.0, 2.0], &[1.0, 3.0]).unwrap(),
        );
        data.root_histos.insert(
            "empty".into(),
            Histogram::from_bins_1d("empty", vec![0.0, 1.0], &[0.0]).unwrap(),
        );
        data
    }

    #[test]
    fn scales_to_unit_area() {
        let mut d = data(true);
        NormalizeToUnity::new().run(&mut d).unwrap();
        let a = &d.root_histos["a"];
        assert_relative_eq!(a.integral(), 1.0);
        assert_relative_eq!(a.bin_content(2, 0, 0), 0.75);
        assert_eq!(d.root_histos["empty"].integral(), 0.0);
    }

    #[test]
    fn disabled_leaves_histograms_alone() {
        let mut d = data(false);
        NormalizeToUnity::new().run(&mut d).unwrap();
        assert_eq!(d.root_histos["a"].integral(), 4.0);
    }
}
